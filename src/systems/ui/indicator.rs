use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use crate::systems::points::TrackingChanged;

// banner shown for a moment when the face is found or lost
#[derive(Resource)]
pub struct TrackingIndicator {
    pub tracking: bool,
    pub timer: f32,
    pub duration: f32,
}

impl Default for TrackingIndicator {
    fn default() -> Self {
        Self {
            tracking: false,
            timer: 0.0,
            duration: 2.0,
        }
    }
}

impl TrackingIndicator {
    pub fn trigger(&mut self, tracking: bool) {
        self.tracking = tracking;
        self.timer = self.duration;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.timer > 0.0 {
            self.timer = (self.timer - dt).max(0.0);
        }
    }

    pub fn alpha(&self) -> f32 {
        (self.timer / self.duration).clamp(0.0, 1.0)
    }
}

pub fn update_tracking_indicator(
    mut indicator: ResMut<TrackingIndicator>,
    mut events: EventReader<TrackingChanged>,
    time: Res<Time>,
) {
    for event in events.read() {
        indicator.trigger(event.0);
    }

    indicator.tick(time.delta_secs());
}

pub fn render_tracking_indicator(
    indicator: Res<TrackingIndicator>,
    mut contexts: EguiContexts,
) {
    if indicator.timer <= 0.0 {
        return;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        let alpha = indicator.alpha();

        let (text, bg_color) = if indicator.tracking {
            ("FACE FOUND", egui::Color32::from_rgb(50, 91, 34))
        } else {
            ("FACE LOST", egui::Color32::from_rgb(178, 34, 34))
        };

        egui::Area::new(egui::Id::new("tracking_indicator"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 60.0))
            .show(ctx, |ui| {
                let frame = egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(
                        bg_color.r(), bg_color.g(), bg_color.b(),
                        (200.0 * alpha) as u8
                    ))
                    .stroke(egui::Stroke::new(
                        1.5,
                        egui::Color32::from_rgba_unmultiplied(255, 255, 255, (180.0 * alpha) as u8)
                    ))
                    .inner_margin(egui::Margin::symmetric(12, 6))
                    .corner_radius(egui::CornerRadius::same(6));

                frame.show(ui, |ui| {
                    ui.label(egui::RichText::new(text)
                        .size(14.0)
                        .color(egui::Color32::from_rgba_unmultiplied(255, 255, 255, (255.0 * alpha) as u8))
                        .strong());
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_fades_out() {
        let mut indicator = TrackingIndicator::default();
        assert_eq!(indicator.alpha(), 0.0);

        indicator.trigger(true);
        assert_eq!(indicator.alpha(), 1.0);

        indicator.tick(1.0);
        assert!((indicator.alpha() - 0.5).abs() < 1e-6);

        indicator.tick(5.0);
        assert_eq!(indicator.timer, 0.0);
        assert!(indicator.tracking);
    }
}
