use bevy::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};
use crate::config::RANDOM_POINTS_MAX;
use crate::systems::export::ExportEvent;
use crate::systems::landmarks::{face_bounding_box, LatestSnapshots};
use crate::systems::overlay::{CellDiagram, OverlaySettings, Trail};
use crate::systems::points::{Params, PointSet};

pub mod indicator;

pub use indicator::{TrackingIndicator, update_tracking_indicator, render_tracking_indicator};

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app
            .insert_resource(TrackingIndicator::default())
            .add_systems(Update, (key_input, update_tracking_indicator))
            .add_systems(EguiPrimaryContextPass, (ui_main, fps, render_tracking_indicator)); // UI rendering here
    }
}

fn key_input(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut settings: ResMut<OverlaySettings>,
) {
    if keyboard_input.just_pressed(KeyCode::Tab) {
        settings.show_points = !settings.show_points;
    }
    if keyboard_input.just_pressed(KeyCode::KeyT) {
        settings.trails = !settings.trails;
    }
}

fn ui_main(
    mut contexts: EguiContexts,
    mut params: ResMut<Params>,
    mut settings: ResMut<OverlaySettings>,
    mut trail: ResMut<Trail>,
    mut export_events: EventWriter<ExportEvent>,
    points: Res<PointSet>,
    latest: Res<LatestSnapshots>,
    diagram: Res<CellDiagram>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::SidePanel::left("config_panel")
            .default_width(200.0)
            .min_width(250.0)
            .max_width(400.0)
            .resizable(true)
            .show(ctx, |ui| {
                // tracking state
                ui.label("Tracking:");
                ui.horizontal(|ui| {
                    let (state_text, bg_color) = if points.face_present {
                        ("FACE", egui::Color32::from_rgb(50, 91, 34))
                    } else {
                        ("NO FACE", egui::Color32::from_rgb(130, 22, 22))
                    };

                    let frame = egui::Frame::new()
                        .fill(bg_color)
                        .inner_margin(egui::Margin::symmetric(4, 1))
                        .corner_radius(egui::CornerRadius::same(3));

                    frame.show(ui, |ui| {
                        ui.label(egui::RichText::new(state_text)
                            .size(12.0)
                            .color(egui::Color32::WHITE)
                            .strong());
                    });

                    ui.label(format!("{} hand(s)", latest.hands.len()));
                });

                ui.separator();

                egui::CollapsingHeader::new("Points")
                    .default_open(true)
                    .show(ui, |ui| {
                    let face_points = latest.face()
                        .map(|f| f.keypoints.len().div_ceil(params.face_skip.max(1)))
                        .unwrap_or(0);
                    ui.label(format!("Face: {}", if points.face_present { face_points } else { 0 }));
                    ui.label(format!("Hands: {}", if points.face_present { latest.hands.len() * 11 } else { 0 }));
                    ui.label(format!("Reserved: {}", points.reserved.len()));
                    ui.label(format!("Current: {}", points.current.len()));
                    ui.label(format!("Cells drawn: {}", diagram.drawable().count()));

                    // not part of the diagram, handy when lining up a recording
                    if let Some(bbox) = latest.face().and_then(face_bounding_box) {
                        ui.label(format!(
                            "Face box: {:.0}, {:.0}  {:.0} x {:.0}",
                            bbox.x, bbox.y, bbox.width, bbox.height
                        ));
                    }
                });

                egui::CollapsingHeader::new("Smoothing")
                    .default_open(true)
                    .show(ui, |ui| {
                    ui.add(egui::Slider::new(&mut params.lerp_speed, 0.05..=0.95)
                        .text("Lerp Speed"))
                        .on_hover_text("Fraction of the distance to the detected landmarks covered every frame. Higher is snappier.");
                    ui.add(egui::Slider::new(&mut params.face_skip, 1..=12)
                        .text("Face Point Skip"))
                        .on_hover_text("Keep every Nth face landmark. Lower values give denser cells.");
                    ui.add(egui::Slider::new(&mut params.random_points, 0..=RANDOM_POINTS_MAX)
                        .text("Random Points"))
                        .on_hover_text("Extra points scattered over the canvas, re-scattered when the face comes back.");
                });

                egui::CollapsingHeader::new("Display")
                    .default_open(true)
                    .show(ui, |ui| {
                    ui.checkbox(&mut settings.trails, "Trails (T)")
                        .on_hover_text("Let previous frames fade out instead of disappearing");
                    ui.checkbox(&mut settings.show_points, "Points (TAB)")
                        .on_hover_text("Show smoothed points and their raw targets");
                    ui.label(format!("Trail frames: {}", trail.len()));
                    if ui.button("Clear Trails").clicked() {
                        trail.clear();
                    }
                });

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Export SVG")
                        .on_hover_text("Export current cells as SVG file, current directory")
                        .clicked() {
                        let timestamp = std::time::SystemTime::now()
                            .duration_since(std::time::UNIX_EPOCH)
                            .map(|d| d.as_secs())
                            .unwrap_or_default();
                        let filename = format!("voronoi_{}.svg", timestamp);
                        export_events.write(ExportEvent { filename });
                    }
                });

                ui.separator();
                ui.label("ESC - Exit");
            });
    }
}

fn fps(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("fps_counter"))
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 10.0))
            .show(ctx, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::RIGHT), |ui| {
                    if let Some(fps_diagnostic) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
                        if let Some(fps) = fps_diagnostic.smoothed() {
                            ui.label(egui::RichText::new(format!("{:.0}", fps))
                                .size(26.0)
                                .color(egui::Color32::WHITE));
                        }
                    }
                });
            });
    }
}
