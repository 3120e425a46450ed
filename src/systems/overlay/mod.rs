// this is the entry point for the overlay plugin
// turns the smoothed point set into voronoi cells and draws them
use std::collections::VecDeque;

use bevy::prelude::*;

use crate::config::*;
use crate::systems::points::PointSet;
use crate::systems::{Canvas, FrameSet};

pub mod poly;

// my 2d polygon datatype, canvas coordinates
pub type Polygon = Vec<Vec2>;

// cells of the current frame, indexed like PointSet::current
#[derive(Resource, Default, Debug)]
pub struct CellDiagram {
    pub cells: Vec<Option<Polygon>>,
}

impl CellDiagram {
    pub fn drawable(&self) -> impl Iterator<Item = &Polygon> {
        self.cells.iter().flatten()
    }
}

// stroke hue in degrees, cycles every frame
#[derive(Resource, Default, Debug)]
pub struct Hue(pub f32);

impl Hue {
    pub fn advance(&mut self, step: f32) {
        self.0 = (self.0 + step) % 360.0;
    }
}

#[derive(Resource, Debug)]
pub struct OverlaySettings {
    pub trails: bool,
    pub show_points: bool,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self { trails: true, show_points: false }
    }
}

#[derive(Debug, Clone)]
pub struct TrailFrame {
    pub hue: f32,
    pub cells: Vec<Polygon>,
}

/// Recent frames of cells, newest first.
/// A frame `age` frames old is drawn with alpha `(1 - fade)^age`,
/// the same falloff a translucent black fill over the canvas gives every frame.
#[derive(Resource, Debug)]
pub struct Trail {
    frames: VecDeque<TrailFrame>,
    capacity: usize,
    fade: f32,
}

impl Default for Trail {
    fn default() -> Self {
        Self::new(TRAIL_LENGTH, TRAIL_FADE)
    }
}

impl Trail {
    pub fn new(capacity: usize, fade: f32) -> Self {
        Self { frames: VecDeque::with_capacity(capacity), capacity, fade }
    }

    // frames without a face still push, so older cells keep fading
    pub fn push(&mut self, frame: TrailFrame) {
        self.frames.push_front(frame);
        self.frames.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn alpha(&self, age: usize) -> f32 {
        (1.0 - self.fade).powi(age as i32)
    }

    /// Oldest first, so newer cells are drawn on top.
    pub fn faded(&self) -> impl Iterator<Item = (f32, &TrailFrame)> {
        self.frames
            .iter()
            .enumerate()
            .rev()
            .map(|(age, frame)| (self.alpha(age), frame))
    }
}

// main plugin for the overlay
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<CellDiagram>()
            .init_resource::<Hue>()
            .init_resource::<OverlaySettings>()
            .init_resource::<Trail>()
            .add_event::<crate::systems::export::ExportEvent>()
            .add_systems(
                Update,
                (
                    (build_cells, draw_cells, debug_gizmos).chain().in_set(FrameSet::Render),
                    crate::systems::export::handle_export.after(FrameSet::Render),
                ),
            );
    }
}

pub fn build_cells(
    mut diagram: ResMut<CellDiagram>,
    mut trail: ResMut<Trail>,
    mut hue: ResMut<Hue>,
    points: Res<PointSet>,
    canvas: Res<Canvas>,
) {
    hue.advance(HUE_STEP);

    // no face means no tessellation this frame
    diagram.cells = if points.face_present && !points.current.is_empty() {
        poly::voronoi::cell_polygons(&points.current, canvas.clip())
    } else {
        Vec::new()
    };

    trail.push(TrailFrame {
        hue: hue.0,
        cells: diagram.drawable().cloned().collect(),
    });
}

fn draw_polygon(gizmos: &mut Gizmos, canvas: &Canvas, polygon: &Polygon, color: Color) {
    let Some(&first) = polygon.first() else {
        return;
    };

    // close the outline
    let outline = polygon.iter().chain(std::iter::once(&first)).map(|&p| canvas.to_world(p));
    gizmos.linestrip_2d(outline, color);
}

fn draw_cells(
    mut gizmos: Gizmos,
    diagram: Res<CellDiagram>,
    trail: Res<Trail>,
    settings: Res<OverlaySettings>,
    hue: Res<Hue>,
    canvas: Res<Canvas>,
) {
    if settings.trails {
        for (alpha, frame) in trail.faded() {
            let color = Color::hsva(frame.hue, 1.0, 1.0, alpha);
            for cell in &frame.cells {
                draw_polygon(&mut gizmos, &canvas, cell, color);
            }
        }
    } else {
        let color = Color::hsv(hue.0, 1.0, 1.0);
        for cell in diagram.drawable() {
            draw_polygon(&mut gizmos, &canvas, cell, color);
        }
    }
}

fn debug_gizmos(
    mut gizmos: Gizmos,
    points: Res<PointSet>,
    settings: Res<OverlaySettings>,
    canvas: Res<Canvas>,
) {
    if !settings.show_points {
        return;
    }

    // smoothed generators, with the raw targets faded behind them
    for p in &points.target {
        gizmos.circle_2d(canvas.to_world(*p), 2.0, Color::srgba(1.0, 1.0, 1.0, 0.25));
    }
    for p in &points.current {
        gizmos.circle_2d(canvas.to_world(*p), 3.0, Color::srgba(1.0, 0.5, 0.0, 0.8));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(hue: f32) -> TrailFrame {
        TrailFrame { hue, cells: Vec::new() }
    }

    #[test]
    fn hue_wraps() {
        let mut hue = Hue(359.0);
        hue.advance(2.0);
        assert_eq!(hue.0, 1.0);
    }

    #[test]
    fn trail_evicts_oldest() {
        let mut trail = Trail::new(3, TRAIL_FADE);
        for h in 0..5 {
            trail.push(frame(h as f32));
        }
        assert_eq!(trail.len(), 3);
        let hues: Vec<f32> = trail.faded().map(|(_, f)| f.hue).collect();
        assert_eq!(hues, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn trail_alpha_decays_with_age() {
        let mut trail = Trail::new(TRAIL_LENGTH, TRAIL_FADE);
        for h in 0..TRAIL_LENGTH {
            trail.push(frame(h as f32));
        }
        let alphas: Vec<f32> = trail.faded().map(|(a, _)| a).collect();
        assert_eq!(*alphas.last().unwrap(), 1.0);
        assert!(alphas.windows(2).all(|w| w[0] < w[1]));
        assert!((trail.alpha(1) - (230.0 / 255.0)).abs() < 1e-6);
    }

    #[test]
    fn no_face_draws_nothing_but_keeps_fading() {
        let mut app = App::new();
        app.init_resource::<CellDiagram>()
            .init_resource::<Hue>()
            .init_resource::<Trail>()
            .init_resource::<Canvas>()
            .insert_resource(PointSet {
                current: vec![Vec2::new(100.0, 100.0), Vec2::new(300.0, 200.0)],
                face_present: true,
                ..default()
            })
            .add_systems(Update, build_cells);

        app.update();
        assert_eq!(app.world().resource::<CellDiagram>().drawable().count(), 2);

        app.insert_resource(PointSet::default());
        app.update();
        assert!(app.world().resource::<CellDiagram>().cells.is_empty());

        let trail = app.world().resource::<Trail>();
        assert_eq!(trail.len(), 2);
        let (alpha, oldest) = trail.faded().next().unwrap();
        assert_eq!(oldest.cells.len(), 2);
        assert!(alpha < 1.0);
        assert_eq!(app.world().resource::<Hue>().0, 2.0 * HUE_STEP);
    }
}
