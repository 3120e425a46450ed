use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::config::{WINDOW_HEIGHT, WINDOW_WIDTH};

pub mod export;
pub mod landmarks;
pub mod overlay;
pub mod points;
pub mod ui;

// per frame ordering: detectors -> snapshot intake -> point synthesis -> drawing
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Detect,
    Intake,
    Synthesize,
    Render,
}

// canvas size follows the window, origin top left, y down
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub size: Vec2,
}

impl Default for Canvas {
    fn default() -> Self {
        Self { size: Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT) }
    }
}

impl Canvas {
    pub fn clip(&self) -> Rect {
        Rect::from_corners(Vec2::ZERO, self.size)
    }

    // canvas pixels to 2d world space, camera sits at the window center
    pub fn to_world(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - self.size.x * 0.5, self.size.y * 0.5 - p.y)
    }
}

pub struct FramePlugin;

impl Plugin for FramePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<Canvas>()
            .init_resource::<landmarks::LatestSnapshots>()
            .configure_sets(
                Update,
                (FrameSet::Detect, FrameSet::Intake, FrameSet::Synthesize, FrameSet::Render).chain(),
            )
            .add_systems(PreUpdate, track_canvas)
            .add_systems(
                Update,
                (landmarks::receive_faces, landmarks::receive_hands).in_set(FrameSet::Intake),
            );
    }
}

fn track_canvas(
    mut canvas: ResMut<Canvas>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let size = Vec2::new(window.width(), window.height());
    if size != canvas.size && size.x > 0.0 && size.y > 0.0 {
        debug!("canvas resized to {}x{}", size.x, size.y);
        canvas.size = size;
    }
}
