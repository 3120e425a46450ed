// this is the entry point for the point synthesis plugin
use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use crate::config::*;
use crate::systems::landmarks::LatestSnapshots;
use crate::systems::{Canvas, FrameSet};

pub mod synth;

pub use synth::PointSet;

// runtime tunable synthesis parameters
#[derive(Resource, Debug, Clone)]
pub struct Params {
    pub lerp_speed: f32,
    pub face_skip: usize,
    pub random_points: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            lerp_speed: LERP_SPEED,
            face_skip: FACE_POINT_SKIP,
            random_points: RANDOM_POINTS,
        }
    }
}

impl Params {
    pub fn synth(&self) -> synth::SynthParams {
        synth::SynthParams {
            lerp_speed: self.lerp_speed,
            face_skip: self.face_skip.max(1),
        }
    }
}

#[derive(Resource)]
pub struct PointRng(pub StdRng);

// fired when face tracking is gained (true) or lost (false)
#[derive(Event, Debug, Clone, Copy)]
pub struct TrackingChanged(pub bool);

pub struct PointSynthesisPlugin;

impl Plugin for PointSynthesisPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(Params::default())
            .insert_resource(PointSet::default())
            .insert_resource(PointRng(StdRng::seed_from_u64(INITIAL_SEED)))
            .add_event::<TrackingChanged>()
            .add_systems(Update, update_points.in_set(FrameSet::Synthesize));
    }
}

pub fn update_points(
    mut points: ResMut<PointSet>,
    mut rng: ResMut<PointRng>,
    mut tracking_events: EventWriter<TrackingChanged>,
    latest: Res<LatestSnapshots>,
    params: Res<Params>,
    canvas: Res<Canvas>,
) {
    let was_tracking = points.face_present;
    let mut state = std::mem::take(&mut *points);

    // refill the reserved slot when its size no longer matches the setting
    if latest.face().is_some() && state.reserved.len() != params.random_points {
        state.reserved = synth::scatter_reserved(params.random_points, canvas.clip(), &mut rng.0);
    }

    *points = synth::update(state, latest.face(), &latest.hands, &params.synth());

    if points.face_present != was_tracking {
        if points.face_present {
            info!("face acquired, tracking {} points", points.current.len());
        } else {
            info!("face lost, point set cleared");
        }
        tracking_events.write(TrackingChanged(points.face_present));
    }
}
