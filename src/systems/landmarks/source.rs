// detector stand-ins
// every detector answers with landmarks for the current video frame,
// face and hand detectors tick on their own timers, like the async model callbacks did
use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use rand::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::Normal;

use super::{FaceResults, FaceSnapshot, HandLandmark, HandResults, HandSnapshot, Landmark};
use super::replay::ReplaySource;
use crate::config::*;
use crate::systems::Canvas;

/// What a detector gets to see of the video source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoFrame {
    pub size: Vec2,
    pub time: f32,
}

/// Face and hand landmark detection, in canvas pixels.
pub trait LandmarkSource: Send + Sync {
    fn detect_faces(&mut self, frame: &VideoFrame) -> Vec<FaceSnapshot>;
    fn detect_hands(&mut self, frame: &VideoFrame) -> Vec<HandSnapshot>;
}

#[derive(Resource)]
pub struct ActiveSource(pub Box<dyn LandmarkSource>);

#[derive(Resource, Debug, Clone)]
pub struct DetectorSettings {
    pub max_faces: usize,
    pub face_interval: f32,
    pub hand_interval: f32,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            max_faces: MAX_FACES,
            face_interval: FACE_DETECT_INTERVAL,
            hand_interval: HAND_DETECT_INTERVAL,
        }
    }
}

#[derive(Resource)]
struct DetectorClock {
    face: Timer,
    hand: Timer,
}

impl DetectorClock {
    fn new(settings: &DetectorSettings) -> Self {
        Self {
            face: Timer::from_seconds(settings.face_interval, TimerMode::Repeating),
            hand: Timer::from_seconds(settings.hand_interval, TimerMode::Repeating),
        }
    }
}

pub struct DetectorPlugin;

impl Plugin for DetectorPlugin {
    fn build(&self, app: &mut App) {
        let settings = DetectorSettings::default();
        app
            .insert_resource(DetectorClock::new(&settings))
            .insert_resource(settings)
            .insert_resource(ActiveSource(open_source(std::env::args().nth(1))))
            .add_event::<FaceResults>()
            .add_event::<HandResults>()
            .add_systems(
                Update,
                (sync_detector_clock, (run_face_detector, run_hand_detector))
                    .chain()
                    .in_set(crate::systems::FrameSet::Detect),
            );
    }
}

// a recording path on the command line replaces the synthetic source
fn open_source(path: Option<String>) -> Box<dyn LandmarkSource> {
    if let Some(path) = path {
        match ReplaySource::open(&path) {
            Ok(replay) => {
                info!("replaying {} landmark frames from {}", replay.len(), path);
                return Box::new(replay);
            }
            Err(e) => {
                error!("could not load recording {}: {}", path, e);
            }
        }
    }

    info!("using synthetic landmarks");
    Box::new(SyntheticSource::new(INITIAL_SEED, LANDMARK_JITTER))
}

// intervals edited at runtime restart both timers
fn sync_detector_clock(
    mut clock: ResMut<DetectorClock>,
    settings: Res<DetectorSettings>,
) {
    if settings.is_changed() {
        debug!(
            "detector intervals: faces {:.3}s, hands {:.3}s",
            settings.face_interval, settings.hand_interval
        );
        *clock = DetectorClock::new(&settings);
    }
}

fn current_frame(canvas: &Canvas, time: &Time) -> VideoFrame {
    VideoFrame { size: canvas.size, time: time.elapsed_secs() }
}

fn run_face_detector(
    mut clock: ResMut<DetectorClock>,
    mut source: ResMut<ActiveSource>,
    mut results: EventWriter<FaceResults>,
    settings: Res<DetectorSettings>,
    canvas: Res<Canvas>,
    time: Res<Time>,
) {
    if !clock.face.tick(time.delta()).just_finished() {
        return;
    }

    let frame = current_frame(&canvas, &time);
    let mut faces = source.0.detect_faces(&frame);
    faces.truncate(settings.max_faces);
    results.write(FaceResults(faces));
}

fn run_hand_detector(
    mut clock: ResMut<DetectorClock>,
    mut source: ResMut<ActiveSource>,
    mut results: EventWriter<HandResults>,
    canvas: Res<Canvas>,
    time: Res<Time>,
) {
    if !clock.hand.tick(time.delta()).just_finished() {
        return;
    }

    let frame = current_frame(&canvas, &time);
    results.write(HandResults(source.0.detect_hands(&frame)));
}

/// Procedural landmarks: a swaying face oval and two hands that come and go.
pub struct SyntheticSource {
    rng: StdRng,
    noise: Option<Normal<f32>>,
}

impl SyntheticSource {
    pub fn new(seed: u64, jitter: f32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            noise: Normal::new(0.0, jitter).ok(),
        }
    }

    fn jitter(&mut self, p: Vec2) -> Landmark {
        let (dx, dy) = match self.noise {
            Some(noise) => (self.rng.sample(noise), self.rng.sample(noise)),
            None => (0.0, 0.0),
        };
        Landmark::new(p.x + dx, p.y + dy)
    }

    // hand `side` is -1 for the left of the frame, 1 for the right
    fn hand(&mut self, frame: &VideoFrame, side: f32) -> HandSnapshot {
        let t = frame.time;
        let wrist = Vec2::new(
            frame.size.x * (0.5 + side * 0.3),
            frame.size.y * 0.8 + (t * 1.3 + side).sin() * frame.size.y * 0.05,
        );
        let scale = frame.size.y * 0.05;
        let tilt = side * 0.25 + (t * 0.9).sin() * 0.3;

        // thumb first, each finger has four joints walking away from the wrist
        let keypoints = HandLandmark::ALL
            .iter()
            .map(|lm| {
                let Some((finger, joint)) = lm.finger_joint() else {
                    return self.jitter(wrist);
                };
                let spread = (finger as f32 - 2.0) * 0.32 * -side;
                let angle = tilt + spread + if finger == 0 { -side * 0.5 } else { 0.0 };
                let dir = Vec2::new(angle.sin(), -angle.cos());
                let base = if finger == 0 { 0.6 } else { 1.8 };
                let curl = 0.85 + 0.15 * (t * 2.0 + finger as f32).sin();
                let reach = (base + joint as f32 * 0.9 * curl) * scale;
                self.jitter(wrist + dir * reach)
            })
            .collect();

        HandSnapshot { keypoints }
    }
}

impl LandmarkSource for SyntheticSource {
    fn detect_faces(&mut self, frame: &VideoFrame) -> Vec<FaceSnapshot> {
        let t = frame.time;
        let center = Vec2::new(
            frame.size.x * 0.5 + (t * 0.7).sin() * frame.size.x * 0.08,
            frame.size.y * 0.45 + (t * 0.5).cos() * frame.size.y * 0.04,
        );
        let radii = Vec2::new(frame.size.y * 0.2, frame.size.y * 0.27);
        let roll = (t * 0.6).sin() * 0.15;

        // sunflower layout fills the oval evenly
        let golden = PI * (3.0 - 5.0f32.sqrt());
        let n = FACE_LANDMARK_COUNT as f32;
        let keypoints = (0..FACE_LANDMARK_COUNT)
            .map(|i| {
                let r = ((i as f32 + 0.5) / n).sqrt();
                let a = i as f32 * golden;
                let local = Vec2::new(a.cos() * r * radii.x, a.sin() * r * radii.y);
                self.jitter(center + Vec2::from_angle(roll).rotate(local))
            })
            .collect();

        vec![FaceSnapshot { keypoints }]
    }

    fn detect_hands(&mut self, frame: &VideoFrame) -> Vec<HandSnapshot> {
        let mut hands = Vec::new();
        // each hand is in view for a bit more than half of its cycle
        for (i, side) in [-1.0f32, 1.0].into_iter().enumerate() {
            let phase = (frame.time * TAU / 9.0 + i as f32 * PI * 0.6).sin();
            if phase > -0.2 {
                hands.push(self.hand(frame, side));
            }
        }
        hands
    }
}
