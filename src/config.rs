// Configuration file, all measurements in canvas pixels
// This controls the initial parameter settings, most of them can be tuned at runtime
use crate::systems::landmarks::HandLandmark;

// Window / canvas
pub const WINDOW_WIDTH: f32 = 1280.0;
pub const WINDOW_HEIGHT: f32 = 720.0;

// Point synthesis
pub const LERP_SPEED: f32 = 0.7;        // fraction of the remaining distance covered per frame
pub const FACE_POINT_SKIP: usize = 3;   // keep every Nth face landmark
pub const RANDOM_POINTS: usize = 0;     // extra scattered points appended to every target
pub const RANDOM_POINTS_MAX: usize = 60;

// Hand layout indices (21-point hand model)
pub const FINGER_TIPS: [usize; 5] = [
    HandLandmark::ThumbTip.index(),
    HandLandmark::IndexTip.index(),
    HandLandmark::MiddleTip.index(),
    HandLandmark::RingTip.index(),
    HandLandmark::PinkyTip.index(),
];
// middle joint of every finger, the mcp for the thumb
pub const KNUCKLES: [usize; 5] = [
    HandLandmark::ThumbMcp.index(),
    HandLandmark::IndexPip.index(),
    HandLandmark::MiddlePip.index(),
    HandLandmark::RingPip.index(),
    HandLandmark::PinkyPip.index(),
];
pub const PALM_CENTER: usize = HandLandmark::Wrist.index();
pub const HAND_LANDMARK_COUNT: usize = HandLandmark::ALL.len();
pub const FACE_LANDMARK_COUNT: usize = 468;

// Detectors
pub const MAX_FACES: usize = 1;
pub const FACE_DETECT_INTERVAL: f32 = 1.0 / 30.0; // seconds between face results
pub const HAND_DETECT_INTERVAL: f32 = 1.0 / 24.0; // hands usually come in slower
pub const INITIAL_SEED: u64 = 1512086461918454205;
pub const LANDMARK_JITTER: f32 = 0.6;             // std dev of synthetic landmark noise

// Overlay
pub const HUE_STEP: f32 = 2.0;              // degrees per frame
pub const TRAIL_FADE: f32 = 25.0 / 255.0;   // alpha removed per frame by the fade pass
pub const TRAIL_LENGTH: usize = 24;         // frames kept before they are practically invisible
