// landmark datatypes and the intake side of the detectors
// detectors write result events, intake keeps only the latest one of each kind
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod replay;
pub mod source;

/// A single detector keypoint in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    // depth is dropped, the diagram is flat
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Keypoints of one detected face, in detector order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceSnapshot {
    pub keypoints: Vec<Landmark>,
}

/// Keypoints of one detected hand, 21-point layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandSnapshot {
    pub keypoints: Vec<Landmark>,
}

impl HandSnapshot {
    /// Looks up a keypoint of the hand layout.
    ///
    /// # Panics
    ///
    /// A snapshot shorter than the layout is a detector contract violation and panics.
    pub fn keypoint(&self, idx: usize) -> &Landmark {
        match self.keypoints.get(idx) {
            Some(kp) => kp,
            None => panic!(
                "hand snapshot has {} keypoints, landmark {} requested",
                self.keypoints.len(),
                idx
            ),
        }
    }
}

// named indices of the 21-point hand model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    /// Every landmark in detector order.
    pub const ALL: [HandLandmark; 21] = [
        HandLandmark::Wrist,
        HandLandmark::ThumbCmc,
        HandLandmark::ThumbMcp,
        HandLandmark::ThumbIp,
        HandLandmark::ThumbTip,
        HandLandmark::IndexMcp,
        HandLandmark::IndexPip,
        HandLandmark::IndexDip,
        HandLandmark::IndexTip,
        HandLandmark::MiddleMcp,
        HandLandmark::MiddlePip,
        HandLandmark::MiddleDip,
        HandLandmark::MiddleTip,
        HandLandmark::RingMcp,
        HandLandmark::RingPip,
        HandLandmark::RingDip,
        HandLandmark::RingTip,
        HandLandmark::PinkyMcp,
        HandLandmark::PinkyPip,
        HandLandmark::PinkyDip,
        HandLandmark::PinkyTip,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    // (finger, joint), thumb is finger 0 and joint 0 sits nearest the wrist
    pub const fn finger_joint(self) -> Option<(usize, usize)> {
        match self {
            HandLandmark::Wrist => None,
            other => {
                let i = other.index() - 1;
                Some((i / 4, i % 4))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Axis aligned box around every keypoint of a face.
/// # Returns `None` for a face without keypoints.
pub fn face_bounding_box(face: &FaceSnapshot) -> Option<BoundingBox> {
    if face.keypoints.is_empty() {
        return None;
    }

    let (min, max) = face.keypoints.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(min, max), kp| (min.min(kp.xy()), max.max(kp.xy())),
    );

    Some(BoundingBox {
        x: min.x,
        y: min.y,
        width: max.x - min.x,
        height: max.y - min.y,
    })
}

// detector results, one event per detector callback
#[derive(Event, Debug, Clone)]
pub struct FaceResults(pub Vec<FaceSnapshot>);

#[derive(Event, Debug, Clone)]
pub struct HandResults(pub Vec<HandSnapshot>);

// most recent detector output, held until replaced
#[derive(Resource, Debug, Default)]
pub struct LatestSnapshots {
    pub faces: Vec<FaceSnapshot>,
    pub hands: Vec<HandSnapshot>,
}

impl LatestSnapshots {
    // only the first face is ever tracked
    pub fn face(&self) -> Option<&FaceSnapshot> {
        self.faces.first()
    }
}

pub fn receive_faces(
    mut events: EventReader<FaceResults>,
    mut latest: ResMut<LatestSnapshots>,
) {
    // last write wins, nothing is queued
    if let Some(results) = events.read().last() {
        latest.faces = results.0.clone();
    }
}

pub fn receive_hands(
    mut events: EventReader<HandResults>,
    mut latest: ResMut<LatestSnapshots>,
) {
    if let Some(results) = events.read().last() {
        latest.hands = results.0.clone();
    }
}
