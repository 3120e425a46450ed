// plays back landmark recordings
// recordings are json: { "fps": 30, "frames": [ { "faces": [[{x,y,z}..]], "hands": [[..]] } ] }
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::source::{LandmarkSource, VideoFrame};
use super::{FaceSnapshot, HandSnapshot};

#[derive(Debug)]
pub enum ReplayError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Empty,
    BadFrameRate(f32),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::Io(err) => write!(f, "io error: {}", err),
            ReplayError::Parse(err) => write!(f, "recording parse error: {}", err),
            ReplayError::Empty => write!(f, "recording has no frames"),
            ReplayError::BadFrameRate(fps) => write!(f, "invalid recording frame rate: {}", fps),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<std::io::Error> for ReplayError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(default)]
    pub faces: Vec<FaceSnapshot>,
    #[serde(default)]
    pub hands: Vec<HandSnapshot>,
}

fn default_fps() -> f32 {
    30.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    #[serde(default = "default_fps")]
    pub fps: f32,
    pub frames: Vec<RecordedFrame>,
}

/// Loops over a recording, picking the frame by capture time.
#[derive(Debug)]
pub struct ReplaySource {
    recording: Recording,
}

impl ReplaySource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        let recording: Recording = serde_json::from_str(text)?;
        Self::new(recording)
    }

    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        if recording.frames.is_empty() {
            return Err(ReplayError::Empty);
        }
        if !(recording.fps.is_finite() && recording.fps > 0.0) {
            return Err(ReplayError::BadFrameRate(recording.fps));
        }
        Ok(Self { recording })
    }

    pub fn len(&self) -> usize {
        self.recording.frames.len()
    }

    fn frame_at(&self, time: f32) -> &RecordedFrame {
        let idx = (time.max(0.0) * self.recording.fps) as usize % self.recording.frames.len();
        &self.recording.frames[idx]
    }
}

impl LandmarkSource for ReplaySource {
    fn detect_faces(&mut self, frame: &VideoFrame) -> Vec<FaceSnapshot> {
        self.frame_at(frame.time).faces.clone()
    }

    fn detect_hands(&mut self, frame: &VideoFrame) -> Vec<HandSnapshot> {
        self.frame_at(frame.time).hands.clone()
    }
}
