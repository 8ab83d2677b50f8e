/// Pose landmark models
///
/// This module provides the 33-point body landmark layout produced by pose
/// estimators, plus the timestamped frame that carries one detection.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a complete body detection
pub const LANDMARK_COUNT: usize = 33;

/// A single body landmark in normalized image coordinates (`y` grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    /// Detection visibility (0-1)
    #[serde(default = "default_visibility")]
    pub visibility: f32,
}

fn default_visibility() -> f32 {
    1.0
}

impl Landmark {
    /// Create a fully visible landmark on the image plane
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility.clamp(0.0, 1.0);
        self
    }

    /// Check if the landmark is usable at the given visibility threshold
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility >= threshold && self.x.is_finite() && self.y.is_finite()
    }
}

/// Standard 33-point body landmark indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get landmark name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEyeInner => "left_eye_inner",
            Self::LeftEye => "left_eye",
            Self::LeftEyeOuter => "left_eye_outer",
            Self::RightEyeInner => "right_eye_inner",
            Self::RightEye => "right_eye",
            Self::RightEyeOuter => "right_eye_outer",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::MouthLeft => "mouth_left",
            Self::MouthRight => "mouth_right",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftPinky => "left_pinky",
            Self::RightPinky => "right_pinky",
            Self::LeftIndex => "left_index",
            Self::RightIndex => "right_index",
            Self::LeftThumb => "left_thumb",
            Self::RightThumb => "right_thumb",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
            Self::LeftHeel => "left_heel",
            Self::RightHeel => "right_heel",
            Self::LeftFootIndex => "left_foot_index",
            Self::RightFootIndex => "right_foot_index",
        }
    }
}

/// One pose detection with its capture time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Capture timestamp in milliseconds, monotonically increasing within a session
    pub timestamp_ms: u64,
    /// Landmarks addressed by `PoseLandmark` index
    pub landmarks: Vec<Landmark>,
}

impl PoseFrame {
    pub fn new(timestamp_ms: u64, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp_ms,
            landmarks,
        }
    }

    /// Get landmark by name; missing indices yield `None`
    pub fn get(&self, landmark: PoseLandmark) -> Option<&Landmark> {
        self.landmarks.get(landmark.index())
    }

    /// Get landmark only if it meets the visibility threshold
    pub fn visible(&self, landmark: PoseLandmark, threshold: f32) -> Option<&Landmark> {
        self.get(landmark).filter(|lm| lm.is_visible(threshold))
    }

    /// Check if all required landmarks are visible
    pub fn all_visible(&self, required: &[PoseLandmark], threshold: f32) -> bool {
        required
            .iter()
            .all(|landmark| self.visible(*landmark, threshold).is_some())
    }

    /// Replace one landmark, padding missing indices with invisible placeholders
    pub fn set(&mut self, landmark: PoseLandmark, value: Landmark) {
        let index = landmark.index();
        if self.landmarks.len() <= index {
            self.landmarks.resize(
                LANDMARK_COUNT.max(index + 1),
                Landmark::default().with_visibility(0.0),
            );
        }
        self.landmarks[index] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_indices_follow_body_layout() {
        assert_eq!(PoseLandmark::Nose.index(), 0);
        assert_eq!(PoseLandmark::LeftEar.index(), 7);
        assert_eq!(PoseLandmark::LeftShoulder.index(), 11);
        assert_eq!(PoseLandmark::RightWrist.index(), 16);
        assert_eq!(PoseLandmark::LeftHip.index(), 23);
        assert_eq!(PoseLandmark::RightAnkle.index(), 28);
        assert_eq!(PoseLandmark::RightFootIndex.index(), LANDMARK_COUNT - 1);
        assert_eq!(PoseLandmark::RightKnee.name(), "right_knee");
    }

    #[test]
    fn test_missing_landmarks_are_not_visible() {
        let frame = PoseFrame::new(0, vec![Landmark::new(0.5, 0.5); 12]);
        assert!(frame.visible(PoseLandmark::Nose, 0.5).is_some());
        assert!(frame.get(PoseLandmark::LeftHip).is_none());
        assert!(!frame.all_visible(&[PoseLandmark::Nose, PoseLandmark::LeftHip], 0.5));
    }

    #[test]
    fn test_visibility_threshold() {
        let mut frame = PoseFrame::new(0, vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT]);
        frame.set(
            PoseLandmark::LeftWrist,
            Landmark::new(0.4, 0.4).with_visibility(0.55),
        );

        assert!(frame.visible(PoseLandmark::LeftWrist, 0.5).is_some());
        assert!(frame.visible(PoseLandmark::LeftWrist, 0.6).is_none());
    }

    #[test]
    fn test_set_pads_short_frames() {
        let mut frame = PoseFrame::new(0, Vec::new());
        frame.set(PoseLandmark::LeftKnee, Landmark::new(0.3, 0.7));

        assert_eq!(frame.landmarks.len(), LANDMARK_COUNT);
        assert!(frame.visible(PoseLandmark::LeftKnee, 0.9).is_some());
        assert!(frame.visible(PoseLandmark::Nose, 0.1).is_none());
    }

    #[test]
    fn test_frame_deserializes_without_optional_fields() {
        let frame: PoseFrame =
            serde_json::from_str(r#"{"timestamp_ms": 40, "landmarks": [{"x": 0.1, "y": 0.2}]}"#)
                .unwrap();
        assert_eq!(frame.timestamp_ms, 40);
        assert!((frame.landmarks[0].visibility - 1.0).abs() < 0.001);
        assert!((frame.landmarks[0].z).abs() < 0.001);
    }
}
