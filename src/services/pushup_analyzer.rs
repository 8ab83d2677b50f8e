/// Push-up form analysis
///
/// Side-view analysis of a push-up:
/// - Elbow angles and up/down classification
/// - Body alignment with sag/pike detection
/// - Worming, hand/foot lift-off and ground contact
/// - Pause detection in the top or bottom position

use tracing::{debug, info};

use crate::config::PushupConfig;
use crate::models::analysis::PushupFormAnalysis;
use crate::models::calibration::{CalibrationBaseline, PushupBaseline};
use crate::models::landmark::{Landmark, PoseFrame, PoseLandmark};
use crate::services::form_analyzer::FormAnalyzer;
use crate::services::geometry::{angle, midpoint, segment_is_degenerate, signed_deviation};
use crate::services::pause_detector::PauseDetector;

const REQUIRED_LANDMARKS: [PoseLandmark; 12] = [
    PoseLandmark::LeftShoulder,
    PoseLandmark::RightShoulder,
    PoseLandmark::LeftElbow,
    PoseLandmark::RightElbow,
    PoseLandmark::LeftWrist,
    PoseLandmark::RightWrist,
    PoseLandmark::LeftHip,
    PoseLandmark::RightHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::RightKnee,
    PoseLandmark::LeftAnkle,
    PoseLandmark::RightAnkle,
];

struct PushupPoints {
    left_shoulder: Landmark,
    right_shoulder: Landmark,
    left_elbow: Landmark,
    right_elbow: Landmark,
    left_wrist: Landmark,
    right_wrist: Landmark,
    mid_shoulder: Landmark,
    mid_hip: Landmark,
    mid_knee: Landmark,
    mid_ankle: Landmark,
    mid_wrist: Landmark,
    left_ankle: Landmark,
    right_ankle: Landmark,
}

impl PushupPoints {
    fn extract(frame: &PoseFrame, threshold: f32) -> Option<Self> {
        if !frame.all_visible(&REQUIRED_LANDMARKS, threshold) {
            return None;
        }
        let get = |landmark| frame.get(landmark).copied();

        let left_shoulder = get(PoseLandmark::LeftShoulder)?;
        let right_shoulder = get(PoseLandmark::RightShoulder)?;
        let left_elbow = get(PoseLandmark::LeftElbow)?;
        let right_elbow = get(PoseLandmark::RightElbow)?;
        let left_wrist = get(PoseLandmark::LeftWrist)?;
        let right_wrist = get(PoseLandmark::RightWrist)?;
        let left_hip = get(PoseLandmark::LeftHip)?;
        let right_hip = get(PoseLandmark::RightHip)?;
        let left_knee = get(PoseLandmark::LeftKnee)?;
        let right_knee = get(PoseLandmark::RightKnee)?;
        let left_ankle = get(PoseLandmark::LeftAnkle)?;
        let right_ankle = get(PoseLandmark::RightAnkle)?;

        let points = Self {
            mid_shoulder: midpoint(&left_shoulder, &right_shoulder),
            mid_hip: midpoint(&left_hip, &right_hip),
            mid_knee: midpoint(&left_knee, &right_knee),
            mid_ankle: midpoint(&left_ankle, &right_ankle),
            mid_wrist: midpoint(&left_wrist, &right_wrist),
            left_shoulder,
            right_shoulder,
            left_elbow,
            right_elbow,
            left_wrist,
            right_wrist,
            left_ankle,
            right_ankle,
        };

        let segments = [
            (&points.left_shoulder, &points.left_elbow),
            (&points.left_elbow, &points.left_wrist),
            (&points.right_shoulder, &points.right_elbow),
            (&points.right_elbow, &points.right_wrist),
            (&points.mid_shoulder, &points.mid_hip),
            (&points.mid_hip, &points.mid_ankle),
        ];
        if segments.iter().any(|(a, b)| segment_is_degenerate(a, b)) {
            return None;
        }

        Some(points)
    }
}

/// Heights carried over from the previous usable frame
#[derive(Debug, Clone, Copy)]
struct PreviousHeights {
    shoulder_y: f32,
    hip_y: f32,
    left_wrist_y: f32,
    right_wrist_y: f32,
    left_ankle_y: f32,
    right_ankle_y: f32,
}

pub struct PushupAnalyzer {
    config: PushupConfig,
    baseline: Option<PushupBaseline>,
    previous: Option<PreviousHeights>,
    pause: PauseDetector,
}

impl PushupAnalyzer {
    pub fn new(config: PushupConfig) -> Self {
        let pause = PauseDetector::new(config.pause_threshold_ms, config.pause_angle_tolerance);
        Self {
            config,
            baseline: None,
            previous: None,
            pause,
        }
    }

    fn capture_baseline(points: &PushupPoints) -> PushupBaseline {
        PushupBaseline {
            shoulder_y: points.mid_shoulder.y,
            hip_y: points.mid_hip.y,
            floor_y: points.mid_wrist.y.max(points.mid_ankle.y),
        }
    }

    fn clear_history(&mut self) {
        self.previous = None;
        self.pause.reset();
    }
}

impl Default for PushupAnalyzer {
    fn default() -> Self {
        Self::new(PushupConfig::default())
    }
}

impl FormAnalyzer for PushupAnalyzer {
    type Analysis = PushupFormAnalysis;

    fn analyze(&mut self, frame: &PoseFrame) -> PushupFormAnalysis {
        let Some(points) = PushupPoints::extract(frame, self.config.visibility_threshold) else {
            debug!(timestamp_ms = frame.timestamp_ms, "push-up landmarks not visible");
            self.clear_history();
            return PushupFormAnalysis::default();
        };

        let baseline = match self.baseline {
            Some(baseline) => baseline,
            None => {
                let baseline = Self::capture_baseline(&points);
                info!(floor_y = baseline.floor_y, "push-up baseline captured from first usable frame");
                self.baseline = Some(baseline);
                baseline
            }
        };

        let config = &self.config;
        let left_elbow_angle = angle(&points.left_shoulder, &points.left_elbow, &points.left_wrist);
        let right_elbow_angle =
            angle(&points.right_shoulder, &points.right_elbow, &points.right_wrist);
        let min_elbow_angle = left_elbow_angle.min(right_elbow_angle);

        let body_alignment_angle = angle(&points.mid_shoulder, &points.mid_hip, &points.mid_ankle);
        let hip_deviation =
            signed_deviation(&points.mid_shoulder, &points.mid_hip, &points.mid_ankle);

        let is_up_position = min_elbow_angle >= config.min_elbow_extension_angle;
        let is_down_position = min_elbow_angle <= config.max_elbow_flexion_angle;

        let current = PreviousHeights {
            shoulder_y: points.mid_shoulder.y,
            hip_y: points.mid_hip.y,
            left_wrist_y: points.left_wrist.y,
            right_wrist_y: points.right_wrist.y,
            left_ankle_y: points.left_ankle.y,
            right_ankle_y: points.right_ankle.y,
        };

        // upward movement is a decrease in y
        let (is_worming, hands_lifted, feet_lifted) = match self.previous {
            Some(prev) => {
                let shoulder_delta = current.shoulder_y - prev.shoulder_y;
                let hip_delta = current.hip_y - prev.hip_y;
                let lifted = |before: f32, now: f32| before - now > config.lift_off_threshold;
                (
                    (shoulder_delta - hip_delta).abs() > config.worming_threshold,
                    lifted(prev.left_wrist_y, current.left_wrist_y)
                        || lifted(prev.right_wrist_y, current.right_wrist_y),
                    lifted(prev.left_ankle_y, current.left_ankle_y)
                        || lifted(prev.right_ankle_y, current.right_ankle_y),
                )
            }
            None => (false, false, false),
        };
        self.previous = Some(current);

        let knees_touching = baseline.floor_y - points.mid_knee.y < config.ground_touch_threshold;
        let body_touching = baseline.floor_y - points.mid_shoulder.y < config.ground_touch_threshold;

        let is_paused = self.pause.update(
            min_elbow_angle,
            frame.timestamp_ms,
            is_up_position || is_down_position,
        );

        let range = config.min_elbow_extension_angle - config.max_elbow_flexion_angle;
        let rep_progress = if range > 0.0 {
            ((min_elbow_angle - config.max_elbow_flexion_angle) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };

        PushupFormAnalysis {
            left_elbow_angle,
            right_elbow_angle,
            body_alignment_angle,
            hip_deviation,
            is_up_position,
            is_down_position,
            is_sagging: hip_deviation > config.max_sag_deviation,
            is_piking: hip_deviation < -config.max_pike_deviation,
            is_worming,
            hands_lifted,
            feet_lifted,
            knees_touching,
            body_touching,
            is_paused,
            rep_progress,
            landmarks_visible: true,
        }
    }

    fn calibrate(&mut self, frame: &PoseFrame) -> bool {
        match PushupPoints::extract(frame, self.config.visibility_threshold) {
            Some(points) => {
                let baseline = Self::capture_baseline(&points);
                info!(floor_y = baseline.floor_y, "push-up baseline calibrated");
                self.baseline = Some(baseline);
                self.clear_history();
                true
            }
            None => false,
        }
    }

    fn baseline(&self) -> Option<CalibrationBaseline> {
        self.baseline.map(CalibrationBaseline::Pushup)
    }

    fn reset(&mut self) {
        self.baseline = None;
        self.clear_history();
    }
}
