/// Sit-up form analysis
///
/// Side-view analysis of a sit-up: trunk and knee angles, hand placement behind the
/// head, shoulder grounding and hip stability against the lying baseline, and pauses.

use tracing::{debug, info};

use crate::config::SitupConfig;
use crate::models::analysis::SitupFormAnalysis;
use crate::models::calibration::{CalibrationBaseline, SitupBaseline};
use crate::models::landmark::{Landmark, PoseFrame, PoseLandmark};
use crate::services::form_analyzer::FormAnalyzer;
use crate::services::geometry::{angle, distance, midpoint, segment_is_degenerate};
use crate::services::pause_detector::PauseDetector;

const REQUIRED_LANDMARKS: [PoseLandmark; 13] = [
    PoseLandmark::Nose,
    PoseLandmark::LeftEar,
    PoseLandmark::RightEar,
    PoseLandmark::LeftShoulder,
    PoseLandmark::RightShoulder,
    PoseLandmark::LeftWrist,
    PoseLandmark::RightWrist,
    PoseLandmark::LeftHip,
    PoseLandmark::RightHip,
    PoseLandmark::LeftKnee,
    PoseLandmark::RightKnee,
    PoseLandmark::LeftAnkle,
    PoseLandmark::RightAnkle,
];

struct SitupPoints {
    nose: Landmark,
    left_ear: Landmark,
    right_ear: Landmark,
    left_shoulder: Landmark,
    right_shoulder: Landmark,
    left_wrist: Landmark,
    right_wrist: Landmark,
    left_hip: Landmark,
    right_hip: Landmark,
    left_knee: Landmark,
    right_knee: Landmark,
    left_ankle: Landmark,
    right_ankle: Landmark,
}

impl SitupPoints {
    fn extract(frame: &PoseFrame, threshold: f32) -> Option<Self> {
        if !frame.all_visible(&REQUIRED_LANDMARKS, threshold) {
            return None;
        }
        let get = |landmark| frame.get(landmark).copied();

        let points = Self {
            nose: get(PoseLandmark::Nose)?,
            left_ear: get(PoseLandmark::LeftEar)?,
            right_ear: get(PoseLandmark::RightEar)?,
            left_shoulder: get(PoseLandmark::LeftShoulder)?,
            right_shoulder: get(PoseLandmark::RightShoulder)?,
            left_wrist: get(PoseLandmark::LeftWrist)?,
            right_wrist: get(PoseLandmark::RightWrist)?,
            left_hip: get(PoseLandmark::LeftHip)?,
            right_hip: get(PoseLandmark::RightHip)?,
            left_knee: get(PoseLandmark::LeftKnee)?,
            right_knee: get(PoseLandmark::RightKnee)?,
            left_ankle: get(PoseLandmark::LeftAnkle)?,
            right_ankle: get(PoseLandmark::RightAnkle)?,
        };

        let segments = [
            (&points.left_shoulder, &points.left_hip),
            (&points.right_shoulder, &points.right_hip),
            (&points.left_hip, &points.left_knee),
            (&points.right_hip, &points.right_knee),
            (&points.left_knee, &points.left_ankle),
            (&points.right_knee, &points.right_ankle),
        ];
        if segments.iter().any(|(a, b)| segment_is_degenerate(a, b)) {
            return None;
        }

        Some(points)
    }

    fn mid_shoulder(&self) -> Landmark {
        midpoint(&self.left_shoulder, &self.right_shoulder)
    }

    fn mid_hip(&self) -> Landmark {
        midpoint(&self.left_hip, &self.right_hip)
    }

    fn trunk_angle(&self) -> f32 {
        let left = angle(&self.left_shoulder, &self.left_hip, &self.left_knee);
        let right = angle(&self.right_shoulder, &self.right_hip, &self.right_knee);
        (left + right) / 2.0
    }

    /// Distance from a wrist to the closer ear
    fn wrist_to_head(&self, wrist: &Landmark) -> f32 {
        distance(wrist, &self.left_ear).min(distance(wrist, &self.right_ear))
    }
}

pub struct SitupAnalyzer {
    config: SitupConfig,
    baseline: Option<SitupBaseline>,
    pause: PauseDetector,
}

impl SitupAnalyzer {
    pub fn new(config: SitupConfig) -> Self {
        let pause = PauseDetector::new(config.pause_threshold_ms, config.pause_angle_tolerance);
        Self {
            config,
            baseline: None,
            pause,
        }
    }

    fn capture_baseline(points: &SitupPoints) -> SitupBaseline {
        SitupBaseline {
            shoulder_y: points.mid_shoulder().y,
            hip_y: points.mid_hip().y,
            trunk_angle: points.trunk_angle(),
        }
    }
}

impl Default for SitupAnalyzer {
    fn default() -> Self {
        Self::new(SitupConfig::default())
    }
}

impl FormAnalyzer for SitupAnalyzer {
    type Analysis = SitupFormAnalysis;

    fn analyze(&mut self, frame: &PoseFrame) -> SitupFormAnalysis {
        let Some(points) = SitupPoints::extract(frame, self.config.visibility_threshold) else {
            debug!(timestamp_ms = frame.timestamp_ms, "sit-up landmarks not visible");
            self.pause.reset();
            return SitupFormAnalysis::default();
        };

        let baseline = match self.baseline {
            Some(baseline) => baseline,
            None => {
                let baseline = Self::capture_baseline(&points);
                info!(
                    shoulder_y = baseline.shoulder_y,
                    hip_y = baseline.hip_y,
                    "sit-up baseline captured from first usable frame"
                );
                self.baseline = Some(baseline);
                baseline
            }
        };

        let config = &self.config;
        let trunk_angle = points.trunk_angle();
        let left_knee_angle = angle(&points.left_hip, &points.left_knee, &points.left_ankle);
        let right_knee_angle = angle(&points.right_hip, &points.right_knee, &points.right_ankle);
        let knee_band = config.min_knee_angle..=config.max_knee_angle;
        let is_knee_angle_correct =
            knee_band.contains(&left_knee_angle) && knee_band.contains(&right_knee_angle);

        let wrist_distance = distance(&points.left_wrist, &points.right_wrist);
        let is_hand_position_correct = points.wrist_to_head(&points.left_wrist)
            < config.max_wrist_to_head_distance
            && points.wrist_to_head(&points.right_wrist) < config.max_wrist_to_head_distance
            && wrist_distance < config.max_wrist_distance;

        let mid_shoulder = points.mid_shoulder();
        let mid_hip = points.mid_hip();
        let shoulder_lift = (mid_shoulder.y - baseline.shoulder_y).abs();
        let hip_lift = (mid_hip.y - baseline.hip_y).abs();
        let is_shoulder_grounded = shoulder_lift < config.shoulder_ground_threshold;
        let is_hip_stable = hip_lift < config.hip_lift_threshold;

        let nose_above_hips = points.nose.y < mid_hip.y;
        let trunk_band = config.min_trunk_angle..=config.max_trunk_angle;
        let is_up_position = nose_above_hips && trunk_band.contains(&trunk_angle);
        let is_down_position = is_shoulder_grounded;

        let is_paused = self.pause.update(
            trunk_angle,
            frame.timestamp_ms,
            is_up_position || is_down_position,
        );

        let range = baseline.trunk_angle - config.max_trunk_angle;
        let rep_progress = if range > 0.0 {
            ((baseline.trunk_angle - trunk_angle) / range).clamp(0.0, 1.0)
        } else if is_up_position {
            1.0
        } else {
            0.0
        };

        SitupFormAnalysis {
            trunk_angle,
            left_knee_angle,
            right_knee_angle,
            is_up_position,
            is_down_position,
            is_knee_angle_correct,
            is_hand_position_correct,
            is_shoulder_grounded,
            is_hip_stable,
            is_paused,
            wrist_distance,
            shoulder_lift,
            hip_lift,
            rep_progress,
            landmarks_visible: true,
        }
    }

    fn calibrate(&mut self, frame: &PoseFrame) -> bool {
        match SitupPoints::extract(frame, self.config.visibility_threshold) {
            Some(points) => {
                let baseline = Self::capture_baseline(&points);
                info!(
                    shoulder_y = baseline.shoulder_y,
                    hip_y = baseline.hip_y,
                    "sit-up baseline calibrated"
                );
                self.baseline = Some(baseline);
                self.pause.reset();
                true
            }
            None => false,
        }
    }

    fn baseline(&self) -> Option<CalibrationBaseline> {
        self.baseline.map(CalibrationBaseline::Situp)
    }

    fn reset(&mut self) {
        self.baseline = None;
        self.pause.reset();
    }
}
