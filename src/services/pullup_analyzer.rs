/// Pull-up form analysis
///
/// Front-view analysis of a pull-up:
/// - Elbow lockout in the dead hang and chin clearance over the bar
/// - Swinging from hip and wrist sway against the dead-hang baseline
/// - Kipping from knee angle change against the dead-hang baseline
/// - Pause detection at the top or bottom

use tracing::{debug, info};

use crate::config::PullupConfig;
use crate::models::analysis::PullupFormAnalysis;
use crate::models::calibration::{CalibrationBaseline, PullupBaseline};
use crate::models::landmark::{Landmark, PoseFrame, PoseLandmark};
use crate::services::form_analyzer::FormAnalyzer;
use crate::services::geometry::{angle, distance, midpoint, segment_is_degenerate, MIN_SEGMENT_LENGTH};
use crate::services::pause_detector::PauseDetector;

const REQUIRED_LANDMARKS: [PoseLandmark; 13] = [
    PoseLandmark::Nose,
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

struct PullupPoints {
    nose: Landmark,
    left_shoulder: Landmark,
    right_shoulder: Landmark,
    left_elbow: Landmark,
    right_elbow: Landmark,
    left_wrist: Landmark,
    right_wrist: Landmark,
    left_hip: Landmark,
    right_hip: Landmark,
    left_knee: Landmark,
    right_knee: Landmark,
    left_ankle: Landmark,
    right_ankle: Landmark,
}

impl PullupPoints {
    fn extract(frame: &PoseFrame, threshold: f32) -> Option<Self> {
        if !frame.all_visible(&REQUIRED_LANDMARKS, threshold) {
            return None;
        }
        let get = |landmark| frame.get(landmark).copied();

        let points = Self {
            nose: get(PoseLandmark::Nose)?,
            left_shoulder: get(PoseLandmark::LeftShoulder)?,
            right_shoulder: get(PoseLandmark::RightShoulder)?,
            left_elbow: get(PoseLandmark::LeftElbow)?,
            right_elbow: get(PoseLandmark::RightElbow)?,
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
            (&points.left_shoulder, &points.left_elbow),
            (&points.left_elbow, &points.left_wrist),
            (&points.right_shoulder, &points.right_elbow),
            (&points.right_elbow, &points.right_wrist),
            (&points.left_hip, &points.left_knee),
            (&points.left_knee, &points.left_ankle),
            (&points.right_hip, &points.right_knee),
            (&points.right_knee, &points.right_ankle),
        ];
        if segments.iter().any(|(a, b)| segment_is_degenerate(a, b)) {
            return None;
        }

        Some(points)
    }

    fn knee_angle(&self) -> f32 {
        let left = angle(&self.left_hip, &self.left_knee, &self.left_ankle);
        let right = angle(&self.right_hip, &self.right_knee, &self.right_ankle);
        (left + right) / 2.0
    }
}

pub struct PullupAnalyzer {
    config: PullupConfig,
    baseline: Option<PullupBaseline>,
    pause: PauseDetector,
    in_dead_hang: bool,
    max_displacement: f32,
    max_knee_change: f32,
}

impl PullupAnalyzer {
    pub fn new(config: PullupConfig) -> Self {
        let pause = PauseDetector::new(config.pause_threshold_ms, config.pause_angle_tolerance);
        Self {
            config,
            baseline: None,
            pause,
            in_dead_hang: false,
            max_displacement: 0.0,
            max_knee_change: 0.0,
        }
    }

    fn capture_baseline(points: &PullupPoints) -> PullupBaseline {
        PullupBaseline {
            bar_y: (points.left_wrist.y + points.right_wrist.y) / 2.0,
            left_wrist_x: points.left_wrist.x,
            right_wrist_x: points.right_wrist.x,
            hip_x: midpoint(&points.left_hip, &points.right_hip).x,
            knee_angle: points.knee_angle(),
            shoulder_width: distance(&points.left_shoulder, &points.right_shoulder),
        }
    }

    fn clear_history(&mut self) {
        self.pause.reset();
        self.in_dead_hang = false;
        self.max_displacement = 0.0;
        self.max_knee_change = 0.0;
    }
}

impl Default for PullupAnalyzer {
    fn default() -> Self {
        Self::new(PullupConfig::default())
    }
}

impl FormAnalyzer for PullupAnalyzer {
    type Analysis = PullupFormAnalysis;

    fn analyze(&mut self, frame: &PoseFrame) -> PullupFormAnalysis {
        let Some(points) = PullupPoints::extract(frame, self.config.visibility_threshold) else {
            debug!(timestamp_ms = frame.timestamp_ms, "pull-up landmarks not visible");
            self.clear_history();
            return PullupFormAnalysis::default();
        };

        let baseline = match self.baseline {
            Some(baseline) => baseline,
            None => {
                let baseline = Self::capture_baseline(&points);
                info!(bar_y = baseline.bar_y, "pull-up baseline captured from first usable frame");
                self.baseline = Some(baseline);
                baseline
            }
        };

        let config = &self.config;
        let left_elbow_angle = angle(&points.left_shoulder, &points.left_elbow, &points.left_wrist);
        let right_elbow_angle =
            angle(&points.right_shoulder, &points.right_elbow, &points.right_wrist);
        let elbows_locked = left_elbow_angle >= config.min_elbow_lockout_angle
            && right_elbow_angle >= config.min_elbow_lockout_angle;
        let chin_clears_bar = points.nose.y < baseline.bar_y - config.chin_clearance;

        let is_up_position = chin_clears_bar;
        let is_down_position = elbows_locked && !chin_clears_bar;

        let hip_x = midpoint(&points.left_hip, &points.right_hip).x;
        let hip_displacement = (hip_x - baseline.hip_x).abs();
        let wrist_displacement = (points.left_wrist.x - baseline.left_wrist_x)
            .abs()
            .max((points.right_wrist.x - baseline.right_wrist_x).abs());
        let mut displacement = hip_displacement.max(wrist_displacement);
        if config.normalize_swing_by_shoulder_width && baseline.shoulder_width > MIN_SEGMENT_LENGTH
        {
            displacement /= baseline.shoulder_width;
        }
        let knee_change = (points.knee_angle() - baseline.knee_angle).abs();

        // sway and leg drive are tracked per rep, restarting at each dead hang
        if is_down_position && !self.in_dead_hang {
            self.max_displacement = 0.0;
            self.max_knee_change = 0.0;
        }
        self.in_dead_hang = is_down_position;
        self.max_displacement = self.max_displacement.max(displacement);
        self.max_knee_change = self.max_knee_change.max(knee_change);

        let is_paused = self.pause.update(
            left_elbow_angle.min(right_elbow_angle),
            frame.timestamp_ms,
            is_up_position || is_down_position,
        );

        let top = baseline.bar_y - config.chin_clearance;
        let bottom = baseline.bar_y + config.hang_depth;
        let rep_progress = if bottom > top {
            ((bottom - points.nose.y) / (bottom - top)).clamp(0.0, 1.0)
        } else {
            0.0
        };

        PullupFormAnalysis {
            left_elbow_angle,
            right_elbow_angle,
            elbows_locked,
            chin_clears_bar,
            horizontal_displacement: self.max_displacement,
            knee_angle_change: self.max_knee_change,
            is_swinging: self.max_displacement > config.max_horizontal_displacement,
            is_kipping: self.max_knee_change > config.max_knee_angle_change,
            is_paused,
            is_up_position,
            is_down_position,
            rep_progress,
            landmarks_visible: true,
        }
    }

    fn calibrate(&mut self, frame: &PoseFrame) -> bool {
        match PullupPoints::extract(frame, self.config.visibility_threshold) {
            Some(points) => {
                let baseline = Self::capture_baseline(&points);
                info!(
                    bar_y = baseline.bar_y,
                    shoulder_width = baseline.shoulder_width,
                    "pull-up baseline calibrated"
                );
                self.baseline = Some(baseline);
                self.clear_history();
                true
            }
            None => false,
        }
    }

    fn baseline(&self) -> Option<CalibrationBaseline> {
        self.baseline.map(CalibrationBaseline::Pullup)
    }

    fn reset(&mut self) {
        self.baseline = None;
        self.clear_history();
    }
}
