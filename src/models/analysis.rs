/// Per-exercise form analysis results
///
/// Each analyzer reports joint angles (degrees, 0-180), position classification,
/// rep progress (0-1) and named fault flags for a single frame.

use serde::{Deserialize, Serialize};

use crate::models::rep::{FormFlags, FrameMetrics, RawPosition};

/// What the rep counter needs from an analysis
pub trait AnalysisSignal {
    fn landmarks_visible(&self) -> bool;
    fn position(&self) -> RawPosition;
    fn rep_progress(&self) -> f32;
    fn frame_metrics(&self) -> FrameMetrics;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushupFormAnalysis {
    pub left_elbow_angle: f32,
    pub right_elbow_angle: f32,
    /// Angle at the hips between shoulders and ankles
    pub body_alignment_angle: f32,
    /// Degrees the hips sit below (positive) or above (negative) the shoulder-ankle line
    pub hip_deviation: f32,
    pub is_up_position: bool,
    pub is_down_position: bool,
    pub is_sagging: bool,
    pub is_piking: bool,
    pub is_worming: bool,
    pub hands_lifted: bool,
    pub feet_lifted: bool,
    pub knees_touching: bool,
    pub body_touching: bool,
    pub is_paused: bool,
    pub rep_progress: f32,
    pub landmarks_visible: bool,
}

impl PushupFormAnalysis {
    pub fn min_elbow_angle(&self) -> f32 {
        self.left_elbow_angle.min(self.right_elbow_angle)
    }
}

impl AnalysisSignal for PushupFormAnalysis {
    fn landmarks_visible(&self) -> bool {
        self.landmarks_visible
    }

    fn position(&self) -> RawPosition {
        RawPosition::from_flags(self.is_up_position, self.is_down_position)
    }

    fn rep_progress(&self) -> f32 {
        self.rep_progress
    }

    fn frame_metrics(&self) -> FrameMetrics {
        FrameMetrics {
            elbow_angle_min: Some(self.min_elbow_angle()),
            elbow_angle_max: Some(self.left_elbow_angle.max(self.right_elbow_angle)),
            hip_deviation: Some(self.hip_deviation),
            flags: FormFlags {
                hands_lifted: self.hands_lifted,
                feet_lifted: self.feet_lifted,
                knees_touching: self.knees_touching,
                body_touching: self.body_touching,
                sagging: self.is_sagging,
                piking: self.is_piking,
                worming: self.is_worming,
                paused: self.is_paused,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitupFormAnalysis {
    /// Shoulder-hip-knee angle averaged over both sides
    pub trunk_angle: f32,
    pub left_knee_angle: f32,
    pub right_knee_angle: f32,
    pub is_up_position: bool,
    pub is_down_position: bool,
    pub is_knee_angle_correct: bool,
    pub is_hand_position_correct: bool,
    pub is_shoulder_grounded: bool,
    pub is_hip_stable: bool,
    pub is_paused: bool,
    pub wrist_distance: f32,
    /// Vertical shoulder displacement from the calibrated lying position
    pub shoulder_lift: f32,
    pub hip_lift: f32,
    pub rep_progress: f32,
    pub landmarks_visible: bool,
}

impl AnalysisSignal for SitupFormAnalysis {
    fn landmarks_visible(&self) -> bool {
        self.landmarks_visible
    }

    fn position(&self) -> RawPosition {
        RawPosition::from_flags(self.is_up_position, self.is_down_position)
    }

    fn rep_progress(&self) -> f32 {
        self.rep_progress
    }

    fn frame_metrics(&self) -> FrameMetrics {
        FrameMetrics {
            trunk_angle: Some(self.trunk_angle),
            shoulder_lift: Some(self.shoulder_lift),
            hip_lift: Some(self.hip_lift),
            wrist_distance: Some(self.wrist_distance),
            flags: FormFlags {
                reached_vertical: self.is_up_position,
                hands_released: !self.is_hand_position_correct,
                hips_unstable: !self.is_hip_stable,
                knee_angle_out_of_band: !self.is_knee_angle_correct,
                paused: self.is_paused,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullupFormAnalysis {
    pub left_elbow_angle: f32,
    pub right_elbow_angle: f32,
    pub elbows_locked: bool,
    pub chin_clears_bar: bool,
    /// Largest hip or wrist sway since the last dead hang
    pub horizontal_displacement: f32,
    /// Largest knee angle change from the calibrated hang since the last dead hang
    pub knee_angle_change: f32,
    pub is_swinging: bool,
    pub is_kipping: bool,
    pub is_paused: bool,
    pub is_up_position: bool,
    pub is_down_position: bool,
    pub rep_progress: f32,
    pub landmarks_visible: bool,
}

impl AnalysisSignal for PullupFormAnalysis {
    fn landmarks_visible(&self) -> bool {
        self.landmarks_visible
    }

    fn position(&self) -> RawPosition {
        RawPosition::from_flags(self.is_up_position, self.is_down_position)
    }

    fn rep_progress(&self) -> f32 {
        self.rep_progress
    }

    fn frame_metrics(&self) -> FrameMetrics {
        FrameMetrics {
            elbow_angle_min: Some(self.left_elbow_angle.min(self.right_elbow_angle)),
            elbow_angle_max: Some(self.left_elbow_angle.max(self.right_elbow_angle)),
            horizontal_displacement: Some(self.horizontal_displacement),
            knee_angle_change: Some(self.knee_angle_change),
            flags: FormFlags {
                chin_cleared: self.chin_clears_bar,
                swinging: self.is_swinging,
                kipping: self.is_kipping,
                paused: self.is_paused,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Analysis produced by whichever exercise a session grades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "exercise", rename_all = "snake_case")]
pub enum FormAnalysis {
    Pushup(PushupFormAnalysis),
    Situp(SitupFormAnalysis),
    Pullup(PullupFormAnalysis),
}

impl AnalysisSignal for FormAnalysis {
    fn landmarks_visible(&self) -> bool {
        match self {
            FormAnalysis::Pushup(analysis) => analysis.landmarks_visible(),
            FormAnalysis::Situp(analysis) => analysis.landmarks_visible(),
            FormAnalysis::Pullup(analysis) => analysis.landmarks_visible(),
        }
    }

    fn position(&self) -> RawPosition {
        match self {
            FormAnalysis::Pushup(analysis) => analysis.position(),
            FormAnalysis::Situp(analysis) => analysis.position(),
            FormAnalysis::Pullup(analysis) => analysis.position(),
        }
    }

    fn rep_progress(&self) -> f32 {
        match self {
            FormAnalysis::Pushup(analysis) => analysis.rep_progress(),
            FormAnalysis::Situp(analysis) => analysis.rep_progress(),
            FormAnalysis::Pullup(analysis) => analysis.rep_progress(),
        }
    }

    fn frame_metrics(&self) -> FrameMetrics {
        match self {
            FormAnalysis::Pushup(analysis) => analysis.frame_metrics(),
            FormAnalysis::Situp(analysis) => analysis.frame_metrics(),
            FormAnalysis::Pullup(analysis) => analysis.frame_metrics(),
        }
    }
}
