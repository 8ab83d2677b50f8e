use serde::{Deserialize, Serialize};

/// Push-up reference captured in the starting plank
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PushupBaseline {
    pub shoulder_y: f32,
    pub hip_y: f32,
    /// Floor line: the lower of the mid-wrist and mid-ankle heights
    pub floor_y: f32,
}

/// Sit-up reference captured lying down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SitupBaseline {
    pub shoulder_y: f32,
    pub hip_y: f32,
    /// Shoulder-hip-knee angle while lying flat
    pub trunk_angle: f32,
}

/// Pull-up reference captured in the dead hang
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PullupBaseline {
    /// Bar height, taken as the mean wrist height
    pub bar_y: f32,
    pub left_wrist_x: f32,
    pub right_wrist_x: f32,
    pub hip_x: f32,
    pub knee_angle: f32,
    pub shoulder_width: f32,
}

/// Immutable per-session reference values; recalibrating replaces the whole value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "exercise", rename_all = "snake_case")]
pub enum CalibrationBaseline {
    Pushup(PushupBaseline),
    Situp(SitupBaseline),
    Pullup(PullupBaseline),
}
