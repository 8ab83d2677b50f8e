use serde::{Deserialize, Serialize};

use crate::models::rep::CountingDirection;

/// Stability filter and debounce settings for the rep counter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepCounterConfig {
    /// Consecutive identical raw positions required before a state is considered stable
    #[serde(default = "default_state_stability_threshold")]
    pub state_stability_threshold: usize,

    /// Minimum time between two completed reps
    #[serde(default = "default_min_rep_duration_ms")]
    pub min_rep_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushupConfig {
    #[serde(default = "default_pushup_visibility")]
    pub visibility_threshold: f32,

    #[serde(default = "default_min_elbow_extension")]
    pub min_elbow_extension_angle: f32,

    #[serde(default = "default_max_elbow_flexion")]
    pub max_elbow_flexion_angle: f32,

    /// Hip deviation (degrees below the shoulder-ankle line) beyond which the body sags
    #[serde(default = "default_body_deviation")]
    pub max_sag_deviation: f32,

    /// Hip deviation (degrees above the shoulder-ankle line) beyond which the body pikes
    #[serde(default = "default_body_deviation")]
    pub max_pike_deviation: f32,

    #[serde(default = "default_worming_threshold")]
    pub worming_threshold: f32,

    #[serde(default = "default_lift_off_threshold")]
    pub lift_off_threshold: f32,

    #[serde(default = "default_ground_touch_threshold")]
    pub ground_touch_threshold: f32,

    #[serde(default = "default_pause_threshold_ms")]
    pub pause_threshold_ms: u64,

    #[serde(default = "default_pause_angle_tolerance")]
    pub pause_angle_tolerance: f32,

    #[serde(default = "default_down_to_up")]
    pub counting_direction: CountingDirection,

    #[serde(default)]
    pub validation: PushupValidationConfig,
}

/// Per-rep validity limits and scoring tolerances for push-ups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushupValidationConfig {
    /// Deepest elbow angle must reach at least this value
    #[serde(default = "default_required_depth_angle")]
    pub required_depth_angle: f32,

    /// Depth beyond which no points are deducted
    #[serde(default = "default_ideal_depth_angle")]
    pub ideal_depth_angle: f32,

    #[serde(default = "default_min_elbow_extension")]
    pub required_lockout_angle: f32,

    #[serde(default = "default_max_hip_deviation")]
    pub max_hip_deviation: f32,

    /// Hip deviation tolerated before points are deducted
    #[serde(default = "default_hip_deviation_tolerance")]
    pub hip_deviation_tolerance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitupConfig {
    #[serde(default = "default_visibility")]
    pub visibility_threshold: f32,

    #[serde(default = "default_min_trunk_angle")]
    pub min_trunk_angle: f32,

    #[serde(default = "default_max_trunk_angle")]
    pub max_trunk_angle: f32,

    #[serde(default = "default_min_knee_angle")]
    pub min_knee_angle: f32,

    #[serde(default = "default_max_knee_angle")]
    pub max_knee_angle: f32,

    #[serde(default = "default_wrist_to_head_distance")]
    pub max_wrist_to_head_distance: f32,

    #[serde(default = "default_wrist_distance")]
    pub max_wrist_distance: f32,

    #[serde(default = "default_shoulder_ground_threshold")]
    pub shoulder_ground_threshold: f32,

    #[serde(default = "default_hip_lift_threshold")]
    pub hip_lift_threshold: f32,

    #[serde(default = "default_pause_threshold_ms")]
    pub pause_threshold_ms: u64,

    #[serde(default = "default_pause_angle_tolerance")]
    pub pause_angle_tolerance: f32,

    #[serde(default = "default_down_to_up")]
    pub counting_direction: CountingDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullupConfig {
    #[serde(default = "default_visibility")]
    pub visibility_threshold: f32,

    #[serde(default = "default_min_elbow_extension")]
    pub min_elbow_lockout_angle: f32,

    /// How far the nose must rise above the bar line
    #[serde(default = "default_chin_clearance")]
    pub chin_clearance: f32,

    #[serde(default = "default_max_horizontal_displacement")]
    pub max_horizontal_displacement: f32,

    /// Express horizontal displacement in shoulder widths instead of frame widths
    #[serde(default)]
    pub normalize_swing_by_shoulder_width: bool,

    #[serde(default = "default_max_knee_angle_change")]
    pub max_knee_angle_change: f32,

    /// Nose depth below the bar treated as the bottom of the progress range
    #[serde(default = "default_hang_depth")]
    pub hang_depth: f32,

    #[serde(default = "default_pause_threshold_ms")]
    pub pause_threshold_ms: u64,

    #[serde(default = "default_pause_angle_tolerance")]
    pub pause_angle_tolerance: f32,

    #[serde(default = "default_up_to_down")]
    pub counting_direction: CountingDirection,
}

/// Two-mile run scoring constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunningConfig {
    #[serde(default = "default_reference_distance")]
    pub reference_distance_m: f64,

    #[serde(default = "default_max_score_time")]
    pub max_score_time_s: f64,

    #[serde(default = "default_passing_time")]
    pub passing_time_s: f64,

    /// Time past the passing mark over which the score decays to zero
    #[serde(default = "default_overage_window")]
    pub overage_window_s: f64,
}

// Default value functions
fn default_state_stability_threshold() -> usize {
    3
}

fn default_min_rep_duration_ms() -> u64 {
    500
}

fn default_visibility() -> f32 {
    0.5
}

fn default_pushup_visibility() -> f32 {
    0.6
}

fn default_min_elbow_extension() -> f32 {
    160.0
}

fn default_max_elbow_flexion() -> f32 {
    90.0
}

fn default_body_deviation() -> f32 {
    15.0
}

fn default_worming_threshold() -> f32 {
    0.03
}

fn default_lift_off_threshold() -> f32 {
    0.03
}

fn default_ground_touch_threshold() -> f32 {
    0.02
}

fn default_pause_threshold_ms() -> u64 {
    2000
}

fn default_pause_angle_tolerance() -> f32 {
    5.0
}

fn default_down_to_up() -> CountingDirection {
    CountingDirection::DownToUp
}

fn default_up_to_down() -> CountingDirection {
    CountingDirection::UpToDown
}

fn default_required_depth_angle() -> f32 {
    100.0
}

fn default_ideal_depth_angle() -> f32 {
    90.0
}

fn default_max_hip_deviation() -> f32 {
    20.0
}

fn default_hip_deviation_tolerance() -> f32 {
    10.0
}

fn default_min_trunk_angle() -> f32 {
    60.0
}

fn default_max_trunk_angle() -> f32 {
    95.0
}

fn default_min_knee_angle() -> f32 {
    70.0
}

fn default_max_knee_angle() -> f32 {
    110.0
}

fn default_wrist_to_head_distance() -> f32 {
    0.15
}

fn default_wrist_distance() -> f32 {
    0.1
}

fn default_shoulder_ground_threshold() -> f32 {
    0.03
}

fn default_hip_lift_threshold() -> f32 {
    0.03
}

fn default_chin_clearance() -> f32 {
    0.05
}

fn default_max_horizontal_displacement() -> f32 {
    0.07
}

fn default_max_knee_angle_change() -> f32 {
    20.0
}

fn default_hang_depth() -> f32 {
    0.2
}

fn default_reference_distance() -> f64 {
    3218.69
}

fn default_max_score_time() -> f64 {
    780.0
}

fn default_passing_time() -> f64 {
    1020.0
}

fn default_overage_window() -> f64 {
    300.0
}

impl Default for RepCounterConfig {
    fn default() -> Self {
        Self {
            state_stability_threshold: default_state_stability_threshold(),
            min_rep_duration_ms: default_min_rep_duration_ms(),
        }
    }
}

impl RepCounterConfig {
    pub fn with_stability_threshold(mut self, frames: usize) -> Self {
        self.state_stability_threshold = frames.max(1);
        self
    }

    pub fn with_min_rep_duration_ms(mut self, millis: u64) -> Self {
        self.min_rep_duration_ms = millis;
        self
    }
}

impl Default for PushupConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: default_pushup_visibility(),
            min_elbow_extension_angle: default_min_elbow_extension(),
            max_elbow_flexion_angle: default_max_elbow_flexion(),
            max_sag_deviation: default_body_deviation(),
            max_pike_deviation: default_body_deviation(),
            worming_threshold: default_worming_threshold(),
            lift_off_threshold: default_lift_off_threshold(),
            ground_touch_threshold: default_ground_touch_threshold(),
            pause_threshold_ms: default_pause_threshold_ms(),
            pause_angle_tolerance: default_pause_angle_tolerance(),
            counting_direction: default_down_to_up(),
            validation: PushupValidationConfig::default(),
        }
    }
}

impl Default for PushupValidationConfig {
    fn default() -> Self {
        Self {
            required_depth_angle: default_required_depth_angle(),
            ideal_depth_angle: default_ideal_depth_angle(),
            required_lockout_angle: default_min_elbow_extension(),
            max_hip_deviation: default_max_hip_deviation(),
            hip_deviation_tolerance: default_hip_deviation_tolerance(),
        }
    }
}

impl Default for SitupConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: default_visibility(),
            min_trunk_angle: default_min_trunk_angle(),
            max_trunk_angle: default_max_trunk_angle(),
            min_knee_angle: default_min_knee_angle(),
            max_knee_angle: default_max_knee_angle(),
            max_wrist_to_head_distance: default_wrist_to_head_distance(),
            max_wrist_distance: default_wrist_distance(),
            shoulder_ground_threshold: default_shoulder_ground_threshold(),
            hip_lift_threshold: default_hip_lift_threshold(),
            pause_threshold_ms: default_pause_threshold_ms(),
            pause_angle_tolerance: default_pause_angle_tolerance(),
            counting_direction: default_down_to_up(),
        }
    }
}

impl Default for PullupConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: default_visibility(),
            min_elbow_lockout_angle: default_min_elbow_extension(),
            chin_clearance: default_chin_clearance(),
            max_horizontal_displacement: default_max_horizontal_displacement(),
            normalize_swing_by_shoulder_width: false,
            max_knee_angle_change: default_max_knee_angle_change(),
            hang_depth: default_hang_depth(),
            pause_threshold_ms: default_pause_threshold_ms(),
            pause_angle_tolerance: default_pause_angle_tolerance(),
            counting_direction: default_up_to_down(),
        }
    }
}

impl Default for RunningConfig {
    fn default() -> Self {
        Self {
            reference_distance_m: default_reference_distance(),
            max_score_time_s: default_max_score_time(),
            passing_time_s: default_passing_time(),
            overage_window_s: default_overage_window(),
        }
    }
}
