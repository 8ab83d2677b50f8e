/// Repetition models
///
/// States and directions of the rep counter, the per-frame metrics delta produced by
/// the analyzers, the per-rep accumulator, and validation outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable state reported by the rep counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepState {
    Unknown,
    Up,
    Down,
    Transition,
}

impl fmt::Display for RepState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RepState::Unknown => write!(f, "unknown"),
            RepState::Up => write!(f, "up"),
            RepState::Down => write!(f, "down"),
            RepState::Transition => write!(f, "transition"),
        }
    }
}

/// Instantaneous position classification from a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawPosition {
    Up,
    Down,
    Neither,
}

impl RawPosition {
    pub fn from_flags(is_up: bool, is_down: bool) -> Self {
        match (is_up, is_down) {
            (true, false) => RawPosition::Up,
            (false, true) => RawPosition::Down,
            _ => RawPosition::Neither,
        }
    }
}

/// Direction of the most recent stable state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepDirection {
    UpToDown,
    DownToUp,
    None,
}

impl RepDirection {
    pub fn between(previous: RepState, current: RepState) -> Self {
        match (previous, current) {
            (RepState::Up, RepState::Down) => RepDirection::UpToDown,
            (RepState::Down, RepState::Up) => RepDirection::DownToUp,
            _ => RepDirection::None,
        }
    }
}

/// Which stable transition completes a rep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingDirection {
    /// Rep opens at the bottom and completes at the top (push-up, sit-up)
    DownToUp,
    /// Rep opens at the top and completes back at the bottom (pull-up)
    UpToDown,
}

impl CountingDirection {
    /// Stable state that opens a rep
    pub fn entry_state(self) -> RepState {
        match self {
            CountingDirection::DownToUp => RepState::Down,
            CountingDirection::UpToDown => RepState::Up,
        }
    }

    /// Stable state that completes a rep
    pub fn exit_state(self) -> RepState {
        match self {
            CountingDirection::DownToUp => RepState::Up,
            CountingDirection::UpToDown => RepState::Down,
        }
    }
}

/// Named fault and achievement flags, OR-folded across a rep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFlags {
    pub hands_lifted: bool,
    pub feet_lifted: bool,
    pub knees_touching: bool,
    pub body_touching: bool,
    pub sagging: bool,
    pub piking: bool,
    pub worming: bool,
    pub paused: bool,
    pub reached_vertical: bool,
    pub hands_released: bool,
    pub hips_unstable: bool,
    pub knee_angle_out_of_band: bool,
    pub chin_cleared: bool,
    pub swinging: bool,
    pub kipping: bool,
}

impl FormFlags {
    pub fn merge(&mut self, other: &FormFlags) {
        self.hands_lifted |= other.hands_lifted;
        self.feet_lifted |= other.feet_lifted;
        self.knees_touching |= other.knees_touching;
        self.body_touching |= other.body_touching;
        self.sagging |= other.sagging;
        self.piking |= other.piking;
        self.worming |= other.worming;
        self.paused |= other.paused;
        self.reached_vertical |= other.reached_vertical;
        self.hands_released |= other.hands_released;
        self.hips_unstable |= other.hips_unstable;
        self.knee_angle_out_of_band |= other.knee_angle_out_of_band;
        self.chin_cleared |= other.chin_cleared;
        self.swinging |= other.swinging;
        self.kipping |= other.kipping;
    }
}

/// Metrics an analyzer extracted from one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    /// Smaller of the two elbow angles
    pub elbow_angle_min: Option<f32>,
    /// Larger of the two elbow angles
    pub elbow_angle_max: Option<f32>,
    pub trunk_angle: Option<f32>,
    /// Signed hip deviation from the shoulder-ankle line, positive when hips sag
    pub hip_deviation: Option<f32>,
    pub horizontal_displacement: Option<f32>,
    pub knee_angle_change: Option<f32>,
    pub shoulder_lift: Option<f32>,
    pub hip_lift: Option<f32>,
    pub wrist_distance: Option<f32>,
    pub flags: FormFlags,
}

/// Running accumulator for the rep currently in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepMetrics {
    pub start_timestamp_ms: u64,
    pub end_timestamp_ms: u64,
    pub frame_count: u32,
    pub min_elbow_angle: Option<f32>,
    pub max_elbow_angle: Option<f32>,
    pub min_trunk_angle: Option<f32>,
    pub max_trunk_angle: Option<f32>,
    /// Largest absolute hip deviation seen
    pub max_hip_deviation: Option<f32>,
    pub max_horizontal_displacement: Option<f32>,
    pub max_knee_angle_change: Option<f32>,
    pub min_shoulder_lift: Option<f32>,
    pub max_hip_lift: Option<f32>,
    pub max_wrist_distance: Option<f32>,
    pub flags: FormFlags,
}

fn fold_min(current: Option<f32>, sample: Option<f32>) -> Option<f32> {
    match (current, sample) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (None, sample) => sample,
        (current, None) => current,
    }
}

fn fold_max(current: Option<f32>, sample: Option<f32>) -> Option<f32> {
    match (current, sample) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (None, sample) => sample,
        (current, None) => current,
    }
}

impl RepMetrics {
    /// Open an empty accumulator at the given timestamp
    pub fn start(timestamp_ms: u64) -> Self {
        Self {
            start_timestamp_ms: timestamp_ms,
            end_timestamp_ms: timestamp_ms,
            frame_count: 0,
            min_elbow_angle: None,
            max_elbow_angle: None,
            min_trunk_angle: None,
            max_trunk_angle: None,
            max_hip_deviation: None,
            max_horizontal_displacement: None,
            max_knee_angle_change: None,
            min_shoulder_lift: None,
            max_hip_lift: None,
            max_wrist_distance: None,
            flags: FormFlags::default(),
        }
    }

    /// Fold one frame into the accumulator: `min_*` keep the minimum, `max_*` the maximum,
    /// flags are OR-ed
    pub fn fold(&mut self, frame: &FrameMetrics, timestamp_ms: u64) {
        self.end_timestamp_ms = self.end_timestamp_ms.max(timestamp_ms);
        self.frame_count += 1;

        self.min_elbow_angle = fold_min(self.min_elbow_angle, frame.elbow_angle_min);
        self.max_elbow_angle = fold_max(self.max_elbow_angle, frame.elbow_angle_max);
        self.min_trunk_angle = fold_min(self.min_trunk_angle, frame.trunk_angle);
        self.max_trunk_angle = fold_max(self.max_trunk_angle, frame.trunk_angle);
        self.max_hip_deviation = fold_max(
            self.max_hip_deviation,
            frame.hip_deviation.map(f32::abs),
        );
        self.max_horizontal_displacement = fold_max(
            self.max_horizontal_displacement,
            frame.horizontal_displacement,
        );
        self.max_knee_angle_change =
            fold_max(self.max_knee_angle_change, frame.knee_angle_change);
        self.min_shoulder_lift = fold_min(self.min_shoulder_lift, frame.shoulder_lift);
        self.max_hip_lift = fold_max(self.max_hip_lift, frame.hip_lift);
        self.max_wrist_distance = fold_max(self.max_wrist_distance, frame.wrist_distance);
        self.flags.merge(&frame.flags);
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_timestamp_ms.saturating_sub(self.start_timestamp_ms)
    }
}

/// Why a completed rep did not count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRepReason {
    InsufficientDepth,
    IncompleteExtension,
    PoorBodyAlignment,
    HandsLeftGround,
    FeetLeftGround,
    GroundContact,
    PausedInPosition,
    DidNotReachVertical,
    ShouldersNotGrounded,
    HandsNotInterlocked,
    HipsLifted,
    KneeAngleOutOfRange,
    PausedDuringRep,
    ChinBelowBar,
    NoDeadHang,
    ExcessiveSwinging,
    Kipping,
}

impl InvalidRepReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::InsufficientDepth => "Insufficient depth - elbows must bend to 90°",
            Self::IncompleteExtension => "Incomplete extension - arms must fully lock out at top",
            Self::PoorBodyAlignment => {
                "Poor body alignment - maintain straight line from shoulders to ankles"
            }
            Self::HandsLeftGround => "Hands left the ground",
            Self::FeetLeftGround => "Feet left the ground",
            Self::GroundContact => "Knees or chest touched the ground",
            Self::PausedInPosition => "Paused in incorrect position",
            Self::DidNotReachVertical => "Didn't reach vertical position - sit up more completely",
            Self::ShouldersNotGrounded => "Shoulder blades must touch ground at bottom position",
            Self::HandsNotInterlocked => "Hands must stay interlocked behind head",
            Self::HipsLifted => "Hips must remain on ground throughout rep",
            Self::KneeAngleOutOfRange => "Knee bend outside the allowed range",
            Self::PausedDuringRep => "No pausing during the rep",
            Self::ChinBelowBar => "Chin must clear the bar",
            Self::NoDeadHang => "Must return to full extension at bottom position",
            Self::ExcessiveSwinging => "Excessive swinging detected - maintain body control",
            Self::Kipping => "Kipping/hip drive detected - keep legs still",
        }
    }
}

impl fmt::Display for InvalidRepReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of validating one completed rep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepValidation {
    pub is_valid: bool,
    pub reason: Option<InvalidRepReason>,
    /// Form score (0-100)
    pub form_score: f32,
}

impl RepValidation {
    pub fn valid(form_score: f32) -> Self {
        Self {
            is_valid: true,
            reason: None,
            form_score: form_score.clamp(0.0, 100.0),
        }
    }

    pub fn invalid(reason: InvalidRepReason, form_score: f32) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason),
            form_score: form_score.clamp(0.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTone {
    Positive,
    Caution,
    Negative,
}

/// User-facing message for a completed rep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepFeedback {
    pub message: String,
    pub tone: FeedbackTone,
    pub is_invalid_rep: bool,
}

impl RepFeedback {
    /// Tier a valid rep by its form score
    pub fn for_valid_rep(form_score: f32) -> Self {
        let (message, tone) = if form_score >= 90.0 {
            ("Perfect Rep!", FeedbackTone::Positive)
        } else if form_score >= 70.0 {
            ("Good Rep", FeedbackTone::Positive)
        } else {
            ("Acceptable Rep", FeedbackTone::Caution)
        };

        Self {
            message: message.to_string(),
            tone,
            is_invalid_rep: false,
        }
    }

    pub fn for_invalid_rep(reason: InvalidRepReason) -> Self {
        Self {
            message: reason.to_string(),
            tone: FeedbackTone::Negative,
            is_invalid_rep: true,
        }
    }
}

/// Counter output for one processed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepCountResult {
    pub current_state: RepState,
    pub previous_state: RepState,
    /// Valid reps completed on this frame (0 or 1)
    pub new_reps: u32,
    pub total_reps: u32,
    pub invalid_reps: u32,
    pub new_invalid_rep: bool,
    /// Progress through the current rep (0-1)
    pub rep_progress: f32,
    pub direction: RepDirection,
    pub last_rep_timestamp_ms: Option<u64>,
    pub rep_in_progress: bool,
    pub invalid_rep_reason: Option<InvalidRepReason>,
    pub last_rep_form_score: Option<f32>,
    /// Present only on the frame that completed a rep
    pub feedback: Option<RepFeedback>,
}
