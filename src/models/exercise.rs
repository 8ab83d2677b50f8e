use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::GradingError;

/// Graded fitness test events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseType {
    #[serde(rename = "push-up")]
    Pushup,
    #[serde(rename = "sit-up")]
    Situp,
    #[serde(rename = "pull-up")]
    Pullup,
    #[serde(rename = "running")]
    Running,
}

impl ExerciseType {
    /// Whether the event is graded by counting reps from pose frames
    pub fn is_rep_based(&self) -> bool {
        !matches!(self, ExerciseType::Running)
    }
}

impl std::fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseType::Pushup => write!(f, "push-up"),
            ExerciseType::Situp => write!(f, "sit-up"),
            ExerciseType::Pullup => write!(f, "pull-up"),
            ExerciseType::Running => write!(f, "running"),
        }
    }
}

impl FromStr for ExerciseType {
    type Err = GradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "pushup" | "pushups" => Ok(ExerciseType::Pushup),
            "situp" | "situps" => Ok(ExerciseType::Situp),
            "pullup" | "pullups" => Ok(ExerciseType::Pullup),
            "run" | "running" | "tworun" | "2mile" | "twomilerun" => Ok(ExerciseType::Running),
            _ => Err(GradingError::UnsupportedExercise(s.to_string())),
        }
    }
}
