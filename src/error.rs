use thiserror::Error;

/// Errors raised outside the per-frame grading path.
///
/// Frame processing itself never fails: poor visibility, degenerate geometry and
/// invalid reps are all reported as ordinary results.
#[derive(Error, Debug)]
pub enum GradingError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported exercise: {0}")]
    UnsupportedExercise(String),
}

pub type Result<T> = std::result::Result<T, GradingError>;
