//! Pose-landmark grading engine for standardized fitness tests.
//!
//! Frames of 33 body landmarks go in; rep counts, per-rep form validation, live
//! feedback, set summaries and standardized scores come out. Running is graded
//! from distance and duration alone.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::GradingConfig;
pub use error::{GradingError, Result};
pub use models::{ExerciseType, Landmark, PoseFrame, PoseLandmark};
pub use services::{ExerciseSession, FrameOutcome, RunningGrader};
