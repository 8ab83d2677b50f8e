// Grading services: geometry, per-exercise analyzers, counting, validation and scoring

pub mod exercise_session;
pub mod form_analyzer;
pub mod form_validation;
pub mod geometry;
pub mod pause_detector;
pub mod pullup_analyzer;
pub mod pushup_analyzer;
pub mod rep_counter;
pub mod running_grader;
pub mod scoring;
pub mod set_summary;
pub mod situp_analyzer;

pub use exercise_session::{ExerciseSession, FrameOutcome, VISIBILITY_HINT};
pub use form_analyzer::FormAnalyzer;
pub use form_validation::{AcceptAll, FormValidator, PullupValidator, PushupValidator, SitupValidator};
pub use pause_detector::PauseDetector;
pub use pullup_analyzer::PullupAnalyzer;
pub use pushup_analyzer::PushupAnalyzer;
pub use rep_counter::RepCounter;
pub use running_grader::{Coordinate, GradingResult, RunState, RunningData, RunningGrader};
pub use set_summary::{analyze_report, SetSummaryAggregator};
pub use situp_analyzer::SitupAnalyzer;
