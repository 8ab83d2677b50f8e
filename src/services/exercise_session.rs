/// Exercise session orchestration
///
/// Binds one analyzer, one rep counter and the matching validator for a rep-based
/// exercise and drives them frame by frame:
/// - Calibration against a start-position frame
/// - Visibility gating before counting
/// - Sticky per-rep feedback
/// - Set summary and standardized score

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GradingConfig;
use crate::error::{GradingError, Result};
use crate::models::analysis::{AnalysisSignal, FormAnalysis};
use crate::models::exercise::ExerciseType;
use crate::models::landmark::PoseFrame;
use crate::models::rep::{RepCountResult, RepFeedback};
use crate::models::summary::{SetSummaryAnalysis, SetSummaryReport};
use crate::services::form_analyzer::FormAnalyzer;
use crate::services::form_validation::{
    FormValidator, PullupValidator, PushupValidator, SitupValidator,
};
use crate::services::pullup_analyzer::PullupAnalyzer;
use crate::services::pushup_analyzer::PushupAnalyzer;
use crate::services::rep_counter::RepCounter;
use crate::services::scoring::table_for;
use crate::services::situp_analyzer::SitupAnalyzer;

pub const VISIBILITY_HINT: &str = "Ensure full body is visible";

/// Everything produced for a single frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutcome {
    pub analysis: FormAnalysis,
    pub rep_count: RepCountResult,
    /// Most recent rep feedback, kept until the next rep replaces it
    pub feedback: Option<RepFeedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

enum Grader {
    Pushup {
        analyzer: PushupAnalyzer,
        counter: RepCounter<PushupValidator>,
    },
    Situp {
        analyzer: SitupAnalyzer,
        counter: RepCounter<SitupValidator>,
    },
    Pullup {
        analyzer: PullupAnalyzer,
        counter: RepCounter<PullupValidator>,
    },
}

/// Analyze the frame and feed the counter only when the body is fully visible
fn drive<A, V>(
    analyzer: &mut A,
    counter: &mut RepCounter<V>,
    frame: &PoseFrame,
) -> (A::Analysis, RepCountResult, bool)
where
    A: FormAnalyzer,
    V: FormValidator,
{
    let analysis = analyzer.analyze(frame);
    if !analysis.landmarks_visible() {
        return (analysis, counter.snapshot(), false);
    }

    let rep_count = counter.process(
        analysis.position(),
        analysis.rep_progress(),
        frame.timestamp_ms,
        &analysis.frame_metrics(),
    );
    (analysis, rep_count, true)
}

pub struct ExerciseSession {
    id: Uuid,
    exercise: ExerciseType,
    grader: Grader,
    last_feedback: Option<RepFeedback>,
    frames_processed: u64,
    landmarks_hidden: bool,
}

impl ExerciseSession {
    pub fn new(exercise: ExerciseType, config: &GradingConfig) -> Result<Self> {
        let counter_config = config.rep_counter.clone();
        let grader = match exercise {
            ExerciseType::Pushup => Grader::Pushup {
                analyzer: PushupAnalyzer::new(config.pushup.clone()),
                counter: RepCounter::new(
                    counter_config,
                    config.pushup.counting_direction,
                    PushupValidator::new(config.pushup.validation.clone()),
                ),
            },
            ExerciseType::Situp => Grader::Situp {
                analyzer: SitupAnalyzer::new(config.situp.clone()),
                counter: RepCounter::new(
                    counter_config,
                    config.situp.counting_direction,
                    SitupValidator::new(config.situp.clone()),
                ),
            },
            ExerciseType::Pullup => Grader::Pullup {
                analyzer: PullupAnalyzer::new(config.pullup.clone()),
                counter: RepCounter::new(
                    counter_config,
                    config.pullup.counting_direction,
                    PullupValidator::new(config.pullup.clone()),
                ),
            },
            ExerciseType::Running => {
                return Err(GradingError::UnsupportedExercise(format!(
                    "{} is graded from distance and time, not pose frames",
                    exercise
                )))
            }
        };

        let id = Uuid::new_v4();
        info!(session_id = %id, exercise = %exercise, "exercise session started");

        Ok(Self {
            id,
            exercise,
            grader,
            last_feedback: None,
            frames_processed: 0,
            landmarks_hidden: false,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.id
    }

    pub fn exercise(&self) -> ExerciseType {
        self.exercise
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// True while the most recent frame lacked the required landmarks
    pub fn landmarks_hidden(&self) -> bool {
        self.landmarks_hidden
    }

    /// Capture the start-position baseline; false when the frame is unusable
    pub fn calibrate(&mut self, frame: &PoseFrame) -> bool {
        let calibrated = match &mut self.grader {
            Grader::Pushup { analyzer, .. } => analyzer.calibrate(frame),
            Grader::Situp { analyzer, .. } => analyzer.calibrate(frame),
            Grader::Pullup { analyzer, .. } => analyzer.calibrate(frame),
        };

        if calibrated {
            info!(session_id = %self.id, timestamp_ms = frame.timestamp_ms, "calibrated");
        } else {
            warn!(session_id = %self.id, "calibration frame rejected");
        }
        calibrated
    }

    pub fn process_frame(&mut self, frame: &PoseFrame) -> FrameOutcome {
        self.frames_processed += 1;

        let (analysis, rep_count, visible) = match &mut self.grader {
            Grader::Pushup { analyzer, counter } => {
                let (analysis, rep_count, visible) = drive(analyzer, counter, frame);
                (FormAnalysis::Pushup(analysis), rep_count, visible)
            }
            Grader::Situp { analyzer, counter } => {
                let (analysis, rep_count, visible) = drive(analyzer, counter, frame);
                (FormAnalysis::Situp(analysis), rep_count, visible)
            }
            Grader::Pullup { analyzer, counter } => {
                let (analysis, rep_count, visible) = drive(analyzer, counter, frame);
                (FormAnalysis::Pullup(analysis), rep_count, visible)
            }
        };

        match (visible, self.landmarks_hidden) {
            (false, false) => warn!(
                session_id = %self.id,
                timestamp_ms = frame.timestamp_ms,
                "required landmarks lost"
            ),
            (true, true) => info!(
                session_id = %self.id,
                timestamp_ms = frame.timestamp_ms,
                "required landmarks visible again"
            ),
            (false, true) => debug!(timestamp_ms = frame.timestamp_ms, "landmarks still hidden"),
            (true, false) => {}
        }
        self.landmarks_hidden = !visible;

        if let Some(feedback) = rep_count.feedback.clone() {
            debug!(session_id = %self.id, message = %feedback.message, "rep feedback");
            self.last_feedback = Some(feedback);
        }

        FrameOutcome {
            analysis,
            rep_count,
            feedback: self.last_feedback.clone(),
            hint: (!visible).then_some(VISIBILITY_HINT),
        }
    }

    pub fn total_reps(&self) -> u32 {
        match &self.grader {
            Grader::Pushup { counter, .. } => counter.total_reps(),
            Grader::Situp { counter, .. } => counter.total_reps(),
            Grader::Pullup { counter, .. } => counter.total_reps(),
        }
    }

    pub fn invalid_reps(&self) -> u32 {
        match &self.grader {
            Grader::Pushup { counter, .. } => counter.invalid_reps(),
            Grader::Situp { counter, .. } => counter.invalid_reps(),
            Grader::Pullup { counter, .. } => counter.invalid_reps(),
        }
    }

    pub fn report(&self) -> SetSummaryReport {
        match &self.grader {
            Grader::Pushup { counter, .. } => counter.generate_set_summary(),
            Grader::Situp { counter, .. } => counter.generate_set_summary(),
            Grader::Pullup { counter, .. } => counter.generate_set_summary(),
        }
    }

    pub fn summary(&self) -> SetSummaryAnalysis {
        match &self.grader {
            Grader::Pushup { counter, .. } => counter.summary_analysis(),
            Grader::Situp { counter, .. } => counter.summary_analysis(),
            Grader::Pullup { counter, .. } => counter.summary_analysis(),
        }
    }

    /// Points for the valid reps counted so far
    pub fn standardized_score(&self) -> u32 {
        table_for(self.exercise)
            .map(|table| table.score(self.total_reps()))
            .unwrap_or(0)
    }

    /// Start a new set: baseline, history, counts and feedback are cleared
    pub fn reset(&mut self) {
        match &mut self.grader {
            Grader::Pushup { analyzer, counter } => {
                analyzer.reset();
                counter.reset();
            }
            Grader::Situp { analyzer, counter } => {
                analyzer.reset();
                counter.reset();
            }
            Grader::Pullup { analyzer, counter } => {
                analyzer.reset();
                counter.reset();
            }
        }
        self.last_feedback = None;
        self.frames_processed = 0;
        self.landmarks_hidden = false;
        debug!(session_id = %self.id, "session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::landmark::{Landmark, PoseLandmark, LANDMARK_COUNT};
    use crate::models::rep::RepState;

    fn plank(timestamp_ms: u64, elbow_deg: f32) -> PoseFrame {
        let theta = elbow_deg.to_radians();
        let elbow = Landmark::new(0.30, 0.65);
        let wrist = Landmark::new(0.30, 0.80);
        let shoulder = Landmark::new(0.30 - 0.15 * theta.sin(), 0.65 + 0.15 * theta.cos());
        let ankle = Landmark::new(0.90, 0.80);
        let hip = Landmark::new((shoulder.x + ankle.x) / 2.0, (shoulder.y + ankle.y) / 2.0);
        let knee = Landmark::new((hip.x + ankle.x) / 2.0, (hip.y + ankle.y) / 2.0);

        let mut frame = PoseFrame::new(timestamp_ms, vec![Landmark::default(); LANDMARK_COUNT]);
        for (left, right, point) in [
            (PoseLandmark::LeftShoulder, PoseLandmark::RightShoulder, shoulder),
            (PoseLandmark::LeftElbow, PoseLandmark::RightElbow, elbow),
            (PoseLandmark::LeftWrist, PoseLandmark::RightWrist, wrist),
            (PoseLandmark::LeftHip, PoseLandmark::RightHip, hip),
            (PoseLandmark::LeftKnee, PoseLandmark::RightKnee, knee),
            (PoseLandmark::LeftAnkle, PoseLandmark::RightAnkle, ankle),
        ] {
            frame.set(left, point);
            frame.set(right, point);
        }
        frame
    }

    #[test]
    fn test_running_is_not_a_frame_session() {
        let result = ExerciseSession::new(ExerciseType::Running, &GradingConfig::default());
        assert!(matches!(
            result,
            Err(GradingError::UnsupportedExercise(_))
        ));
    }

    #[test]
    fn test_invisible_frame_is_not_counted() {
        let mut session =
            ExerciseSession::new(ExerciseType::Pushup, &GradingConfig::default()).unwrap();
        let frame = PoseFrame::new(0, vec![Landmark::default(); LANDMARK_COUNT]);

        let outcome = session.process_frame(&frame);
        assert_eq!(outcome.hint, Some(VISIBILITY_HINT));
        assert_eq!(outcome.rep_count.current_state, RepState::Unknown);
        assert!(!outcome.analysis.landmarks_visible());
        assert_eq!(session.frames_processed(), 1);
    }

    #[test]
    fn test_visibility_loss_tracked_until_recovery() {
        let mut session =
            ExerciseSession::new(ExerciseType::Pushup, &GradingConfig::default()).unwrap();
        let hidden = PoseFrame::new(0, vec![Landmark::default(); LANDMARK_COUNT]);

        for timestamp_ms in [0, 100, 200] {
            let outcome = session.process_frame(&PoseFrame { timestamp_ms, ..hidden.clone() });
            assert_eq!(outcome.hint, Some(VISIBILITY_HINT));
            assert!(session.landmarks_hidden());
        }

        let outcome = session.process_frame(&plank(300, 170.0));
        assert_eq!(outcome.hint, None);
        assert!(!session.landmarks_hidden());

        session.process_frame(&PoseFrame { timestamp_ms: 400, ..hidden });
        session.reset();
        assert!(!session.landmarks_hidden());
    }

    #[test]
    fn test_pushup_rep_and_sticky_feedback() {
        let mut session =
            ExerciseSession::new(ExerciseType::Pushup, &GradingConfig::default()).unwrap();
        assert!(session.calibrate(&plank(0, 170.0)));

        let angles = [
            170.0, 170.0, 170.0, 140.0, 110.0, 85.0, 85.0, 85.0, 110.0, 140.0, 170.0, 170.0,
            170.0, 170.0,
        ];
        let mut outcomes = Vec::new();
        for (i, angle) in angles.iter().enumerate() {
            outcomes.push(session.process_frame(&plank(100 + i as u64 * 100, *angle)));
        }

        assert_eq!(session.total_reps(), 1);
        assert_eq!(session.invalid_reps(), 0);
        assert!(outcomes.iter().all(|o| o.hint.is_none()));

        let last = outcomes.last().unwrap();
        assert_eq!(last.rep_count.new_reps, 0);
        assert_eq!(
            last.feedback.as_ref().map(|f| f.message.as_str()),
            Some("Perfect Rep!")
        );
        assert_eq!(outcomes[12].rep_count.new_reps, 1);
        assert_eq!(session.standardized_score(), 1);
        assert_eq!(session.summary().summary.total_valid_reps, 1);
    }

    #[test]
    fn test_reset_clears_counts_and_feedback() {
        let mut session =
            ExerciseSession::new(ExerciseType::Pushup, &GradingConfig::default()).unwrap();
        for (i, angle) in [85.0, 85.0, 85.0, 170.0, 170.0, 170.0].iter().enumerate() {
            session.process_frame(&plank(i as u64 * 100, *angle));
        }
        assert_eq!(session.total_reps(), 1);

        session.reset();
        assert_eq!(session.total_reps(), 0);
        assert_eq!(session.frames_processed(), 0);
        let outcome = session.process_frame(&plank(1_000, 170.0));
        assert!(outcome.feedback.is_none());
    }
}
