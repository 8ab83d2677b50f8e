/// Rep counting state machine
///
/// Exercise-agnostic counter fed one raw position per frame:
/// - Stability filter over the last N raw positions
/// - Rep lifecycle from the entry side to the exit side of the counting direction
/// - Debounce between completed reps
/// - Per-rep metric accumulation and validation on completion
///
/// `Transition` periods between the two sides do not break a rep; completion is
/// judged against the last settled side.

use std::collections::VecDeque;
use tracing::debug;

use crate::config::RepCounterConfig;
use crate::models::rep::{
    CountingDirection, FrameMetrics, InvalidRepReason, RawPosition, RepCountResult,
    RepDirection, RepFeedback, RepMetrics, RepState,
};
use crate::models::summary::{SetSummaryAnalysis, SetSummaryReport};
use crate::services::form_validation::FormValidator;
use crate::services::set_summary::SetSummaryAggregator;

pub struct RepCounter<V> {
    config: RepCounterConfig,
    direction: CountingDirection,
    validator: V,
    raw_positions: VecDeque<RawPosition>,
    current_state: RepState,
    previous_state: RepState,
    /// Last stable state that was `Up` or `Down`
    settled_state: Option<RepState>,
    rep_progress: f32,
    total_reps: u32,
    invalid_reps: u32,
    last_rep_timestamp_ms: Option<u64>,
    last_completion_ms: Option<u64>,
    current_rep: Option<RepMetrics>,
    last_rep_metrics: Option<RepMetrics>,
    invalid_rep_reason: Option<InvalidRepReason>,
    last_rep_form_score: Option<f32>,
    summary: SetSummaryAggregator,
}

impl<V: FormValidator> RepCounter<V> {
    pub fn new(config: RepCounterConfig, direction: CountingDirection, validator: V) -> Self {
        let capacity = config.state_stability_threshold.max(1);
        Self {
            config,
            direction,
            validator,
            raw_positions: VecDeque::with_capacity(capacity),
            current_state: RepState::Unknown,
            previous_state: RepState::Unknown,
            settled_state: None,
            rep_progress: 0.0,
            total_reps: 0,
            invalid_reps: 0,
            last_rep_timestamp_ms: None,
            last_completion_ms: None,
            current_rep: None,
            last_rep_metrics: None,
            invalid_rep_reason: None,
            last_rep_form_score: None,
            summary: SetSummaryAggregator::new(),
        }
    }

    fn stability_window(&self) -> usize {
        self.config.state_stability_threshold.max(1)
    }

    fn stable_state(&self) -> RepState {
        if self.raw_positions.len() < self.stability_window() {
            return RepState::Unknown;
        }

        let first = self.raw_positions[0];
        if self.raw_positions.iter().any(|position| *position != first) {
            return RepState::Transition;
        }

        match first {
            RawPosition::Up => RepState::Up,
            RawPosition::Down => RepState::Down,
            RawPosition::Neither => RepState::Transition,
        }
    }

    /// Feed one frame's position classification and metrics
    pub fn process(
        &mut self,
        position: RawPosition,
        rep_progress: f32,
        timestamp_ms: u64,
        metrics: &FrameMetrics,
    ) -> RepCountResult {
        self.summary.observe_timestamp(timestamp_ms);
        self.rep_progress = if rep_progress.is_finite() {
            rep_progress.clamp(0.0, 1.0)
        } else {
            0.0
        };

        self.raw_positions.push_back(position);
        while self.raw_positions.len() > self.stability_window() {
            self.raw_positions.pop_front();
        }
        let stable = self.stable_state();

        if let Some(rep) = self.current_rep.as_mut() {
            rep.fold(metrics, timestamp_ms);
        }

        if stable != RepState::Unknown && stable != self.current_state {
            debug!(from = %self.current_state, to = %stable, timestamp_ms, "stable state changed");
            self.previous_state = self.current_state;
            self.current_state = stable;
        }

        let mut new_reps = 0;
        let mut new_invalid_rep = false;
        let mut feedback = None;

        if matches!(stable, RepState::Up | RepState::Down) {
            let entry = self.direction.entry_state();
            let exit = self.direction.exit_state();

            if self.current_rep.is_none() && stable == entry {
                let mut rep = RepMetrics::start(timestamp_ms);
                rep.fold(metrics, timestamp_ms);
                self.current_rep = Some(rep);
                debug!(timestamp_ms, "rep started");
            } else if stable == exit && self.settled_state == Some(entry) {
                let debounced = self.last_completion_ms.map_or(true, |last| {
                    timestamp_ms.saturating_sub(last) >= self.config.min_rep_duration_ms
                });

                if debounced {
                    if let Some(mut rep) = self.current_rep.take() {
                        rep.end_timestamp_ms = timestamp_ms;
                        let validation = self.validator.validate(&rep);
                        self.last_completion_ms = Some(timestamp_ms);

                        if validation.is_valid {
                            self.total_reps += 1;
                            new_reps = 1;
                            self.last_rep_timestamp_ms = Some(timestamp_ms);
                            self.last_rep_form_score = Some(validation.form_score);
                            self.invalid_rep_reason = None;
                            self.summary.record_valid(validation.form_score);
                            feedback = Some(RepFeedback::for_valid_rep(validation.form_score));
                            debug!(
                                total_reps = self.total_reps,
                                form_score = validation.form_score,
                                "valid rep completed"
                            );
                        } else {
                            self.invalid_reps += 1;
                            new_invalid_rep = true;
                            self.invalid_rep_reason = validation.reason;
                            self.summary.record_invalid(validation.reason);
                            feedback = validation.reason.map(RepFeedback::for_invalid_rep);
                            debug!(
                                invalid_reps = self.invalid_reps,
                                reason = ?validation.reason,
                                "invalid rep completed"
                            );
                        }

                        self.last_rep_metrics = Some(rep);
                    }
                } else {
                    debug!(timestamp_ms, "rep completion ignored by debounce");
                }
            }

            self.settled_state = Some(stable);
        }

        let mut result = self.snapshot();
        result.new_reps = new_reps;
        result.new_invalid_rep = new_invalid_rep;
        result.feedback = feedback;
        result
    }

    /// Current counter state without feeding a frame
    pub fn snapshot(&self) -> RepCountResult {
        RepCountResult {
            current_state: self.current_state,
            previous_state: self.previous_state,
            new_reps: 0,
            total_reps: self.total_reps,
            invalid_reps: self.invalid_reps,
            new_invalid_rep: false,
            rep_progress: self.rep_progress,
            direction: RepDirection::between(self.previous_state, self.current_state),
            last_rep_timestamp_ms: self.last_rep_timestamp_ms,
            rep_in_progress: self.current_rep.is_some(),
            invalid_rep_reason: self.invalid_rep_reason,
            last_rep_form_score: self.last_rep_form_score,
            feedback: None,
        }
    }

    pub fn total_reps(&self) -> u32 {
        self.total_reps
    }

    pub fn invalid_reps(&self) -> u32 {
        self.invalid_reps
    }

    pub fn is_rep_in_progress(&self) -> bool {
        self.current_rep.is_some()
    }

    /// Metrics of the most recently completed rep, valid or not
    pub fn last_rep_metrics(&self) -> Option<&RepMetrics> {
        self.last_rep_metrics.as_ref()
    }

    pub fn counting_direction(&self) -> CountingDirection {
        self.direction
    }

    pub fn generate_set_summary(&self) -> SetSummaryReport {
        self.summary.report()
    }

    pub fn summary_analysis(&self) -> SetSummaryAnalysis {
        self.summary.analysis()
    }

    /// Clear all state, discarding any rep in progress without penalty
    pub fn reset(&mut self) {
        self.raw_positions.clear();
        self.current_state = RepState::Unknown;
        self.previous_state = RepState::Unknown;
        self.settled_state = None;
        self.rep_progress = 0.0;
        self.total_reps = 0;
        self.invalid_reps = 0;
        self.last_rep_timestamp_ms = None;
        self.last_completion_ms = None;
        self.current_rep = None;
        self.last_rep_metrics = None;
        self.invalid_rep_reason = None;
        self.last_rep_form_score = None;
        self.summary.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rep::RepValidation;
    use crate::services::form_validation::AcceptAll;

    fn counter(direction: CountingDirection) -> RepCounter<AcceptAll> {
        RepCounter::new(RepCounterConfig::default(), direction, AcceptAll)
    }

    fn feed<V: FormValidator>(
        counter: &mut RepCounter<V>,
        positions: &[RawPosition],
        start_ms: u64,
        step_ms: u64,
    ) -> Vec<RepCountResult> {
        positions
            .iter()
            .enumerate()
            .map(|(i, position)| {
                counter.process(
                    *position,
                    0.5,
                    start_ms + i as u64 * step_ms,
                    &FrameMetrics::default(),
                )
            })
            .collect()
    }

    use RawPosition::{Down, Neither, Up};

    #[test]
    fn test_unknown_until_buffer_full() {
        let mut counter = counter(CountingDirection::DownToUp);
        let results = feed(&mut counter, &[Down, Down], 0, 100);
        assert!(results.iter().all(|r| r.current_state == RepState::Unknown));

        let result = counter.process(Down, 0.0, 200, &FrameMetrics::default());
        assert_eq!(result.current_state, RepState::Down);
        assert!(result.rep_in_progress);
    }

    #[test]
    fn test_down_to_up_counts_one_rep() {
        let mut counter = counter(CountingDirection::DownToUp);
        let results = feed(
            &mut counter,
            &[Down, Down, Down, Neither, Neither, Up, Up, Up],
            0,
            100,
        );

        let completed: Vec<_> = results.iter().filter(|r| r.new_reps == 1).collect();
        assert_eq!(completed.len(), 1);
        let last = results.last().unwrap();
        assert_eq!(last.total_reps, 1);
        assert_eq!(last.current_state, RepState::Up);
        assert_eq!(last.previous_state, RepState::Transition);
        assert!(!last.rep_in_progress);
        assert_eq!(last.last_rep_timestamp_ms, Some(700));
        assert_eq!(
            last.feedback.as_ref().map(|f| f.message.as_str()),
            Some("Perfect Rep!")
        );
    }

    #[test]
    fn test_up_to_down_requires_top_first() {
        let mut counter = counter(CountingDirection::UpToDown);
        // starting in the hang does not open a rep
        feed(&mut counter, &[Down, Down, Down], 0, 100);
        assert!(!counter.is_rep_in_progress());

        let results = feed(&mut counter, &[Up, Up, Up, Down, Down, Down], 300, 100);
        assert!(results[2].rep_in_progress);
        assert_eq!(results.last().unwrap().total_reps, 1);
    }

    #[test]
    fn test_direction_follows_stable_states() {
        let config = RepCounterConfig::default().with_stability_threshold(1);
        let mut counter = RepCounter::new(config, CountingDirection::UpToDown, AcceptAll);

        let results = feed(&mut counter, &[Down, Up, Down, Neither], 0, 300);
        assert_eq!(results[0].direction, RepDirection::None);
        assert_eq!(results[1].direction, RepDirection::DownToUp);
        assert_eq!(results[2].direction, RepDirection::UpToDown);
        assert_eq!(results[2].total_reps, 1);
        assert_eq!(results[3].current_state, RepState::Transition);
        assert_eq!(results[3].direction, RepDirection::None);
    }

    #[test]
    fn test_flicker_never_commits_opposite_side() {
        let mut counter = counter(CountingDirection::DownToUp);
        let settled = feed(&mut counter, &[Down, Down, Down], 0, 100);
        assert_eq!(settled.last().unwrap().current_state, RepState::Down);

        let flicker = feed(&mut counter, &[Up, Down, Up, Down, Up], 300, 100);
        assert!(flicker.iter().all(|r| r.current_state != RepState::Up));
        assert!(flicker.iter().all(|r| r.total_reps == 0 && r.new_reps == 0));
        assert!(counter.is_rep_in_progress());

        let held = feed(&mut counter, &[Up, Up, Up], 800, 100);
        assert_eq!(held.last().unwrap().current_state, RepState::Up);
        assert_eq!(held.last().unwrap().total_reps, 1);
        assert_eq!(held.iter().map(|r| r.new_reps).sum::<u32>(), 1);
    }

    #[test]
    fn test_starting_on_exit_side_does_not_count() {
        let mut counter = counter(CountingDirection::DownToUp);
        let results = feed(&mut counter, &[Up, Up, Up, Up], 0, 100);
        assert_eq!(results.last().unwrap().total_reps, 0);
    }

    #[test]
    fn test_debounce_blocks_fast_second_rep() {
        let mut counter = counter(CountingDirection::DownToUp);
        let mut results = feed(&mut counter, &[Down, Down, Down, Up, Up, Up], 0, 10);
        assert_eq!(results.last().unwrap().total_reps, 1);

        // second cycle completes 60ms after the first
        results = feed(&mut counter, &[Down, Down, Down, Up, Up, Up], 60, 0);
        assert_eq!(results.last().unwrap().total_reps, 1);
        assert!(counter.is_rep_in_progress());

        // the open rep completes on the next exit transition once enough time has passed
        results = feed(&mut counter, &[Down, Down, Down, Up, Up, Up], 1_000, 100);
        assert_eq!(results.last().unwrap().total_reps, 2);
    }

    #[test]
    fn test_invalid_rep_is_recorded() {
        let validator = |_: &RepMetrics| {
            RepValidation::invalid(InvalidRepReason::InsufficientDepth, 50.0)
        };
        let mut counter =
            RepCounter::new(RepCounterConfig::default(), CountingDirection::DownToUp, validator);
        let results = feed(&mut counter, &[Down, Down, Down, Up, Up, Up], 0, 100);

        let last = results.last().unwrap();
        assert_eq!(last.total_reps, 0);
        assert_eq!(last.invalid_reps, 1);
        assert!(last.new_invalid_rep);
        assert_eq!(last.invalid_rep_reason, Some(InvalidRepReason::InsufficientDepth));
        assert!(last.feedback.as_ref().unwrap().is_invalid_rep);

        let summary = counter.generate_set_summary();
        assert_eq!(summary.total_attempted_reps, 1);
        assert_eq!(summary.form_issues[0].count, 1);
    }

    #[test]
    fn test_metrics_fold_from_rep_start() {
        let mut counter = counter(CountingDirection::DownToUp);
        let metrics = |angle: f32| FrameMetrics {
            elbow_angle_min: Some(angle),
            elbow_angle_max: Some(angle),
            ..Default::default()
        };

        // frames before the rep opens are not accumulated
        counter.process(Neither, 0.5, 0, &metrics(40.0));
        for (i, angle) in [85.0, 80.0, 82.0, 120.0, 165.0, 170.0, 168.0].iter().enumerate() {
            let position = if *angle <= 90.0 {
                Down
            } else if *angle >= 160.0 {
                Up
            } else {
                Neither
            };
            counter.process(position, 0.5, 100 + i as u64 * 100, &metrics(*angle));
        }

        let rep = counter.last_rep_metrics().unwrap();
        assert_eq!(rep.min_elbow_angle, Some(82.0));
        assert_eq!(rep.max_elbow_angle, Some(170.0));
        assert_eq!(rep.start_timestamp_ms, 300);
        assert_eq!(rep.end_timestamp_ms, 700);
    }

    #[test]
    fn test_reset_discards_open_rep() {
        let mut counter = counter(CountingDirection::DownToUp);
        feed(&mut counter, &[Down, Down, Down, Up, Up, Up, Down, Down, Down], 0, 100);
        assert!(counter.is_rep_in_progress());

        counter.reset();
        let snapshot = counter.snapshot();
        assert_eq!(snapshot.total_reps, 0);
        assert_eq!(snapshot.invalid_reps, 0);
        assert!(!snapshot.rep_in_progress);
        assert_eq!(snapshot.current_state, RepState::Unknown);
        assert_eq!(counter.generate_set_summary().total_attempted_reps, 0);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut counter = counter(CountingDirection::DownToUp);
        let result = counter.process(Up, 3.0, 0, &FrameMetrics::default());
        assert!((result.rep_progress - 1.0).abs() < 0.001);
        let result = counter.process(Up, f32::NAN, 10, &FrameMetrics::default());
        assert!(result.rep_progress.abs() < 0.001);
    }
}
