use proptest::prelude::*;
use pt_grading::config::RepCounterConfig;
use pt_grading::models::{CountingDirection, FrameMetrics, RawPosition, RepState};
use pt_grading::services::{AcceptAll, RepCounter};

fn position() -> impl Strategy<Value = RawPosition> {
    prop_oneof![
        Just(RawPosition::Up),
        Just(RawPosition::Down),
        Just(RawPosition::Neither),
    ]
}

fn direction() -> impl Strategy<Value = CountingDirection> {
    prop_oneof![
        Just(CountingDirection::DownToUp),
        Just(CountingDirection::UpToDown),
    ]
}

proptest! {
    #[test]
    fn counts_are_monotonic_and_bounded(
        positions in prop::collection::vec(position(), 0..200),
        direction in direction(),
        threshold in 1usize..5,
    ) {
        let config = RepCounterConfig::default()
            .with_stability_threshold(threshold)
            .with_min_rep_duration_ms(0);
        let mut counter = RepCounter::new(config, direction, AcceptAll);

        let mut previous_total = 0;
        for (i, position) in positions.iter().enumerate() {
            let result = counter.process(*position, 0.5, i as u64 * 33, &FrameMetrics::default());
            prop_assert!(result.new_reps <= 1);
            prop_assert!(result.total_reps >= previous_total);
            prop_assert_eq!(result.total_reps, previous_total + result.new_reps);
            prop_assert!((0.0..=1.0).contains(&result.rep_progress));
            if i + 1 < threshold {
                prop_assert_eq!(result.current_state, RepState::Unknown);
            }
            previous_total = result.total_reps;
        }

        // every rep needs a full window on each side
        let max_reps = positions.len() / (2 * threshold);
        prop_assert!(counter.total_reps() as usize <= max_reps);
        prop_assert_eq!(counter.invalid_reps(), 0);
    }

    #[test]
    fn reset_returns_to_initial_state(
        positions in prop::collection::vec(position(), 0..60),
    ) {
        let mut counter = RepCounter::new(
            RepCounterConfig::default(),
            CountingDirection::DownToUp,
            AcceptAll,
        );
        for (i, position) in positions.iter().enumerate() {
            counter.process(*position, 0.5, i as u64 * 100, &FrameMetrics::default());
        }

        counter.reset();
        let snapshot = counter.snapshot();
        prop_assert_eq!(snapshot.total_reps, 0);
        prop_assert_eq!(snapshot.current_state, RepState::Unknown);
        prop_assert!(!snapshot.rep_in_progress);
        prop_assert_eq!(counter.generate_set_summary().total_attempted_reps, 0);
    }
}
