/// Standardized scoring
///
/// Fitness test point tables for rep-based events, the two-mile run time table,
/// the continuous run formula, and display formatting helpers.

use crate::config::RunningConfig;
use crate::models::exercise::ExerciseType;

pub const METERS_PER_MILE: f64 = 1609.34;

/// Sorted `(key, points)` pairs; a lookup takes the greatest key not above the input
#[derive(Debug, Clone, Copy)]
pub struct ScoreTable {
    entries: &'static [(u32, u32)],
}

impl ScoreTable {
    /// Entries must be sorted by key in ascending order
    pub const fn new(entries: &'static [(u32, u32)]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [(u32, u32)] {
        self.entries
    }

    /// Points for the greatest key `<= key`, or `None` below the smallest key
    pub fn lookup(&self, key: u32) -> Option<u32> {
        let index = self.entries.partition_point(|(entry_key, _)| *entry_key <= key);
        index.checked_sub(1).map(|i| self.entries[i].1)
    }

    /// Points for a rep count; counts above the table saturate at its top entry
    pub fn score(&self, reps: u32) -> u32 {
        self.lookup(reps).unwrap_or(0)
    }

    pub fn max_key(&self) -> Option<u32> {
        self.entries.last().map(|(key, _)| *key)
    }
}

pub const PUSHUP_TABLE: ScoreTable = ScoreTable::new(&[
    (0, 0), (1, 1), (2, 3), (3, 4), (4, 6), (5, 7), (6, 9), (7, 10),
    (8, 12), (9, 13), (10, 15), (11, 16), (12, 18), (13, 19), (14, 21), (15, 22),
    (16, 24), (17, 25), (18, 26), (19, 28), (20, 29), (21, 31), (22, 32), (23, 34),
    (24, 35), (25, 37), (26, 38), (27, 40), (28, 41), (29, 43), (30, 44), (31, 46),
    (32, 47), (33, 48), (34, 50), (35, 51), (36, 53), (37, 54), (38, 56), (39, 57),
    (40, 59), (41, 60), (42, 62), (43, 63), (44, 65), (45, 66), (46, 68), (47, 69),
    (48, 71), (49, 72), (50, 74), (51, 75), (52, 76), (53, 78), (54, 79), (55, 81),
    (56, 82), (57, 84), (58, 85), (59, 87), (60, 88), (61, 90), (62, 91), (63, 93),
    (64, 94), (65, 96), (66, 97), (67, 99), (68, 100),
]);

pub const SITUP_TABLE: ScoreTable = ScoreTable::new(&[
    (0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 5), (6, 6), (7, 7),
    (8, 8), (9, 9), (10, 10), (11, 11), (12, 12), (13, 13), (14, 14), (15, 15),
    (16, 16), (17, 17), (18, 18), (19, 19), (20, 20), (21, 21), (22, 22), (23, 23),
    (24, 24), (25, 25), (26, 26), (27, 27), (28, 28), (29, 29), (30, 30), (31, 31),
    (32, 32), (33, 33), (34, 34), (35, 35), (36, 36), (37, 37), (38, 38), (39, 39),
    (40, 40), (41, 41), (42, 42), (43, 43), (44, 44), (45, 45), (46, 46), (47, 47),
    (48, 48), (49, 49), (50, 50), (51, 52), (52, 58), (53, 60), (54, 62), (55, 64),
    (56, 66), (57, 68), (58, 70), (59, 72), (60, 74), (61, 76), (62, 78), (63, 80),
    (64, 82), (65, 84), (66, 86), (67, 88), (68, 90), (69, 91), (70, 92), (71, 93),
    (72, 94), (73, 95), (74, 96), (75, 97), (76, 98), (77, 99), (78, 100),
]);

pub const PULLUP_TABLE: ScoreTable = ScoreTable::new(&[
    (0, 0), (1, 4), (2, 8), (3, 12), (4, 16), (5, 20), (6, 24), (7, 28),
    (8, 32), (9, 36), (10, 40), (11, 44), (12, 48), (13, 52), (14, 56), (15, 60),
    (16, 64), (17, 68), (18, 72), (19, 76), (20, 80), (21, 84), (22, 88), (23, 92),
    (24, 96), (25, 100),
]);

pub const RUNNING_TIME_TABLE: ScoreTable = ScoreTable::new(&[
    (660, 100), (666, 99), (672, 98), (678, 96), (684, 95), (690, 94), (696, 93), (702, 92),
    (708, 91), (714, 89), (720, 88), (726, 87), (732, 86), (738, 85), (744, 84), (750, 82),
    (756, 81), (762, 80), (768, 79), (774, 78), (780, 76), (786, 75), (792, 74), (798, 73),
    (804, 72), (810, 71), (816, 69), (822, 68), (828, 67), (834, 66), (840, 64), (846, 63),
    (852, 62), (858, 61), (864, 60), (870, 59), (876, 57), (882, 56), (888, 55), (894, 54),
    (900, 53), (906, 51), (912, 50), (918, 49), (924, 48), (930, 47), (936, 45), (942, 44),
    (948, 43), (954, 42), (960, 41), (966, 39), (972, 38), (978, 37), (984, 36), (990, 35),
    (996, 33), (1002, 32), (1008, 31), (1014, 30), (1020, 29), (1026, 28), (1032, 27), (1038, 26),
    (1044, 24), (1050, 23), (1056, 22), (1062, 21), (1068, 20), (1074, 19), (1080, 18), (1086, 16),
    (1092, 15), (1098, 14), (1104, 13), (1110, 12), (1116, 11), (1122, 10), (1128, 9), (1134, 8),
    (1140, 6), (1146, 5), (1152, 4), (1158, 3), (1164, 2), (1170, 0),
]);

/// Table for a rep-based event; running has none
pub fn table_for(exercise: ExerciseType) -> Option<&'static ScoreTable> {
    match exercise {
        ExerciseType::Pushup => Some(&PUSHUP_TABLE),
        ExerciseType::Situp => Some(&SITUP_TABLE),
        ExerciseType::Pullup => Some(&PULLUP_TABLE),
        ExerciseType::Running => None,
    }
}

pub fn pushup_score(reps: u32) -> u32 {
    PUSHUP_TABLE.score(reps)
}

pub fn situp_score(reps: u32) -> u32 {
    SITUP_TABLE.score(reps)
}

pub fn pullup_score(reps: u32) -> u32 {
    PULLUP_TABLE.score(reps)
}

/// Two-mile run points from the time table; faster than the table scores 100
pub fn running_time_score(time_seconds: u32) -> u32 {
    match RUNNING_TIME_TABLE.lookup(time_seconds) {
        Some(points) => points,
        None => RUNNING_TIME_TABLE
            .entries()
            .first()
            .map_or(0, |(_, points)| *points),
    }
}

/// Continuous run score (0-100) with the time normalized to the reference distance.
///
/// At or under the max-score time scores 100, the passing time scores 60, and the
/// score decays linearly to 0 over the overage window.
pub fn running_score(distance_m: f64, duration_s: f64, config: &RunningConfig) -> f64 {
    if !(distance_m > 0.0) || !duration_s.is_finite() || duration_s < 0.0 {
        return 0.0;
    }

    let normalized = duration_s * (config.reference_distance_m / distance_m);

    if normalized <= config.max_score_time_s {
        return 100.0;
    }

    if normalized >= config.passing_time_s {
        let over = normalized - config.passing_time_s;
        let penalty = (over / config.overage_window_s).min(1.0);
        return (60.0 - penalty * 60.0).max(0.0);
    }

    let range = config.passing_time_s - config.max_score_time_s;
    let reduction = (normalized - config.max_score_time_s) / range * 40.0;
    (100.0 - reduction).max(60.0)
}

/// Pace per mile as `mm:ss`, or `00:00` when distance or duration is not positive
pub fn format_pace(distance_m: f64, duration_s: f64) -> String {
    if !(distance_m > 0.0) || !(duration_s > 0.0) || !duration_s.is_finite() {
        return "00:00".to_string();
    }

    let seconds_per_mile = duration_s / distance_m * METERS_PER_MILE;
    let minutes = (seconds_per_mile / 60.0).floor() as u64;
    let seconds = (seconds_per_mile % 60.0).floor() as u64;
    format!("{:02}:{:02}", minutes, seconds)
}

/// e.g. `48 reps → 71 points`
pub fn format_score_display(reps: u32, points: u32) -> String {
    format!("{} reps → {} points", reps, points)
}

/// e.g. `15:30 → 47 points`
pub fn format_running_score_display(time_seconds: u32, points: u32) -> String {
    format!(
        "{}:{:02} → {} points",
        time_seconds / 60,
        time_seconds % 60,
        points
    )
}
