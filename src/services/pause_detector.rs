/// Detects an athlete holding still in a rep position.
///
/// While `holding` is true and the tracked angle moves less than the tolerance between
/// consecutive frames, elapsed time accumulates; the pause is flagged once the
/// accumulated time exceeds the threshold. Movement or leaving the hold resets it.
#[derive(Debug, Clone)]
pub struct PauseDetector {
    threshold_ms: u64,
    angle_tolerance: f32,
    last_angle: Option<f32>,
    last_timestamp_ms: Option<u64>,
    held_ms: u64,
}

impl PauseDetector {
    pub fn new(threshold_ms: u64, angle_tolerance: f32) -> Self {
        Self {
            threshold_ms,
            angle_tolerance: angle_tolerance.max(0.0),
            last_angle: None,
            last_timestamp_ms: None,
            held_ms: 0,
        }
    }

    /// Feed one frame; returns whether the athlete is currently paused
    pub fn update(&mut self, angle: f32, timestamp_ms: u64, holding: bool) -> bool {
        let still = self
            .last_angle
            .map_or(false, |last| (angle - last).abs() < self.angle_tolerance);

        if holding && still {
            let elapsed = self
                .last_timestamp_ms
                .map_or(0, |last| timestamp_ms.saturating_sub(last));
            self.held_ms = self.held_ms.saturating_add(elapsed);
        } else {
            self.held_ms = 0;
        }

        self.last_angle = Some(angle);
        self.last_timestamp_ms = Some(timestamp_ms);

        self.is_paused()
    }

    pub fn is_paused(&self) -> bool {
        self.held_ms > self.threshold_ms
    }

    pub fn held_ms(&self) -> u64 {
        self.held_ms
    }

    pub fn reset(&mut self) {
        self.last_angle = None;
        self.last_timestamp_ms = None;
        self.held_ms = 0;
    }
}
