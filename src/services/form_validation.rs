/// Rep validation and form scoring
///
/// A validator turns the metrics accumulated over one rep into a valid/invalid
/// decision and a 0-100 form score. Scores start at 100 and lose capped,
/// proportional deductions; the first failing criterion names the reason.

use crate::config::{PullupConfig, PushupValidationConfig, SitupConfig};
use crate::models::rep::{InvalidRepReason, RepMetrics, RepValidation};

pub trait FormValidator {
    fn validate(&self, metrics: &RepMetrics) -> RepValidation;
}

impl<F> FormValidator for F
where
    F: Fn(&RepMetrics) -> RepValidation,
{
    fn validate(&self, metrics: &RepMetrics) -> RepValidation {
        self(metrics)
    }
}

/// Counts every completed rep as a perfect one
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl FormValidator for AcceptAll {
    fn validate(&self, _metrics: &RepMetrics) -> RepValidation {
        RepValidation::valid(100.0)
    }
}

/// First failing criterion in priority order
fn first_failure(criteria: &[(bool, InvalidRepReason)]) -> Option<InvalidRepReason> {
    criteria
        .iter()
        .find(|(passed, _)| !passed)
        .map(|(_, reason)| *reason)
}

fn outcome(score: f32, failure: Option<InvalidRepReason>) -> RepValidation {
    match failure {
        Some(reason) => RepValidation::invalid(reason, score),
        None => RepValidation::valid(score),
    }
}

#[derive(Debug, Clone, Default)]
pub struct PushupValidator {
    config: PushupValidationConfig,
}

impl PushupValidator {
    pub fn new(config: PushupValidationConfig) -> Self {
        Self { config }
    }
}

impl FormValidator for PushupValidator {
    fn validate(&self, metrics: &RepMetrics) -> RepValidation {
        let config = &self.config;
        let min_elbow = metrics.min_elbow_angle.unwrap_or(180.0);
        let max_elbow = metrics.max_elbow_angle.unwrap_or(0.0);
        let hip_deviation = metrics.max_hip_deviation.unwrap_or(0.0);
        let flags = &metrics.flags;

        let mut score = 100.0;
        if min_elbow > config.ideal_depth_angle {
            score -= ((min_elbow - config.ideal_depth_angle) * 2.0).min(50.0);
        }
        if max_elbow < config.required_lockout_angle {
            score -= ((config.required_lockout_angle - max_elbow) * 2.0).min(30.0);
        }
        if hip_deviation > config.hip_deviation_tolerance {
            score -= ((hip_deviation - config.hip_deviation_tolerance) * 2.0).min(30.0);
        }

        let failure = first_failure(&[
            (
                min_elbow <= config.required_depth_angle,
                InvalidRepReason::InsufficientDepth,
            ),
            (
                max_elbow >= config.required_lockout_angle,
                InvalidRepReason::IncompleteExtension,
            ),
            (
                hip_deviation <= config.max_hip_deviation,
                InvalidRepReason::PoorBodyAlignment,
            ),
            (!flags.hands_lifted, InvalidRepReason::HandsLeftGround),
            (!flags.feet_lifted, InvalidRepReason::FeetLeftGround),
            (
                !(flags.knees_touching || flags.body_touching),
                InvalidRepReason::GroundContact,
            ),
            (!flags.paused, InvalidRepReason::PausedInPosition),
        ]);

        outcome(score, failure)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SitupValidator {
    config: SitupConfig,
}

impl SitupValidator {
    pub fn new(config: SitupConfig) -> Self {
        Self { config }
    }
}

impl FormValidator for SitupValidator {
    fn validate(&self, metrics: &RepMetrics) -> RepValidation {
        let config = &self.config;
        let flags = &metrics.flags;

        let reached_vertical = flags.reached_vertical;
        let lowered_fully = metrics
            .min_shoulder_lift
            .map_or(false, |lift| lift < config.shoulder_ground_threshold);
        let hands_interlocked = !flags.hands_released
            && metrics
                .max_wrist_distance
                .map_or(true, |d| d < config.max_wrist_distance);
        let hips_grounded = !flags.hips_unstable
            && metrics
                .max_hip_lift
                .map_or(true, |lift| lift < config.hip_lift_threshold);
        let knees_in_band = !flags.knee_angle_out_of_band;
        let no_pause = !flags.paused;

        let deductions = [
            (reached_vertical, 30.0),
            (lowered_fully, 25.0),
            (hands_interlocked, 25.0),
            (hips_grounded, 20.0),
            (knees_in_band, 15.0),
            (no_pause, 15.0),
        ];
        let score = deductions
            .iter()
            .filter(|(passed, _)| !passed)
            .fold(100.0, |score, (_, points)| score - points);

        let failure = first_failure(&[
            (reached_vertical, InvalidRepReason::DidNotReachVertical),
            (lowered_fully, InvalidRepReason::ShouldersNotGrounded),
            (hands_interlocked, InvalidRepReason::HandsNotInterlocked),
            (hips_grounded, InvalidRepReason::HipsLifted),
            (knees_in_band, InvalidRepReason::KneeAngleOutOfRange),
            (no_pause, InvalidRepReason::PausedDuringRep),
        ]);

        outcome(score, failure)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PullupValidator {
    config: PullupConfig,
}

impl PullupValidator {
    pub fn new(config: PullupConfig) -> Self {
        Self { config }
    }
}

impl FormValidator for PullupValidator {
    fn validate(&self, metrics: &RepMetrics) -> RepValidation {
        let config = &self.config;
        let chin_cleared = metrics.flags.chin_cleared;
        let max_elbow = metrics.max_elbow_angle.unwrap_or(0.0);
        let displacement = metrics.max_horizontal_displacement.unwrap_or(0.0);
        let knee_change = metrics.max_knee_angle_change.unwrap_or(0.0);

        let mut score = 100.0;
        if !chin_cleared {
            score -= 40.0;
        }
        if max_elbow < config.min_elbow_lockout_angle {
            score -= ((config.min_elbow_lockout_angle - max_elbow) * 1.5).min(30.0);
        }
        if displacement > config.max_horizontal_displacement {
            score -= ((displacement - config.max_horizontal_displacement) * 300.0).min(30.0);
        }
        if knee_change > config.max_knee_angle_change {
            score -= ((knee_change - config.max_knee_angle_change) * 2.0).min(30.0);
        }

        let failure = first_failure(&[
            (chin_cleared, InvalidRepReason::ChinBelowBar),
            (
                max_elbow >= config.min_elbow_lockout_angle,
                InvalidRepReason::NoDeadHang,
            ),
            (
                displacement <= config.max_horizontal_displacement,
                InvalidRepReason::ExcessiveSwinging,
            ),
            (
                knee_change <= config.max_knee_angle_change,
                InvalidRepReason::Kipping,
            ),
        ]);

        outcome(score, failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rep::FormFlags;
    use assert_matches::assert_matches;

    fn pushup_metrics(min_elbow: f32, max_elbow: f32, hip_deviation: f32) -> RepMetrics {
        RepMetrics {
            min_elbow_angle: Some(min_elbow),
            max_elbow_angle: Some(max_elbow),
            max_hip_deviation: Some(hip_deviation),
            ..RepMetrics::start(0)
        }
    }

    #[test]
    fn test_pushup_perfect_rep() {
        let result = PushupValidator::default().validate(&pushup_metrics(85.0, 170.0, 3.0));
        assert!(result.is_valid);
        assert_eq!(result.reason, None);
        assert!((result.form_score - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_pushup_shallow_rep() {
        let result = PushupValidator::default().validate(&pushup_metrics(120.0, 170.0, 0.0));
        assert!(!result.is_valid);
        assert_eq!(result.reason, Some(InvalidRepReason::InsufficientDepth));
        assert!((result.form_score - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_pushup_valid_but_imperfect_depth() {
        // within the counted depth but short of the ideal
        let result = PushupValidator::default().validate(&pushup_metrics(98.0, 165.0, 12.0));
        assert!(result.is_valid);
        assert!((result.form_score - (100.0 - 16.0 - 4.0)).abs() < 0.001);
    }

    #[test]
    fn test_pushup_reason_priority() {
        let mut metrics = pushup_metrics(85.0, 150.0, 25.0);
        metrics.flags.hands_lifted = true;
        let result = PushupValidator::default().validate(&metrics);
        assert_eq!(result.reason, Some(InvalidRepReason::IncompleteExtension));

        let mut metrics = pushup_metrics(85.0, 170.0, 0.0);
        metrics.flags = FormFlags {
            feet_lifted: true,
            body_touching: true,
            ..Default::default()
        };
        let result = PushupValidator::default().validate(&metrics);
        assert_eq!(result.reason, Some(InvalidRepReason::FeetLeftGround));
        assert!((result.form_score - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_pushup_score_floor() {
        let result = PushupValidator::default().validate(&pushup_metrics(180.0, 90.0, 60.0));
        assert!(!result.is_valid);
        assert!((result.form_score - 0.0).abs() < 0.001);
    }

    fn situp_metrics() -> RepMetrics {
        RepMetrics {
            min_trunk_angle: Some(75.0),
            max_trunk_angle: Some(135.0),
            min_shoulder_lift: Some(0.0),
            max_hip_lift: Some(0.005),
            max_wrist_distance: Some(0.02),
            flags: FormFlags {
                reached_vertical: true,
                ..Default::default()
            },
            ..RepMetrics::start(0)
        }
    }

    #[test]
    fn test_situp_valid_rep() {
        let result = SitupValidator::default().validate(&situp_metrics());
        assert!(result.is_valid);
        assert!((result.form_score - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_situp_hands_released() {
        let mut metrics = situp_metrics();
        metrics.flags.hands_released = true;
        metrics.max_wrist_distance = Some(0.2);

        let result = SitupValidator::default().validate(&metrics);
        assert!(!result.is_valid);
        assert_eq!(result.reason, Some(InvalidRepReason::HandsNotInterlocked));
        assert!((result.form_score - 75.0).abs() < 0.001);
    }

    #[test]
    fn test_situp_multiple_faults() {
        let mut metrics = situp_metrics();
        metrics.flags.reached_vertical = false;
        metrics.flags.paused = true;

        let result = SitupValidator::default().validate(&metrics);
        assert_eq!(result.reason, Some(InvalidRepReason::DidNotReachVertical));
        assert!((result.form_score - 55.0).abs() < 0.001);
    }

    fn pullup_metrics(displacement: f32, knee_change: f32) -> RepMetrics {
        RepMetrics {
            min_elbow_angle: Some(10.0),
            max_elbow_angle: Some(178.0),
            max_horizontal_displacement: Some(displacement),
            max_knee_angle_change: Some(knee_change),
            flags: FormFlags {
                chin_cleared: true,
                ..Default::default()
            },
            ..RepMetrics::start(0)
        }
    }

    #[test]
    fn test_pullup_valid_rep() {
        let result = PullupValidator::default().validate(&pullup_metrics(0.02, 3.0));
        assert!(result.is_valid);
        assert!((result.form_score - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_pullup_swinging() {
        let result = PullupValidator::default().validate(&pullup_metrics(0.10, 0.0));
        assert!(!result.is_valid);
        assert_matches!(result.reason, Some(InvalidRepReason::ExcessiveSwinging));
        assert!((result.form_score - 91.0).abs() < 0.01);
    }

    #[test]
    fn test_pullup_kipping() {
        let result = PullupValidator::default().validate(&pullup_metrics(0.0, 30.0));
        assert_eq!(result.reason, Some(InvalidRepReason::Kipping));
        assert!((result.form_score - 80.0).abs() < 0.001);
    }

    #[test]
    fn test_pullup_without_observations() {
        let result = PullupValidator::default().validate(&RepMetrics::start(0));
        assert_eq!(result.reason, Some(InvalidRepReason::ChinBelowBar));
        assert!((result.form_score - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_closure_validator() {
        let validator = |metrics: &RepMetrics| {
            if metrics.frame_count > 2 {
                RepValidation::valid(80.0)
            } else {
                RepValidation::invalid(InvalidRepReason::PausedDuringRep, 0.0)
            }
        };
        assert!(!validator.validate(&RepMetrics::start(0)).is_valid);
        assert!(AcceptAll.validate(&RepMetrics::start(0)).is_valid);
    }
}
