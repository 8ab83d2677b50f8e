/// Set summary models
///
/// The end-of-set report and its presentation-ready analysis.

use serde::{Deserialize, Serialize};

use crate::models::rep::InvalidRepReason;

/// How often one invalid-rep reason occurred in a set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormIssueCount {
    pub reason: InvalidRepReason,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSummaryReport {
    pub total_valid_reps: u32,
    pub total_invalid_reps: u32,
    pub total_attempted_reps: u32,
    /// Share of attempted reps that were valid (0-100)
    pub valid_rep_percentage: f32,
    /// Mean form score of valid reps (0-100)
    pub average_form_score: f32,
    /// Invalid-rep reasons in the order they first occurred
    pub form_issues: Vec<FormIssueCount>,
    pub rep_scores: Vec<f32>,
    pub set_duration_ms: u64,
    pub start_timestamp_ms: Option<u64>,
    pub end_timestamp_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    Success,
    Warning,
    Error,
}

impl SummaryStyle {
    pub fn for_percentage(valid_rep_percentage: f32) -> Self {
        if valid_rep_percentage >= 90.0 {
            SummaryStyle::Success
        } else if valid_rep_percentage >= 70.0 {
            SummaryStyle::Warning
        } else {
            SummaryStyle::Error
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueBreakdown {
    pub issue: InvalidRepReason,
    pub count: u32,
    /// Share of invalid reps with this reason (0-100)
    pub percentage: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSummaryAnalysis {
    pub summary: SetSummaryReport,
    pub message: String,
    pub style: SummaryStyle,
    pub issues: Vec<IssueBreakdown>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_thresholds() {
        assert_eq!(SummaryStyle::for_percentage(100.0), SummaryStyle::Success);
        assert_eq!(SummaryStyle::for_percentage(90.0), SummaryStyle::Success);
        assert_eq!(SummaryStyle::for_percentage(89.9), SummaryStyle::Warning);
        assert_eq!(SummaryStyle::for_percentage(70.0), SummaryStyle::Warning);
        assert_eq!(SummaryStyle::for_percentage(0.0), SummaryStyle::Error);
    }
}
