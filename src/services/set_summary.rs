/// Set summary aggregation
///
/// Running totals of valid and invalid reps for one set, turned into a report and a
/// presentation-ready analysis on demand. Timing comes from frame timestamps only.

use crate::models::rep::InvalidRepReason;
use crate::models::summary::{
    FormIssueCount, IssueBreakdown, SetSummaryAnalysis, SetSummaryReport, SummaryStyle,
};

#[derive(Debug, Clone, Default)]
pub struct SetSummaryAggregator {
    rep_scores: Vec<f32>,
    invalid_reps: u32,
    form_issues: Vec<FormIssueCount>,
    first_timestamp_ms: Option<u64>,
    last_timestamp_ms: Option<u64>,
}

impl SetSummaryAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the set's time span to include this frame
    pub fn observe_timestamp(&mut self, timestamp_ms: u64) {
        self.first_timestamp_ms = Some(
            self.first_timestamp_ms
                .map_or(timestamp_ms, |first| first.min(timestamp_ms)),
        );
        self.last_timestamp_ms = Some(
            self.last_timestamp_ms
                .map_or(timestamp_ms, |last| last.max(timestamp_ms)),
        );
    }

    pub fn record_valid(&mut self, form_score: f32) {
        self.rep_scores.push(form_score);
    }

    pub fn record_invalid(&mut self, reason: Option<InvalidRepReason>) {
        self.invalid_reps += 1;
        let Some(reason) = reason else {
            return;
        };

        match self.form_issues.iter_mut().find(|issue| issue.reason == reason) {
            Some(issue) => issue.count += 1,
            None => self.form_issues.push(FormIssueCount { reason, count: 1 }),
        }
    }

    pub fn valid_reps(&self) -> u32 {
        self.rep_scores.len() as u32
    }

    pub fn invalid_reps(&self) -> u32 {
        self.invalid_reps
    }

    pub fn report(&self) -> SetSummaryReport {
        let total_valid_reps = self.valid_reps();
        let total_attempted_reps = total_valid_reps + self.invalid_reps;

        let valid_rep_percentage = if total_attempted_reps > 0 {
            total_valid_reps as f32 / total_attempted_reps as f32 * 100.0
        } else {
            0.0
        };
        let average_form_score = if self.rep_scores.is_empty() {
            0.0
        } else {
            self.rep_scores.iter().sum::<f32>() / self.rep_scores.len() as f32
        };

        let set_duration_ms = match (self.first_timestamp_ms, self.last_timestamp_ms) {
            (Some(first), Some(last)) => last.saturating_sub(first),
            _ => 0,
        };

        SetSummaryReport {
            total_valid_reps,
            total_invalid_reps: self.invalid_reps,
            total_attempted_reps,
            valid_rep_percentage,
            average_form_score,
            form_issues: self.form_issues.clone(),
            rep_scores: self.rep_scores.clone(),
            set_duration_ms,
            start_timestamp_ms: self.first_timestamp_ms,
            end_timestamp_ms: self.last_timestamp_ms,
        }
    }

    pub fn analysis(&self) -> SetSummaryAnalysis {
        analyze_report(self.report())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Build the user-facing message, style and issue percentages for a report
pub fn analyze_report(summary: SetSummaryReport) -> SetSummaryAnalysis {
    let message = format!(
        "Completed {} valid reps out of {} attempts ({:.1}%).\nAverage form score: {:.1}/100",
        summary.total_valid_reps,
        summary.total_attempted_reps,
        summary.valid_rep_percentage,
        summary.average_form_score,
    );
    let style = SummaryStyle::for_percentage(summary.valid_rep_percentage);

    let invalid = summary.total_invalid_reps.max(1) as f32;
    let issues = summary
        .form_issues
        .iter()
        .map(|issue| IssueBreakdown {
            issue: issue.reason,
            count: issue.count,
            percentage: issue.count as f32 / invalid * 100.0,
        })
        .collect();

    SetSummaryAnalysis {
        summary,
        message,
        style,
        issues,
    }
}
