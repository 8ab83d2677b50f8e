use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, ValueEnum};
use colored::Colorize;
use pt_grading::models::{FeedbackTone, PoseFrame, SetSummaryAnalysis, SummaryStyle};
use pt_grading::services::scoring::{format_score_display, table_for};
use pt_grading::{ExerciseSession, ExerciseType};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExerciseArg {
    #[value(alias = "push-up")]
    Pushup,
    #[value(alias = "sit-up")]
    Situp,
    #[value(alias = "pull-up")]
    Pullup,
}

impl From<ExerciseArg> for ExerciseType {
    fn from(arg: ExerciseArg) -> Self {
        match arg {
            ExerciseArg::Pushup => ExerciseType::Pushup,
            ExerciseArg::Situp => ExerciseType::Situp,
            ExerciseArg::Pullup => ExerciseType::Pullup,
        }
    }
}

#[derive(Args)]
pub struct ReplayCommand {
    /// JSON-lines file with one pose frame per line
    file: PathBuf,

    /// Exercise being performed
    #[arg(short, long, value_enum)]
    exercise: ExerciseArg,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Skip calibration and let the analyzer baseline on its first usable frame
    #[arg(long)]
    no_calibrate: bool,
}

/// One completed attempt as printed during replay
#[derive(Debug, Clone, Serialize)]
pub struct RepEvent {
    pub timestamp_ms: u64,
    pub valid: bool,
    pub message: String,
    pub tone: FeedbackTone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_score: Option<f32>,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub session_id: Uuid,
    pub exercise: ExerciseType,
    pub frames: u64,
    pub hidden_frames: u64,
    pub calibrated: bool,
    pub reps: Vec<RepEvent>,
    pub total_reps: u32,
    pub invalid_reps: u32,
    pub standardized_score: u32,
    pub summary: SetSummaryAnalysis,
}

/// Read frames from a JSON-lines file, skipping blank lines
pub fn read_frames(path: &Path) -> Result<Vec<PoseFrame>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open recording {}", path.display()))?;

    let mut frames = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let frame: PoseFrame = serde_json::from_str(&line)
            .with_context(|| format!("Invalid pose frame on line {}", index + 1))?;
        frames.push(frame);
    }

    Ok(frames)
}

/// Drive a session over recorded frames
pub fn replay_frames(
    exercise: ExerciseType,
    frames: &[PoseFrame],
    config: &Config,
    calibrate: bool,
) -> Result<ReplayReport> {
    let mut session = ExerciseSession::new(exercise, &config.grading)?;
    let mut calibrated = false;
    let mut hidden_frames = 0;
    let mut reps = Vec::new();

    for frame in frames {
        if calibrate && !calibrated {
            calibrated = session.calibrate(frame);
        }

        let outcome = session.process_frame(frame);
        if outcome.hint.is_some() {
            hidden_frames += 1;
        }

        let rep_count = &outcome.rep_count;
        if rep_count.new_reps > 0 || rep_count.new_invalid_rep {
            let (message, tone) = rep_count
                .feedback
                .as_ref()
                .map(|feedback| (feedback.message.clone(), feedback.tone))
                .unwrap_or((String::new(), FeedbackTone::Negative));
            reps.push(RepEvent {
                timestamp_ms: frame.timestamp_ms,
                valid: rep_count.new_reps > 0,
                message,
                tone,
                form_score: if rep_count.new_reps > 0 {
                    rep_count.last_rep_form_score
                } else {
                    None
                },
            });
        }
    }

    tracing::info!(
        session_id = %session.session_id(),
        frames = session.frames_processed(),
        total_reps = session.total_reps(),
        "replay finished"
    );

    Ok(ReplayReport {
        session_id: session.session_id(),
        exercise,
        frames: session.frames_processed(),
        hidden_frames,
        calibrated,
        reps,
        total_reps: session.total_reps(),
        invalid_reps: session.invalid_reps(),
        standardized_score: session.standardized_score(),
        summary: session.summary(),
    })
}

impl ReplayCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        let exercise = ExerciseType::from(self.exercise);
        let frames = read_frames(&self.file)?;
        let report = replay_frames(exercise, &frames, config, !self.no_calibrate)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        print_report(&report, config);
        Ok(())
    }
}

fn print_report(report: &ReplayReport, config: &Config) {
    let now = Local::now().format(&config.output.timestamp_format);
    println!("{}", format!("{} replay", report.exercise).bold());
    println!("Session {} at {}", report.session_id, now);
    println!("────────────────────────────────");

    if report.frames > 0 && !report.calibrated && report.frames != report.hidden_frames {
        println!("{}", "Calibration skipped; baseline taken from the first usable frame".dimmed());
    }

    if config.output.show_reps {
        let mut valid = 0;
        for rep in &report.reps {
            let seconds = rep.timestamp_ms as f64 / 1000.0;
            if rep.valid {
                valid += 1;
                let line = format!(
                    "  ✓ Rep {:>3}  {:>7.2}s  {} ({:.0})",
                    valid,
                    seconds,
                    rep.message,
                    rep.form_score.unwrap_or(0.0)
                );
                match rep.tone {
                    FeedbackTone::Positive => println!("{}", line.green()),
                    _ => println!("{}", line.yellow()),
                }
            } else {
                let line = format!("  ✗ Invalid  {:>7.2}s  {}", seconds, rep.message);
                println!("{}", line.red());
            }
        }
        if !report.reps.is_empty() {
            println!();
        }
    }

    if report.hidden_frames > 0 {
        println!(
            "{}",
            format!(
                "{} of {} frames skipped: Ensure full body is visible",
                report.hidden_frames, report.frames
            )
            .yellow()
        );
        println!();
    }

    let summary = &report.summary;
    let message = match summary.style {
        SummaryStyle::Success => summary.message.green(),
        SummaryStyle::Warning => summary.message.yellow(),
        SummaryStyle::Error => summary.message.red(),
    };
    println!("{}", message);

    if !summary.issues.is_empty() {
        println!();
        println!("Form issues:");
        for issue in &summary.issues {
            println!(
                "  {:>3} × {} ({:.0}%)",
                issue.count, issue.issue, issue.percentage
            );
        }
    }

    if table_for(report.exercise).is_some() {
        println!();
        println!(
            "{}",
            format!(
                "Score: {}",
                format_score_display(report.total_reps, report.standardized_score)
            )
            .bold()
        );
    }
}
