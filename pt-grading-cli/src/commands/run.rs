use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use pt_grading::services::scoring::{format_running_score_display, running_time_score};
use pt_grading::services::{RunningData, RunningGrader};
use serde::Serialize;

use crate::config::Config;

#[derive(Args)]
pub struct RunCommand {
    /// Distance covered in meters
    #[arg(long)]
    distance: f64,

    /// Elapsed time as seconds or mm:ss
    #[arg(long, value_parser = parse_duration)]
    duration: f64,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct RunReport {
    distance_meters: f64,
    duration_seconds: f64,
    pace_per_mile: String,
    normalized_time_seconds: f64,
    score: f64,
    table_points: u32,
}

/// Accept `930`, `930.5` or `15:30`
pub fn parse_duration(value: &str) -> Result<f64> {
    let seconds = match value.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u32 = minutes
                .trim()
                .parse()
                .with_context(|| format!("Invalid minutes in '{}'", value))?;
            let seconds: f64 = seconds
                .trim()
                .parse()
                .with_context(|| format!("Invalid seconds in '{}'", value))?;
            if !(0.0..60.0).contains(&seconds) {
                bail!("Seconds must be below 60 in '{}'", value);
            }
            minutes as f64 * 60.0 + seconds
        }
        None => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid duration '{}'", value))?,
    };

    if !seconds.is_finite() || seconds < 0.0 {
        bail!("Duration must be a non-negative number of seconds");
    }
    Ok(seconds)
}

impl RunCommand {
    pub fn execute(self, config: &Config) -> Result<()> {
        if !(self.distance > 0.0) {
            bail!("Distance must be positive");
        }

        let running = &config.grading.running;
        let mut grader = RunningGrader::new(running.clone());
        grader.update(RunningData {
            distance_meters: self.distance,
            duration_seconds: self.duration,
            coordinates: None,
        });
        let result = grader.complete();
        let score = result.form_score.unwrap_or(0.0);

        let normalized = self.duration * running.reference_distance_m / self.distance;
        let normalized_seconds = normalized.round() as u32;
        let table_points = running_time_score(normalized_seconds);

        if self.json {
            let report = RunReport {
                distance_meters: grader.distance_meters(),
                duration_seconds: grader.duration_seconds(),
                pace_per_mile: grader.pace().to_string(),
                normalized_time_seconds: normalized,
                score,
                table_points,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("{}", "Run Result".bold());
        println!("────────────────────────────────");
        println!("Distance:  {:.0} m", grader.distance_meters());
        println!(
            "Time:      {}:{:02}",
            self.duration as u64 / 60,
            self.duration as u64 % 60
        );
        println!("Pace:      {} /mi", grader.pace());
        println!();

        let score_line = format!("Score:     {:.1} / 100", score);
        if score >= 60.0 {
            println!("{}", score_line.green().bold());
        } else {
            println!("{}", score_line.red().bold());
        }
        println!(
            "Table:     {}",
            format_running_score_display(normalized_seconds, table_points)
        );

        Ok(())
    }
}
