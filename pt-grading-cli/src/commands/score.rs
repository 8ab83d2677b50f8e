use anyhow::{bail, Context, Result};
use clap::Args;
use pt_grading::services::scoring::{format_score_display, table_for};
use pt_grading::ExerciseType;

#[derive(Args)]
pub struct ScoreCommand {
    /// Exercise (pushup, situp, pullup)
    exercise: String,

    /// Number of valid reps
    reps: u32,
}

impl ScoreCommand {
    pub fn execute(self) -> Result<()> {
        let exercise: ExerciseType = self
            .exercise
            .parse()
            .with_context(|| format!("Unknown exercise '{}'", self.exercise))?;

        let Some(table) = table_for(exercise) else {
            bail!("{} is scored by time; use `pt-grade run` instead", exercise);
        };

        println!(
            "{}: {}",
            exercise,
            format_score_display(self.reps, table.score(self.reps))
        );

        Ok(())
    }
}
