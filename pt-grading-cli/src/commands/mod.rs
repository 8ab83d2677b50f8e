mod config_cmd;
mod replay;
mod run;
mod score;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

pub use replay::ReplayCommand;
pub use run::RunCommand;
pub use score::ScoreCommand;

#[derive(Parser)]
#[command(name = "pt-grade")]
#[command(about = "Replay pose recordings and score standardized fitness tests", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "PT_GRADING_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines recording of pose frames through a grading session
    Replay(ReplayCommand),

    /// Look up standardized points for a rep count
    Score(ScoreCommand),

    /// Grade a run from distance and duration
    Run(RunCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        let config_path = self.config.as_deref();

        match self.command {
            Commands::Replay(cmd) => {
                let config = Config::load(config_path)?;
                apply_color(&config, self.no_color);
                cmd.execute(&config)
            }
            Commands::Score(cmd) => cmd.execute(),
            Commands::Run(cmd) => {
                let config = Config::load(config_path)?;
                apply_color(&config, self.no_color);
                cmd.execute(&config)
            }
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config_path),
                ConfigSubcommands::Init { force } => config_cmd::init_config(config_path, force),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn apply_color(config: &Config, no_color: bool) {
    if no_color || !config.output.color {
        colored::control::set_override(false);
    }
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
