//! Command-line flags, layered over the config file defaults.
use std::path::PathBuf;

use clap::Parser;

use crate::config::{
    DEFAULT_BREAK_MINUTES, DEFAULT_ROUNDS, DEFAULT_WORK_MINUTES, FileConfig, SessionKind,
    TimerConfig,
};

#[derive(Debug, Parser)]
#[command(
    name = "termdoro",
    version,
    about = "termdoro - Terminal Pomodoro Timer",
    allow_negative_numbers = true
)]
pub struct Cli {
    /// Work session duration in minutes (default: 25)
    #[arg(short, long, value_name = "MINUTES")]
    pub work: Option<i64>,

    /// Break session duration in minutes (default: 5)
    #[arg(short = 'b', long = "break", value_name = "MINUTES")]
    pub break_minutes: Option<i64>,

    /// Number of work sessions to run (default: 1)
    #[arg(short, long)]
    pub rounds: Option<i64>,

    /// Automatically start the next session without prompting
    #[arg(long)]
    pub auto: bool,

    /// Disable the terminal bell on session completion
    #[arg(long)]
    pub no_bell: bool,

    /// Start with a break or work session (default: work)
    #[arg(long, value_enum, value_name = "KIND")]
    pub start_with: Option<SessionKind>,

    /// Read defaults from this JSON file instead of ~/.config/termdoro/config.json
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merges flags over `file`, falling back to the built-in defaults.
    pub fn resolve(&self, file: &FileConfig) -> TimerConfig {
        TimerConfig::new(
            self.work
                .or(file.work_minutes)
                .unwrap_or(DEFAULT_WORK_MINUTES),
            self.break_minutes
                .or(file.break_minutes)
                .unwrap_or(DEFAULT_BREAK_MINUTES),
            self.rounds.or(file.rounds).unwrap_or(DEFAULT_ROUNDS),
            self.auto || file.auto.unwrap_or(false),
            !self.no_bell && file.bell.unwrap_or(true),
            self.start_with
                .or(file.start_with)
                .unwrap_or(SessionKind::Work),
        )
    }
}
