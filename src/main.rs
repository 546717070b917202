use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};

use termdoro::alert::TerminalBell;
use termdoro::cli::Cli;
use termdoro::config::{self, FileConfig};
use termdoro::countdown::MonotonicClock;
use termdoro::gate::StdinGate;
use termdoro::interrupt::Interrupt;
use termdoro::logging;
use termdoro::scheduler::{self, ExitStatus, Scheduler};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing();

    match run(&cli) {
        Ok(status) => ExitCode::from(status.code()),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> termdoro::Result<ExitStatus> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let file = FileConfig::load(&path).unwrap_or_else(|err| {
        warn!(%err, "ignoring config file");
        eprintln!("Warning: {err}, using defaults");
        FileConfig::default()
    });
    let config = cli.resolve(&file);

    let interrupt = Interrupt::new();
    interrupt.install_handler()?;

    let plan = scheduler::build_plan(&config);
    let mut scheduler = Scheduler::new(
        config,
        io::stdout(),
        MonotonicClock,
        StdinGate::new(),
        TerminalBell::stdout(),
        interrupt,
    );
    info!(config = ?scheduler.config(), sessions = plan.len(), "starting run");
    scheduler.run(&plan)
}
