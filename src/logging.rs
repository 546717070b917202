//! Optional file logging.
//!
//! The countdown redraws the terminal line in place, so log output never goes
//! to the console. Set `TERMDORO_LOG` to a path to get a log file; verbosity
//! follows `RUST_LOG` and defaults to `termdoro=info`.
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "TERMDORO_LOG";

const DEFAULT_FILTER: &str = "termdoro=info";

/// Log file for this run: `<base>.<unix seconds>.<pid>`.
pub fn log_file_path(base: &Path, started: SystemTime, pid: u32) -> PathBuf {
    let secs = started
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{secs}.{pid}"));
    PathBuf::from(name)
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the file subscriber when `TERMDORO_LOG` is set; no-op otherwise.
pub fn init_tracing() {
    let Some(base) = std::env::var_os(LOG_ENV) else {
        return;
    };
    let path = log_file_path(Path::new(&base), SystemTime::now(), std::process::id());

    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: {LOG_ENV}: cannot create {}: {err}", path.display());
            return;
        }
    };

    tracing_subscriber::registry()
        .with(filter())
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(false),
        )
        .init();
    tracing::debug!(path = %path.display(), "logging started");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_log_file_path_suffix() {
        let started = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let path = log_file_path(Path::new("/tmp/termdoro.log"), started, 4242);
        assert_eq!(path, PathBuf::from("/tmp/termdoro.log.1700000000.4242"));
    }

    #[test]
    fn test_log_file_path_before_epoch() {
        let started = UNIX_EPOCH - Duration::from_secs(5);
        let path = log_file_path(Path::new("run.log"), started, 1);
        assert_eq!(path, PathBuf::from("run.log.0.1"));
    }
}
