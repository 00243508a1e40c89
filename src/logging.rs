//! File logging
//!
//! The terminal belongs to the grid while a session is open, so log
//! records go to `<temp dir>/pam-debug.log`. Logging is off unless
//! `PAM_LOG` names a level (`error`, `warn`, `info`, `debug`, `trace`).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Environment variable holding the log level
pub const LOG_ENV: &str = "PAM_LOG";

pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("pam-debug.log")
}

/// Parse a level name; unknown names disable logging
pub fn parse_level(value: &str) -> Option<log::LevelFilter> {
    value.trim().parse::<log::LevelFilter>().ok()
}

/// Install the file logger when `PAM_LOG` is set
pub fn init() -> std::io::Result<()> {
    let Some(level) = std::env::var(LOG_ENV).ok().as_deref().and_then(parse_level) else {
        return Ok(());
    };

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path())?;

    let installed = env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format(|buf, record| {
            use std::time::SystemTime;
            let datetime: chrono::DateTime<chrono::Local> = SystemTime::now().into();
            writeln!(
                buf,
                "[{}] [{}] {}",
                datetime.format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .try_init();

    if installed.is_ok() {
        log::debug!("=== PAM SESSION STARTED ===");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(log::LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Some(log::LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(log::LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn test_log_path_is_in_temp_dir() {
        assert!(log_path().starts_with(std::env::temp_dir()));
    }
}
