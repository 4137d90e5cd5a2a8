//! File logging.
//!
//! The dashboard owns the terminal, so records only ever go to a file.

use eyre::{eyre, Result, WrapErr};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

const APP_NAME: &str = "wifiscan";
const LOG_FILE_NAME: &str = "wifiscan.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DEFAULT_FILTER: &str = "info";
const VERBOSE_FILTER: &str = "debug";

/// Where this run logs to and what it keeps
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub path: PathBuf,
    /// Directives in `RUST_LOG` syntax, e.g. `info,wifiscan::driver=trace`
    pub filters: String,
}

impl LogSettings {
    pub fn resolve(verbose: bool) -> Result<Self> {
        let rust_log = std::env::var("RUST_LOG").ok();

        Ok(Self {
            path: get_log_file_path()?,
            filters: filter_directives(verbose, rust_log.as_deref()),
        })
    }

    /// Open the log file for appending and install the global logger
    pub fn install(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .wrap_err_with(|| format!("failed to create log directory {}", dir.display()))?;
        }

        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .wrap_err_with(|| format!("failed to open log file {}", self.path.display()))?;

        env_logger::Builder::new()
            .parse_filters(&self.filters)
            .format(format_record)
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init()
            .wrap_err("logger already initialized")?;

        log::info!("[logging] initialized: path={} filters={}", self.path.display(), self.filters);
        Ok(())
    }
}

/// Resolve settings, install the logger and return the log file path
pub fn init_logging(verbose: bool) -> Result<PathBuf> {
    let settings = LogSettings::resolve(verbose)?;
    settings.install()?;
    Ok(settings.path)
}

fn format_record(buf: &mut env_logger::fmt::Formatter, record: &log::Record) -> io::Result<()> {
    writeln!(
        buf,
        "{} [{}] {} - {}",
        chrono::Utc::now().format(TIMESTAMP_FORMAT),
        record.level(),
        record.target(),
        record.args()
    )
}

/// `--verbose` forces debug; otherwise `RUST_LOG` is used as given.
fn filter_directives(verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return VERBOSE_FILTER.to_string();
    }

    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

pub fn get_log_file_path() -> Result<PathBuf> {
    Ok(log_dir()?.join(LOG_FILE_NAME))
}

fn log_dir() -> Result<PathBuf> {
    if cfg!(target_os = "macos") {
        let home = dirs::home_dir().ok_or_else(|| eyre!("could not find home directory"))?;
        return Ok(home.join("Library").join("Logs").join(APP_NAME));
    }

    // Scanning usually runs under sudo
    if running_as_root() {
        return Ok(PathBuf::from("/var/log").join(APP_NAME));
    }

    let data = dirs::data_local_dir().ok_or_else(|| eyre!("could not find local data directory"))?;
    Ok(data.join(APP_NAME).join("logs"))
}

#[cfg(unix)]
fn running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_generation() {
        let path = get_log_file_path().unwrap();
        assert!(path.to_string_lossy().contains(APP_NAME));
        assert_eq!(path.file_name().unwrap(), LOG_FILE_NAME);
    }

    #[test]
    fn test_filter_directives() {
        assert_eq!(filter_directives(false, None), "info");
        assert_eq!(filter_directives(false, Some("  ")), "info");
        assert_eq!(filter_directives(false, Some("warn,wifiscan::driver=trace")), "warn,wifiscan::driver=trace");
        assert_eq!(filter_directives(true, Some("warn")), "debug");
        assert_eq!(filter_directives(true, None), "debug");
    }
}
