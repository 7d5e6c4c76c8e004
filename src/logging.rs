//! env_logger setup shared by the binaries.

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

/// How a binary wants its logs.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Each step raises the threshold: warn, error, off
    pub quiet: u8,
    /// Each step lowers the threshold: debug, trace
    pub verbose: u8,
    /// Write logs to this file instead of stderr
    pub log_file: Option<PathBuf>,
    /// Log to stderr when no file is given
    pub console: bool,
    /// Level used when neither RUST_LOG nor -q/-v say otherwise
    pub default_level: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            quiet: 0,
            verbose: 0,
            log_file: None,
            console: true,
            default_level: "info".to_string(),
        }
    }
}

/// Level forced by `-q`/`-v`, if any. Verbosity wins over quietness.
pub fn flag_level(quiet: u8, verbose: u8) -> Option<LevelFilter> {
    match (quiet, verbose) {
        (_, 1) => Some(LevelFilter::Debug),
        (_, v) if v >= 2 => Some(LevelFilter::Trace),
        (0, _) => None,
        (1, _) => Some(LevelFilter::Warn),
        (2, _) => Some(LevelFilter::Error),
        _ => Some(LevelFilter::Off),
    }
}

/// Initialize the global logger. Call once, before anything logs.
pub fn init(options: &LogOptions) -> Result<()> {
    LevelFilter::from_str(&options.default_level)
        .with_context(|| format!("invalid log level: {}", options.default_level))?;

    let mut builder =
        Builder::from_env(Env::default().filter_or("RUST_LOG", options.default_level.as_str()));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(level) = flag_level(options.quiet, options.verbose) {
        builder.filter_level(level);
    }

    match &options.log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None if !options.console => {
            builder.filter_level(LevelFilter::Off);
        }
        None => {}
    }

    builder.try_init().context("logger already initialized")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_level() {
        assert_eq!(flag_level(0, 0), None);
        assert_eq!(flag_level(1, 0), Some(LevelFilter::Warn));
        assert_eq!(flag_level(2, 0), Some(LevelFilter::Error));
        assert_eq!(flag_level(5, 0), Some(LevelFilter::Off));
        assert_eq!(flag_level(0, 1), Some(LevelFilter::Debug));
        assert_eq!(flag_level(3, 2), Some(LevelFilter::Trace));
    }

    #[test]
    fn test_invalid_default_level_rejected() {
        let options = LogOptions {
            default_level: "loud".to_string(),
            ..LogOptions::default()
        };
        assert!(init(&options).is_err());
    }
}
