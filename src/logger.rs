//! log4rs configuration: rolling `app.log`, `audit.log` and `metrics.log`
//! files, or a stderr console for the command-line front end.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::{Path, PathBuf};

use crate::telemetry::{AUDIT_TARGET, METRICS_TARGET};
use crate::utils::devlog::BENCH_TARGET;

const ENC_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;
pub const DEFAULT_RETENTION: u32 = 7;

/// error|warn|info|debug|trace; anything else is info.
#[must_use]
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling(base: &Path, name: &str, keep: u32) -> Result<RollingFileAppender, Box<dyn Error>> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", base.join(format!("{name}.{{}}.log")).display()), keep)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    let appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENC_PATTERN)))
        .build(base.join(format!("{name}.log")), Box::new(policy))?;
    Ok(appender)
}

/// Build the file configuration without installing it.
///
/// # Errors
/// Returns an error if the directory cannot be created or an appender fails to open.
pub fn file_config(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<u32>,
) -> Result<Config, Box<dyn Error>> {
    let base = dir
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    std::fs::create_dir_all(&base)?;
    let keep = retention.unwrap_or(DEFAULT_RETENTION);
    let lvl = parse_level(level.unwrap_or("info"));
    let config = Config::builder()
        .appender(Appender::builder().build("app", Box::new(rolling(&base, "app", keep)?)))
        .appender(Appender::builder().build("audit", Box::new(rolling(&base, "audit", keep)?)))
        .appender(Appender::builder().build("metrics", Box::new(rolling(&base, "metrics", keep)?)))
        .logger(Logger::builder().appender("audit").additive(false).build(AUDIT_TARGET, LevelFilter::Info))
        .logger(Logger::builder().appender("metrics").additive(false).build(METRICS_TARGET, LevelFilter::Info))
        // Benchmark lines go through the thread-local capture only.
        .logger(Logger::builder().additive(false).build(BENCH_TARGET, LevelFilter::Off))
        .build(Root::builder().appender("app").build(lvl))?;
    Ok(config)
}

/// Configure file logging globally for the process. A second call keeps the
/// configuration installed first.
///
/// # Errors
/// Returns an error if the configuration cannot be built.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<u32>,
) -> Result<(), Box<dyn Error>> {
    let config = file_config(dir, level, retention)?;
    if log4rs::init_config(config).is_err() {
        log::debug!("logger already initialized; keeping existing configuration");
    }
    Ok(())
}

/// Configure a stderr logger, used by the command-line front end so that
/// stdout carries only response envelopes.
///
/// # Errors
/// Returns an error if the configuration cannot be built.
pub fn configure_console(level: Option<&str>) -> Result<(), Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{l}] {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .logger(Logger::builder().additive(false).build(BENCH_TARGET, LevelFilter::Off))
        .build(Root::builder().appender("stderr").build(parse_level(level.unwrap_or("warn"))))?;
    if log4rs::init_config(config).is_err() {
        log::debug!("logger already initialized; keeping existing configuration");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level(" warn "), LevelFilter::Warn);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
        assert_eq!(parse_level("off"), LevelFilter::Off);
    }

    #[test]
    fn file_config_creates_directory_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs");
        file_config(Some(&nested), Some("debug"), Some(3)).unwrap();
        assert!(nested.join("app.log").exists());
        assert!(nested.join("audit.log").exists());
        assert!(nested.join("metrics.log").exists());
    }
}
