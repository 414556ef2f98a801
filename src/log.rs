//! Initialisation of the program logger.
//!
//! Log messages are written to the console (coloured when attached to a terminal) and, when an
//! output folder is in use, to log files alongside the results.
use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// Set once [`init`] has succeeded
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The environment variable which overrides the log level in the settings file
pub const LOG_LEVEL_ENV_VAR: &str = "CARBON_ROI_LOG_LEVEL";

/// Log level used when neither `CARBON_ROI_LOG_LEVEL` nor `settings.toml` sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log file for `info` and more verbose messages
const LOG_INFO_FILE_NAME: &str = "carbon_roi_info.log";

/// Log file for warnings and errors
const LOG_ERROR_FILE_NAME: &str = "carbon_roi_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Set up logging for the rest of the program's run.
///
/// The level is taken from the `CARBON_ROI_LOG_LEVEL` environment variable if set, otherwise from
/// `log_level_from_settings`. Accepted levels are `off`, `error`, `warn`, `info`, `debug` and
/// `trace` (in any case).
///
/// Messages less severe than warnings go to stdout and the rest to stderr, coloured when writing to a
/// terminal. If `log_file_dir` is given, `carbon_roi_info.log` (at least `info` level) and
/// `carbon_roi_error.log` (warnings and errors) are also written there.
///
/// Fails if the level is unknown, a log file can't be created or a logger is already set.
pub fn init(log_level_from_settings: &str, log_file_dir: Option<&Path>) -> Result<()> {
    let log_level =
        env::var(LOG_LEVEL_ENV_VAR).unwrap_or_else(|_| log_level_from_settings.to_string());
    let log_level = parse_log_level(&log_level)?;

    let mut dispatch = Dispatch::new()
        .chain(console_dispatch(log_level, false))
        .chain(console_dispatch(log_level, true));
    if let Some(dir) = log_file_dir {
        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .filter(|metadata| metadata.level() > LevelFilter::Warn)
                    .format(write_log_plain)
                    .level(log_level.max(LevelFilter::Info))
                    .chain(create_log_file(dir, LOG_INFO_FILE_NAME)?),
            )
            .chain(
                Dispatch::new()
                    .format(write_log_plain)
                    .level(LevelFilter::Warn)
                    .chain(create_log_file(dir, LOG_ERROR_FILE_NAME)?),
            );
    }

    dispatch.apply()?;
    LOGGER_INIT
        .set(())
        .map_err(|()| anyhow!("Logger already initialised"))?;

    Ok(())
}

/// Output to stderr (warnings and errors) or stdout (everything else)
fn console_dispatch(log_level: LevelFilter, errors: bool) -> Dispatch {
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    let dispatch = Dispatch::new();
    if errors {
        let use_colour = std::io::stderr().is_terminal();
        dispatch
            .format(move |out, message, record| {
                write_log_colour(out, message, record, use_colour, &colours);
            })
            .level(log_level.min(LevelFilter::Warn))
            .chain(std::io::stderr())
    } else {
        let use_colour = std::io::stdout().is_terminal();
        dispatch
            .filter(|metadata| metadata.level() > LevelFilter::Warn)
            .format(move |out, message, record| {
                write_log_colour(out, message, record, use_colour, &colours);
            })
            .level(log_level)
            .chain(std::io::stdout())
    }
}

/// Create (or truncate) a log file in `dir`
fn create_log_file(dir: &Path, file_name: &str) -> Result<File> {
    let path = dir.join(file_name);
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))
}

/// Convert a log level string to a [`LevelFilter`], ignoring case
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    let level = match log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    };

    Ok(level)
}

/// Write a `[time level target] message` line
fn write_log<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");

    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}

/// Write a log line without colours (for log files and non-terminals)
fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_log(out, record.level(), record.target(), message);
}

/// Write a log line, colouring the level if `use_colour` is set
fn write_log_colour(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: &ColoredLevelConfig,
) {
    if use_colour {
        write_log(out, colours.color(record.level()), record.target(), message);
    } else {
        write_log_plain(out, message, record);
    }
}
