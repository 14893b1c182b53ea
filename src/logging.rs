//! Logging bootstrap.
//!
//! One rotating log file per process under the configured directory, with
//! `info` and above echoed to stderr. Panics are recorded as
//! `event=panic_captured` before the default hook runs.
//!
//! Messages across the crate use `event=<name> module=<module> status=<status> key=value`.

use std::any::Any;
use std::panic::{self, PanicHookInfo};
use std::path::{Path, PathBuf};

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, LoggerHandle, Naming,
    WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;

const LOG_FILE_BASENAME: &str = "bookstore";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEPT_LOG_FILES: usize = 5;
const PANIC_TEXT_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: LevelFilter,
    dir: PathBuf,
    _handle: LoggerHandle,
}

/// Start logging at `level` (`off`, `error`, `warn`, `info`, `debug` or
/// `trace`, any case) into `log_dir`, resolved against the working directory
/// when relative.
///
/// Calling it again with the same level and directory is a no-op; any other
/// combination is rejected while a logger is active.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), String> {
    let level: LevelFilter = level
        .trim()
        .parse()
        .map_err(|_| format!("unknown log level `{}`", level.trim()))?;
    let dir = absolute_dir(log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start(level, &dir))?;
    if active.level != level || active.dir != dir {
        return Err(format!(
            "logging already running at level {} in `{}`",
            active.level,
            active.dir.display()
        ));
    }
    Ok(())
}

/// Level and directory of the running logger.
pub fn logging_status() -> Option<(LevelFilter, PathBuf)> {
    ACTIVE.get().map(|active| (active.level, active.dir.clone()))
}

fn start(level: LevelFilter, dir: &Path) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(dir)
        .map_err(|err| format!("cannot create log directory `{}`: {err}", dir.display()))?;

    let handle = Logger::with(LogSpecification::builder().default(level).build())
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEPT_LOG_FILES),
        )
        .duplicate_to_stderr(Duplicate::Info)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("cannot start logger: {err}"))?;

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        error!(
            "event=panic_captured module=logging status=error {}",
            panic_fields(info)
        );
        default_hook(info);
    }));

    info!(
        "event=logging_start module=logging status=ok version={} level={} dir={}",
        env!("CARGO_PKG_VERSION"),
        level,
        dir.display()
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

fn absolute_dir(dir: &Path) -> Result<PathBuf, String> {
    if dir.as_os_str().is_empty() {
        return Err("log directory is empty".to_string());
    }
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|err| format!("cannot resolve `{}`: {err}", dir.display()))?;
    Ok(cwd.join(dir))
}

fn panic_fields(info: &PanicHookInfo<'_>) -> String {
    let location = info
        .location()
        .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
    format!("location={} payload={}", location, panic_text(info.payload()))
}

/// Panic message on one line, cut to `PANIC_TEXT_LIMIT` characters.
fn panic_text(payload: &(dyn Any + Send)) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string payload>");

    let mut text: String = message
        .chars()
        .take(PANIC_TEXT_LIMIT)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if message.chars().nth(PANIC_TEXT_LIMIT).is_some() {
        text.push_str("...");
    }
    text
}
