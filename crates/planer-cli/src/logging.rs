//! Operational logging setup.
//!
//! Lines are written as `{timestamp} - {target} - {level} - {message}` to
//! stderr at the requested level and, when enabled, to
//! `{log_dir}/planer-{YYYYmmdd_HHMMSS}.log` at debug level. The file rotates
//! at [`MAX_LOG_BYTES`] and keeps [`LOG_BACKUPS`] older copies.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use env_logger::{fmt::Formatter, Builder, Logger, Target};
use jiff::Zoned;
use log::{LevelFilter, Log, Metadata, Record};

/// Size at which the log file is rotated.
pub const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Number of rotated log files kept next to the active one.
pub const LOG_BACKUPS: u32 = 5;

/// Initialize the global logger.
///
/// Returns the path of the log file when one was opened. `RUST_LOG`
/// directives, if set, refine both sinks.
pub fn init(level: LevelFilter, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let (log_file, file) = match log_dir {
        Some(dir) => {
            let path = log_file_path(dir)?;
            let file = RotatingFile::open(&path, MAX_LOG_BYTES, LOG_BACKUPS)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            (Some(path), Some(file))
        }
        None => (None, None),
    };

    let logger = SplitLogger::new(level, file);
    let max_level = logger.max_level();
    log::set_boxed_logger(Box::new(logger)).context("Failed to initialize logger")?;
    log::set_max_level(max_level);
    Ok(log_file)
}

fn format_line(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    writeln!(
        buf,
        "{} - {} - {} - {}",
        Zoned::now().strftime("%Y-%m-%d %H:%M:%S"),
        record.target(),
        record.level(),
        record.args()
    )
}

fn sink(level: LevelFilter, target: Target) -> Logger {
    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(format_line)
        .target(target)
        .build()
}

fn log_file_path(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let stamp = Zoned::now().strftime("%Y%m%d_%H%M%S").to_string();
    Ok(dir.join(format!("planer-{stamp}.log")))
}

/// Console logger plus an optional file logger with its own level.
struct SplitLogger {
    console: Logger,
    file: Option<Logger>,
}

impl SplitLogger {
    fn new(level: LevelFilter, file: Option<RotatingFile>) -> Self {
        Self {
            console: sink(level, Target::Stderr),
            file: file.map(|file| {
                sink(
                    level.max(LevelFilter::Debug),
                    Target::Pipe(Box::new(file)),
                )
            }),
        }
    }

    fn max_level(&self) -> LevelFilter {
        let file = self.file.as_ref().map_or(LevelFilter::Off, Logger::filter);
        self.console.filter().max(file)
    }
}

impl Log for SplitLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.enabled(metadata)
            || self.file.as_ref().is_some_and(|file| file.enabled(metadata))
    }

    fn log(&self, record: &Record) {
        if self.console.matches(record) {
            self.console.log(record);
        }
        if let Some(file) = &self.file {
            if file.matches(record) {
                file.log(record);
            }
        }
    }

    fn flush(&self) {
        self.console.flush();
        if let Some(file) = &self.file {
            file.flush();
        }
    }
}

/// Append-only file that rolls over to `{path}.1` .. `{path}.{backups}`
/// once it would grow past `max_bytes`.
struct RotatingFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    backups: u32,
}

impl RotatingFile {
    fn open(path: &Path, max_bytes: u64, backups: u32) -> io::Result<Self> {
        let file = open_append(path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file,
            written,
            max_bytes,
            backups,
        })
    }

    fn backup_path(&self, index: u32) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        if self.backups == 0 {
            self.file = File::create(&self.path)?;
            self.written = 0;
            return Ok(());
        }

        match fs::remove_file(self.backup_path(self.backups)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
            _ => {}
        }
        for index in (1..self.backups).rev() {
            rename_if_exists(&self.backup_path(index), &self.backup_path(index + 1))?;
        }
        rename_if_exists(&self.path, &self.backup_path(1))?;

        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    File::options().create(true).append(true).open(path)
}

fn rename_if_exists(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
