use std::{fmt, io::Write as _};

use ansi_term::{Color, WithFg};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Writes log records to stderr with a colored level tag.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{} {} {}",
            LevelFormat(record.level()),
            WithFg::new(Color::DarkGray, record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Installs the console logger with `level` as the maximum level.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

struct LevelFormat(Level);

impl fmt::Display for LevelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (color, msg) = match self.0 {
            Level::Trace => (Color::Magenta, "TRACE"),
            Level::Debug => (Color::Blue, "DEBUG"),
            Level::Info => (Color::Green, " INFO"),
            Level::Warn => (Color::Yellow, " WARN"),
            Level::Error => (Color::Red, "ERROR"),
        };
        write!(f, "{}", WithFg::new(color, msg))
    }
}
