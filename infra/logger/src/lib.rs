//! # Logger
//!
//! Installs the global `tracing` subscriber for the plugin manager binaries.
//!
//! * Console output (compact, ANSI) and/or a rolling log file written through a
//!   non-blocking worker. File output can be JSON.
//! * `RUST_LOG` always wins over the programmatic level and filter.
//! * With the `profiling` feature and `--cfg tokio_unstable`, a `console-subscriber`
//!   layer is attached next to the console output.
//!
//! ```rust
//! use pmgr_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("pmgr-server")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const DEFAULT_MAX_FILES: usize = 14;

#[derive(Debug)]
struct Settings {
    console: bool,
    dir: Option<PathBuf>,
    level: LevelFilter,
    filter: Option<String>,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            console: true,
            dir: None,
            level: LevelFilter::INFO,
            filter: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct Named(String);
#[derive(Debug)]
pub struct ConsoleOnly;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for Named {}
impl Sealed for ConsoleOnly {}
impl Sealed for WithFile {}

/// Builder for the global subscriber. A name is required before [`LoggerBuilder::init`];
/// file options only exist once a directory was given.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = ConsoleOnly> {
    settings: Settings,
    name: N,
    _file: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Names the application; also used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, F> {
        LoggerBuilder { settings: self.settings, name: Named(name.into()), _file: PhantomData }
    }
}

impl<F: Sealed> LoggerBuilder<Named, F> {
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Parses a level name (`trace`..`error`, `off`).
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
    pub fn level_str(self, level: &str) -> Result<Self, LoggerError> {
        let parsed = level.trim().parse::<LevelFilter>().map_err(|_| {
            LoggerError::InvalidConfiguration {
                message: format!("Unknown log level \"{level}\"").into(),
                context: None,
            }
        })?;
        Ok(self.level(parsed))
    }

    /// Directive list such as `pmgr_archive=debug,tower_http=info`.
    #[must_use]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.settings.filter = (!filter.trim().is_empty()).then_some(filter);
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Enables rolling file output under `dir`.
    pub fn path(self, dir: impl Into<PathBuf>) -> LoggerBuilder<Named, WithFile> {
        let mut settings = self.settings;
        settings.dir = Some(dir.into());
        LoggerBuilder { settings, name: self.name, _file: PhantomData }
    }

    /// Installs the subscriber.
    ///
    /// Keep the returned [`Logger`] alive until shutdown; dropping it stops the file writer.
    ///
    /// # Errors
    ///
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, an invalid filter or when
    ///   no output is enabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] when the log directory is unusable.
    /// * [`LoggerError::Subscriber`] when a global subscriber already exists.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Settings { console, dir, level, filter, rotation, max_files, json } = self.settings;
        let name = self.name.0;

        if name.trim().is_empty() {
            return Err(invalid("Logger name cannot be empty"));
        }
        if max_files == 0 {
            return Err(invalid("max_files must be greater than zero"));
        }

        let filter = env_filter(level, filter.as_deref())?;
        let mut layers = Vec::new();

        #[cfg(all(feature = "profiling", tokio_unstable))]
        if console {
            layers.push(console_subscriber::spawn().boxed());
        }

        if console {
            layers.push(fmt::layer().compact().with_ansi(true).boxed());
        }

        let guard = match dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)
                    .context(format!("Creating log directory {}", dir.display()))?;

                let appender = RollingFileAppender::builder()
                    .rotation(rotation)
                    .filename_prefix(&name)
                    .filename_suffix("log")
                    .max_log_files(max_files)
                    .build(&dir)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file = fmt::layer().with_writer(writer).with_ansi(false);
                layers.push(if json { file.json().boxed() } else { file.boxed() });
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(invalid("No logging output enabled; enable the console or a log directory"));
        }

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        tracing::debug!(logger = %name, "Logging initialized");

        Ok(Logger { guard })
    }
}

impl LoggerBuilder<Named, WithFile> {
    #[must_use]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    /// Parses `minutely`, `hourly`, `daily` or `never`.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] for other values.
    pub fn rotation_str(self, rotation: &str) -> Result<Self, LoggerError> {
        Ok(self.rotation(parse_rotation(rotation)?))
    }

    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }

    #[must_use]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.settings.json = enabled;
        self
    }
}

/// Handle that owns the non-blocking file writer.
#[must_use = "Dropping the logger stops the background file writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: Settings::default(), name: NoName, _file: PhantomData }
    }

    /// `true` when file output is active.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Flushing log files");
        }
    }
}

/// Maps a rotation name to [`Rotation`].
///
/// # Errors
///
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_rotation(value: &str) -> Result<Rotation, LoggerError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "minutely" => Ok(Rotation::MINUTELY),
        "hourly" => Ok(Rotation::HOURLY),
        "daily" => Ok(Rotation::DAILY),
        "never" => Ok(Rotation::NEVER),
        other => Err(LoggerError::InvalidConfiguration {
            message: format!("Unknown log rotation \"{other}\"").into(),
            context: Some("expected minutely, hourly, daily or never".into()),
        }),
    }
}

fn invalid(message: &'static str) -> LoggerError {
    LoggerError::InvalidConfiguration { message: message.into(), context: None }
}

fn env_filter(level: LevelFilter, directives: Option<&str>) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(level.into());
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return Ok(builder.from_env_lossy());
    }
    match directives {
        Some(directives) => builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
            message: e.to_string().into(),
            context: Some(format!("Parsing log filter \"{directives}\"").into()),
        }),
        None => Ok(builder.from_env_lossy()),
    }
}
