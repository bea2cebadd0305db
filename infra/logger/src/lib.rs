//! # Logger
//!
//! Tracing setup shared by every Lectio binary: a compact console layer,
//! an optional rolling file layer with non-blocking I/O, and `RUST_LOG`
//! based filtering.
//!
//! * Use [`LoggerBuilder::env_filter`] for a programmatic default filter
//!   (e.g. `"lectio=debug,hyper=info"`); `RUST_LOG` still wins.
//!
//! ## Example
//!
//! ```rust
//! # use lectio_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("lectio-server")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::LoggerError;
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use sealed::State;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const KEPT_LOG_FILES: usize = 10;

type BoxedLayer =
    Box<dyn Layer<tracing_subscriber::layer::Layered<EnvFilter, Registry>> + Send + Sync>;

#[derive(Debug)]
struct Settings {
    console: bool,
    directory: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            console: true,
            directory: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: KEPT_LOG_FILES,
            json: false,
            env_filter: None,
        }
    }
}

#[derive(Debug)]
pub struct Unnamed;
#[derive(Debug)]
pub struct Named(String);
#[derive(Debug)]
pub struct NoSink;
#[derive(Debug)]
pub struct FileSink;

mod sealed {
    pub trait State {}
}
impl State for Unnamed {}
impl State for Named {}
impl State for NoSink {}
impl State for FileSink {}

/// Builder for the global tracing subscriber. The type states guarantee a
/// name is set before `init` and keep the file-only knobs off builders that
/// never configured a log directory.
#[derive(Debug)]
pub struct LoggerBuilder<N: State = Unnamed, S: State = NoSink> {
    settings: Settings,
    name: N,
    sink: PhantomData<S>,
}

impl<S: State> LoggerBuilder<Unnamed, S> {
    /// Names the logger; the name prefixes rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, S> {
        LoggerBuilder { settings: self.settings, name: Named(name.into()), sink: PhantomData }
    }
}

impl LoggerBuilder<Named, FileSink> {
    /// Caps how many rotated log files are kept.
    #[must_use = "finish the builder with .init()"]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }

    /// Sets the rotation strategy for log files.
    #[must_use = "finish the builder with .init()"]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    /// Switches the file layer to JSON lines.
    #[must_use = "finish the builder with .init()"]
    pub const fn json(mut self) -> Self {
        self.settings.json = true;
        self
    }
}

impl<S: State> LoggerBuilder<Named, S> {
    /// Sets the minimum level emitted when no filter directive matches.
    #[must_use = "finish the builder with .init()"]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Sets a programmatic default filter (e.g. `lectio=debug,hyper=info`).
    ///
    /// `RUST_LOG` still overrides it. An unparsable filter surfaces as an
    /// error from [`LoggerBuilder::init`].
    #[must_use = "finish the builder with .init()"]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.settings.env_filter = Some(filter.into());
        self
    }

    /// Toggles the console layer.
    #[must_use = "finish the builder with .init()"]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Enables file logging into `directory`.
    pub fn path(self, directory: impl Into<PathBuf>) -> LoggerBuilder<Named, FileSink> {
        let mut settings = self.settings;
        settings.directory = Some(directory.into());
        LoggerBuilder { settings, name: self.name, sink: PhantomData }
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// The returned [`Logger`] owns the non-blocking [`WorkerGuard`]; keep
    /// it alive for the lifetime of the program or file logs are lost.
    ///
    /// # Errors
    /// [`LoggerError::Subscriber`] when a global subscriber is already
    /// installed, [`LoggerError::InvalidConfiguration`] for bad builder
    /// settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { settings, name: Named(name), .. } = self;
        settings.check(&name)?;
        let filter = settings.filter()?;

        let mut layers: Vec<BoxedLayer> = Vec::new();
        if settings.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }
        let guard = if let Some(directory) = settings.directory.clone() {
            let (file, guard) = settings.file_layer(&name, directory)?;
            layers.push(file);
            Some(guard)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "neither console nor file output is enabled".into(),
            });
        }

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

impl Settings {
    fn check(&self, name: &str) -> Result<(), LoggerError> {
        if name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "logger name must not be blank".into(),
            });
        }
        if self.max_files == 0 {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be at least 1".into(),
            });
        }
        Ok(())
    }

    fn filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.env_filter {
            None => Ok(builder.from_env_lossy()),
            Some(directives) => {
                builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("bad filter directive '{directives}': {e}").into(),
                })
            }
        }
    }

    fn file_layer(
        &self,
        name: &str,
        directory: PathBuf,
    ) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
        std::fs::create_dir_all(&directory).map_err(|e| LoggerError::Internal {
            message: format!("cannot create log directory {}: {e}", directory.display()).into(),
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(self.rotation.clone())
            .filename_prefix(name)
            .filename_suffix("log")
            .max_log_files(self.max_files)
            .build(directory)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let file = layer().with_writer(writer).with_ansi(false);
        let file = if self.json { file.json().boxed() } else { file.boxed() };
        Ok((file, guard))
    }
}

/// Handle to the installed logging system. Holds the background worker
/// guard; drop it only at shutdown.
#[must_use = "dropping this handle stops the background logging worker"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a fresh [`LoggerBuilder`].
    ///
    /// The name becomes the rolling-file prefix, e.g.
    /// `lectio-server.2026-08-27.log`.
    #[must_use = "finish the builder with .init()"]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: Settings::default(), name: Unnamed, sink: PhantomData }
    }

    /// Best-effort synchronization point before shutdown; the real flush
    /// happens when this handle drops.
    pub fn flush(&self) {
        tracing::debug!("logger flush requested");
    }

    /// The underlying worker guard, when file logging is active.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("shutting down file logging, draining buffers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn builder_starts_from_defaults() {
        let builder = Logger::builder().name("lectio").env_filter("lectio=debug");
        assert!(builder.settings.console);
        assert_eq!(builder.settings.level, LevelFilter::INFO);
        assert_eq!(builder.settings.max_files, KEPT_LOG_FILES);
        assert_eq!(builder.settings.env_filter.as_deref(), Some("lectio=debug"));
        assert!(builder.settings.directory.is_none());
    }

    #[test]
    #[serial]
    fn builder_collects_settings() {
        let tmp = tempdir().unwrap();
        let logs = tmp.path().join("logs");
        let builder = Logger::builder()
            .name("lectio")
            .env_filter("lectio=info")
            .path(logs.clone())
            .max_files(3)
            .level(LevelFilter::DEBUG);

        assert!(builder.settings.console);
        assert_eq!(builder.settings.level, LevelFilter::DEBUG);
        assert_eq!(builder.settings.max_files, 3);
        assert_eq!(builder.settings.env_filter.as_deref(), Some("lectio=info"));
        assert_eq!(builder.settings.directory.as_deref(), Some(logs.as_path()));
    }

    #[test]
    #[serial]
    fn file_logging_creates_log_files() {
        let tmp = tempdir().unwrap();
        let logs = tmp.path().join("logs");

        let logger = Logger::builder()
            .name("lectio")
            .path(&logs)
            .level(LevelFilter::INFO)
            .init()
            .unwrap();

        tracing::info!("hello world");
        std::thread::sleep(Duration::from_millis(20));
        logger.flush();

        assert!(logs.exists(), "init should create the log directory");

        let wrote_log = std::fs::read_dir(&logs)
            .unwrap()
            .flatten()
            .any(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("log"));
        assert!(wrote_log, "expected a .log file in {}", logs.display());
    }
}
