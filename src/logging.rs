//! Logging context
//!
//! A `Logger` is built once in `main` and handed by reference to whatever
//! needs to log. It owns its own `tracing` dispatcher instead of installing a
//! process-wide subscriber, so two loggers with different settings can live
//! side by side (tests rely on this).

use std::fmt::Display;
use std::time::Instant;
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "debug";

/// Explicit logging context
#[derive(Clone, Debug)]
pub struct Logger {
    dispatch: Dispatch,
    verbose: bool,
}

impl Logger {
    /// Logger writing to stderr when `verbose`, silent otherwise
    pub fn new(verbose: bool) -> Self {
        Self::with_writer(std::io::stderr, verbose)
    }

    /// Logger that discards everything
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
            verbose: false,
        }
    }

    /// Logger writing to an arbitrary sink
    pub fn with_writer<W>(make_writer: W, verbose: bool) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        if !verbose {
            return Self::disabled();
        }

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let subscriber = tracing_subscriber::fmt()
            .with_writer(make_writer)
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
            verbose,
        }
    }

    /// Whether anything will be written
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn debug(&self, message: impl Display) {
        tracing::dispatcher::with_default(&self.dispatch, || tracing::debug!("{}", message));
    }

    pub fn info(&self, message: impl Display) {
        tracing::dispatcher::with_default(&self.dispatch, || tracing::info!("{}", message));
    }

    pub fn warn(&self, message: impl Display) {
        tracing::dispatcher::with_default(&self.dispatch, || tracing::warn!("{}", message));
    }

    pub fn error(&self, message: impl Display) {
        tracing::dispatcher::with_default(&self.dispatch, || tracing::error!("{}", message));
    }

    /// Start timing an operation; the elapsed time is logged when the guard drops
    pub fn timer(&self, operation: impl Into<String>) -> Timer<'_> {
        let operation = operation.into();
        self.debug(format_args!("Started operation: {}", operation));
        Timer {
            logger: self,
            operation,
            started: Instant::now(),
        }
    }
}

/// Guard returned by [`Logger::timer`]
pub struct Timer<'a> {
    logger: &'a Logger,
    operation: String,
    started: Instant,
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.logger.debug(format_args!(
            "Completed operation: {} in {:?}",
            self.operation,
            self.started.elapsed()
        ));
    }
}
