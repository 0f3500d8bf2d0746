//! Scoped timing instrumentation
//!
//! A [`TimingGuard`] starts a monotonic stopwatch when created and emits a
//! single info entry carrying the operation name and elapsed time when it is
//! dropped. Because the emission lives in `Drop`, it happens on every exit
//! path of the enclosing scope, including early returns and unwinding panics.

use super::log_context::LogContext;
use super::log_handler::LogHandler;
use super::log_level::LogLevel;
use super::output_builder::OutputOptions;
use std::time::{Duration, Instant};

/// RAII stopwatch that logs its elapsed time on drop
///
/// # Example
///
/// ```
/// use policy_engine_logger::LogHandler;
///
/// let handler = LogHandler::new();
/// {
///     let _timer = handler.start_timer("evaluate_rules");
///     // ... work ...
/// } // info entry with operation = "evaluate_rules" emitted here
/// ```
#[must_use = "the timer logs when dropped; binding it to `_` drops it immediately"]
pub struct TimingGuard<'a> {
    handler: &'a LogHandler,
    operation: String,
    started: Instant,
}

impl<'a> TimingGuard<'a> {
    pub fn start(handler: &'a LogHandler, operation: impl Into<String>) -> Self {
        Self {
            handler,
            operation: operation.into(),
            started: Instant::now(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        let duration = self.started.elapsed();
        let mut options = OutputOptions::new(LogLevel::Info)
            .operation(self.operation.clone())
            .duration(duration);

        if std::thread::panicking() {
            options = options.context(LogContext::new().with_field("panicked", true));
        }

        self.handler
            .output(format!("{} finished", self.operation), options);
    }
}

impl LogHandler {
    /// Start a timer that logs when it goes out of scope
    pub fn start_timer(&self, operation: impl Into<String>) -> TimingGuard<'_> {
        TimingGuard::start(self, operation)
    }

    /// Run `body`, then log how long it took
    ///
    /// The entry is emitted whether `body` returns normally or panics. The
    /// return value, including an `Err`, is passed through untouched and a
    /// panic keeps unwinding after the entry is logged.
    ///
    /// On a panic the entry also gets a context field `panicked = true`.
    /// With structured logging on, the `_structured` record therefore always
    /// appears for a timed operation, even when the current tag is empty, and
    /// its payload carries `"context": {"panicked": true}`.
    ///
    /// # Example
    ///
    /// ```
    /// use policy_engine_logger::LogHandler;
    ///
    /// let handler = LogHandler::new();
    /// let total: u32 = handler.time("sum", || (1..=10).sum());
    /// assert_eq!(total, 55);
    /// ```
    pub fn time<T, F>(&self, operation: impl Into<String>, body: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _timer = self.start_timer(operation);
        body()
    }

    /// Await `body`, then log how long it took
    ///
    /// The calling task suspends until `body` settles. There is no timeout:
    /// a future that never completes never logs. A panic while polling is
    /// tagged `panicked = true` as in [`LogHandler::time`].
    pub async fn time_async<F>(&self, operation: impl Into<String>, body: F) -> F::Output
    where
        F: std::future::Future,
    {
        let _timer = self.start_timer(operation);
        body.await
    }
}
