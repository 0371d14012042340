// crates.io
use tracing::Level;
// self
use crate::_prelude::*;

/// Severity used when logging requests and responses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
	/// Verbose diagnostics.
	Debug,
	/// Routine request/response logging.
	#[default]
	Info,
	/// Recoverable anomalies.
	Warn,
	/// Failures.
	Error,
}
impl LogLevel {
	/// Returns a stable lowercase label.
	pub const fn as_str(self) -> &'static str {
		match self {
			LogLevel::Debug => "debug",
			LogLevel::Info => "info",
			LogLevel::Warn => "warn",
			LogLevel::Error => "error",
		}
	}
}
impl Display for LogLevel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<LogLevel> for Level {
	fn from(level: LogLevel) -> Self {
		match level {
			LogLevel::Debug => Level::DEBUG,
			LogLevel::Info => Level::INFO,
			LogLevel::Warn => Level::WARN,
			LogLevel::Error => Level::ERROR,
		}
	}
}

/// Leveled logger injected into the client for request/response logging.
///
/// Implementations must not panic; logging is a side effect and never influences the
/// request outcome.
pub trait RequestLogger
where
	Self: Send + Sync,
{
	/// Emits `message` at `level`.
	fn log(&self, level: LogLevel, message: &str);

	/// Emits `message` at [`LogLevel::Debug`].
	fn debug(&self, message: &str) {
		self.log(LogLevel::Debug, message);
	}

	/// Emits `message` at [`LogLevel::Info`].
	fn info(&self, message: &str) {
		self.log(LogLevel::Info, message);
	}

	/// Emits `message` at [`LogLevel::Warn`].
	fn warn(&self, message: &str) {
		self.log(LogLevel::Warn, message);
	}

	/// Emits `message` at [`LogLevel::Error`].
	fn error(&self, message: &str) {
		self.log(LogLevel::Error, message);
	}
}

/// [`RequestLogger`] that forwards to `tracing` events under the `netsuite_restlet::requests`
/// target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;
impl RequestLogger for TracingLogger {
	fn log(&self, level: LogLevel, message: &str) {
		match level {
			LogLevel::Debug => tracing::debug!(target: "netsuite_restlet::requests", "{message}"),
			LogLevel::Info => tracing::info!(target: "netsuite_restlet::requests", "{message}"),
			LogLevel::Warn => tracing::warn!(target: "netsuite_restlet::requests", "{message}"),
			LogLevel::Error => tracing::error!(target: "netsuite_restlet::requests", "{message}"),
		}
	}
}

/// In-memory [`RequestLogger`] that keeps every line; handy for tests and debugging sessions.
#[derive(Clone, Debug, Default)]
pub struct CapturingLogger(Arc<Mutex<Vec<(LogLevel, String)>>>);
impl CapturingLogger {
	/// Returns a snapshot of every captured line.
	pub fn lines(&self) -> Vec<(LogLevel, String)> {
		self.0.lock().clone()
	}
}
impl RequestLogger for CapturingLogger {
	fn log(&self, level: LogLevel, message: &str) {
		self.0.lock().push((level, message.to_owned()));
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn helpers_forward_levels() {
		let logger = CapturingLogger::default();

		logger.debug("a");
		logger.warn("b");

		assert_eq!(
			logger.lines(),
			vec![(LogLevel::Debug, "a".into()), (LogLevel::Warn, "b".into())]
		);
	}

	#[test]
	fn tracing_logger_accepts_every_level() {
		for level in [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error] {
			TracingLogger.log(level, level.as_str());
		}
	}
}
