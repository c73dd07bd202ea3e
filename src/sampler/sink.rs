//! Display sink trait
//!
//! Defines the interface the sampler publishes rates through (GUI event emitter, log, ...).

use thiserror::Error;

/// Errors that can occur while publishing a rate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Emit failed: {0}")]
    Emit(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Receiver of periodic rate values
///
/// Publishing is fire-and-forget: implementations must not block the caller
/// for longer than it takes to hand the value off.
pub trait RateSink: Send + Sync {
    /// Publish `value` on the named channel
    fn publish(&self, channel: &str, value: u64) -> SinkResult<()>;
}

/// Sink that writes every sample to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl RateSink for LogSink {
    fn publish(&self, channel: &str, value: u64) -> SinkResult<()> {
        tracing::info!(channel, rate = value, "{} events/s", value);
        Ok(())
    }
}

/// Sink that emits each sample as a Tauri event to every window
#[cfg(feature = "desktop")]
pub struct TauriSink {
    app: tauri::AppHandle,
}

#[cfg(feature = "desktop")]
impl TauriSink {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

#[cfg(feature = "desktop")]
impl RateSink for TauriSink {
    fn publish(&self, channel: &str, value: u64) -> SinkResult<()> {
        use tauri::Emitter;

        self.app
            .emit(channel, value)
            .map_err(|e| SinkError::Emit(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_sink_never_fails() {
        assert_eq!(LogSink.publish("MouseRate", 42), Ok(()));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(SinkError::Emit("no window".into()).to_string(), "Emit failed: no window");
    }
}
