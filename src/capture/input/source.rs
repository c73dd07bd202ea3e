//! Input source trait
//!
//! Defines the interface for anything that reports input events into a sampler.

use crate::sampler::EventRecorder;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while installing or running an input hook
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Already running")]
    AlreadyRunning,

    #[error("Hook install failed: {0}")]
    HookInstall(String),

    #[error("Hook thread exited before reporting status")]
    HookThreadLost,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    PlatformError(String),
}

/// Result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Trait for input event sources
///
/// A source calls [`EventRecorder::record_event`] once per event, from
/// whatever thread its platform hook runs on.
#[async_trait]
pub trait InputSource: Send + Sync {
    /// Get the source identifier (e.g., "mouse-motion")
    fn id(&self) -> &str;

    /// Install the hook and begin reporting into `recorder`
    async fn start(&mut self, recorder: EventRecorder) -> CaptureResult<()>;

    /// Remove the hook. Stopping an idle source does nothing.
    async fn stop(&mut self) -> CaptureResult<()>;

    /// Check if the source is currently reporting events
    fn is_running(&self) -> bool;
}
