use crate::capture::input::source::{CaptureError, CaptureResult, InputSource};
use crate::sampler::EventRecorder;
use async_trait::async_trait;

#[cfg(target_os = "macos")]
use crate::capture::macos::input as platform;

#[cfg(target_os = "windows")]
use crate::capture::windows::input as platform;

#[cfg(all(target_os = "linux", feature = "x11-hook"))]
use crate::capture::linux::input as platform;

#[cfg(not(any(
    target_os = "macos",
    target_os = "windows",
    all(target_os = "linux", feature = "x11-hook")
)))]
use crate::capture::unsupported as platform;

/// Process-wide mouse motion hook
///
/// Each reported mouse move counts as one event; coordinates are ignored.
pub struct MouseMotionSource {
    id: String,
    hook: Option<platform::MotionHook>,
}

impl MouseMotionSource {
    pub fn new() -> Self {
        Self {
            id: "mouse-motion".to_string(),
            hook: None,
        }
    }
}

impl Default for MouseMotionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputSource for MouseMotionSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn start(&mut self, recorder: EventRecorder) -> CaptureResult<()> {
        if self.hook.is_some() {
            return Err(CaptureError::AlreadyRunning);
        }

        // Waits for the hook thread to report whether installation worked
        let hook = tokio::task::spawn_blocking(move || platform::start_motion_hook(recorder))
            .await
            .map_err(|e| CaptureError::PlatformError(e.to_string()))??;

        self.hook = Some(hook);

        tracing::info!("Mouse motion hook started");
        Ok(())
    }

    async fn stop(&mut self) -> CaptureResult<()> {
        let Some(hook) = self.hook.take() else {
            return Ok(());
        };

        tokio::task::spawn_blocking(move || hook.stop())
            .await
            .map_err(|e| CaptureError::PlatformError(e.to_string()))??;

        tracing::info!("Mouse motion hook stopped");
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.hook.is_some()
    }
}
