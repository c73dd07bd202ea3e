//! Fallback for platforms without a mouse hook implementation

use crate::capture::input::{CaptureError, CaptureResult};
use crate::sampler::EventRecorder;

pub struct MotionHook;

impl MotionHook {
    pub fn stop(self) -> CaptureResult<()> {
        Ok(())
    }
}

pub fn start_motion_hook(_recorder: EventRecorder) -> CaptureResult<MotionHook> {
    Err(CaptureError::PlatformError(
        "mouse hook not supported on this platform".to_string(),
    ))
}
