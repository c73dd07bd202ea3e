use crate::capture::input::{CaptureError, CaptureResult};
use crate::sampler::EventRecorder;
use parking_lot::Mutex as ParkingMutex;
use rdev::EventType;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

// rdev::listen never returns once it is running, so one listener thread
// serves the whole process and forwards into whichever recorder is installed.
static TARGET: ParkingMutex<Option<EventRecorder>> = ParkingMutex::new(None);
static LISTENING: AtomicBool = AtomicBool::new(false);

/// rdev reports display and XRecord failures right away; silence this long means it is listening
const LISTEN_GRACE: Duration = Duration::from_millis(250);

/// Installed recorder slot on the shared listener
pub struct MotionHook;

impl MotionHook {
    /// Detach the recorder. The listener thread stays parked until process exit.
    pub fn stop(self) -> CaptureResult<()> {
        TARGET.lock().take();
        Ok(())
    }
}

pub fn counts_as_motion(event_type: &EventType) -> bool {
    matches!(event_type, EventType::MouseMove { .. })
}

fn forward(event_type: &EventType) {
    if counts_as_motion(event_type) {
        if let Some(recorder) = TARGET.lock().as_ref() {
            recorder.record_event();
        }
    }
}

fn abort_start(error: CaptureError) -> CaptureResult<MotionHook> {
    LISTENING.store(false, Ordering::SeqCst);
    TARGET.lock().take();
    Err(error)
}

/// Start counting mouse motion (Linux/X11)
pub fn start_motion_hook(recorder: EventRecorder) -> CaptureResult<MotionHook> {
    {
        let mut target = TARGET.lock();
        if target.is_some() {
            return Err(CaptureError::AlreadyRunning);
        }
        *target = Some(recorder);
    }

    if LISTENING.swap(true, Ordering::SeqCst) {
        tracing::info!("Reusing running X11 listener");
        return Ok(MotionHook);
    }

    let (error_tx, error_rx) = mpsc::channel::<String>();
    let spawned = std::thread::Builder::new()
        .name("mouse-hook".to_string())
        .spawn(move || {
            if let Err(e) = rdev::listen(|event| forward(&event.event_type)) {
                let _ = error_tx.send(format!("{:?}", e));
            }
        });
    if let Err(e) = spawned {
        return abort_start(CaptureError::IoError(e));
    }

    match error_rx.recv_timeout(LISTEN_GRACE) {
        Err(RecvTimeoutError::Timeout) => {
            tracing::info!("X11 mouse listener installed");
            Ok(MotionHook)
        }
        Ok(message) => abort_start(CaptureError::HookInstall(message)),
        Err(RecvTimeoutError::Disconnected) => abort_start(CaptureError::HookThreadLost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_moves_count() {
        assert!(counts_as_motion(&EventType::MouseMove { x: 1.0, y: 2.0 }));
        assert!(!counts_as_motion(&EventType::ButtonPress(rdev::Button::Left)));
        assert!(!counts_as_motion(&EventType::Wheel {
            delta_x: 0,
            delta_y: 1
        }));
        assert!(!counts_as_motion(&EventType::KeyPress(rdev::Key::KeyA)));
    }
}
