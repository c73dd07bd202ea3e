use crate::capture::input::{CaptureError, CaptureResult};
use crate::capture::macos::permissions::has_accessibility_permission;
use crate::sampler::EventRecorder;
use core_foundation::base::TCFType;
use core_foundation::mach_port::CFMachPortRef;
use core_foundation::runloop::{kCFRunLoopCommonModes, kCFRunLoopDefaultMode, CFRunLoop};
use core_graphics::event::{
    CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement, CGEventType,
};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

/// How long the run loop runs before re-checking the stop flag
const RUN_LOOP_SLICE: Duration = Duration::from_millis(100);

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
}

/// Moves and drags of any button
pub fn counts_as_motion(event_type: CGEventType) -> bool {
    matches!(
        event_type,
        CGEventType::MouseMoved
            | CGEventType::LeftMouseDragged
            | CGEventType::RightMouseDragged
            | CGEventType::OtherMouseDragged
    )
}

/// Delivered whatever the event mask says; the tap stays off until re-enabled
pub fn is_tap_disabled(event_type: CGEventType) -> bool {
    matches!(
        event_type,
        CGEventType::TapDisabledByTimeout | CGEventType::TapDisabledByUserInput
    )
}

/// Running event tap thread
pub struct MotionHook {
    handle: JoinHandle<()>,
    is_running: Arc<AtomicBool>,
}

impl MotionHook {
    pub fn stop(self) -> CaptureResult<()> {
        self.is_running.store(false, Ordering::SeqCst);
        self.handle
            .join()
            .map_err(|_| CaptureError::PlatformError("Event tap thread panicked".to_string()))
    }
}

/// Start the mouse event tap thread (macOS)
///
/// The tap is listen-only and counts moves and drags of any button.
/// Returns once the tap is attached to the thread's run loop.
pub fn start_motion_hook(recorder: EventRecorder) -> CaptureResult<MotionHook> {
    if !has_accessibility_permission() {
        return Err(CaptureError::PermissionDenied(
            "Accessibility access is required to observe mouse movement".to_string(),
        ));
    }

    let is_running = Arc::new(AtomicBool::new(true));
    let running = is_running.clone();
    let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

    let handle = std::thread::Builder::new()
        .name("mouse-hook".to_string())
        .spawn(move || {
            // Filled in once the tap exists; the callback only runs on this thread
            let tap_port: Rc<Cell<CFMachPortRef>> = Rc::new(Cell::new(std::ptr::null_mut()));
            let callback_port = tap_port.clone();

            let tap = CGEventTap::new(
                CGEventTapLocation::HID,
                CGEventTapPlacement::HeadInsertEventTap,
                CGEventTapOptions::ListenOnly,
                vec![
                    CGEventType::MouseMoved,
                    CGEventType::LeftMouseDragged,
                    CGEventType::RightMouseDragged,
                    CGEventType::OtherMouseDragged,
                ],
                move |_proxy, event_type, _event| {
                    if counts_as_motion(event_type) {
                        recorder.record_event();
                    } else if is_tap_disabled(event_type) {
                        let port = callback_port.get();
                        if !port.is_null() {
                            unsafe { CGEventTapEnable(port, true) };
                            tracing::warn!(
                                "Event tap disabled by the system (type {}), re-enabled",
                                event_type as u32
                            );
                        }
                    }
                    None
                },
            );
            let tap = match tap {
                Ok(tap) => tap,
                Err(()) => {
                    let _ = ready_tx.send(Err("CGEventTapCreate returned null".to_string()));
                    return;
                }
            };

            let source = match tap.mach_port.create_runloop_source(0) {
                Ok(source) => source,
                Err(()) => {
                    let _ = ready_tx.send(Err("Failed to create run loop source".to_string()));
                    return;
                }
            };

            let run_loop = CFRunLoop::get_current();
            unsafe { run_loop.add_source(&source, kCFRunLoopCommonModes) };
            tap.enable();
            tap_port.set(tap.mach_port.as_concrete_TypeRef());

            let _ = ready_tx.send(Ok(()));
            tracing::info!("macOS event tap installed");

            while running.load(Ordering::Relaxed) {
                CFRunLoop::run_in_mode(unsafe { kCFRunLoopDefaultMode }, RUN_LOOP_SLICE, false);
            }

            unsafe { run_loop.remove_source(&source, kCFRunLoopCommonModes) };
            tracing::info!("macOS event tap thread stopped");
        })?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(MotionHook { handle, is_running }),
        Ok(Err(message)) => {
            let _ = handle.join();
            Err(CaptureError::HookInstall(message))
        }
        Err(_) => {
            let _ = handle.join();
            Err(CaptureError::HookThreadLost)
        }
    }
}
