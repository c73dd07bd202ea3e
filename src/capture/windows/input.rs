use crate::capture::input::{CaptureError, CaptureResult};
use crate::sampler::EventRecorder;
use std::cell::RefCell;
use std::sync::mpsc;
use std::thread::JoinHandle;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    TranslateMessage, UnhookWindowsHookEx, HC_ACTION, HHOOK, MSG, WH_MOUSE_LL, WM_MOUSEMOVE,
    WM_QUIT,
};

thread_local! {
    // Low-level hooks are called on the thread that installed them
    static RECORDER: RefCell<Option<EventRecorder>> = const { RefCell::new(None) };
}

/// Running hook thread
pub struct MotionHook {
    handle: JoinHandle<()>,
    thread_id: u32,
}

impl MotionHook {
    /// Post `WM_QUIT` to the hook thread and wait for it to unhook
    pub fn stop(self) -> CaptureResult<()> {
        unsafe { PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }.map_err(
            |e| CaptureError::PlatformError(format!("Failed to post WM_QUIT to hook thread: {}", e)),
        )?;
        self.handle
            .join()
            .map_err(|_| CaptureError::PlatformError("Mouse hook thread panicked".to_string()))
    }
}

unsafe extern "system" fn mouse_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 && wparam.0 as u32 == WM_MOUSEMOVE {
        RECORDER.with(|slot| {
            if let Some(recorder) = slot.borrow().as_ref() {
                recorder.record_event();
            }
        });
    }
    CallNextHookEx(HHOOK::default(), code, wparam, lparam)
}

/// Start the mouse hook thread (Windows)
///
/// Returns once the hook is installed, or with the install error.
pub fn start_motion_hook(recorder: EventRecorder) -> CaptureResult<MotionHook> {
    let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, String>>();

    let handle = std::thread::Builder::new()
        .name("mouse-hook".to_string())
        .spawn(move || {
            RECORDER.with(|slot| *slot.borrow_mut() = Some(recorder));

            let hook = unsafe {
                GetModuleHandleW(PCWSTR::null()).and_then(|module| {
                    SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_proc), HINSTANCE(module.0), 0)
                })
            };
            let hook = match hook {
                Ok(hook) => hook,
                Err(e) => {
                    let _ = ready_tx.send(Err(e.to_string()));
                    return;
                }
            };

            let _ = ready_tx.send(Ok(unsafe { GetCurrentThreadId() }));
            tracing::info!("Windows mouse hook installed");

            let mut msg = MSG::default();
            // 0 on WM_QUIT, -1 on error
            while unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) }.0 > 0 {
                unsafe {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }

            if let Err(e) = unsafe { UnhookWindowsHookEx(hook) } {
                tracing::warn!("Failed to remove mouse hook: {}", e);
            }
            RECORDER.with(|slot| slot.borrow_mut().take());
            tracing::info!("Windows mouse hook thread stopped");
        })?;

    match ready_rx.recv() {
        Ok(Ok(thread_id)) => Ok(MotionHook { handle, thread_id }),
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
