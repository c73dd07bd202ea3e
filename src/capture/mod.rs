//! Platform-specific capture implementations
//!
//! This module provides the mouse motion hook for each platform.

pub mod input;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(all(target_os = "linux", feature = "x11-hook"))]
pub mod linux;

#[cfg(not(any(
    target_os = "macos",
    target_os = "windows",
    all(target_os = "linux", feature = "x11-hook")
)))]
pub mod unsupported;

pub use input::{CaptureError, CaptureResult, InputSource, MouseMotionSource};

/// Whether the process may observe global input events
pub fn has_input_permission() -> bool {
    #[cfg(target_os = "macos")]
    {
        macos::permissions::has_accessibility_permission()
    }

    #[cfg(any(target_os = "windows", all(target_os = "linux", feature = "x11-hook")))]
    {
        true
    }

    #[cfg(not(any(
        target_os = "macos",
        target_os = "windows",
        all(target_os = "linux", feature = "x11-hook")
    )))]
    {
        false
    }
}
