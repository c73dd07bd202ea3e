//! Linux capture implementations
//!
//! Uses `rdev` (X11 XRecord) for motion events.

pub mod input;

pub use input::*;
