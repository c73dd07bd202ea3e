//! Windows capture implementations
//!
//! Uses a low-level mouse hook (`WH_MOUSE_LL`) for motion events.

pub mod input;

pub use input::*;
