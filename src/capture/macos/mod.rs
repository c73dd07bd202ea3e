//! macOS capture implementations
//!
//! Uses a Quartz event tap for mouse motion; requires Accessibility access.

pub mod input;
pub mod permissions;

pub use input::*;
pub use permissions::*;
