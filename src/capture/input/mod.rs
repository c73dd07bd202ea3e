//! Input event capture
//!
//! Implements an `InputSource` that counts process-wide mouse motion events
//! into a sampler.

pub mod channel;
pub mod source;

pub use channel::MouseMotionSource;
pub use source::{CaptureError, CaptureResult, InputSource};
