//! Periodic event-rate sampling
//!
//! Event sources count into a [`SampleWindow`] through an [`EventRecorder`];
//! a timer drives [`RateSampler::tick`], which swaps the count for zero and
//! publishes it to a [`RateSink`].

pub mod rate;
pub mod sink;
pub mod window;

pub use rate::{RateSampler, SamplerError, SamplerResult, SamplerState, SamplerStats};
pub use sink::{LogSink, RateSink, SinkError, SinkResult};
pub use window::{EventRecorder, SampleWindow};

#[cfg(feature = "desktop")]
pub use sink::TauriSink;
