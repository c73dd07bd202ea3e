use crate::config::SamplerConfig;
use crate::sampler::sink::{RateSink, SinkError};
use crate::sampler::window::{EventRecorder, SampleWindow};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Errors raised when building a sampler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SamplerError {
    #[error("Sampling interval must be greater than zero")]
    ZeroInterval,

    #[error("Channel name must not be empty")]
    EmptyChannel,
}

pub type SamplerResult<T> = Result<T, SamplerError>;

/// Where the sampler is in its tick cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SamplerState {
    /// Waiting for the next tick
    Idle,
    /// Between the counter swap and the end of the publish
    Emitting,
}

const STATE_IDLE: u8 = 0;
const STATE_EMITTING: u8 = 1;

/// Snapshot of sampler counters, sent to the front end as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerStats {
    pub ticks: u64,
    pub publish_failures: u64,
    pub last_rate: u64,
    pub interval_ms: u64,
}

type ErrorObserver = Box<dyn Fn(&SinkError) + Send + Sync>;

/// Turns a stream of recorded events into one rate value per interval
pub struct RateSampler {
    window: Arc<SampleWindow>,
    channel: String,
    sink: Arc<dyn RateSink>,
    on_error: Option<ErrorObserver>,
    state: AtomicU8,
    ticks: AtomicU64,
    publish_failures: AtomicU64,
    last_rate: AtomicU64,
}

impl RateSampler {
    pub fn new(config: &SamplerConfig, sink: Arc<dyn RateSink>) -> SamplerResult<Self> {
        if config.interval_ms == 0 {
            return Err(SamplerError::ZeroInterval);
        }
        if config.channel.is_empty() {
            return Err(SamplerError::EmptyChannel);
        }

        Ok(Self {
            window: Arc::new(SampleWindow::new(config.interval())),
            channel: config.channel.clone(),
            sink,
            on_error: None,
            state: AtomicU8::new(STATE_IDLE),
            ticks: AtomicU64::new(0),
            publish_failures: AtomicU64::new(0),
            last_rate: AtomicU64::new(0),
        })
    }

    /// Install a callback that sees every failed publish
    pub fn with_error_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&SinkError) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(observer));
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Handle for event sources; every clone counts into this sampler's window
    pub fn recorder(&self) -> EventRecorder {
        EventRecorder::new(self.window.clone())
    }

    pub fn record_event(&self) {
        self.window.record();
    }

    /// Swap the counter for zero and publish what it held.
    ///
    /// A failed publish is counted and reported, never propagated.
    pub fn tick(&self) {
        self.state.store(STATE_EMITTING, Ordering::Release);

        let rate = self.window.take();
        self.last_rate.store(rate, Ordering::Release);
        self.ticks.fetch_add(1, Ordering::Relaxed);

        if let Err(e) = self.sink.publish(&self.channel, rate) {
            self.publish_failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Failed to publish {} on {}: {}", rate, self.channel, e);
            if let Some(observer) = &self.on_error {
                observer(&e);
            }
        } else {
            tracing::trace!("Published {} on {}", rate, self.channel);
        }

        self.state.store(STATE_IDLE, Ordering::Release);
    }

    pub fn state(&self) -> SamplerState {
        match self.state.load(Ordering::Acquire) {
            STATE_EMITTING => SamplerState::Emitting,
            _ => SamplerState::Idle,
        }
    }

    /// Value handed to the sink on the most recent tick
    pub fn last_rate(&self) -> u64 {
        self.last_rate.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> SamplerStats {
        SamplerStats {
            ticks: self.ticks.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            last_rate: self.last_rate(),
            interval_ms: self.window.interval().as_millis() as u64,
        }
    }

    /// Timer loop: tick once per interval until `shutdown` turns true or its
    /// sender goes away. The first tick fires one full interval after start.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let period = self.window.interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("Rate sampler started (channel={}, interval={:?})", self.channel, period);

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => self.tick(),
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Rate sampler stopped after {} ticks", self.ticks.load(Ordering::Relaxed));
    }
}
