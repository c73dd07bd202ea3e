//! Rate monitor
//!
//! Couples one input source with one rate sampler and owns the lifecycle of
//! both: the hook thread and the timer task start and stop together.

use crate::capture::{CaptureError, InputSource, MouseMotionSource};
use crate::config::SamplerConfig;
use crate::sampler::{RateSampler, RateSink, SamplerError};
use parking_lot::Mutex as ParkingMutex;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// Errors that can occur while starting or stopping the monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Input source failed to start: {0}")]
    SourceStart(CaptureError),

    #[error("Input source failed to stop: {0}")]
    SourceStop(CaptureError),

    #[error("Invalid sampler configuration: {0}")]
    Sampler(#[from] SamplerError),

    #[error("Already running")]
    AlreadyRunning,
}

pub type MonitorResult<T> = Result<T, MonitorError>;

/// Monitor lifecycle as shown to the front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    pub running: bool,
    /// Why the last `start` failed, cleared by the next successful start
    pub last_error: Option<String>,
}

struct TimerTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct RateMonitor {
    sampler: Arc<RateSampler>,
    source: Mutex<Box<dyn InputSource>>,
    timer: ParkingMutex<Option<TimerTask>>,
    last_error: ParkingMutex<Option<String>>,
}

impl RateMonitor {
    pub fn new(sampler: RateSampler, source: Box<dyn InputSource>) -> Self {
        Self {
            sampler: Arc::new(sampler),
            source: Mutex::new(source),
            timer: ParkingMutex::new(None),
            last_error: ParkingMutex::new(None),
        }
    }

    /// Monitor for process-wide mouse motion
    pub fn mouse(config: &SamplerConfig, sink: Arc<dyn RateSink>) -> MonitorResult<Self> {
        let sampler = RateSampler::new(config, sink)?;
        Ok(Self::new(sampler, Box::new(MouseMotionSource::new())))
    }

    pub fn sampler(&self) -> &Arc<RateSampler> {
        &self.sampler
    }

    pub fn is_running(&self) -> bool {
        self.timer.lock().is_some()
    }

    pub fn status(&self) -> MonitorStatus {
        MonitorStatus {
            running: self.is_running(),
            last_error: self.last_error.lock().clone(),
        }
    }

    /// Install the input hook, then start ticking.
    ///
    /// Hook failures come back as [`MonitorError::SourceStart`] and leave
    /// nothing running.
    pub async fn start(&self) -> MonitorResult<()> {
        let mut source = self.source.lock().await;
        if source.is_running() || self.is_running() {
            return Err(MonitorError::AlreadyRunning);
        }

        if let Err(e) = source.start(self.sampler.recorder()).await {
            let error = MonitorError::SourceStart(e);
            *self.last_error.lock() = Some(error.to_string());
            return Err(error);
        }
        self.last_error.lock().take();

        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(self.sampler.clone().run(shutdown_rx));
        *self.timer.lock() = Some(TimerTask { shutdown, handle });

        tracing::info!(
            "Rate monitor started (source={}, channel={})",
            source.id(),
            self.sampler.channel()
        );
        Ok(())
    }

    /// Stop ticking, then remove the input hook. Stopping an idle monitor does nothing.
    pub async fn stop(&self) -> MonitorResult<()> {
        let mut source = self.source.lock().await;

        let timer = self.timer.lock().take();
        if let Some(timer) = timer {
            let _ = timer.shutdown.send(true);
            if let Err(e) = timer.handle.await {
                tracing::warn!("Sampler task ended abnormally: {}", e);
            }
        }

        source.stop().await.map_err(MonitorError::SourceStop)?;

        tracing::info!("Rate monitor stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureResult;
    use crate::sampler::{EventRecorder, SinkError};
    use async_trait::async_trait;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSink {
        values: ParkingMutex<Vec<u64>>,
    }

    impl RateSink for RecordingSink {
        fn publish(&self, _channel: &str, value: u64) -> Result<(), SinkError> {
            self.values.lock().push(value);
            Ok(())
        }
    }

    /// Source that hands its recorder to the test instead of hooking anything
    #[derive(Default)]
    struct FakeSource {
        recorder: Arc<ParkingMutex<Option<EventRecorder>>>,
        fail_start: bool,
        fail_stop: bool,
    }

    #[async_trait]
    impl InputSource for FakeSource {
        fn id(&self) -> &str {
            "fake"
        }

        async fn start(&mut self, recorder: EventRecorder) -> CaptureResult<()> {
            if self.fail_start {
                return Err(CaptureError::PermissionDenied("no access".to_string()));
            }
            *self.recorder.lock() = Some(recorder);
            Ok(())
        }

        async fn stop(&mut self) -> CaptureResult<()> {
            if self.fail_stop && self.is_running() {
                return Err(CaptureError::PlatformError("hook still installed".to_string()));
            }
            self.recorder.lock().take();
            Ok(())
        }

        fn is_running(&self) -> bool {
            self.recorder.lock().is_some()
        }
    }

    fn monitor_with(
        source: FakeSource,
    ) -> (RateMonitor, Arc<RecordingSink>, Arc<ParkingMutex<Option<EventRecorder>>>) {
        let sink = Arc::new(RecordingSink::default());
        let sampler = RateSampler::new(&SamplerConfig::default(), sink.clone()).unwrap();
        let slot = source.recorder.clone();
        (RateMonitor::new(sampler, Box::new(source)), sink, slot)
    }

    fn fire(slot: &ParkingMutex<Option<EventRecorder>>, times: usize) {
        let recorder = slot.lock().clone().expect("source should be running");
        for _ in 0..times {
            recorder.record_event();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_reach_sink_each_second() {
        let (monitor, sink, slot) = monitor_with(FakeSource::default());
        monitor.start().await.unwrap();
        assert!(monitor.is_running());

        fire(&slot, 3);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        tokio::time::sleep(Duration::from_millis(1000)).await;
        fire(&slot, 1);
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert_eq!(*sink.values.lock(), vec![3, 0, 1]);
        assert_eq!(monitor.sampler().last_rate(), 1);

        monitor.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_publishing_and_source() {
        let (monitor, sink, slot) = monitor_with(FakeSource::default());
        monitor.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        monitor.stop().await.unwrap();
        assert!(!monitor.is_running());
        assert!(slot.lock().is_none());

        let published = sink.values.lock().len();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(sink.values.lock().len(), published);

        // idle stop is a no-op
        monitor.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_source_failure_is_a_start_error() {
        let (monitor, sink, _) = monitor_with(FakeSource {
            fail_start: true,
            ..FakeSource::default()
        });

        let err = monitor.start().await.unwrap_err();
        assert!(matches!(
            err,
            MonitorError::SourceStart(CaptureError::PermissionDenied(_))
        ));
        assert!(!monitor.is_running());
        assert!(sink.values.lock().is_empty());

        let status = monitor.status();
        assert!(!status.running);
        assert_eq!(
            status.last_error.as_deref(),
            Some("Input source failed to start: Permission denied: no access")
        );
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["running"], false);
        assert!(json["lastError"].is_string());
    }

    #[tokio::test]
    async fn test_status_after_successful_start() {
        let (monitor, _, _) = monitor_with(FakeSource::default());
        monitor.start().await.unwrap();
        assert_eq!(
            monitor.status(),
            MonitorStatus {
                running: true,
                last_error: None
            }
        );
        monitor.stop().await.unwrap();
        assert!(!monitor.status().running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unhook_failure_is_a_stop_error() {
        let (monitor, sink, slot) = monitor_with(FakeSource {
            fail_stop: true,
            ..FakeSource::default()
        });
        monitor.start().await.unwrap();

        let err = monitor.stop().await.unwrap_err();
        assert!(matches!(
            err,
            MonitorError::SourceStop(CaptureError::PlatformError(_))
        ));
        // timer is down even though the hook is not
        assert!(!monitor.is_running());
        assert!(slot.lock().is_some());
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(sink.values.lock().is_empty());
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let (monitor, _, _) = monitor_with(FakeSource::default());
        monitor.start().await.unwrap();
        assert!(matches!(
            monitor.start().await,
            Err(MonitorError::AlreadyRunning)
        ));
        monitor.stop().await.unwrap();
    }

    #[test]
    fn test_mouse_monitor_rejects_zero_interval() {
        let config = SamplerConfig {
            interval_ms: 0,
            ..SamplerConfig::default()
        };
        let result = RateMonitor::mouse(&config, Arc::new(RecordingSink::default()));
        assert!(matches!(
            result,
            Err(MonitorError::Sampler(SamplerError::ZeroInterval))
        ));
    }
}
