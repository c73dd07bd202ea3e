//! Mouse rate Tauri commands

use crate::capture::has_input_permission;
use crate::monitor::{MonitorStatus, RateMonitor};
use crate::sampler::SamplerStats;
use std::sync::Arc;
use tauri::State;

/// Application state for the rate monitor
pub struct RateState {
    pub monitor: Arc<RateMonitor>,
}

impl RateState {
    pub fn new(monitor: Arc<RateMonitor>) -> Self {
        Self { monitor }
    }
}

/// Rate published on the most recent tick
#[tauri::command]
pub fn get_mouse_rate(state: State<'_, RateState>) -> u64 {
    state.monitor.sampler().last_rate()
}

/// Tick and failure counters
#[tauri::command]
pub fn get_sampler_stats(state: State<'_, RateState>) -> SamplerStats {
    state.monitor.sampler().stats()
}

/// Whether the input hook is running, and why it failed to start if not
#[tauri::command]
pub fn get_monitor_status(state: State<'_, RateState>) -> MonitorStatus {
    state.monitor.status()
}

/// Whether the OS lets this process observe global mouse events
#[tauri::command]
pub async fn check_input_permission() -> Result<bool, String> {
    Ok(has_input_permission())
}
