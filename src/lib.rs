//! Mouse Rate - live mouse movement rate.
//!
//! This is the main library crate for the mouse rate utility. It counts
//! process-wide mouse motion events and publishes the count once per second,
//! either to a Tauri window (`desktop` feature) or to the log.

pub mod capture;
#[cfg(feature = "desktop")]
pub mod commands;
pub mod config;
pub mod monitor;
pub mod sampler;

use anyhow::Context;
use config::DEFAULT_LOG_FILTER;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the application
pub fn run() {
    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mouse Rate v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = launch() {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
    }
}

#[cfg(feature = "desktop")]
fn launch() -> anyhow::Result<()> {
    use crate::commands::rate::RateState;
    use crate::config::SamplerConfig;
    use crate::monitor::RateMonitor;
    use crate::sampler::TauriSink;
    use std::sync::Arc;
    use tauri::Manager;

    tauri::Builder::default()
        .setup(|app| {
            let sink = Arc::new(TauriSink::new(app.handle().clone()));
            let monitor = Arc::new(RateMonitor::mouse(&SamplerConfig::default(), sink)?);
            app.manage(RateState::new(monitor.clone()));

            tauri::async_runtime::spawn(async move {
                if let Err(e) = monitor.start().await {
                    tracing::error!("Mouse rate monitor did not start: {}", e);
                }
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::rate::get_mouse_rate,
            commands::rate::get_sampler_stats,
            commands::rate::get_monitor_status,
            commands::rate::check_input_permission,
        ])
        .run(tauri::generate_context!())
        .context("error while running tauri application")
}

/// Headless mode: log each sample until Ctrl-C
#[cfg(not(feature = "desktop"))]
fn launch() -> anyhow::Result<()> {
    use crate::config::SamplerConfig;
    use crate::monitor::RateMonitor;
    use crate::sampler::LogSink;
    use std::sync::Arc;

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    runtime.block_on(async {
        let monitor = RateMonitor::mouse(&SamplerConfig::default(), Arc::new(LogSink))?;
        monitor
            .start()
            .await
            .context("failed to start mouse rate monitor")?;

        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl-C")?;

        monitor.stop().await?;
        Ok::<(), anyhow::Error>(())
    })
}
