//! Pulse Monitor
//!
//! Watches remote compute instances until they finish and collects their
//! output file listings.
//!
//! Architecture:
//! - Configuration: load settings from environment or defaults
//! - Client: HTTP communication with the compute API (pulse-client)
//! - Pollers: per-instance poll loops (full and status-only)
//! - Supervisor: poll task registry, spawning and cancellation
//!
//! The monitor spawns one poll task per instance, forwards their events to
//! the log, and translates Ctrl-C into stop commands.

mod config;
mod events;
mod poller;
mod supervisor;
#[cfg(test)]
mod testutil;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::events::{PollCommand, ResourceEvent};
use crate::supervisor::PollSupervisor;
use pulse_client::{ComputeClient, InstanceApi};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pulse_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pulse Monitor");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: api_url={}, poll_interval={:?}",
        config.api_url, config.poll_interval
    );

    // Initialize compute API client
    let client = Arc::new(ComputeClient::new(config.api_url.clone()));
    info!("Compute API client initialized");

    // Create the supervisor and its channels
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (supervisor, command_tx) = PollSupervisor::new(
        Arc::clone(&client) as Arc<dyn InstanceApi>,
        event_tx,
        config.poll_interval,
    );
    let supervisor_task = tokio::spawn(supervisor.run());

    // Fetch initial references and start the requested polls
    let mut pending_stops = 0usize;

    if let Some(id) = config.instance {
        let instance = client
            .get_instance(id)
            .await
            .with_context(|| format!("Failed to fetch instance {}", id))?;
        command_tx
            .send(PollCommand::StartFilePoll(instance))
            .map_err(|_| anyhow::anyhow!("Supervisor terminated unexpectedly"))?;
        pending_stops += 1;
    }

    if !config.watch.is_empty() {
        let mut batch = Vec::with_capacity(config.watch.len());
        for id in &config.watch {
            let instance = client
                .get_instance(*id)
                .await
                .with_context(|| format!("Failed to fetch instance {}", id))?;
            batch.push(instance);
        }
        pending_stops += batch.len();
        command_tx
            .send(PollCommand::StartStatusPoll(batch))
            .map_err(|_| anyhow::anyhow!("Supervisor terminated unexpectedly"))?;
    }

    if pending_stops == 0 {
        warn!("Nothing to poll: set PULSE_INSTANCE and/or PULSE_WATCH");
        drop(command_tx);
        supervisor_task.await.ok();
        return Ok(());
    }

    info!("Polling started for {} instance(s)", pending_stops);

    // Forward events until every started poll has reported its stop
    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => {
                    let stopped = matches!(
                        event,
                        ResourceEvent::PollingStopped { .. }
                            | ResourceEvent::StatusPollingStopped { .. }
                    );
                    report_event(event);
                    if stopped {
                        pending_stops -= 1;
                        if pending_stops == 0 {
                            break;
                        }
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, stopping all polls");
                let _ = command_tx.send(PollCommand::StopFilePoll);
                for id in &config.watch {
                    let _ = command_tx.send(PollCommand::StopStatusPoll(*id));
                }
            }
        }
    }

    info!("All polls finished");
    drop(command_tx);
    supervisor_task.await.ok();

    Ok(())
}

/// Loads configuration from environment variables with fallback to defaults
fn load_config() -> Result<Config> {
    match Config::from_env() {
        Ok(config) => {
            config.validate()?;
            Ok(config)
        }
        Err(_) => {
            info!("Failed to load config from environment, using defaults");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

/// Logs one poll event
fn report_event(event: ResourceEvent) {
    match event {
        ResourceEvent::StatusUpdated { id, details, .. } => {
            info!("Instance {} is {:?}", id, details.status);
        }
        ResourceEvent::InstanceStatusUpdated { id, status, .. } => {
            info!("Instance {} is {:?}", id, status);
        }
        ResourceEvent::FilesReady { id, files } => {
            info!("Instance {} produced {} file(s)", id, files.len());
        }
        ResourceEvent::FilesFailed { id, error } => {
            warn!("File collection for instance {} failed: {}", id, error);
        }
        ResourceEvent::PollingStopped { id } => {
            info!("Stopped polling instance {}", id);
        }
        ResourceEvent::StatusPollingStopped { id } => {
            info!("Stopped status polling for instance {}", id);
        }
    }
}
