//! Status-only poller
//!
//! Lighter-weight variant of the full poller used for batch monitoring:
//! fetches status at the fixed interval, never decodes logs, never
//! collects files. One task per instance of the batch.

use std::sync::Arc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::events::{EventSender, ResourceEvent};
use pulse_client::InstanceApi;
use pulse_core::domain::instance::InstanceDetails;

/// Poll loop for one instance of a status-only batch
pub struct StatusPoller {
    api: Arc<dyn InstanceApi>,
    events: EventSender,
    interval: std::time::Duration,
}

impl StatusPoller {
    /// Creates a new status poller
    pub fn new(api: Arc<dyn InstanceApi>, events: EventSender, interval: std::time::Duration) -> Self {
        Self {
            api,
            events,
            interval,
        }
    }

    /// Runs the poll loop until terminal status, failure, or cancellation.
    ///
    /// Emits exactly one `StatusPollingStopped` for the instance, at exit.
    pub async fn run(self, instance: InstanceDetails, token: CancellationToken) {
        let id = instance.id;
        self.poll_loop(&instance, &token).await;
        let _ = self.events.send(ResourceEvent::StatusPollingStopped { id });
    }

    async fn poll_loop(&self, selected: &InstanceDetails, token: &CancellationToken) {
        let id = selected.id;

        loop {
            if token.is_cancelled() {
                debug!("Status poll for instance {} cancelled", id);
                return;
            }

            let details = match self.api.fetch_instance(id).await {
                Ok(details) => details,
                Err(e) => {
                    warn!("Failed to fetch instance {}: {}", id, e);
                    return;
                }
            };

            let _ = self.events.send(ResourceEvent::InstanceStatusUpdated {
                id,
                selected: selected.clone(),
                status: details.status,
            });

            if details.status.is_terminal() {
                return;
            }

            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Status poll for instance {} cancelled", id);
                    return;
                }
                _ = time::sleep(self.interval) => {}
            }
        }
    }
}
