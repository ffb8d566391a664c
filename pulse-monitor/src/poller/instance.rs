//! Full instance poller
//!
//! Repeatedly fetches one instance's details at a fixed interval until the
//! instance reaches a terminal status, emitting a `StatusUpdated` event per
//! iteration. On successful completion the output files are collected
//! before the task ends.

use std::sync::Arc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::events::{EventSender, ResourceEvent};
use crate::poller::FileCollector;
use pulse_client::InstanceApi;
use pulse_core::domain::instance::{InstanceDetails, InstanceId, InstanceStatus, ParsedStatus};
use pulse_core::log::{LogMap, decode_log};

/// Poll loop for a single instance: status, summary, log, and files
pub struct InstancePoller {
    api: Arc<dyn InstanceApi>,
    events: EventSender,
    interval: std::time::Duration,
}

impl InstancePoller {
    /// Creates a new full poller
    pub fn new(api: Arc<dyn InstanceApi>, events: EventSender, interval: std::time::Duration) -> Self {
        Self {
            api,
            events,
            interval,
        }
    }

    /// Runs the poll loop until terminal status, failure, or cancellation.
    ///
    /// Emits exactly one `PollingStopped` for the instance, at exit,
    /// whatever the exit reason.
    pub async fn run(self, instance: InstanceDetails, token: CancellationToken) {
        let id = instance.id;
        self.poll_loop(id, &token).await;
        let _ = self.events.send(ResourceEvent::PollingStopped { id });
    }

    async fn poll_loop(&self, id: InstanceId, token: &CancellationToken) {
        loop {
            if token.is_cancelled() {
                debug!("Full poll for instance {} cancelled", id);
                return;
            }

            // In-flight fetches run to completion; cancellation is only
            // observed at the loop top and during the inter-poll sleep.
            let details = match self.api.fetch_instance(id).await {
                Ok(details) => details,
                Err(e) => {
                    warn!("Failed to fetch instance {}: {}", id, e);
                    return;
                }
            };

            let status = details.status;
            let parsed = parse_summary(id, details.summary.as_deref());

            let log = if details.raw.is_empty() {
                LogMap::new()
            } else {
                match decode_log(&details.raw) {
                    Ok(log) => log,
                    Err(e) => {
                        warn!("Failed to decode log for instance {}: {}", id, e);
                        return;
                    }
                }
            };

            let _ = self.events.send(ResourceEvent::StatusUpdated {
                id,
                status: parsed,
                log,
                details,
            });

            match status {
                InstanceStatus::FinishedWithError | InstanceStatus::Cancelled => return,
                InstanceStatus::FinishedSuccessfully => {
                    FileCollector::new(Arc::clone(&self.api), self.events.clone())
                        .collect(id)
                        .await;
                    return;
                }
                _ => {
                    tokio::select! {
                        _ = token.cancelled() => {
                            debug!("Full poll for instance {} cancelled", id);
                            return;
                        }
                        _ = time::sleep(self.interval) => {}
                    }
                }
            }
        }
    }
}

/// Parses the encoded status summary, degrading to `None` when malformed.
///
/// A malformed summary is reported but does not end the poll: the instance
/// may still be running and later iterations may carry a well-formed one.
fn parse_summary(id: InstanceId, summary: Option<&str>) -> Option<ParsedStatus> {
    let summary = summary?;
    match serde_json::from_str::<ParsedStatus>(summary) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Malformed status summary for instance {}: {}", id, e);
            None
        }
    }
}
