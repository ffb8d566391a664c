//! Events and commands crossing the monitor's boundaries
//!
//! The supervisor consumes [`PollCommand`]s and the poll tasks emit
//! [`ResourceEvent`]s; both travel over unbounded mpsc channels. The
//! consumer of the event channel (presentation, state store) is outside
//! this crate.

use tokio::sync::mpsc;

use pulse_core::domain::file::FileRef;
use pulse_core::domain::instance::{InstanceDetails, InstanceId, InstanceStatus, ParsedStatus};
use pulse_core::log::LogMap;

/// Type alias for the outward event channel
pub type EventSender = mpsc::UnboundedSender<ResourceEvent>;

/// Events emitted by the poll tasks
#[derive(Debug, Clone)]
pub enum ResourceEvent {
    /// One full-poll iteration completed for an instance
    StatusUpdated {
        id: InstanceId,
        /// Decoded status summary; `None` when absent or malformed
        status: Option<ParsedStatus>,
        /// Decoded log; empty when the instance has produced no output
        log: LogMap,
        details: InstanceDetails,
    },
    /// One status-poll iteration completed for an instance
    InstanceStatusUpdated {
        id: InstanceId,
        /// The instance reference the poll was started with
        selected: InstanceDetails,
        /// Freshly fetched status
        status: InstanceStatus,
    },
    /// All output files of an instance were collected (never empty)
    FilesReady {
        id: InstanceId,
        files: Vec<FileRef>,
    },
    /// File collection failed; partial pages are discarded
    FilesFailed {
        id: InstanceId,
        error: String,
    },
    /// The full poll task for this instance ended (emitted exactly once)
    PollingStopped { id: InstanceId },
    /// The status poll task for this instance ended (emitted exactly once)
    StatusPollingStopped { id: InstanceId },
}

/// Commands consumed by the supervisor
#[derive(Debug, Clone)]
pub enum PollCommand {
    /// Begin a single-instance full poll (status + log + files)
    StartFilePoll(InstanceDetails),
    /// Begin a status-only poll for each instance of the batch
    StartStatusPoll(Vec<InstanceDetails>),
    /// Cancel the currently tracked full poll (global, unscoped)
    StopFilePoll,
    /// Cancel the status poll for one instance
    StopStatusPoll(InstanceId),
}
