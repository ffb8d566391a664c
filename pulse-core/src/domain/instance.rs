//! Instance domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Server-assigned identifier of a plugin instance
pub type InstanceId = u64;

/// Decoded form of an instance's status summary
///
/// The summary is schema-free on the wire; it decodes to an arbitrary
/// string-keyed map.
pub type ParsedStatus = HashMap<String, serde_json::Value>;

/// Snapshot of a plugin instance as reported by the compute API
///
/// One snapshot per poll; each fetch supersedes the previous one. The
/// `raw` field carries the instance's log blob, base64-encoded (empty
/// until the instance has produced output). The `summary` field carries
/// the encoded status summary, absent until the backend publishes one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDetails {
    pub id: InstanceId,
    pub plugin_name: String,
    pub status: InstanceStatus,
    pub previous_id: Option<InstanceId>,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub raw: String,
    pub summary: Option<String>,
}

/// Execution status of a plugin instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstanceStatus {
    Queued,
    Started,
    WaitingForPrevious,
    Scheduled,
    Running,
    RegisteringFiles,
    FinishedSuccessfully,
    FinishedWithError,
    Cancelled,
}

impl InstanceStatus {
    /// Whether the instance will never transition further
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::FinishedSuccessfully | Self::FinishedWithError | Self::Cancelled
        )
    }

    /// Whether the instance finished and produced output worth collecting
    pub fn is_success(&self) -> bool {
        matches!(self, Self::FinishedSuccessfully)
    }
}
