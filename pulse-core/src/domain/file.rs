//! Output file domain types

use serde::{Deserialize, Serialize};

use crate::domain::instance::InstanceId;

/// One output file produced by a plugin instance
///
/// Identity is the server-assigned `id`; listings are returned in a stable
/// server-side order that pagination preserves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub id: u64,
    pub instance_id: InstanceId,
    pub fname: String,
    pub fsize: u64,
    pub creation_date: Option<chrono::DateTime<chrono::Utc>>,
}
