//! The interface the monitor polls through
//!
//! Trait-based to enable testing and dependency injection: the pollers
//! hold an `Arc<dyn InstanceApi>` and never know whether the other side
//! is HTTP or a scripted mock.

use async_trait::async_trait;

use crate::error::Result;
use pulse_core::domain::instance::{InstanceDetails, InstanceId};
use pulse_core::dto::file::{FilePage, PageParams};

/// Remote operations the poll loops depend on
#[async_trait]
pub trait InstanceApi: Send + Sync {
    /// Fetches the current details snapshot of one instance
    ///
    /// Every poll iteration starts here; the returned snapshot supersedes
    /// any previously fetched one.
    async fn fetch_instance(&self, id: InstanceId) -> Result<InstanceDetails>;

    /// Fetches one page of an instance's output file listing
    ///
    /// # Arguments
    /// * `id` - The instance whose files to list
    /// * `page` - Pagination window (limit and offset)
    async fn fetch_file_page(&self, id: InstanceId, page: PageParams) -> Result<FilePage>;
}
