//! Output file collection
//!
//! Walks an instance's paginated file listing to exhaustion and reports
//! the whole set at once. Partial results never leave this module: a page
//! failure discards everything accumulated so far.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::events::{EventSender, ResourceEvent};
use pulse_client::InstanceApi;
use pulse_core::domain::file::FileRef;
use pulse_core::domain::instance::InstanceId;
use pulse_core::dto::file::PageParams;

/// Page size of the file listing walk
pub const PAGE_LIMIT: usize = 200;

/// File pagination failed; accumulated pages are discarded
#[derive(Debug, Error)]
#[error("Error while paginating files")]
pub struct CollectError {
    #[source]
    source: pulse_client::ClientError,
}

/// Collects the complete output file listing of an instance
pub struct FileCollector {
    api: Arc<dyn InstanceApi>,
    events: EventSender,
}

impl FileCollector {
    /// Creates a new file collector
    pub fn new(api: Arc<dyn InstanceApi>, events: EventSender) -> Self {
        Self { api, events }
    }

    /// Collects all output files of an instance and reports the outcome.
    ///
    /// Emits `FilesReady` when the listing is non-empty, `FilesFailed` when
    /// any page fetch fails, and nothing at all for an empty listing.
    pub async fn collect(&self, id: InstanceId) {
        match self.fetch_all_pages(id).await {
            Ok(files) if files.is_empty() => {
                debug!("Instance {} produced no files", id);
            }
            Ok(files) => {
                debug!("Collected {} file(s) for instance {}", files.len(), id);
                let _ = self.events.send(ResourceEvent::FilesReady { id, files });
            }
            Err(e) => {
                warn!("File collection failed for instance {}: {}", id, e);
                let _ = self.events.send(ResourceEvent::FilesFailed {
                    id,
                    error: e.to_string(),
                });
            }
        }
    }

    /// Walks the listing page by page, preserving server order
    async fn fetch_all_pages(&self, id: InstanceId) -> Result<Vec<FileRef>, CollectError> {
        let mut page = PageParams::first(PAGE_LIMIT);
        let mut files = Vec::new();

        loop {
            let fetched = self
                .api
                .fetch_file_page(id, page)
                .await
                .map_err(|source| CollectError { source })?;

            files.extend(fetched.items);

            if !fetched.has_next_page {
                return Ok(files);
            }
            page = page.next();
        }
    }
}
