//! Scripted test double for the compute API
//!
//! Tests script per-instance fetch results and file pages up front, then
//! drive the pollers against the mock and assert on the emitted events
//! and call counts.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use pulse_client::error::Result;
use pulse_client::{ClientError, InstanceApi};
use pulse_core::domain::file::FileRef;
use pulse_core::domain::instance::{InstanceDetails, InstanceId, InstanceStatus};
use pulse_core::dto::file::{FilePage, PageParams};

/// Compute API double driven by pre-scripted responses
pub struct MockApi {
    fetches: Mutex<HashMap<InstanceId, VecDeque<Result<InstanceDetails>>>>,
    pages: Mutex<VecDeque<Result<FilePage>>>,
    /// Status returned once an instance's script is exhausted
    fallback: Mutex<Option<InstanceStatus>>,
    pub fetch_count: AtomicUsize,
    pub page_count: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            fetches: Mutex::new(HashMap::new()),
            pages: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
            fetch_count: AtomicUsize::new(0),
            page_count: AtomicUsize::new(0),
        }
    }

    /// Scripts the next detail fetch for the given instance
    pub fn push_details(&self, details: InstanceDetails) {
        self.fetches
            .lock()
            .unwrap()
            .entry(details.id)
            .or_default()
            .push_back(Ok(details));
    }

    /// Scripts a failing detail fetch for the given instance
    pub fn push_fetch_error(&self, id: InstanceId) {
        self.fetches
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .push_back(Err(ClientError::api_error(500, "mock fetch failure")));
    }

    /// Makes exhausted scripts return the given status forever
    pub fn set_fallback(&self, status: InstanceStatus) {
        *self.fallback.lock().unwrap() = Some(status);
    }

    /// Scripts the next file page (shared across instances)
    pub fn push_page(&self, page: FilePage) {
        self.pages.lock().unwrap().push_back(Ok(page));
    }

    /// Scripts a failing file page fetch
    pub fn push_page_error(&self) {
        self.pages
            .lock()
            .unwrap()
            .push_back(Err(ClientError::api_error(500, "mock page failure")));
    }
}

#[async_trait]
impl InstanceApi for MockApi {
    async fn fetch_instance(&self, id: InstanceId) -> Result<InstanceDetails> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if let Some(scripted) = self
            .fetches
            .lock()
            .unwrap()
            .get_mut(&id)
            .and_then(|queue| queue.pop_front())
        {
            return scripted;
        }

        match *self.fallback.lock().unwrap() {
            Some(status) => Ok(details(id, status)),
            None => Err(ClientError::api_error(410, "mock script exhausted")),
        }
    }

    async fn fetch_file_page(&self, _id: InstanceId, _page: PageParams) -> Result<FilePage> {
        self.page_count.fetch_add(1, Ordering::SeqCst);

        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::api_error(410, "mock script exhausted")))
    }
}

/// A minimal details snapshot with the given status
pub fn details(id: InstanceId, status: InstanceStatus) -> InstanceDetails {
    details_with(id, status, "", None)
}

/// A details snapshot with a raw log blob and/or status summary
pub fn details_with(
    id: InstanceId,
    status: InstanceStatus,
    raw: &str,
    summary: Option<&str>,
) -> InstanceDetails {
    InstanceDetails {
        id,
        plugin_name: "pl-dircopy".to_string(),
        status,
        previous_id: None,
        start_date: None,
        end_date: None,
        raw: raw.to_string(),
        summary: summary.map(str::to_string),
    }
}

/// Sequentially numbered file refs, `count` of them starting at `first_id`
pub fn file_refs(instance_id: InstanceId, first_id: u64, count: usize) -> Vec<FileRef> {
    (0..count as u64)
        .map(|n| FileRef {
            id: first_id + n,
            instance_id,
            fname: format!("output/{}.dat", first_id + n),
            fsize: 1024,
            creation_date: None,
        })
        .collect()
}

/// A file page with the given items and continuation flag
pub fn page(items: Vec<FileRef>, has_next_page: bool) -> FilePage {
    FilePage {
        items,
        has_next_page,
    }
}

/// Encodes a JSON value the way instances publish their log blobs
pub fn encode_log(value: &serde_json::Value) -> String {
    use base64::prelude::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    let text = serde_json::to_string(value).unwrap();
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    BASE64_STANDARD.encode(encoder.finish().unwrap())
}
