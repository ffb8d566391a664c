//! File listing DTOs

use serde::{Deserialize, Serialize};

use crate::domain::file::FileRef;

/// Pagination window for a file listing request
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageParams {
    pub limit: usize,
    pub offset: usize,
}

impl PageParams {
    /// First window of a listing
    pub fn first(limit: usize) -> Self {
        Self { limit, offset: 0 }
    }

    /// The window immediately after this one
    pub fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset + self.limit,
        }
    }
}

/// One page of a file listing plus its continuation flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePage {
    pub items: Vec<FileRef>,
    pub has_next_page: bool,
}
