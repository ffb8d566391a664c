//! Instance-related API endpoints

use async_trait::async_trait;
use tracing::debug;

use crate::ComputeClient;
use crate::api::InstanceApi;
use crate::error::Result;
use pulse_core::domain::instance::{InstanceDetails, InstanceId};
use pulse_core::dto::file::{FilePage, PageParams};

impl ComputeClient {
    /// Get the details snapshot of an instance
    ///
    /// # Arguments
    /// * `id` - The instance id
    ///
    /// # Returns
    /// The instance details, including its raw log blob and status summary
    pub async fn get_instance(&self, id: InstanceId) -> Result<InstanceDetails> {
        let url = format!("{}/api/v1/instances/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get one page of an instance's output file listing
    ///
    /// # Arguments
    /// * `id` - The instance id
    /// * `page` - Pagination window (limit and offset)
    pub async fn list_instance_files(&self, id: InstanceId, page: PageParams) -> Result<FilePage> {
        let url = format!("{}/api/v1/instances/{}/files", self.base_url, id);

        debug!(
            "Listing files for instance {} (limit={}, offset={})",
            id, page.limit, page.offset
        );

        let response = self.client.get(&url).query(&page).send().await?;

        self.handle_response(response).await
    }
}

#[async_trait]
impl InstanceApi for ComputeClient {
    async fn fetch_instance(&self, id: InstanceId) -> Result<InstanceDetails> {
        self.get_instance(id).await
    }

    async fn fetch_file_page(&self, id: InstanceId, page: PageParams) -> Result<FilePage> {
        self.list_instance_files(id, page).await
    }
}
