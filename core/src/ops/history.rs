//! History listing, retries and history cleanup.

use crate::call::{Call, Upload};
use crate::client::SabnzbdClient;
use crate::error::ApiError;
use crate::response::decode_field;
use crate::transport::HttpTransport;
use crate::types::{History, HistoryQuery};

impl<T: HttpTransport> SabnzbdClient<T> {
    pub async fn history(&self, query: &HistoryQuery) -> Result<History, ApiError> {
        let call = Call::new("history")
            .opt("start", query.start)
            .opt("limit", query.limit)
            .opt("search", query.search.as_ref())
            .opt("cat", query.category.as_ref())
            .opt("failed_only", query.failed_only)
            .opt("last_history_update", query.last_history_update)
            .arg("nzo_ids", query.nzo_ids.as_slice());
        self.call_json(call, |doc| decode_field(doc, "history"))
            .await
    }

    /// Move a failed job back into the queue.
    pub async fn retry(&self, id: &str, password: Option<&str>) -> Result<bool, ApiError> {
        let call = Call::new("retry").arg("value", id).opt("password", password);
        self.call_status(call).await
    }

    /// Retry a failed job with a replacement NZB. Sent as a multipart form
    /// with the file under `nzbfile`.
    pub async fn retry_with_file(
        &self,
        id: &str,
        upload: Upload,
        password: Option<&str>,
    ) -> Result<bool, ApiError> {
        let call = Call::new("retry")
            .arg("value", id)
            .opt("password", password)
            .upload(upload.with_field("nzbfile"));
        self.call_status(call).await
    }

    pub async fn retry_all(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("retry_all")).await
    }

    pub async fn delete_history(&self, ids: &[&str], delete_files: bool) -> Result<bool, ApiError> {
        let call = Call::new("history")
            .arg("name", "delete")
            .arg("value", ids)
            .arg("del_files", delete_files);
        self.call_status(call).await
    }

    pub async fn delete_all_history(&self, delete_files: bool) -> Result<bool, ApiError> {
        self.delete_history(&["all"], delete_files).await
    }

    pub async fn delete_failed_history(&self, delete_files: bool) -> Result<bool, ApiError> {
        self.delete_history(&["failed"], delete_files).await
    }
}
