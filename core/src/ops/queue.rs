//! Queue listing, global queue control and job ingestion.

use serde_json::Value;

use crate::call::{Call, Upload};
use crate::client::SabnzbdClient;
use crate::error::ApiError;
use crate::response::{decode_field, require_status, require_strings};
use crate::transport::HttpTransport;
use crate::types::{AddOptions, Queue, QueueQuery, SortDirection, SortField};

fn with_add_options(call: Call, options: &AddOptions) -> Call {
    call.opt("nzbname", options.name.as_ref())
        .opt("password", options.password.as_ref())
        .opt("cat", options.category.as_ref())
        .opt("script", options.script.as_ref())
        .opt("priority", options.priority)
        .opt("pp", options.post_processing)
}

/// `nzo_ids` of the jobs an add call created.
fn added_ids(doc: &Value) -> Result<Vec<String>, ApiError> {
    if !require_status(doc)? {
        return Err(ApiError::Rejected("server did not accept the job".to_string()));
    }
    require_strings(doc, "nzo_ids")
}

impl<T: HttpTransport> SabnzbdClient<T> {
    /// Current queue, filtered by `query`.
    pub async fn queue(&self, query: &QueueQuery) -> Result<Queue, ApiError> {
        let call = Call::new("queue")
            .opt("start", query.start)
            .opt("limit", query.limit)
            .opt("search", query.search.as_ref())
            .opt("cat", query.category.as_ref())
            .opt("priority", query.priority)
            .opt("status", query.status.as_ref())
            .arg("nzo_ids", query.nzo_ids.as_slice());
        self.call_json(call, |doc| decode_field(doc, "queue"))
            .await
    }

    pub async fn pause_queue(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("pause")).await
    }

    pub async fn resume_queue(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("resume")).await
    }

    /// Pause the queue and resume it automatically after `minutes`.
    pub async fn pause_for(&self, minutes: u32) -> Result<bool, ApiError> {
        let call = Call::new("config")
            .arg("name", "set_pause")
            .arg("value", minutes);
        self.call_status(call).await
    }

    /// Accepts the forms the service understands: `"50"` (percent),
    /// `"50%"`, `"400K"`, `"5M"`.
    pub async fn set_speed_limit(&self, limit: &str) -> Result<bool, ApiError> {
        let call = Call::new("config")
            .arg("name", "speedlimit")
            .arg("value", limit);
        self.call_status(call).await
    }

    pub async fn sort_queue(
        &self,
        sort: SortField,
        direction: SortDirection,
    ) -> Result<bool, ApiError> {
        let call = Call::new("queue")
            .arg("name", "sort")
            .arg("dir", direction)
            .arg("sort", sort);
        self.call_status(call).await
    }

    /// Remove every queued job, or only those matching `search`. Returns the
    /// removed ids.
    pub async fn purge_queue(
        &self,
        search: Option<&str>,
        delete_files: bool,
    ) -> Result<Vec<String>, ApiError> {
        let call = Call::new("queue")
            .arg("name", "purge")
            .opt("search", search)
            .arg("del_files", delete_files);
        self.call_json(call, |doc| require_strings(doc, "nzo_ids"))
            .await
    }

    /// Have the server fetch an NZB from `url`.
    pub async fn add_url(&self, url: &str, options: &AddOptions) -> Result<Vec<String>, ApiError> {
        let call = with_add_options(Call::new("addurl").arg("name", url), options);
        self.call_json(call, added_ids).await
    }

    /// Add an NZB that already exists on the server's filesystem.
    pub async fn add_local_file(
        &self,
        path: &str,
        options: &AddOptions,
    ) -> Result<Vec<String>, ApiError> {
        let call = with_add_options(Call::new("addlocalfile").arg("name", path), options);
        self.call_json(call, added_ids).await
    }

    /// Upload an NZB. Sent as a multipart form.
    pub async fn add_file(
        &self,
        upload: Upload,
        options: &AddOptions,
    ) -> Result<Vec<String>, ApiError> {
        let call = with_add_options(Call::new("addfile").upload(upload), options);
        self.call_json(call, added_ids).await
    }
}
