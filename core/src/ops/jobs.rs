//! Operations on individual queued jobs, addressed by `nzo_id`.

use crate::call::Call;
use crate::client::SabnzbdClient;
use crate::error::ApiError;
use crate::response::{decode_field, require_i64, require_strings};
use crate::transport::HttpTransport;
use crate::types::{JobFile, PostProcessing, Priority, SwitchResult};

impl<T: HttpTransport> SabnzbdClient<T> {
    pub async fn pause_jobs(&self, ids: &[&str]) -> Result<bool, ApiError> {
        let call = Call::new("queue").arg("name", "pause").arg("value", ids);
        self.call_status(call).await
    }

    pub async fn resume_jobs(&self, ids: &[&str]) -> Result<bool, ApiError> {
        let call = Call::new("queue").arg("name", "resume").arg("value", ids);
        self.call_status(call).await
    }

    /// Remove jobs from the queue. Returns the ids the server removed.
    pub async fn delete_jobs(
        &self,
        ids: &[&str],
        delete_files: bool,
    ) -> Result<Vec<String>, ApiError> {
        let call = Call::new("queue")
            .arg("name", "delete")
            .arg("value", ids)
            .arg("del_files", delete_files);
        self.call_json(call, |doc| require_strings(doc, "nzo_ids"))
            .await
    }

    pub async fn delete_all_jobs(&self, delete_files: bool) -> Result<Vec<String>, ApiError> {
        self.delete_jobs(&["all"], delete_files).await
    }

    pub async fn rename_job(
        &self,
        id: &str,
        name: &str,
        password: Option<&str>,
    ) -> Result<bool, ApiError> {
        let call = Call::new("queue")
            .arg("name", "rename")
            .arg("value", id)
            .arg("value2", name)
            .opt("value3", password);
        self.call_status(call).await
    }

    /// Change a job's priority. Returns its new queue position.
    pub async fn set_job_priority(&self, id: &str, priority: Priority) -> Result<i64, ApiError> {
        let call = Call::new("queue")
            .arg("name", "priority")
            .arg("value", id)
            .arg("value2", priority);
        self.call_json(call, |doc| require_i64(doc, "position"))
            .await
    }

    /// Move job `id` to the place of job `target`, or to a numeric position
    /// when `target` is an index.
    pub async fn switch_jobs(&self, id: &str, target: &str) -> Result<SwitchResult, ApiError> {
        let call = Call::new("switch").arg("value", id).arg("value2", target);
        self.call_json(call, |doc| decode_field(doc, "result"))
            .await
    }

    pub async fn change_category(&self, id: &str, category: &str) -> Result<bool, ApiError> {
        let call = Call::new("change_cat")
            .arg("value", id)
            .arg("value2", category);
        self.call_status(call).await
    }

    pub async fn change_script(&self, id: &str, script: &str) -> Result<bool, ApiError> {
        let call = Call::new("change_script")
            .arg("value", id)
            .arg("value2", script);
        self.call_status(call).await
    }

    pub async fn change_post_processing(
        &self,
        id: &str,
        post_processing: PostProcessing,
    ) -> Result<bool, ApiError> {
        let call = Call::new("change_opts")
            .arg("value", id)
            .arg("value2", post_processing);
        self.call_status(call).await
    }

    pub async fn job_files(&self, id: &str) -> Result<Vec<JobFile>, ApiError> {
        let call = Call::new("get_files").arg("value", id);
        self.call_json(call, |doc| decode_field(doc, "files"))
            .await
    }
}
