//! Server information, configuration and lifecycle control.

use serde_json::Value;

use crate::call::Call;
use crate::client::SabnzbdClient;
use crate::error::ApiError;
use crate::response::{decode_field, require, require_str, require_strings};
use crate::stats::{self, ServerStats};
use crate::transport::HttpTransport;
use crate::types::Warning;

impl<T: HttpTransport> SabnzbdClient<T> {
    pub async fn version(&self) -> Result<String, ApiError> {
        self.call_json(Call::new("version"), |doc| {
            require_str(doc, "version").map(str::to_string)
        })
        .await
    }

    /// Authentication method the server expects (`apikey`, `login`, `none`).
    pub async fn auth(&self) -> Result<String, ApiError> {
        self.call_json(Call::new("auth"), |doc| {
            require_str(doc, "auth").map(str::to_string)
        })
        .await
    }

    pub async fn warnings(&self) -> Result<Vec<Warning>, ApiError> {
        self.call_json(Call::new("warnings"), |doc| decode_field(doc, "warnings"))
            .await
    }

    pub async fn clear_warnings(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("warnings").arg("name", "clear"))
            .await
    }

    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.call_json(Call::new("get_cats"), |doc| {
            require_strings(doc, "categories")
        })
        .await
    }

    pub async fn scripts(&self) -> Result<Vec<String>, ApiError> {
        self.call_json(Call::new("get_scripts"), |doc| {
            require_strings(doc, "scripts")
        })
        .await
    }

    pub async fn server_stats(&self) -> Result<ServerStats, ApiError> {
        self.call_json(Call::new("server_stats"), stats::project)
            .await
    }

    /// The whole configuration, one section, or a single keyword of it.
    pub async fn get_config(
        &self,
        section: Option<&str>,
        keyword: Option<&str>,
    ) -> Result<Value, ApiError> {
        let call = Call::new("get_config")
            .opt("section", section)
            .opt("keyword", keyword);
        self.call_json(call, |doc| require(doc, "config").cloned())
            .await
    }

    /// Set one keyword. Returns the updated configuration fragment.
    pub async fn set_config(
        &self,
        section: &str,
        keyword: &str,
        value: &str,
    ) -> Result<Value, ApiError> {
        let call = Call::new("set_config")
            .arg("section", section)
            .arg("keyword", keyword)
            .arg("value", value);
        self.call_json(call, |doc| require(doc, "config").cloned())
            .await
    }

    /// Reset keywords to their defaults.
    pub async fn set_config_default(&self, keywords: &[&str]) -> Result<bool, ApiError> {
        self.call_status(Call::new("set_config_default").arg("keyword", keywords))
            .await
    }

    /// Translate a UI string into the server's configured language.
    pub async fn translate(&self, text: &str) -> Result<String, ApiError> {
        let call = Call::new("translate").arg("value", text);
        self.call_json(call, |doc| require_str(doc, "value").map(str::to_string))
            .await
    }

    /// Set what the server does when the queue finishes, e.g. `shutdown_pc`
    /// or `script_<name>`. Answered in plain text, returned verbatim.
    pub async fn change_complete_action(&self, action: &str) -> Result<String, ApiError> {
        self.call_text(Call::new("change_complete_action").arg("value", action))
            .await
    }

    pub async fn shutdown(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("shutdown")).await
    }

    pub async fn restart(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("restart")).await
    }

    /// Restart and run a queue repair.
    pub async fn restart_repair(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("restart_repair")).await
    }

    pub async fn pause_post_processing(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("pause_pp")).await
    }

    pub async fn resume_post_processing(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("resume_pp")).await
    }

    /// Fetch all RSS feeds now.
    pub async fn rss_now(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("rss_now")).await
    }

    /// Scan the watched folder now.
    pub async fn watched_now(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("watched_now")).await
    }

    pub async fn reset_quota(&self) -> Result<bool, ApiError> {
        self.call_status(Call::new("reset_quota")).await
    }
}
