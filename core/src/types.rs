//! Request options and response records for the SABnzbd API.
//!
//! # Design
//! Response records mirror the JSON the service returns. The service reports
//! most sizes and durations as preformatted strings, so they stay `String`
//! here. Every field has a serde default: the validating decoders check the
//! fields an operation needs, and the rest may be absent on older servers.

use serde::{Deserialize, Serialize};

use crate::call::ArgValue;

/// Job priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Use the category's priority.
    Default,
    Paused,
    Low,
    Normal,
    High,
    Force,
}

impl Priority {
    pub fn as_i64(self) -> i64 {
        match self {
            Priority::Default => -100,
            Priority::Paused => -2,
            Priority::Low => -1,
            Priority::Normal => 0,
            Priority::High => 1,
            Priority::Force => 2,
        }
    }
}

impl From<Priority> for ArgValue {
    fn from(value: Priority) -> Self {
        ArgValue::Int(value.as_i64())
    }
}

/// Post-processing level applied after download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcessing {
    Skip,
    Repair,
    Unpack,
    Delete,
}

impl From<PostProcessing> for ArgValue {
    fn from(value: PostProcessing) -> Self {
        ArgValue::Int(match value {
            PostProcessing::Skip => 0,
            PostProcessing::Repair => 1,
            PostProcessing::Unpack => 2,
            PostProcessing::Delete => 3,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    AverageAge,
    Name,
    Size,
    Remaining,
}

impl From<SortField> for ArgValue {
    fn from(value: SortField) -> Self {
        ArgValue::from(match value {
            SortField::AverageAge => "avg_age",
            SortField::Name => "name",
            SortField::Size => "size",
            SortField::Remaining => "remaining",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl From<SortDirection> for ArgValue {
    fn from(value: SortDirection) -> Self {
        ArgValue::from(match value {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        })
    }
}

/// Filters for the queue listing. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct QueueQuery {
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<String>,
    pub nzo_ids: Vec<String>,
}

/// Filters for the history listing. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub start: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub failed_only: Option<bool>,
    /// Only return data if history changed since this marker.
    pub last_history_update: Option<i64>,
    pub nzo_ids: Vec<String>,
}

/// Options shared by the add operations. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Job name; defaults to the file or URL name on the server.
    pub name: Option<String>,
    pub password: Option<String>,
    pub category: Option<String>,
    pub script: Option<String>,
    pub priority: Option<Priority>,
    pub post_processing: Option<PostProcessing>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Queue {
    pub status: String,
    pub paused: bool,
    pub speed: String,
    pub speedlimit: String,
    pub kbpersec: String,
    pub mb: String,
    pub mbleft: String,
    pub size: String,
    pub sizeleft: String,
    pub timeleft: String,
    pub noofslots: u32,
    pub noofslots_total: u32,
    pub slots: Vec<QueueSlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSlot {
    pub nzo_id: String,
    pub index: u32,
    pub filename: String,
    pub status: String,
    pub cat: String,
    pub priority: String,
    pub script: String,
    pub password: String,
    pub mb: String,
    pub mbleft: String,
    pub percentage: String,
    pub timeleft: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct History {
    pub noofslots: u32,
    pub day_size: String,
    pub week_size: String,
    pub month_size: String,
    pub total_size: String,
    pub last_history_update: i64,
    pub slots: Vec<HistorySlot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySlot {
    pub nzo_id: String,
    pub name: String,
    pub nzb_name: String,
    pub category: String,
    pub status: String,
    pub fail_message: String,
    pub storage: String,
    pub size: String,
    pub bytes: u64,
    /// Unix timestamp of completion.
    pub completed: i64,
    pub download_time: u64,
    pub postproc_time: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Warning {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time: i64,
}

/// One file of a queued job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobFile {
    pub nzf_id: String,
    pub filename: String,
    pub status: String,
    pub mb: String,
    pub mbleft: String,
    pub bytes: String,
    pub age: String,
}

/// New place of a job after a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchResult {
    pub position: i64,
    pub priority: i64,
}
