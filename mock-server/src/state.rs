//! In-memory server state: queue, history, warnings and configuration.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "mock-api-key";
pub const VERSION: &str = "4.3.2";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Job {
    pub nzo_id: String,
    pub filename: String,
    pub cat: String,
    pub priority: i64,
    pub pp: i64,
    pub script: String,
    pub password: String,
    pub status: String,
    pub mb: f64,
}

impl Job {
    pub fn new(filename: &str, mb: f64) -> Self {
        Self {
            nzo_id: new_id("nzo"),
            filename: filename.to_string(),
            cat: "*".to_string(),
            priority: 0,
            pp: 3,
            script: "None".to_string(),
            password: String::new(),
            status: "Queued".to_string(),
            mb,
        }
    }

    pub fn slot(&self, index: usize) -> Value {
        json!({
            "nzo_id": self.nzo_id,
            "index": index,
            "filename": self.filename,
            "status": self.status,
            "cat": self.cat,
            "priority": priority_name(self.priority),
            "script": self.script,
            "password": self.password,
            "mb": format!("{:.2}", self.mb),
            "mbleft": format!("{:.2}", self.mb),
            "percentage": "0",
            "timeleft": "0:00:00",
            "labels": [],
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub nzo_id: String,
    pub name: String,
    pub category: String,
    pub status: String,
    pub fail_message: String,
    pub bytes: u64,
    pub completed: i64,
}

impl HistoryEntry {
    pub fn slot(&self) -> Value {
        json!({
            "nzo_id": self.nzo_id,
            "name": self.name,
            "nzb_name": format!("{}.nzb", self.name),
            "category": self.category,
            "status": self.status,
            "fail_message": self.fail_message,
            "storage": format!("/downloads/complete/{}", self.name),
            "size": format!("{} B", self.bytes),
            "bytes": self.bytes,
            "completed": self.completed,
            "download_time": 60,
            "postproc_time": 5,
        })
    }

    fn failed(&self) -> bool {
        self.status == "Failed"
    }
}

pub fn new_id(kind: &str) -> String {
    format!("SABnzbd_{kind}_{}", &Uuid::new_v4().simple().to_string()[..8])
}

pub fn priority_name(priority: i64) -> &'static str {
    match priority {
        -2 => "Paused",
        -1 => "Low",
        1 => "High",
        2 => "Force",
        _ => "Normal",
    }
}

/// Everything the mock remembers between calls.
#[derive(Clone, Debug)]
pub struct SabState {
    pub api_key: String,
    pub paused: bool,
    pub pp_paused: bool,
    pub speedlimit: String,
    pub complete_action: Option<String>,
    pub queue: Vec<Job>,
    pub history: Vec<HistoryEntry>,
    pub history_updates: i64,
    pub warnings: Vec<Value>,
    pub categories: Vec<String>,
    pub scripts: Vec<String>,
    pub config: Map<String, Value>,
}

impl SabState {
    pub fn new(api_key: &str) -> Self {
        let config = json!({
            "misc": {
                "host": "127.0.0.1",
                "port": "8080",
                "complete_dir": "/downloads/complete",
                "bandwidth_max": "",
            },
            "categories": {
                "movies": {"dir": "movies", "priority": -100},
                "tv": {"dir": "tv", "priority": -100},
            },
        });
        Self {
            api_key: api_key.to_string(),
            paused: false,
            pp_paused: false,
            speedlimit: "100".to_string(),
            complete_action: None,
            queue: Vec::new(),
            history: vec![
                HistoryEntry {
                    nzo_id: new_id("nzo"),
                    name: "Old.Show.S01E01".to_string(),
                    category: "tv".to_string(),
                    status: "Completed".to_string(),
                    fail_message: String::new(),
                    bytes: 734_003_200,
                    completed: 1_700_000_000,
                },
                HistoryEntry {
                    nzo_id: new_id("nzo"),
                    name: "Broken.Movie.2019".to_string(),
                    category: "movies".to_string(),
                    status: "Failed".to_string(),
                    fail_message: "Repair failed, not enough repair blocks".to_string(),
                    bytes: 4_294_967_296,
                    completed: 1_700_003_600,
                },
            ],
            history_updates: 1,
            warnings: vec![json!({
                "text": "Server news.alpha.test will be ignored for 10 minutes",
                "type": "WARNING",
                "time": 1_700_000_100,
            })],
            categories: vec!["*".to_string(), "movies".to_string(), "tv".to_string()],
            scripts: vec!["None".to_string(), "notify.py".to_string()],
            config: config.as_object().cloned().unwrap_or_default(),
        }
    }

    pub fn add_job(&mut self, mut job: Job, cat: Option<&str>) -> Result<String, String> {
        if let Some(cat) = cat {
            if !self.categories.iter().any(|c| c == cat) {
                return Err("Unknown category".to_string());
            }
            job.cat = cat.to_string();
        }
        let id = job.nzo_id.clone();
        self.queue.push(job);
        Ok(id)
    }

    pub fn job_mut(&mut self, id: &str) -> Option<&mut Job> {
        self.queue.iter_mut().find(|job| job.nzo_id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.queue.iter().position(|job| job.nzo_id == id)
    }

    /// Remove jobs by id, or all of them for `all`. Returns removed ids.
    pub fn remove_jobs(&mut self, ids: &[&str]) -> Vec<String> {
        let all = ids.contains(&"all");
        let (removed, kept): (Vec<Job>, Vec<Job>) = self
            .queue
            .drain(..)
            .partition(|job| all || ids.contains(&job.nzo_id.as_str()));
        self.queue = kept;
        removed.into_iter().map(|job| job.nzo_id).collect()
    }

    pub fn remove_history(&mut self, ids: &[&str]) {
        let all = ids.contains(&"all");
        let failed = ids.contains(&"failed");
        self.history.retain(|entry| {
            !(all || (failed && entry.failed()) || ids.contains(&entry.nzo_id.as_str()))
        });
        self.history_updates += 1;
    }

    /// Move a failed history entry back into the queue.
    pub fn retry(&mut self, id: &str) -> Option<String> {
        let index = self
            .history
            .iter()
            .position(|entry| entry.nzo_id == id && entry.failed())?;
        let entry = self.history.remove(index);
        let mut job = Job::new(&entry.name, entry.bytes as f64 / 1_048_576.0);
        job.nzo_id = entry.nzo_id.clone();
        job.cat = entry.category;
        self.queue.push(job);
        self.history_updates += 1;
        Some(entry.nzo_id)
    }

    pub fn retry_all(&mut self) {
        let failed: Vec<String> = self
            .history
            .iter()
            .filter(|entry| entry.failed())
            .map(|entry| entry.nzo_id.clone())
            .collect();
        for id in failed {
            self.retry(&id);
        }
    }

    pub fn server_stats(&self) -> Value {
        json!({
            "day": 3_000_000, "week": 21_000_000, "month": 90_000_000, "total": 1_000_000_000,
            "servers": {
                "news.alpha.test": {
                    "day": 2_000_000, "week": 14_000_000, "month": 60_000_000, "total": 700_000_000,
                    "daily": {"2024-05-01": 1_000_000, "2024-05-02": 500_000, "2024-05-03": 500_000},
                    "articles_tried": {"2024-05-01": 1500, "2024-05-02": 800, "2024-05-03": 700},
                    "articles_success": {"2024-05-01": 1490, "2024-05-02": 800, "2024-05-03": 690},
                },
                "news.beta.test": {
                    "day": 1_000_000, "week": 7_000_000, "month": 30_000_000, "total": 300_000_000,
                    "daily": {"2024-05-03": 400_000, "2024-05-01": 300_000, "2024-05-02": 300_000},
                    "articles_tried": {"2024-05-03": 600, "2024-05-01": 450, "2024-05-02": 450},
                    "articles_success": {"2024-05-03": 600, "2024-05-01": 449, "2024-05-02": 450},
                },
            }
        })
    }
}

impl Default for SabState {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY)
    }
}
