//! In-memory stand-in for the SABnzbd `/api` endpoint.
//!
//! Accepts the same GET query strings and multipart POST forms as the real
//! service and answers with the same JSON shapes, backed by `SabState`.
//! Repeated query keys are refused with 400 so tests notice a client that
//! sends list arguments as repeated fields.

pub mod state;

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use state::{HistoryEntry, Job, SabState, DEFAULT_API_KEY, VERSION};

pub type Db = Arc<RwLock<SabState>>;

pub fn app() -> Router {
    app_with_state(SabState::default())
}

pub fn app_with_state(state: SabState) -> Router {
    let db: Db = Arc::new(RwLock::new(state));
    Router::new()
        .route("/api", get(api_get).post(api_post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// Request fields after transport decoding.
#[derive(Debug, Default)]
struct Params {
    fields: Vec<(String, String)>,
    upload: Option<(String, String, Vec<u8>)>,
}

impl Params {
    fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|v| v.split(',').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("1")
    }

    fn number(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    fn duplicate_key(&self) -> Option<&str> {
        self.fields.iter().enumerate().find_map(|(i, (k, _))| {
            self.fields[..i]
                .iter()
                .any(|(seen, _)| seen == k)
                .then_some(k.as_str())
        })
    }
}

async fn api_get(State(db): State<Db>, Query(fields): Query<Vec<(String, String)>>) -> Response {
    dispatch(&db, Params { fields, upload: None }).await
}

async fn api_post(State(db): State<Db>, mut multipart: Multipart) -> Response {
    let mut params = Params::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        };
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        match file_name {
            Some(file_name) => match field.bytes().await {
                Ok(bytes) => params.upload = Some((name, file_name, bytes.to_vec())),
                Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
            },
            None => match field.text().await {
                Ok(text) => params.fields.push((name, text)),
                Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
            },
        }
    }
    dispatch(&db, params).await
}

fn status(ok: bool) -> Response {
    Json(json!({ "status": ok })).into_response()
}

fn rejected(message: &str) -> Response {
    Json(json!({ "status": false, "error": message })).into_response()
}

fn paginate<T>(items: Vec<T>, params: &Params) -> Vec<T> {
    let start = params.number("start").unwrap_or(0);
    let limit = params.number("limit").filter(|l| *l > 0).unwrap_or(usize::MAX);
    items.into_iter().skip(start).take(limit).collect()
}

async fn dispatch(db: &Db, params: Params) -> Response {
    if let Some(key) = params.duplicate_key() {
        return (StatusCode::BAD_REQUEST, format!("duplicate parameter {key}")).into_response();
    }
    let mode = params.get("mode").unwrap_or_default().to_string();
    tracing::debug!(%mode, "api request");

    let mut state = db.write().await;
    if !matches!(mode.as_str(), "version" | "auth") && params.get("apikey") != Some(state.api_key.as_str()) {
        return rejected("API Key Incorrect");
    }

    match mode.as_str() {
        "version" => Json(json!({ "version": VERSION })).into_response(),
        "auth" => Json(json!({ "auth": "apikey" })).into_response(),
        "queue" => queue(&mut state, &params),
        "pause" => {
            state.paused = true;
            status(true)
        }
        "resume" => {
            state.paused = false;
            status(true)
        }
        "config" => match (params.get("name"), params.get("value")) {
            (Some("speedlimit"), Some(value)) => {
                state.speedlimit = value.to_string();
                status(true)
            }
            (Some("set_pause"), Some(_)) => {
                state.paused = true;
                status(true)
            }
            _ => status(false),
        },
        "addurl" | "addlocalfile" => {
            let Some(source) = params.get("name") else {
                return rejected("expects one parameter");
            };
            let default_name = source
                .split(['?', '#'])
                .next()
                .unwrap_or(source)
                .rsplit('/')
                .next()
                .unwrap_or(source)
                .trim_end_matches(".nzb");
            let name = params.get("nzbname").unwrap_or(default_name);
            add(&mut state, &params, name)
        }
        "addfile" => {
            let Some((_, file_name, content)) = &params.upload else {
                return rejected("expects one parameter");
            };
            if content.is_empty() {
                return rejected("empty file");
            }
            let name = params
                .get("nzbname")
                .unwrap_or(file_name.trim_end_matches(".nzb"))
                .to_string();
            add(&mut state, &params, &name)
        }
        "switch" => switch(&mut state, &params),
        "change_cat" | "change_script" | "change_opts" => {
            let (Some(id), Some(value)) = (params.get("value"), params.get("value2")) else {
                return status(false);
            };
            let Some(job) = state.job_mut(id) else {
                return status(false);
            };
            match mode.as_str() {
                "change_cat" => job.cat = value.to_string(),
                "change_script" => job.script = value.to_string(),
                _ => job.pp = value.parse().unwrap_or(job.pp),
            }
            status(true)
        }
        "get_files" => {
            let files: Vec<Value> = params
                .get("value")
                .and_then(|id| state.queue.iter().find(|job| job.nzo_id == id))
                .map(|job| {
                    vec![json!({
                        "nzf_id": crate::state::new_id("nzf"),
                        "filename": format!("{}.part01.rar", job.filename),
                        "status": "active",
                        "mb": format!("{:.2}", job.mb),
                        "mbleft": format!("{:.2}", job.mb),
                        "bytes": format!("{:.2}", job.mb * 1_048_576.0),
                        "age": "1d",
                    })]
                })
                .unwrap_or_default();
            Json(json!({ "files": files })).into_response()
        }
        "history" => history(&mut state, &params),
        "retry" => match params.get("value").and_then(|id| state.retry(id)) {
            Some(id) => Json(json!({ "status": true, "nzo_id": id })).into_response(),
            None => status(false),
        },
        "retry_all" => {
            state.retry_all();
            status(true)
        }
        "warnings" => {
            if params.get("name") == Some("clear") {
                state.warnings.clear();
                status(true)
            } else {
                Json(json!({ "warnings": state.warnings })).into_response()
            }
        }
        "get_cats" => Json(json!({ "categories": state.categories })).into_response(),
        "get_scripts" => Json(json!({ "scripts": state.scripts })).into_response(),
        "server_stats" => Json(state.server_stats()).into_response(),
        "get_config" => get_config(&state, &params),
        "set_config" => {
            let (Some(section), Some(keyword), Some(value)) = (
                params.get("section"),
                params.get("keyword"),
                params.get("value"),
            ) else {
                return rejected("expects section, keyword and value");
            };
            let entry = state
                .config
                .entry(section.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(section_map) = entry {
                section_map.insert(keyword.to_string(), Value::from(value));
            }
            Json(json!({ "config": { section: { keyword: value } } })).into_response()
        }
        "set_config_default" => {
            let keywords = params.list("keyword");
            if let Some(Value::Object(misc)) = state.config.get_mut("misc") {
                for keyword in keywords {
                    if let Some(value) = misc.get_mut(keyword) {
                        *value = Value::from("");
                    }
                }
            }
            status(true)
        }
        "translate" => Json(json!({ "value": params.get("value").unwrap_or_default() })).into_response(),
        "change_complete_action" => {
            state.complete_action = params.get("value").map(str::to_string);
            if params.get("output") == Some("text") {
                "ok\n".into_response()
            } else {
                status(true)
            }
        }
        "pause_pp" => {
            state.pp_paused = true;
            status(true)
        }
        "resume_pp" => {
            state.pp_paused = false;
            status(true)
        }
        "shutdown" | "restart" | "restart_repair" | "rss_now" | "watched_now" | "reset_quota" => {
            status(true)
        }
        _ => (StatusCode::NOT_FOUND, "not implemented\n").into_response(),
    }
}

fn add(state: &mut SabState, params: &Params, name: &str) -> Response {
    let mut job = Job::new(name, 512.0);
    if let Some(priority) = params.get("priority").and_then(|p| p.parse().ok()) {
        job.priority = priority;
    }
    if let Some(pp) = params.get("pp").and_then(|p| p.parse().ok()) {
        job.pp = pp;
    }
    if let Some(script) = params.get("script") {
        job.script = script.to_string();
    }
    if let Some(password) = params.get("password") {
        job.password = password.to_string();
    }
    match state.add_job(job, params.get("cat")) {
        Ok(id) => Json(json!({ "status": true, "nzo_ids": [id] })).into_response(),
        Err(message) => rejected(&message),
    }
}

fn queue(state: &mut SabState, params: &Params) -> Response {
    match params.get("name") {
        Some("sort") => {
            match params.get("sort") {
                Some("name") => state.queue.sort_by(|a, b| a.filename.cmp(&b.filename)),
                Some("size") | Some("remaining") => {
                    state.queue.sort_by(|a, b| a.mb.total_cmp(&b.mb))
                }
                _ => {}
            }
            if params.get("dir") == Some("desc") {
                state.queue.reverse();
            }
            status(true)
        }
        Some("purge") => {
            let ids: Vec<String> = state
                .queue
                .iter()
                .filter(|job| {
                    params
                        .get("search")
                        .map_or(true, |s| job.filename.to_lowercase().contains(&s.to_lowercase()))
                })
                .map(|job| job.nzo_id.clone())
                .collect();
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            let removed = state.remove_jobs(&ids);
            Json(json!({ "status": true, "nzo_ids": removed })).into_response()
        }
        Some(action @ ("pause" | "resume")) => {
            let status_name = if action == "pause" { "Paused" } else { "Queued" };
            for id in params.list("value") {
                if let Some(job) = state.job_mut(id) {
                    job.status = status_name.to_string();
                }
            }
            status(true)
        }
        Some("delete") => {
            let removed = state.remove_jobs(&params.list("value"));
            Json(json!({ "status": true, "nzo_ids": removed })).into_response()
        }
        Some("rename") => {
            let (Some(id), Some(name)) = (params.get("value"), params.get("value2")) else {
                return status(false);
            };
            let password = params.get("value3").map(str::to_string);
            match state.job_mut(id) {
                Some(job) => {
                    job.filename = name.to_string();
                    if let Some(password) = password {
                        job.password = password;
                    }
                    status(true)
                }
                None => status(false),
            }
        }
        Some("priority") => {
            let (Some(id), Some(priority)) = (
                params.get("value"),
                params.get("value2").and_then(|p| p.parse::<i64>().ok()),
            ) else {
                return Json(json!({ "position": -1 })).into_response();
            };
            let Some(index) = state.position(id) else {
                return Json(json!({ "position": -1 })).into_response();
            };
            let mut job = state.queue.remove(index);
            job.priority = priority;
            let position = if priority == 2 { 0 } else { index };
            state.queue.insert(position, job);
            Json(json!({ "position": position })).into_response()
        }
        Some(other) => {
            (StatusCode::NOT_FOUND, format!("unknown queue action {other}\n")).into_response()
        }
        None => queue_listing(state, params),
    }
}

fn queue_listing(state: &SabState, params: &Params) -> Response {
    let ids = params.list("nzo_ids");
    let matching: Vec<(usize, &Job)> = state
        .queue
        .iter()
        .enumerate()
        .filter(|(_, job)| params.get("cat").map_or(true, |cat| job.cat == cat))
        .filter(|(_, job)| {
            params
                .get("search")
                .map_or(true, |s| job.filename.to_lowercase().contains(&s.to_lowercase()))
        })
        .filter(|(_, job)| ids.is_empty() || ids.contains(&job.nzo_id.as_str()))
        .collect();
    let noofslots = matching.len();
    let slots: Vec<Value> = paginate(matching, params)
        .into_iter()
        .map(|(index, job)| job.slot(index))
        .collect();
    let total_mb: f64 = state.queue.iter().map(|job| job.mb).sum();
    let status = if state.paused {
        "Paused"
    } else if state.queue.is_empty() {
        "Idle"
    } else {
        "Downloading"
    };

    Json(json!({
        "queue": {
            "status": status,
            "paused": state.paused,
            "speed": "0  ",
            "speedlimit": state.speedlimit,
            "kbpersec": "0.00",
            "mb": format!("{total_mb:.2}"),
            "mbleft": format!("{total_mb:.2}"),
            "size": format!("{total_mb:.1} MB"),
            "sizeleft": format!("{total_mb:.1} MB"),
            "timeleft": "0:00:00",
            "noofslots": noofslots,
            "noofslots_total": state.queue.len(),
            "slots": slots,
        }
    }))
    .into_response()
}

fn switch(state: &mut SabState, params: &Params) -> Response {
    let (Some(id), Some(target)) = (params.get("value"), params.get("value2")) else {
        return Json(json!({ "result": { "position": -1, "priority": 0 } })).into_response();
    };
    let Some(from) = state.position(id) else {
        return Json(json!({ "result": { "position": -1, "priority": 0 } })).into_response();
    };
    let to = target
        .parse::<usize>()
        .ok()
        .or_else(|| state.position(target))
        .unwrap_or(from)
        .min(state.queue.len() - 1);
    let job = state.queue.remove(from);
    let priority = job.priority;
    state.queue.insert(to, job);
    Json(json!({ "result": { "position": to, "priority": priority } })).into_response()
}

fn history(state: &mut SabState, params: &Params) -> Response {
    if params.get("name") == Some("delete") {
        state.remove_history(&params.list("value"));
        return status(true);
    }
    let ids = params.list("nzo_ids");
    let matching: Vec<&HistoryEntry> = state
        .history
        .iter()
        .filter(|entry| !params.flag("failed_only") || entry.status == "Failed")
        .filter(|entry| params.get("cat").map_or(true, |cat| entry.category == cat))
        .filter(|entry| {
            params
                .get("search")
                .map_or(true, |s| entry.name.to_lowercase().contains(&s.to_lowercase()))
        })
        .filter(|entry| ids.is_empty() || ids.contains(&entry.nzo_id.as_str()))
        .collect();
    let noofslots = matching.len();
    let slots: Vec<Value> = paginate(matching, params)
        .into_iter()
        .map(HistoryEntry::slot)
        .collect();
    let total: u64 = state.history.iter().map(|entry| entry.bytes).sum();

    Json(json!({
        "history": {
            "noofslots": noofslots,
            "day_size": "0 B",
            "week_size": "0 B",
            "month_size": format!("{total} B"),
            "total_size": format!("{total} B"),
            "last_history_update": state.history_updates,
            "slots": slots,
        }
    }))
    .into_response()
}

fn get_config(state: &SabState, params: &Params) -> Response {
    let config = match (params.get("section"), params.get("keyword")) {
        (None, _) => Value::Object(state.config.clone()),
        (Some(section), None) => json!({ section: state.config.get(section).cloned().unwrap_or(Value::Null) }),
        (Some(section), Some(keyword)) => json!({
            section: state
                .config
                .get(section)
                .and_then(|s| s.get(keyword))
                .cloned()
                .unwrap_or(Value::Null)
        }),
    };
    Json(json!({ "config": config })).into_response()
}
