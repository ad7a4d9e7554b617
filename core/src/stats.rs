//! Server statistics projection.
//!
//! The service reports per-server tallies as nested objects keyed by date.
//! `project` turns the decoded document into `ServerStats`, one record per
//! news server, with each date-keyed object copied into a `HashMap`.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::response::{as_u64, require_object, require_u64};

/// Download totals across all servers plus the per-server breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerStats {
    pub day: u64,
    pub week: u64,
    pub month: u64,
    pub total: u64,
    pub servers: HashMap<String, ServerStat>,
}

/// Tallies for one news server. Date keys are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerStat {
    pub day: u64,
    pub week: u64,
    pub month: u64,
    pub total: u64,
    /// Bytes downloaded per date.
    pub daily: HashMap<String, u64>,
    pub articles_tried: HashMap<String, u64>,
    pub articles_success: HashMap<String, u64>,
}

/// Build `ServerStats` from a decoded `server_stats` response.
pub fn project(doc: &Value) -> Result<ServerStats, ApiError> {
    let mut servers = HashMap::new();
    for (name, server) in require_object(doc, "servers")? {
        servers.insert(name.clone(), project_server(name, server)?);
    }
    Ok(ServerStats {
        day: require_u64(doc, "day")?,
        week: require_u64(doc, "week")?,
        month: require_u64(doc, "month")?,
        total: require_u64(doc, "total")?,
        servers,
    })
}

fn project_server(name: &str, server: &Value) -> Result<ServerStat, ApiError> {
    let scoped = |err: ApiError| match err {
        ApiError::Protocol(msg) => ApiError::Protocol(format!("server `{name}`: {msg}")),
        other => other,
    };
    let tally = |field: &str| require_u64(server, field).map_err(scoped);
    let dated = |field: &str| {
        require_object(server, field)
            .and_then(|source| date_map(field, source))
            .map_err(scoped)
    };

    let articles_tried = dated("articles_tried")?;
    Ok(ServerStat {
        day: tally("day")?,
        week: tally("week")?,
        month: tally("month")?,
        total: tally("total")?,
        daily: dated("daily")?,
        // Filled from `articles_tried`, not `articles_success`. Existing
        // consumers depend on this; see DESIGN.md before changing it.
        articles_success: articles_tried.clone(),
        articles_tried,
    })
}

fn date_map(field: &str, source: &Map<String, Value>) -> Result<HashMap<String, u64>, ApiError> {
    let mut out = HashMap::with_capacity(source.len());
    for (date, value) in source {
        let count = as_u64(value).ok_or_else(|| {
            ApiError::Protocol(format!("field `{field}.{date}` is not a non-negative integer"))
        })?;
        out.insert(date.clone(), count);
    }
    Ok(out)
}
