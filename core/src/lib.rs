//! Async client for the SABnzbd HTTP control API.
//!
//! # Overview
//! Every operation the service offers is a `mode` plus named arguments sent
//! to `<host>/api`. This crate encodes those calls, executes them through a
//! pluggable transport and validates the responses into typed results.
//!
//! # Design
//! - `Call` describes one request; `Endpoint::encode` turns it into an
//!   `HttpRequest` (query string, or multipart when a file is uploaded).
//! - `response::interpret` classifies the transport outcome and decodes the
//!   body. The `require_*` helpers validate the fields each operation needs.
//! - Encoding and interpretation are pure, so callers can run the round trip
//!   with any HTTP stack. `SabnzbdClient` does it with `reqwest` by default.
//! - `SabnzbdClient` holds only immutable configuration and is safe to share
//!   across concurrent calls.

pub mod call;
pub mod client;
pub mod config;
pub mod encoder;
pub mod error;
pub mod http;
mod ops;
pub mod response;
pub mod stats;
pub mod transport;
pub mod types;

pub use call::{ArgValue, Call, Output, Upload};
pub use client::SabnzbdClient;
pub use config::{ClientConfig, Endpoint};
pub use encoder::{MultipartEncoder, QueryEncoder, RequestEncoder};
pub use error::{ApiError, TransportError};
pub use http::{FormPart, HttpBody, HttpMethod, HttpRequest, HttpResponse};
pub use response::Decoded;
pub use stats::{ServerStat, ServerStats};
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{
    AddOptions, History, HistoryQuery, HistorySlot, JobFile, PostProcessing, Priority, Queue,
    QueueQuery, QueueSlot, SortDirection, SortField, SwitchResult, Warning,
};
