//! Async client for the SABnzbd API.
//!
//! # Design
//! `SabnzbdClient` holds an immutable `Endpoint` and a transport and nothing
//! else, so one instance can serve any number of concurrent calls. Every
//! operation funnels through `dispatch`: encode the `Call`, execute it once,
//! interpret the outcome. The operation methods live in `crate::ops`, grouped
//! by area, and only pick the mode, the arguments and the decoder.

use serde_json::Value;
use tracing::{debug, warn};

use crate::call::{Call, Output};
use crate::config::{ClientConfig, Endpoint};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::response::{self, Decoded};
use crate::transport::{HttpTransport, ReqwestTransport};

#[derive(Debug, Clone)]
pub struct SabnzbdClient<T = ReqwestTransport> {
    endpoint: Endpoint,
    transport: T,
}

impl SabnzbdClient<ReqwestTransport> {
    /// Client for `host` (e.g. `http://localhost:8080`) using `reqwest`.
    pub fn new(host: &str, api_key: &str) -> Result<Self, ApiError> {
        Self::from_config(&ClientConfig::new(host, api_key))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let endpoint = config.endpoint()?;
        let transport = ReqwestTransport::new(config.timeout)
            .map_err(|e| ApiError::Config(format!("could not build HTTP client: {e}")))?;
        Ok(Self::with_transport(endpoint, transport))
    }
}

impl<T> SabnzbdClient<T> {
    pub fn with_transport(endpoint: Endpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encode a call without sending it.
    pub fn build_request(&self, call: &Call) -> HttpRequest {
        self.endpoint.encode(call)
    }
}

impl<T: HttpTransport> SabnzbdClient<T> {
    /// Send one call and decode the response in the encoding it asked for.
    pub async fn dispatch(&self, call: Call) -> Result<Decoded, ApiError> {
        let output = call.output_encoding();
        let request = self.build_request(&call);
        debug!(
            mode = call.mode(),
            output = output.as_str(),
            multipart = request.method == HttpMethod::Post,
            "dispatching api call"
        );

        let outcome = self.transport.execute(request).await;
        let decoded = response::interpret(outcome, output);
        if let Err(err) = &decoded {
            warn!(mode = call.mode(), error = %err, "api call failed");
        }
        decoded
    }

    /// Send a JSON call and project the document with `validate`. Errors past
    /// `dispatch` (shape or service rejection) are logged here.
    pub(crate) async fn call_json<R>(
        &self,
        call: Call,
        validate: impl FnOnce(&Value) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let mode = call.mode().to_string();
        let doc = self.dispatch(call.output(Output::Json)).await?;
        let result = doc.into_json().and_then(|doc| validate(&doc));
        if let Err(err) = &result {
            warn!(mode = %mode, error = %err, "api response rejected");
        }
        result
    }

    pub(crate) async fn call_text(&self, call: Call) -> Result<String, ApiError> {
        let mode = call.mode().to_string();
        let result = self.dispatch(call.output(Output::Text)).await?.into_text();
        if let Err(err) = &result {
            warn!(mode = %mode, error = %err, "api response rejected");
        }
        result
    }

    /// Action calls that answer with a `status` flag.
    pub(crate) async fn call_status(&self, call: Call) -> Result<bool, ApiError> {
        self.call_json(call, response::require_status).await
    }
}
