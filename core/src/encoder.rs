//! Request encoding: `Call` + `Endpoint` → `HttpRequest`.
//!
//! # Design
//! Two strategies implement `RequestEncoder`. `QueryEncoder` puts everything
//! in the URL of a GET; `MultipartEncoder` posts a form whose first field is
//! the binary upload. Both append the mandatory control fields through
//! `control_fields`, after the caller's arguments. Encoding is pure and
//! cannot fail; configuration problems were already rejected by `Endpoint::new`.

use crate::call::Call;
use crate::config::Endpoint;
use crate::http::{FormPart, HttpBody, HttpMethod, HttpRequest};

/// Turns a call into a transport-ready request.
pub trait RequestEncoder {
    fn encode(&self, endpoint: &Endpoint, call: &Call) -> HttpRequest;
}

/// GET `<host>/api?<args>&mode=..&output=..&apikey=..`
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEncoder;

/// POST `<host>/api` with a multipart form body.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultipartEncoder;

/// The three fields every request carries, in wire order.
pub fn control_fields(endpoint: &Endpoint, call: &Call) -> [(&'static str, String); 3] {
    [
        ("mode", call.mode().to_string()),
        ("output", call.output_encoding().as_str().to_string()),
        ("apikey", endpoint.api_key().to_string()),
    ]
}

fn argument_fields(call: &Call) -> impl Iterator<Item = (&str, String)> {
    call.args().iter().map(|(k, v)| (k.as_str(), v.to_wire()))
}

fn text_part((name, value): (&str, String)) -> FormPart {
    FormPart::Text {
        name: name.to_string(),
        value,
    }
}

impl RequestEncoder for QueryEncoder {
    fn encode(&self, endpoint: &Endpoint, call: &Call) -> HttpRequest {
        let mut url = endpoint.api_url().clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in argument_fields(call) {
                pairs.append_pair(key, &value);
            }
            for (key, value) in control_fields(endpoint, call) {
                pairs.append_pair(key, &value);
            }
        }
        HttpRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestEncoder for MultipartEncoder {
    fn encode(&self, endpoint: &Endpoint, call: &Call) -> HttpRequest {
        let mut parts = Vec::with_capacity(call.args().len() + 4);
        if let Some(upload) = call.upload_payload() {
            parts.push(FormPart::File {
                name: upload.field.clone(),
                file_name: upload.file_name.clone(),
                content: upload.content.clone(),
            });
        }
        parts.extend(argument_fields(call).map(text_part));
        parts.extend(control_fields(endpoint, call).into_iter().map(text_part));

        HttpRequest {
            method: HttpMethod::Post,
            url: endpoint.api_url().to_string(),
            headers: Vec::new(),
            body: Some(HttpBody::Multipart(parts)),
        }
    }
}

impl Endpoint {
    /// Encode a call, choosing multipart when it carries an upload.
    pub fn encode(&self, call: &Call) -> HttpRequest {
        if call.upload_payload().is_some() {
            MultipartEncoder.encode(self, call)
        } else {
            QueryEncoder.encode(self, call)
        }
    }
}
