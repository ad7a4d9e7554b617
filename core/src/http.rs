//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The encoder produces an
//! `HttpRequest` and the interpreter consumes an `HttpResponse`; neither
//! touches the network. Multipart bodies are described as a list of
//! `FormPart`s so the encoder stays independent of any HTTP library, and the
//! transport turns them into a real form when sending.

/// HTTP method for a request. The API only uses GET and POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// One field of a multipart form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content: Vec<u8>,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Request body. Query-string requests carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpBody {
    Multipart(Vec<FormPart>),
}

/// An HTTP request described as plain data.
///
/// `url` contains the query string, and with it the API key. Do not log it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    /// Decoded query parameters in wire order. Fails if `url` does not
    /// parse, which only happens for requests built by hand.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>, url::ParseError> {
        let url = url::Url::parse(&self.url)?;
        Ok(url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect())
    }

    /// Text fields of a multipart body in wire order.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        match &self.body {
            Some(HttpBody::Multipart(parts)) => parts
                .iter()
                .filter_map(|part| match part {
                    FormPart::Text { name, value } => Some((name.clone(), value.clone())),
                    FormPart::File { .. } => None,
                })
                .collect(),
            None => Vec::new(),
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
