//! Call descriptors: one pending API request before transport encoding.
//!
//! # Design
//! A `Call` is the method selector plus named arguments, the desired output
//! encoding and an optional binary upload. Arguments are kept in insertion
//! order. Every setter applies the presence rule: an argument is recorded only
//! if it carries a non-empty value, so `None`, `""` and empty lists never
//! reach the wire.

/// Response encoding requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    #[default]
    Json,
    Text,
}

impl Output {
    pub fn as_str(self) -> &'static str {
        match self {
            Output::Json => "json",
            Output::Text => "text",
        }
    }
}

/// Value of a named argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    Int(i64),
    List(Vec<String>),
}

impl ArgValue {
    /// Wire form. Lists become a single comma-joined string of their
    /// non-empty items.
    pub fn to_wire(&self) -> String {
        match self {
            ArgValue::Text(s) => s.clone(),
            ArgValue::Int(n) => n.to_string(),
            ArgValue::List(items) => items
                .iter()
                .filter(|item| !item.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            ArgValue::Text(s) => s.is_empty(),
            ArgValue::Int(_) => false,
            ArgValue::List(items) => items.iter().all(|item| item.is_empty()),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Text(value)
    }
}

impl From<&String> for ArgValue {
    fn from(value: &String) -> Self {
        ArgValue::Text(value.clone())
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Int(value.into())
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        ArgValue::Int(value.into())
    }
}

/// Booleans travel as `1` / `0`.
impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Int(i64::from(value))
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(value: Vec<String>) -> Self {
        ArgValue::List(value)
    }
}

impl From<&[String]> for ArgValue {
    fn from(value: &[String]) -> Self {
        ArgValue::List(value.to_vec())
    }
}

impl From<&[&str]> for ArgValue {
    fn from(value: &[&str]) -> Self {
        ArgValue::List(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ArgValue {
    fn from(value: [&str; N]) -> Self {
        ArgValue::List(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Binary payload sent through the multipart transport.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    /// Form field the payload is sent under.
    pub field: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            field: "name".to_string(),
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("field", &self.field)
            .field("file_name", &self.file_name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// One pending API request.
#[derive(Debug, Clone)]
pub struct Call {
    mode: String,
    args: Vec<(String, ArgValue)>,
    output: Output,
    upload: Option<Upload>,
}

impl Call {
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            args: Vec::new(),
            output: Output::Json,
            upload: None,
        }
    }

    /// Add an argument. Empty values are dropped.
    pub fn arg(mut self, key: &str, value: impl Into<ArgValue>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.args.push((key.to_string(), value));
        }
        self
    }

    /// Add an argument only if the caller supplied one.
    pub fn opt<V: Into<ArgValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.arg(key, value),
            None => self,
        }
    }

    pub fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    pub fn upload(mut self, upload: Upload) -> Self {
        self.upload = Some(upload);
        self
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn args(&self) -> &[(String, ArgValue)] {
        &self.args
    }

    pub fn output_encoding(&self) -> Output {
        self.output
    }

    pub fn upload_payload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }
}
