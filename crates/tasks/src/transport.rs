//! The port through which requests leave the process.
//!
//! An [`ApiRequest`] is a fully-resolved call: method, path relative to the
//! service base URL, the API key for the `X-Api-Key` header, and a body.
//! Implementations of [`Transport`] turn it into a network request and hand
//! back the parsed JSON response body.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use crate::HorizonResult;

/// HTTP method of an [`ApiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Multipart form field a task file is uploaded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadField {
    /// Dataset the service evaluates generated prompts against.
    EvaluationDataset,
    /// Schema the deployed task's output must conform to.
    OutputSchema,
}

impl UploadField {
    /// The multipart field name.
    pub fn as_str(self) -> &'static str {
        match self {
            UploadField::EvaluationDataset => "evaluation_dataset",
            UploadField::OutputSchema => "output_schema",
        }
    }

    /// The task sub-resource that accepts this upload.
    pub fn endpoint(self) -> &'static str {
        match self {
            UploadField::EvaluationDataset => "upload_evaluation_dataset",
            UploadField::OutputSchema => "upload_output_schema",
        }
    }
}

/// An opened file on its way into a multipart request.
///
/// Owns the file handle, which is released when the request carrying it is
/// dropped, whether or not the request succeeded.
#[derive(Debug)]
pub struct FileUpload {
    field: UploadField,
    file_name: String,
    file: std::fs::File,
    length: u64,
}

impl FileUpload {
    /// Wraps an already-opened file of `length` bytes.
    ///
    /// The part's file name is the base name of `path`, falling back to the
    /// field name when the path has none.
    pub fn new(field: UploadField, path: &Path, file: std::fs::File, length: u64) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| field.as_str().to_string());
        Self {
            field,
            file_name,
            file,
            length,
        }
    }

    pub fn field(&self) -> UploadField {
        self.field
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Splits the upload into field, file name, handle and length.
    pub fn into_parts(self) -> (UploadField, String, std::fs::File, u64) {
        (self.field, self.file_name, self.file, self.length)
    }
}

/// Body of an [`ApiRequest`].
#[derive(Debug)]
pub enum RequestBody {
    /// No body (GET, DELETE).
    Empty,
    /// A JSON document sent with `Content-Type: application/json`.
    Json(Value),
    /// A single-file multipart form; the transport sets the boundary header.
    Multipart(FileUpload),
}

/// A resolved call against the Horizon service.
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, always starting with `/`.
    pub path: String,
    /// Value of the `X-Api-Key` header.
    pub api_key: String,
    /// Payload, if any.
    pub body: RequestBody,
}

impl ApiRequest {
    /// A bodiless GET of `path`.
    pub fn get(path: impl Into<String>, api_key: &str) -> Self {
        Self::new(Method::Get, path, api_key, RequestBody::Empty)
    }

    /// A bodiless DELETE of `path`.
    pub fn delete(path: impl Into<String>, api_key: &str) -> Self {
        Self::new(Method::Delete, path, api_key, RequestBody::Empty)
    }

    /// A POST carrying `body` as JSON.
    pub fn post_json(path: impl Into<String>, api_key: &str, body: Value) -> Self {
        Self::new(Method::Post, path, api_key, RequestBody::Json(body))
    }

    /// A POST carrying `upload` as a single-file multipart form.
    pub fn post_multipart(path: impl Into<String>, api_key: &str, upload: FileUpload) -> Self {
        Self::new(Method::Post, path, api_key, RequestBody::Multipart(upload))
    }

    fn new(method: Method, path: impl Into<String>, api_key: &str, body: RequestBody) -> Self {
        Self {
            method,
            path: path.into(),
            api_key: api_key.to_string(),
            body,
        }
    }
}

// Hand-written so the API key never reaches logs.
impl std::fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("api_key", &"<redacted>")
            .field("body", &self.body)
            .finish()
    }
}

/// Sends [`ApiRequest`]s to the Horizon service.
///
/// # Errors
///
/// Implementations map failures onto [`crate::HorizonError`]:
///
/// - unreachable service, or connection lost before a response →
///   [`crate::HorizonError::Connection`]
/// - non-2xx status → [`crate::HorizonError::RemoteApi`]
/// - unparseable success body → [`crate::HorizonError::Decode`]
/// - anything else → [`crate::HorizonError::Transport`]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the parsed response body.
    ///
    /// An empty success body is returned as [`Value::Null`].
    async fn send(&self, request: ApiRequest) -> HorizonResult<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: ApiRequest) -> HorizonResult<Value> {
        (**self).send(request).await
    }
}
