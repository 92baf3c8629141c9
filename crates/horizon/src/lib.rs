//! Rust client for the Horizon task API.
//!
//! [`TaskClient`] wraps every task endpoint of the Horizon service: create,
//! list, fetch and delete tasks, generate and deploy them against an LLM
//! provider, upload evaluation datasets and output schemas, and read
//! deployment logs.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, multipart encoding, response parsing
//! and the deploy retry loop live here. Request payloads, credentials and
//! the error taxonomy come from the [`tasks`] crate and are re-exported.
//!
//! ## Logging
//!
//! Operations emit `tracing` spans and events (retries at `WARN`, request
//! dispatch at `DEBUG`). Install a subscriber in the application to see them;
//! API keys are never recorded.

pub mod client;
pub mod config;
pub mod http;

pub use client::TaskClient;
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use http::{HttpTransport, API_KEY_HEADER};
pub use tasks::{
    ApiRequest, CreateTaskRequest, Credentials, DeployRetryPolicy, DeployTaskRequest, ErrorKind,
    HorizonError, HorizonResult, ProjectId, RequiredCredential, TaskId, TaskType, Transport,
    UploadField,
};
