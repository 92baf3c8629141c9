//! Domain types and port definitions for the Horizon task API client.
//!
//! This crate contains every concept the client needs to describe a call to
//! the Horizon service: newtype identifiers, request payloads, the credential
//! context, the error taxonomy, and the deployment retry policy. The
//! [`Transport`] trait is the single port through which requests leave the
//! process; the `horizon` crate implements it over HTTP.
//!
//! ## Architectural Layer
//!
//! **Business rules + port definitions.** This crate performs no network I/O.
//! It defines *what* is sent; infrastructure defines *how* it is sent.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`TaskId`, `ProjectId`, `ModelName`, `TaskType`) |
//! | [`types`] | Caller-facing requests and the JSON payloads they become |
//! | [`credentials`] | API key and LLM provider key context |
//! | [`errors`] | [`HorizonError`], [`ErrorKind`] and [`RetryPolicy`] |
//! | [`retry`] | [`DeployRetryPolicy`], the injectable deploy retry rule |
//! | [`transport`] | The [`Transport`] port and the [`ApiRequest`] it carries |

pub mod credentials;
pub mod errors;
pub mod identifiers;
pub mod retry;
pub mod transport;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use credentials::{Credentials, ProviderKeys};
pub use errors::{ErrorKind, HorizonError, HorizonResult, RequiredCredential, RetryPolicy};
pub use identifiers::{ModelName, ProjectId, TaskId, TaskType};
pub use retry::DeployRetryPolicy;
pub use transport::{ApiRequest, FileUpload, Method, RequestBody, Transport, UploadField};
pub use types::{
    AllowedModels, CreateTaskPayload, CreateTaskRequest, DeployTaskPayload, DeployTaskRequest,
    GenerateTaskPayload,
};
