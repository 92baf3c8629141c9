//! # Task Client
//!
//! [`TaskClient`] exposes one method per Horizon task endpoint. Each method
//! checks the credential context first, validates its arguments, and only
//! then sends exactly one request through the configured [`Transport`].
//! `deploy_task` is the exception: it repeats the request on connection
//! failures according to its [`DeployRetryPolicy`].

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tasks::{
    ApiRequest, CreateTaskRequest, Credentials, DeployRetryPolicy, DeployTaskRequest, FileUpload,
    GenerateTaskPayload, HorizonError, HorizonResult, RetryPolicy, TaskId, Transport, UploadField,
};
use tracing::{info, instrument, warn};

use crate::config::ClientConfig;
use crate::http::HttpTransport;

const TASKS_PATH: &str = "/api/tasks";

fn task_path(task_id: TaskId) -> String {
    format!("{TASKS_PATH}/{task_id}")
}

fn task_action_path(task_id: TaskId, action: &str) -> String {
    format!("{TASKS_PATH}/{task_id}/{action}")
}

fn to_json<T: Serialize>(payload: &T) -> HorizonResult<Value> {
    serde_json::to_value(payload).map_err(|e| {
        HorizonError::invalid_argument(format!("payload is not JSON-serialisable: {e}"))
    })
}

/// Client for the Horizon task API.
///
/// Holds its own credentials, so several clients with different keys can
/// coexist in one process. The client is `Send + Sync` whenever its
/// transport is and may be shared behind an `Arc`.
///
/// # Example
///
/// ```rust,no_run
/// use horizon::{ClientConfig, Credentials, DeployTaskRequest, TaskClient, TaskId};
///
/// # async fn example() -> Result<(), horizon::HorizonError> {
/// let credentials = Credentials::new()
///     .with_api_key("hz-...")
///     .with_openai_api_key("sk-...");
/// let client = TaskClient::new(&ClientConfig::new(), credentials)?;
///
/// let output = client
///     .deploy_task(DeployTaskRequest::new(
///         TaskId::new(42),
///         serde_json::json!({"ticket": "Printer is on fire"}),
///     ))
///     .await?;
/// println!("{output}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TaskClient<T = HttpTransport> {
    transport: T,
    credentials: Credentials,
    retry_policy: DeployRetryPolicy,
}

impl TaskClient<HttpTransport> {
    /// Creates a client that talks HTTP to the service described by `config`.
    ///
    /// # Errors
    ///
    /// [`HorizonError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, credentials: Credentials) -> HorizonResult<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?, credentials))
    }

    /// Creates a client from `HORIZON_*`, `OPENAI_API_KEY` and
    /// `ANTHROPIC_API_KEY` environment variables.
    ///
    /// # Errors
    ///
    /// [`HorizonError::InvalidArgument`] for malformed configuration
    /// variables. Missing keys are not an error here; they surface on the
    /// first call that needs them.
    pub fn from_env() -> HorizonResult<Self> {
        Self::new(&ClientConfig::from_env()?, Credentials::from_env())
    }
}

impl<T: Transport> TaskClient<T> {
    /// Creates a client over any [`Transport`].
    pub fn with_transport(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            retry_policy: DeployRetryPolicy::default(),
        }
    }

    /// Replaces the retry rule used by [`TaskClient::deploy_task`].
    pub fn with_retry_policy(mut self, retry_policy: DeployRetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// The credentials every call is checked against.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The retry rule applied by [`TaskClient::deploy_task`].
    pub fn retry_policy(&self) -> &DeployRetryPolicy {
        &self.retry_policy
    }

    /// Lists the tasks visible to the API key.
    #[instrument(skip(self))]
    pub async fn list_tasks(&self) -> HorizonResult<Value> {
        let api_key = self.credentials.require_api_key()?;
        self.transport
            .send(ApiRequest::get(TASKS_PATH, api_key))
            .await
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// [`HorizonError::InvalidArgument`] if `request.allowed_models` is empty
    /// or contains a blank name; nothing is sent in that case.
    #[instrument(
        skip(self, request),
        fields(name = %request.name, project_id = %request.project_id)
    )]
    pub async fn create_task(&self, request: CreateTaskRequest) -> HorizonResult<Value> {
        let api_key = self.credentials.require_api_key()?;
        let payload = to_json(&request.into_payload()?)?;
        self.transport
            .send(ApiRequest::post_json(
                format!("{TASKS_PATH}/create"),
                api_key,
                payload,
            ))
            .await
    }

    /// Fetches one task.
    #[instrument(skip(self))]
    pub async fn get_task(&self, task_id: TaskId) -> HorizonResult<Value> {
        let api_key = self.credentials.require_api_key()?;
        self.transport
            .send(ApiRequest::get(task_path(task_id), api_key))
            .await
    }

    /// Deletes a task. Services answering `204 No Content` yield [`Value::Null`].
    #[instrument(skip(self))]
    pub async fn delete_task(&self, task_id: TaskId) -> HorizonResult<Value> {
        let api_key = self.credentials.require_api_key()?;
        self.transport
            .send(ApiRequest::delete(task_path(task_id), api_key))
            .await
    }

    /// Fetches the summary the service shows before a task is confirmed.
    #[instrument(skip(self))]
    pub async fn get_task_confirmation_details(&self, task_id: TaskId) -> HorizonResult<Value> {
        let api_key = self.credentials.require_api_key()?;
        self.transport
            .send(ApiRequest::get(
                task_action_path(task_id, "get_task_confirmation_details"),
                api_key,
            ))
            .await
    }

    /// Asks the service to generate a prompt for `task_id` from `objective`.
    ///
    /// # Errors
    ///
    /// [`HorizonError::MissingCredential`] unless the API key and at least
    /// one provider key are set.
    #[instrument(skip(self, objective))]
    pub async fn generate_task(&self, task_id: TaskId, objective: &str) -> HorizonResult<Value> {
        let api_key = self.credentials.require_api_key()?;
        let provider_keys = self.credentials.require_provider_keys()?;
        let payload = to_json(&GenerateTaskPayload {
            task_id,
            objective,
            provider_keys,
        })?;
        self.transport
            .send(ApiRequest::post_json(
                format!("{TASKS_PATH}/generate"),
                api_key,
                payload,
            ))
            .await
    }

    /// Runs a generated task on `request.inputs`.
    ///
    /// Connection failures are retried per the client's
    /// [`DeployRetryPolicy`] (10 attempts, 10 s apart, by default). Any other
    /// failure is returned as soon as it happens.
    ///
    /// # Errors
    ///
    /// - [`HorizonError::MissingCredential`] / [`HorizonError::InvalidArgument`]
    ///   before anything is sent.
    /// - [`HorizonError::RetriesExhausted`] when every attempt failed with a
    ///   retriable error.
    /// - Any non-retriable error from the transport, unchanged.
    #[instrument(skip(self, request), fields(task_id = %request.task_id))]
    pub async fn deploy_task(&self, request: DeployTaskRequest) -> HorizonResult<Value> {
        let api_key = self.credentials.require_api_key()?;
        let provider_keys = self.credentials.require_provider_keys()?;
        let payload = to_json(&request.to_payload(provider_keys)?)?;
        let path = format!("{TASKS_PATH}/deploy");

        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match self
                .transport
                .send(ApiRequest::post_json(path.as_str(), api_key, payload.clone()))
                .await
            {
                Ok(body) => return Ok(body),
                Err(err) if !self.retry_policy.is_retriable(&err) => return Err(err),
                Err(err) => err,
            };

            match self.retry_policy.next_attempt(attempt, &err) {
                RetryPolicy::Retryable { after } => {
                    warn!(
                        attempt,
                        max_attempts = self.retry_policy.max_attempts(),
                        delay_secs = after.map(|d| d.as_secs_f64()),
                        error = %err,
                        "deployment attempt failed, retrying"
                    );
                    if let Some(delay) = after {
                        tokio::time::sleep(delay).await;
                    }
                }
                RetryPolicy::NonRetryable => {
                    warn!(attempt, error = %err, "deployment retries exhausted");
                    return Err(HorizonError::RetriesExhausted {
                        attempts: attempt,
                        last_error: err.to_string(),
                    });
                }
            }
        }
    }

    /// Uploads the dataset the service evaluates generated prompts against.
    ///
    /// # Errors
    ///
    /// [`HorizonError::InvalidArgument`] if `path` cannot be opened as a
    /// regular file; nothing is sent in that case.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn upload_evaluation_dataset(
        &self,
        task_id: TaskId,
        path: impl AsRef<Path>,
    ) -> HorizonResult<Value> {
        self.upload(task_id, UploadField::EvaluationDataset, path.as_ref())
            .await
    }

    /// Uploads the schema deployed outputs must conform to.
    ///
    /// # Errors
    ///
    /// [`HorizonError::InvalidArgument`] if `path` cannot be opened as a
    /// regular file; nothing is sent in that case.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn upload_output_schema(
        &self,
        task_id: TaskId,
        path: impl AsRef<Path>,
    ) -> HorizonResult<Value> {
        self.upload(task_id, UploadField::OutputSchema, path.as_ref())
            .await
    }

    /// Fetches the logs of deployments run with `log_deployment` set.
    #[instrument(skip(self))]
    pub async fn view_deployment_logs(&self, task_id: TaskId) -> HorizonResult<Value> {
        let api_key = self.credentials.require_api_key()?;
        self.transport
            .send(ApiRequest::get(
                task_action_path(task_id, "view_deployment_logs"),
                api_key,
            ))
            .await
    }

    async fn upload(
        &self,
        task_id: TaskId,
        field: UploadField,
        path: &Path,
    ) -> HorizonResult<Value> {
        let api_key = self.credentials.require_api_key()?;
        let upload = open_upload(field, path).await?;
        info!(field = field.as_str(), bytes = upload.len(), "uploading task file");
        self.transport
            .send(ApiRequest::post_multipart(
                task_action_path(task_id, field.endpoint()),
                api_key,
                upload,
            ))
            .await
    }
}

/// Opens `path` for upload; the handle lives as long as the returned value.
async fn open_upload(field: UploadField, path: &Path) -> HorizonResult<FileUpload> {
    let unreadable = |e: std::io::Error| {
        HorizonError::invalid_argument(format!("cannot open '{}': {e}", path.display()))
    };
    let file = tokio::fs::File::open(path).await.map_err(unreadable)?;
    let metadata = file.metadata().await.map_err(unreadable)?;
    if !metadata.is_file() {
        return Err(HorizonError::invalid_argument(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    Ok(FileUpload::new(
        field,
        path,
        file.into_std().await,
        metadata.len(),
    ))
}
