//! Caller-facing requests and the JSON payloads they are validated into.
//!
//! Requests accept loosely-typed input (plain strings, arbitrary JSON); the
//! `*Payload` types only exist once that input has passed validation, so a
//! payload in hand is always safe to send.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{HorizonError, HorizonResult, ModelName, ProjectId, ProviderKeys, TaskId, TaskType};

// ---------------------------------------------------------------------------
// Allowed models
// ---------------------------------------------------------------------------

/// Ordered, non-empty list of models a task may run on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowedModels(Vec<ModelName>);

impl AllowedModels {
    /// Validates a list of model names, keeping their order.
    ///
    /// # Errors
    ///
    /// [`HorizonError::InvalidArgument`] if the list is empty or any name is blank.
    pub fn new<I, S>(models: I) -> HorizonResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let models = models
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                ModelName::new(name).ok_or_else(|| {
                    HorizonError::invalid_argument(format!(
                        "allowed model at position {index} is blank"
                    ))
                })
            })
            .collect::<HorizonResult<Vec<_>>>()?;

        if models.is_empty() {
            return Err(HorizonError::invalid_argument(
                "must provide list with at least one allowed model",
            ));
        }
        Ok(Self(models))
    }

    pub fn as_slice(&self) -> &[ModelName] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// create_task
// ---------------------------------------------------------------------------

/// Request to create a task under a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub name: String,
    pub project_id: ProjectId,
    pub allowed_models: Vec<String>,
    pub task_type: TaskType,
}

impl CreateTaskRequest {
    /// Creates a `text_generation` task request.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        project_id: impl Into<ProjectId>,
        allowed_models: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            project_id: project_id.into(),
            allowed_models: allowed_models.into_iter().map(Into::into).collect(),
            task_type: TaskType::default(),
        }
    }

    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Validates the request into its wire payload.
    ///
    /// # Errors
    ///
    /// [`HorizonError::InvalidArgument`] for an empty or blank model list.
    pub fn into_payload(self) -> HorizonResult<CreateTaskPayload> {
        Ok(CreateTaskPayload {
            allowed_models: AllowedModels::new(self.allowed_models)?,
            name: self.name,
            task_type: self.task_type,
            project_id: self.project_id,
        })
    }
}

/// Body of `POST /api/tasks/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTaskPayload {
    pub name: String,
    pub task_type: TaskType,
    pub project_id: ProjectId,
    pub allowed_models: AllowedModels,
}

// ---------------------------------------------------------------------------
// generate_task
// ---------------------------------------------------------------------------

/// Body of `POST /api/tasks/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateTaskPayload<'a> {
    pub task_id: TaskId,
    pub objective: &'a str,
    #[serde(flatten)]
    pub provider_keys: ProviderKeys<'a>,
}

// ---------------------------------------------------------------------------
// deploy_task
// ---------------------------------------------------------------------------

/// Request to run a generated task on concrete inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployTaskRequest {
    pub task_id: TaskId,
    /// Input variables keyed by name; must be a JSON object.
    pub inputs: Value,
    /// Ask the service to record this deployment in the task's logs.
    pub log_deployment: bool,
}

impl DeployTaskRequest {
    pub fn new(task_id: impl Into<TaskId>, inputs: Value) -> Self {
        Self {
            task_id: task_id.into(),
            inputs,
            log_deployment: false,
        }
    }

    /// Asks the service to record this deployment in the task's logs.
    pub fn with_log_deployment(mut self, log_deployment: bool) -> Self {
        self.log_deployment = log_deployment;
        self
    }

    /// Validates the request into its wire payload.
    ///
    /// # Errors
    ///
    /// [`HorizonError::InvalidArgument`] if `inputs` is not a JSON object.
    /// Inputs fill named template variables, so arrays, scalars and `null`
    /// are refused here rather than sent.
    pub fn to_payload<'a>(
        &'a self,
        provider_keys: ProviderKeys<'a>,
    ) -> HorizonResult<DeployTaskPayload<'a>> {
        let inputs = self.inputs.as_object().ok_or_else(|| {
            HorizonError::invalid_argument("deployment inputs must be a JSON object")
        })?;
        Ok(DeployTaskPayload {
            task_id: self.task_id,
            inputs,
            provider_keys,
            log_deployment: self.log_deployment,
        })
    }
}

/// Body of `POST /api/tasks/deploy`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeployTaskPayload<'a> {
    pub task_id: TaskId,
    pub inputs: &'a Map<String, Value>,
    #[serde(flatten)]
    pub provider_keys: ProviderKeys<'a>,
    pub log_deployment: bool,
}
