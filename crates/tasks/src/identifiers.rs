//! Newtype identifiers.
//!
//! Every value the Horizon service uses to name something is a distinct
//! newtype. This prevents passing a [`ProjectId`] where a [`TaskId`] is
//! expected even though both are `u64` on the wire.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new value, returning `None` if it is empty or whitespace.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.trim().is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (server-assigned integers).
// Generates: struct (Copy), new(), as_u64(), From<u64>, Display.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: server-assigned integers
// ---------------------------------------------------------------------------

u64_id! {
    /// Identifies a task on the Horizon service.
    ///
    /// Opaque to the client: it is only ever echoed back in paths and payloads.
    TaskId
}

u64_id! {
    /// Identifies the project a task is created under.
    ProjectId
}

// ---------------------------------------------------------------------------
// String-backed values
// ---------------------------------------------------------------------------

string_id! {
    /// Name of an LLM the service may use when generating or deploying a task
    /// (e.g. `"gpt-3.5-turbo"`, `"claude-instant-1"`).
    ModelName
}

string_id! {
    /// Kind of task the service should create.
    ///
    /// Defaults to [`TaskType::TEXT_GENERATION`].
    TaskType
}

impl TaskType {
    /// The task type used when the caller does not choose one.
    pub const TEXT_GENERATION: &'static str = "text_generation";
}

impl Default for TaskType {
    fn default() -> Self {
        Self(Self::TEXT_GENERATION.to_string())
    }
}
