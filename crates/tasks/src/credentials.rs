//! Credential context carried by a client instance.
//!
//! [`Credentials`] holds the Horizon API key and the optional LLM provider
//! keys. It is built once by the embedding application and only read
//! afterwards; each client owns its own copy, so two clients in one process
//! can use different keys.
//!
//! Provider keys follow an "any key" rule: generation and deployment need at
//! least one of the OpenAI or Anthropic keys, and both are forwarded (absent
//! ones as JSON `null`) so the service can pick the provider.

use serde::Serialize;

use crate::{HorizonError, HorizonResult, RequiredCredential};

/// Environment variable holding the Horizon API key.
pub const API_KEY_ENV_VAR: &str = "HORIZON_API_KEY";
/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the Anthropic API key.
pub const ANTHROPIC_API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";

/// API key and LLM provider keys used by every call.
///
/// Empty strings are treated as absent. The `Debug` implementation never
/// prints key material.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    api_key: Option<String>,
    openai_api_key: Option<String>,
    anthropic_api_key: Option<String>,
}

/// Provider keys as they appear in generation and deployment payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderKeys<'a> {
    pub openai_api_key: Option<&'a str>,
    pub anthropic_api_key: Option<&'a str>,
}

impl Credentials {
    /// Creates an empty credential context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads all three keys from the process environment.
    ///
    /// See [`API_KEY_ENV_VAR`], [`OPENAI_API_KEY_ENV_VAR`] and
    /// [`ANTHROPIC_API_KEY_ENV_VAR`].
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds credentials from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_key: non_empty(lookup(API_KEY_ENV_VAR)),
            openai_api_key: non_empty(lookup(OPENAI_API_KEY_ENV_VAR)),
            anthropic_api_key: non_empty(lookup(ANTHROPIC_API_KEY_ENV_VAR)),
        }
    }

    /// Sets the Horizon API key. A blank key leaves it unset.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = non_empty(Some(key.into()));
        self
    }

    /// Sets the OpenAI API key. A blank key leaves it unset.
    pub fn with_openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = non_empty(Some(key.into()));
        self
    }

    /// Sets the Anthropic API key. A blank key leaves it unset.
    pub fn with_anthropic_api_key(mut self, key: impl Into<String>) -> Self {
        self.anthropic_api_key = non_empty(Some(key.into()));
        self
    }

    /// Returns the Horizon API key.
    ///
    /// # Errors
    ///
    /// [`HorizonError::MissingCredential`] with [`RequiredCredential::ApiKey`]
    /// when no key is set.
    pub fn require_api_key(&self) -> HorizonResult<&str> {
        self.api_key
            .as_deref()
            .ok_or(HorizonError::MissingCredential {
                credential: RequiredCredential::ApiKey,
            })
    }

    /// Returns both provider keys, provided at least one is set.
    ///
    /// # Errors
    ///
    /// [`HorizonError::MissingCredential`] with
    /// [`RequiredCredential::ProviderKey`] when both are absent.
    pub fn require_provider_keys(&self) -> HorizonResult<ProviderKeys<'_>> {
        let keys = ProviderKeys {
            openai_api_key: self.openai_api_key.as_deref(),
            anthropic_api_key: self.anthropic_api_key.as_deref(),
        };
        if keys.openai_api_key.is_none() && keys.anthropic_api_key.is_none() {
            return Err(HorizonError::MissingCredential {
                credential: RequiredCredential::ProviderKey,
            });
        }
        Ok(keys)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(key: &Option<String>) -> &'static str {
            if key.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("anthropic_api_key", &mask(&self.anthropic_api_key))
            .finish()
    }
}

// Blank keys would only be rejected by the service, so they count as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
