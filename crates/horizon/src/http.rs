//! `reqwest`-backed implementation of [`tasks::Transport`].

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tasks::{ApiRequest, HorizonError, HorizonResult, Method, RequestBody, Transport};
use tracing::debug;

use crate::config::ClientConfig;

/// Header carrying the Horizon API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Sends requests to the Horizon service over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: ClientConfig,
    client: Client,
}

impl HttpTransport {
    /// Builds the underlying HTTP client from `config`.
    ///
    /// Every request carries `Accept: application/json` and the configured
    /// User-Agent.
    ///
    /// # Errors
    ///
    /// [`HorizonError::Transport`] if the TLS backend cannot be initialised
    /// or the User-Agent is not a valid header value.
    pub fn new(config: &ClientConfig) -> HorizonResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let user_agent = HeaderValue::from_str(config.user_agent()).map_err(|e| {
            HorizonError::Transport {
                message: format!("invalid User-Agent: {e}"),
            }
        })?;
        headers.insert(USER_AGENT, user_agent);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| HorizonError::Transport {
            message: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    /// The base URL every request path is joined onto.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> HorizonResult<Value> {
        let url = self.config.endpoint(&request.path);
        debug!(method = %request.method, path = %request.path, "dispatching Horizon request");

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self
            .client
            .request(method, &url)
            .header(API_KEY_HEADER, &request.api_key);

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(upload) => {
                let (field, file_name, file, length) = upload.into_parts();
                let body = reqwest::Body::from(tokio::fs::File::from_std(file));
                let part = Part::stream_with_length(body, length).file_name(file_name);
                builder.multipart(Form::new().part(field.as_str(), part))
            }
        };

        let response = builder.send().await.map_err(classify_reqwest)?;
        let status = response.status();
        let body = response.text().await.map_err(classify_reqwest)?;
        debug!(status = status.as_u16(), "Horizon response received");

        if !status.is_success() {
            return Err(HorizonError::RemoteApi {
                status: status.as_u16(),
                body,
            });
        }
        parse_body(&body)
    }
}

/// Parses a success body; an empty body becomes [`Value::Null`].
fn parse_body(body: &str) -> HorizonResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| HorizonError::Decode {
        message: e.to_string(),
    })
}

/// Classify a [`reqwest::Error`] into the matching [`HorizonError`] variant.
///
/// A connect timeout is flagged as both a connect and a timeout error and
/// counts as [`HorizonError::Connection`]: the request never left the client.
/// A connection that is reset or closed before any response arrives is also
/// a [`HorizonError::Connection`], even though the request may already have
/// reached the service.
fn classify_reqwest(err: reqwest::Error) -> HorizonError {
    if err.is_connect() {
        HorizonError::Connection {
            message: err.to_string(),
        }
    } else if err.is_timeout() {
        HorizonError::Transport {
            message: format!("request timed out: {err}"),
        }
    } else if err.is_request() {
        HorizonError::Connection {
            message: format!("connection lost before a response: {err}"),
        }
    } else if err.is_decode() {
        HorizonError::Decode {
            message: err.to_string(),
        }
    } else {
        HorizonError::Transport {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_empty_is_null() {
        assert_eq!(parse_body("").unwrap(), Value::Null);
        assert_eq!(parse_body("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_body_json() {
        let value = parse_body(r#"{"tasks": []}"#).unwrap();
        assert_eq!(value, serde_json::json!({"tasks": []}));
    }

    #[test]
    fn test_parse_body_malformed_is_decode_error() {
        let err = parse_body("<html>oops</html>").unwrap_err();
        assert!(matches!(err, HorizonError::Decode { .. }));
    }

    #[test]
    fn test_new_keeps_base_url() {
        let config = ClientConfig::new()
            .try_with_base_url("http://localhost:8000")
            .unwrap();
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_new_rejects_invalid_user_agent() {
        let config = ClientConfig::new().with_user_agent("bad\nagent");
        let err = HttpTransport::new(&config).unwrap_err();
        assert!(matches!(err, HorizonError::Transport { .. }));
    }
}
