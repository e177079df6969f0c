// SPDX-License-Identifier: MPL-2.0
//! HTTP adapter for the remote processing port.
//!
//! Each request is a multipart `POST {base_url}/{endpoint}` with the PNG in
//! an `image` part followed by the request's text fields. Error responses
//! are expected to carry a JSON body of the form `{"error": "..."}`.

use crate::application::port::{RemoteError, RemoteProcessor, RemoteRequest};
use crate::config::Config;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

const USER_AGENT: &str = concat!("ClarifiStudio/", env!("CARGO_PKG_VERSION"));

/// Longest slice of a non-JSON error body quoted in messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`RemoteProcessor`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpProcessor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProcessor {
    /// Builds a processor for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::InvalidRequest`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::InvalidRequest(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds a processor from the `[remote]` config section.
    ///
    /// # Errors
    ///
    /// See [`HttpProcessor::new`].
    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        Self::new(config.remote_base_url(), config.remote_timeout())
    }

    /// Full URL for `request`.
    #[must_use]
    pub fn url_for(&self, request: &RemoteRequest) -> String {
        format!("{}/{}", self.base_url, request.endpoint())
    }

    fn form(request: &RemoteRequest, png: Vec<u8>) -> Result<Form, RemoteError> {
        let part = Part::bytes(png)
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| RemoteError::InvalidRequest(e.to_string()))?;
        let form = request
            .fields()
            .iter()
            .fold(Form::new().part("image", part), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            });
        Ok(form)
    }

    async fn send(
        &self,
        request: &RemoteRequest,
        png: Vec<u8>,
    ) -> Result<reqwest::Response, RemoteError> {
        let url = self.url_for(request);
        tracing::debug!(%url, "posting to remote processor");
        let response = self
            .client
            .post(&url)
            .multipart(Self::form(request, png)?)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(%url, status = status.as_u16(), error = %err, "failed to read error body");
                String::new()
            }
        };
        Err(error_from_body(status.as_u16(), &body))
    }
}

/// Maps an unsuccessful response to a [`RemoteError`].
fn error_from_body(status: u16, body: &str) -> RemoteError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no details".to_string()
            } else {
                trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
            }
        });
    RemoteError::Status { status, message }
}

impl RemoteProcessor for HttpProcessor {
    fn process(
        &self,
        request: &RemoteRequest,
        png: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, RemoteError>> + Send {
        async move {
            let response = self.send(request, png).await?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| RemoteError::Transport(e.to_string()))?;
            Ok(bytes.to_vec())
        }
    }

    fn query(
        &self,
        request: &RemoteRequest,
        png: Vec<u8>,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send {
        async move {
            let response = self.send(request, png).await?;
            response
                .text()
                .await
                .map_err(|e| RemoteError::Transport(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_endpoint() {
        let processor =
            HttpProcessor::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            processor.url_for(&RemoteRequest::remove_background()),
            "http://localhost:8000/premium/remove-background"
        );
    }

    #[test]
    fn json_error_body_is_unwrapped() {
        let err = error_from_body(400, r#"{"error": "Image too large"}"#);
        assert_eq!(
            err,
            RemoteError::Status {
                status: 400,
                message: "Image too large".into()
            }
        );
    }

    #[test]
    fn plain_error_body_is_truncated() {
        let body = "x".repeat(1000);
        match error_from_body(502, &body) {
            RemoteError::Status { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message.len(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            error_from_body(500, "  "),
            RemoteError::Status {
                status: 500,
                message: "no details".into()
            }
        );
    }

    #[test]
    fn from_config_uses_remote_section() {
        let mut config = Config::default();
        config.remote.base_url = Some("http://example.test".into());
        let processor = HttpProcessor::from_config(&config).unwrap();
        assert_eq!(
            processor.url_for(&RemoteRequest::new("meme/apply-meme")),
            "http://example.test/meme/apply-meme"
        );
    }

    #[tokio::test]
    async fn truncated_error_body_keeps_the_status() {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_millis(200)))
                .unwrap();
            let mut buf = [0u8; 4096];
            while matches!(stream.read(&mut buf), Ok(n) if n > 0) {}
            // Promises 100 bytes, sends 7, then hangs up.
            stream
                .write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\n\
                      Content-Length: 100\r\nConnection: close\r\n\r\npartial",
                )
                .unwrap();
        });

        let processor =
            HttpProcessor::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
        let result = processor
            .process(&RemoteRequest::colorize(), vec![1, 2, 3])
            .await;
        server.join().unwrap();

        assert_eq!(
            result,
            Err(RemoteError::Status {
                status: 500,
                message: "no details".into()
            })
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        // Port 9 (discard) on localhost is not expected to run an HTTP server.
        let processor = HttpProcessor::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = processor
            .process(&RemoteRequest::colorize(), vec![1, 2, 3])
            .await;
        assert!(matches!(result, Err(RemoteError::Transport(_))));
    }
}
