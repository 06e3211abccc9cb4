//! The HTTP collaborator the widget talks to.
//!
//! The backend exposes two endpoints: `GET /` answers any 2xx while the
//! server is alive, and `POST /chat` turns `{"message": ...}` into
//! `{"reply": ...}`. [`HttpBackend`] is the real client; tests substitute
//! their own [`Backend`] implementations.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::api::{summarize_error_body, ChatReply, ChatRequest};
use crate::utils::url::construct_api_url;

/// Why a backend request did not produce a usable answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The server answered with a status outside 2xx.
    Status {
        status: u16,
        /// One-line summary of the error body, if there was one.
        summary: Option<String>,
    },

    /// The request never completed (connection refused, reset, DNS, ...).
    Transport(String),

    /// A 2xx response whose body was not the expected JSON.
    Decode(String),
}

impl BackendError {
    pub fn is_status(&self) -> bool {
        matches!(self, BackendError::Status { .. })
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Status {
                status,
                summary: Some(summary),
            } => write!(f, "server responded with status {status}: {summary}"),
            BackendError::Status {
                status,
                summary: None,
            } => write!(f, "server responded with status {status}"),
            BackendError::Transport(detail) => write!(f, "request failed: {detail}"),
            BackendError::Decode(detail) => write!(f, "unexpected response body: {detail}"),
        }
    }
}

impl StdError for BackendError {}

/// Health and chat endpoints of the assistant server.
///
/// Futures are not `Send`: the widget runs on a single UI thread.
#[async_trait(?Send)]
pub trait Backend {
    /// Liveness probe. `Ok` for any 2xx answer.
    async fn health(&self) -> Result<(), BackendError>;

    /// Send one message and return the assistant's reply text.
    async fn chat(&self, message: &str) -> Result<String, BackendError>;
}

/// [`Backend`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    origin: String,
}

impl HttpBackend {
    /// `origin` should already be resolved with
    /// [`resolve_origin`](crate::utils::url::resolve_origin).
    pub fn new(origin: impl Into<String>) -> Self {
        Self::with_client(Client::new(), origin)
    }

    pub fn with_client(client: Client, origin: impl Into<String>) -> Self {
        Self {
            client,
            origin: origin.into(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    async fn status_error(response: reqwest::Response) -> BackendError {
        let status = response.status().as_u16();
        let summary = response
            .text()
            .await
            .ok()
            .and_then(|body| summarize_error_body(&body));
        BackendError::Status { status, summary }
    }
}

fn transport_error(err: reqwest::Error) -> BackendError {
    BackendError::Transport(err.to_string())
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn health(&self) -> Result<(), BackendError> {
        let url = construct_api_url(&self.origin, "");
        debug!(%url, "probing backend health");

        let response = self.client.get(url).send().await.map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(())
    }

    async fn chat(&self, message: &str) -> Result<String, BackendError> {
        let url = construct_api_url(&self.origin, "chat");
        debug!(%url, chars = message.chars().count(), "sending chat message");

        let response = self
            .client
            .post(url)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body = response.text().await.map_err(transport_error)?;
        let reply: ChatReply =
            serde_json::from_str(&body).map_err(|err| BackendError::Decode(err.to_string()))?;
        Ok(reply.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::APOLOGY;
    use crate::core::exchanger::{ExchangeOutcome, ExchangeSettings, MessageExchanger};
    use crate::core::message::Message;
    use crate::utils::test_utils::test_renderer;
    use std::rc::Rc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    struct CapturedRequest {
        request_line: String,
        body: Vec<u8>,
    }

    async fn read_http_request(
        stream: &mut tokio::net::TcpStream,
    ) -> Result<CapturedRequest, String> {
        let mut buffer = Vec::new();
        let mut header_end = None;
        while header_end.is_none() {
            let mut chunk = [0_u8; 1024];
            let read = stream
                .read(&mut chunk)
                .await
                .map_err(|err| err.to_string())?;
            if read == 0 {
                return Err("Unexpected EOF while reading HTTP headers".to_string());
            }
            buffer.extend_from_slice(&chunk[..read]);
            header_end = buffer
                .windows(4)
                .position(|window| window == b"\r\n\r\n")
                .map(|index| index + 4);
        }

        let header_end = header_end.expect("header end should exist");
        let header_text =
            std::str::from_utf8(&buffer[..header_end]).map_err(|err| err.to_string())?;
        let mut lines = header_text.split("\r\n").filter(|line| !line.is_empty());
        let request_line = lines
            .next()
            .ok_or_else(|| "Missing HTTP request line".to_string())?
            .to_string();

        let mut content_length = 0_usize;
        for line in lines {
            let mut parts = line.splitn(2, ':');
            let Some(name) = parts.next() else {
                continue;
            };
            if name.eq_ignore_ascii_case("content-length") {
                content_length = parts
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .parse::<usize>()
                    .map_err(|err| err.to_string())?;
            }
        }

        let mut body = buffer[header_end..].to_vec();
        while body.len() < content_length {
            let mut chunk = [0_u8; 1024];
            let read = stream
                .read(&mut chunk)
                .await
                .map_err(|err| err.to_string())?;
            if read == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..read]);
        }

        Ok(CapturedRequest { request_line, body })
    }

    /// Serve exactly one canned response and hand back what was received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<Result<CapturedRequest, String>>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
            let captured = read_http_request(&mut stream).await?;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .map_err(|err| err.to_string())?;
            Ok(captured)
        });

        (format!("http://{addr}"), server)
    }

    #[tokio::test]
    async fn health_accepts_any_success_status() {
        let (origin, server) = serve_once("200 OK", "Server is running!").await;
        let backend = HttpBackend::new(origin);

        backend.health().await.expect("health should pass");

        let captured = server.await.expect("join").expect("request");
        assert_eq!(captured.request_line, "GET / HTTP/1.1");
    }

    #[tokio::test]
    async fn health_reports_status_failures() {
        let (origin, server) = serve_once("503 Service Unavailable", "").await;
        let backend = HttpBackend::new(origin);

        let err = backend.health().await.expect_err("health should fail");
        assert_eq!(
            err,
            BackendError::Status {
                status: 503,
                summary: None
            }
        );
        server.await.expect("join").expect("request");
    }

    #[tokio::test]
    async fn chat_posts_message_and_returns_reply() {
        let (origin, server) = serve_once("200 OK", r#"{"reply":"Hi *there*"}"#).await;
        let backend = HttpBackend::new(origin);

        let reply = backend.chat("Hello").await.expect("chat should succeed");
        assert_eq!(reply, "Hi *there*");

        let captured = server.await.expect("join").expect("request");
        assert_eq!(captured.request_line, "POST /chat HTTP/1.1");
        let body: serde_json::Value =
            serde_json::from_slice(&captured.body).expect("request body is JSON");
        assert_eq!(body, serde_json::json!({"message": "Hello"}));
    }

    #[tokio::test]
    async fn chat_surfaces_error_summary_from_status_failures() {
        let (origin, server) =
            serve_once("400 Bad Request", r#"{"error":"No message provided"}"#).await;
        let backend = HttpBackend::new(origin);

        let err = backend.chat("Hello").await.expect_err("chat should fail");
        assert_eq!(
            err,
            BackendError::Status {
                status: 400,
                summary: Some("No message provided".to_string())
            }
        );
        assert!(err.is_status());
        server.await.expect("join").expect("request");
    }

    #[tokio::test]
    async fn chat_ignores_reply_field_on_status_failures() {
        let (origin, server) = serve_once(
            "500 Internal Server Error",
            r#"{"reply":"should be ignored"}"#,
        )
        .await;
        let backend = HttpBackend::new(origin);

        let err = backend.chat("Hello").await.expect_err("status should fail");
        assert!(matches!(err, BackendError::Status { status: 500, .. }));
        server.await.expect("join").expect("request");
    }

    #[tokio::test]
    async fn status_failure_with_reply_body_still_shows_the_apology() {
        let (origin, server) = serve_once(
            "500 Internal Server Error",
            r#"{"reply":"should be ignored"}"#,
        )
        .await;
        let backend: Rc<dyn Backend> = Rc::new(HttpBackend::new(origin));
        let (view, renderer) = test_renderer();
        let exchanger = MessageExchanger::new(backend, renderer, ExchangeSettings::default());

        view.set_input_value("Hello");
        let outcome = exchanger.send_message().await;

        assert!(matches!(
            outcome,
            Some(ExchangeOutcome::Failed(BackendError::Status { status: 500, .. }))
        ));
        assert_eq!(
            view.messages(),
            vec![Message::user("Hello"), Message::bot_error(APOLOGY)]
        );
        server.await.expect("join").expect("request");
    }

    #[tokio::test]
    async fn chat_rejects_success_without_reply_field() {
        let (origin, server) = serve_once("200 OK", r#"{"answer":"wrong field"}"#).await;
        let backend = HttpBackend::new(origin);

        let err = backend.chat("Hello").await.expect_err("decode should fail");
        assert!(matches!(err, BackendError::Decode(_)));
        server.await.expect("join").expect("request");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");
        drop(listener);

        let backend = HttpBackend::new(format!("http://{addr}"));
        let err = backend.health().await.expect_err("nothing is listening");
        assert!(matches!(err, BackendError::Transport(_)));
        assert!(!err.is_status());
    }

    #[test]
    fn display_includes_status_and_summary() {
        let err = BackendError::Status {
            status: 500,
            summary: Some("Failed to get response from AI".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "server responded with status 500: Failed to get response from AI"
        );
    }
}
