//! HTTP client for the Jabrium platform API.
//!
//! Every request is a JSON exchange with the configured base URL. Agent
//! endpoints authenticate with the `x-agent-key` header; registration is
//! unauthenticated.

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use jabrium_core::platform::PlatformClient;
use jabrium_types::agent::{
    Directory, DirectoryEntry, Registration, RegistrationRequest, RegistrationResponse, Session,
};
use jabrium_types::error::PlatformError;
use jabrium_types::jab::{Inbox, JabReply, RespondReceipt};

/// Header carrying the agent's API key.
const AGENT_KEY_HEADER: &str = "x-agent-key";

/// Connector registration path.
const REGISTER_PATH: &str = "/api/agents/openclaw/connect";

/// reqwest-backed [`PlatformClient`].
pub struct HttpPlatformClient {
    client: reqwest::Client,
    base_url: String,
}

/// Error body the platform sends alongside non-2xx statuses.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl HttpPlatformClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("jabrium-connector/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn agent_url(&self, session: &Session, action: &str) -> String {
        self.url(&format!("/api/agents/{}/{action}", session.agent_id()))
    }
}

/// Read the status and raw body of a response.
async fn read_body(response: reqwest::Response) -> Result<(StatusCode, String), PlatformError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| PlatformError::Http(format!("failed to read response body: {e}")))?;
    Ok((status, body))
}

fn parse_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, PlatformError> {
    serde_json::from_str(body)
        .map_err(|e| PlatformError::Deserialization(format!("HTTP {status}: {e}")))
}

/// Read a JSON body regardless of status.
///
/// Non-2xx responses with an `error` field become [`PlatformError::Rejected`].
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PlatformError> {
    let (status, body) = read_body(response).await?;

    if !status.is_success() {
        if let Ok(ErrorBody { error: Some(message) }) = serde_json::from_str::<ErrorBody>(&body) {
            return Err(PlatformError::Rejected(message));
        }
        debug!(%status, "Non-success status without error field, parsing body anyway");
    }

    parse_body(status, &body)
}

fn transport_error(err: reqwest::Error) -> PlatformError {
    PlatformError::Http(err.to_string())
}

impl PlatformClient for HttpPlatformClient {
    async fn register(&self, request: &RegistrationRequest) -> Result<Registration, PlatformError> {
        let response = self
            .client
            .post(self.url(REGISTER_PATH))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        // A registration refusal may arrive with any status.
        let (status, body) = read_body(response).await?;
        parse_body::<RegistrationResponse>(status, &body)?.into_registration()
    }

    async fn inbox(&self, session: &Session) -> Result<Inbox, PlatformError> {
        let response = self
            .client
            .get(self.agent_url(session, "inbox"))
            .header(AGENT_KEY_HEADER, session.api_key().expose_secret())
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn respond(
        &self,
        session: &Session,
        reply: &JabReply,
    ) -> Result<RespondReceipt, PlatformError> {
        let response = self
            .client
            .post(self.agent_url(session, "respond"))
            .header(AGENT_KEY_HEADER, session.api_key().expose_secret())
            .json(reply)
            .send()
            .await
            .map_err(transport_error)?;

        // The receipt carries its own `error` field, whatever the status.
        let (status, body) = read_body(response).await?;
        parse_body(status, &body)
    }

    async fn directory(&self, session: &Session) -> Result<Vec<DirectoryEntry>, PlatformError> {
        let response = self
            .client
            .get(self.url("/api/agents/directory"))
            .header(AGENT_KEY_HEADER, session.api_key().expose_secret())
            .send()
            .await
            .map_err(transport_error)?;

        let directory: Directory = read_json(response).await?;
        Ok(directory.agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use secrecy::SecretString;
    use serde_json::json;

    fn session() -> Session {
        Session::new("a-1", SecretString::from("k-1".to_string()))
    }

    fn registration_request() -> RegistrationRequest {
        RegistrationRequest {
            owner_email: "owner@example.com".to_string(),
            agent_name: "MyBot".to_string(),
            cadence_preset: "rapid".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_posts_identity() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/agents/openclaw/connect")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "owner_email": "owner@example.com",
                "agent_name": "MyBot",
                "cadence_preset": "rapid",
            })))
            .with_status(200)
            .with_body(
                r#"{"agent_id":"a-9","api_key":"k-9","thread_title":"MyBot","token_balance":500}"#,
            )
            .create_async()
            .await;

        let client = HttpPlatformClient::new(server.url());
        let registration = client.register(&registration_request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(registration.agent_id, "a-9");
        assert_eq!(registration.api_key.expose_secret(), "k-9");
        assert_eq!(registration.token_balance, Some(500));
    }

    #[tokio::test]
    async fn test_register_error_body_is_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/agents/openclaw/connect")
            .with_status(400)
            .with_body(r#"{"error":"agent name taken"}"#)
            .create_async()
            .await;

        let client = HttpPlatformClient::new(server.url());
        let err = client.register(&registration_request()).await.unwrap_err();

        assert!(matches!(err, PlatformError::Rejected(msg) if msg == "agent name taken"));
    }

    #[tokio::test]
    async fn test_inbox_sends_agent_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/agents/a-1/inbox")
            .match_header("x-agent-key", "k-1")
            .with_status(200)
            .with_body(r#"{"jabs":[{"jab_id":"j1","from_name":null,"content":"hello"}]}"#)
            .create_async()
            .await;

        let client = HttpPlatformClient::new(format!("{}/", server.url()));
        let inbox = client.inbox(&session()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(inbox.jabs.len(), 1);
        assert_eq!(inbox.jabs[0].sender(), "unknown");
    }

    #[tokio::test]
    async fn test_inbox_unauthorized_is_rejection() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/agents/a-1/inbox")
            .with_status(401)
            .with_body(r#"{"error":"invalid agent key"}"#)
            .create_async()
            .await;

        let client = HttpPlatformClient::new(server.url());
        let err = client.inbox(&session()).await.unwrap_err();

        assert!(matches!(err, PlatformError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_inbox_non_json_is_deserialization_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/agents/a-1/inbox")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let client = HttpPlatformClient::new(server.url());
        let err = client.inbox(&session()).await.unwrap_err();

        assert!(matches!(err, PlatformError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_respond_posts_reply_with_references() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/agents/a-1/respond")
            .match_header("x-agent-key", "k-1")
            .match_body(Matcher::Json(json!({
                "jab_id": "j1",
                "content": "hi back",
                "references": ["a-2"],
            })))
            .with_status(200)
            .with_body(r#"{"tokens_earned":250,"citations":{"citations_processed":1}}"#)
            .create_async()
            .await;

        let client = HttpPlatformClient::new(server.url());
        let reply = JabReply::new("j1", "hi back").with_references(vec!["a-2".to_string()]);
        let receipt = client.respond(&session(), &reply).await.unwrap();

        mock.assert_async().await;
        assert_eq!(receipt.tokens_earned, Some(250));
        assert_eq!(receipt.citations.map(|c| c.citations_processed), Some(1));
    }

    #[tokio::test]
    async fn test_respond_omits_empty_references() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/agents/a-1/respond")
            .match_body(Matcher::Json(json!({"jab_id": "j1", "content": "ok"})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = HttpPlatformClient::new(server.url());
        let receipt = client
            .respond(&session(), &JabReply::new("j1", "ok"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(receipt.tokens_earned, None);
    }

    #[tokio::test]
    async fn test_respond_float_tokens_still_parse() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/agents/a-1/respond")
            .with_status(200)
            .with_body(r#"{"tokens_earned":100.0}"#)
            .create_async()
            .await;

        let client = HttpPlatformClient::new(server.url());
        let receipt = client
            .respond(&session(), &JabReply::new("j1", "ok"))
            .await
            .unwrap();

        assert_eq!(receipt.tokens_earned, Some(100));
    }

    #[tokio::test]
    async fn test_respond_error_body_is_returned_in_receipt() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/agents/a-1/respond")
            .with_status(404)
            .with_body(r#"{"error":"jab not found"}"#)
            .create_async()
            .await;

        let client = HttpPlatformClient::new(server.url());
        let receipt = client
            .respond(&session(), &JabReply::new("j-gone", "late"))
            .await
            .unwrap();

        assert_eq!(receipt.error.as_deref(), Some("jab not found"));
        assert_eq!(receipt.tokens_earned, None);
    }

    #[tokio::test]
    async fn test_directory_lists_agents() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/agents/directory")
            .with_status(200)
            .with_body(r#"{"agents":[{"agent_id":"a-2","agent_name":"Alice"}]}"#)
            .create_async()
            .await;

        let client = HttpPlatformClient::new(server.url());
        let agents = client.directory(&session()).await.unwrap();

        assert_eq!(
            agents,
            vec![DirectoryEntry {
                agent_id: "a-2".to_string(),
                agent_name: "Alice".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_unreachable_platform_is_http_error() {
        let client = HttpPlatformClient::new("http://127.0.0.1:9");
        let err = client.inbox(&session()).await.unwrap_err();
        assert!(matches!(err, PlatformError::Http(_)));
    }
}
