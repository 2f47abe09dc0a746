//! Slack Web API calls used around the RTM session.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::client::{ChatClient, ClientError, SlackChannel, SlackUser};

const PAGE_LIMIT: &str = "200";

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Default, Deserialize)]
struct RtmConnectBody {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UsersPage {
    #[serde(default)]
    members: Vec<UserRecord>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ChannelsPage {
    #[serde(default)]
    channels: Vec<ChannelRecord>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ChannelRecord {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    is_member: bool,
}

#[derive(Debug, Default, Deserialize)]
struct PostBody {}

impl ResponseMetadata {
    fn cursor(metadata: Option<Self>) -> Option<String> {
        metadata.and_then(|metadata| metadata.next_cursor).filter(|cursor| !cursor.is_empty())
    }
}

#[derive(Clone)]
pub struct SlackWebClient {
    http: reqwest::Client,
    api_base: String,
    token: SecretString,
}

impl SlackWebClient {
    pub fn new(
        api_base: &str,
        token: SecretString,
        request_timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent("norrisbot")
            .timeout(request_timeout)
            .build()?;

        Ok(Self { http, api_base: api_base.trim_end_matches('/').to_string(), token })
    }

    /// Starts an RTM session and returns its websocket URL.
    pub async fn rtm_connect(&self) -> Result<String, ClientError> {
        let request = self.http.post(self.url("rtm.connect"));
        let body: RtmConnectBody = self.call("rtm.connect", request).await?;
        body.url.filter(|url| !url.trim().is_empty()).ok_or_else(|| ClientError::Api {
            method: "rtm.connect".to_owned(),
            error: "response did not include a websocket url".to_owned(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }

    async fn call<T>(&self, method: &str, request: reqwest::RequestBuilder) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let envelope = request
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?
            .error_for_status()?
            .json::<ApiEnvelope<T>>()
            .await?;

        if !envelope.ok {
            return Err(ClientError::Api {
                method: method.to_owned(),
                error: envelope.error.unwrap_or_else(|| "unknown_error".to_owned()),
            });
        }
        Ok(envelope.body)
    }
}

#[async_trait]
impl ChatClient for SlackWebClient {
    async fn users(&self) -> Result<Vec<SlackUser>, ClientError> {
        let mut users = Vec::new();
        let mut cursor = String::new();
        loop {
            let request = self
                .http
                .get(self.url("users.list"))
                .query(&[("limit", PAGE_LIMIT), ("cursor", cursor.as_str())]);
            let page: UsersPage = self.call("users.list", request).await?;
            users.extend(
                page.members.into_iter().map(|user| SlackUser { id: user.id, name: user.name }),
            );

            match ResponseMetadata::cursor(page.response_metadata) {
                Some(next) => cursor = next,
                None => return Ok(users),
            }
        }
    }

    async fn channels(&self) -> Result<Vec<SlackChannel>, ClientError> {
        let mut channels = Vec::new();
        let mut cursor = String::new();
        loop {
            let request = self.http.get(self.url("conversations.list")).query(&[
                ("types", "public_channel"),
                ("exclude_archived", "true"),
                ("limit", PAGE_LIMIT),
                ("cursor", cursor.as_str()),
            ]);
            let page: ChannelsPage = self.call("conversations.list", request).await?;
            channels.extend(
                page.channels
                    .into_iter()
                    .filter(|channel| channel.is_member)
                    .map(|channel| SlackChannel { id: channel.id, name: channel.name }),
            );

            match ResponseMetadata::cursor(page.response_metadata) {
                Some(next) => cursor = next,
                None => return Ok(channels),
            }
        }
    }

    async fn post_message_to_channel(
        &self,
        channel: &SlackChannel,
        text: &str,
    ) -> Result<(), ClientError> {
        let payload = json!({
            "channel": channel.id,
            "text": text,
            "as_user": true,
        });
        let request = self.http.post(self.url("chat.postMessage")).json(&payload);
        let _: PostBody = self.call("chat.postMessage", request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::SlackWebClient;
    use crate::client::{ChatClient, ClientError, SlackChannel, SlackUser};

    fn client(server: &MockServer) -> SlackWebClient {
        SlackWebClient::new(
            &server.base_url(),
            "xoxb-test".to_owned().into(),
            Duration::from_secs(5),
        )
        .expect("client")
    }

    #[tokio::test]
    async fn rtm_connect_returns_websocket_url() {
        let server = MockServer::start();
        let connect = server.mock(|when, then| {
            when.method(POST).path("/rtm.connect").header("authorization", "Bearer xoxb-test");
            then.status(200).json_body(json!({
                "ok": true,
                "url": "wss://example.invalid/rtm",
                "self": {"id": "UBOT", "name": "norrisbot"}
            }));
        });

        let url = client(&server).rtm_connect().await.expect("rtm.connect");
        assert_eq!(url, "wss://example.invalid/rtm");
        connect.assert();
    }

    #[tokio::test]
    async fn rtm_connect_surfaces_auth_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/rtm.connect");
            then.status(200).json_body(json!({"ok": false, "error": "invalid_auth"}));
        });

        let error = client(&server).rtm_connect().await.expect_err("should fail");
        let ClientError::Api { method, error } = error else {
            panic!("expected an api error");
        };
        assert_eq!(method, "rtm.connect");
        assert_eq!(error, "invalid_auth");
    }

    #[tokio::test]
    async fn users_follow_pagination_cursor() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET).path("/users.list").query_param("cursor", "");
            then.status(200).json_body(json!({
                "ok": true,
                "members": [{"id": "U1", "name": "alice"}],
                "response_metadata": {"next_cursor": "page-2"}
            }));
        });
        let second = server.mock(|when, then| {
            when.method(GET).path("/users.list").query_param("cursor", "page-2");
            then.status(200).json_body(json!({
                "ok": true,
                "members": [{"id": "UBOT", "name": "norrisbot"}],
                "response_metadata": {"next_cursor": ""}
            }));
        });

        let users = client(&server).users().await.expect("users");
        assert_eq!(
            users,
            vec![
                SlackUser { id: "U1".to_owned(), name: "alice".to_owned() },
                SlackUser { id: "UBOT".to_owned(), name: "norrisbot".to_owned() },
            ]
        );
        first.assert();
        second.assert();
    }

    #[tokio::test]
    async fn channels_keep_only_memberships_in_order() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.list")
                .query_param("types", "public_channel")
                .query_param("exclude_archived", "true");
            then.status(200).json_body(json!({
                "ok": true,
                "channels": [
                    {"id": "C1", "name": "random", "is_member": false},
                    {"id": "C2", "name": "general", "is_member": true},
                    {"id": "C3", "name": "jokes", "is_member": true}
                ]
            }));
        });

        let channels = client(&server).channels().await.expect("channels");
        assert_eq!(
            channels,
            vec![
                SlackChannel { id: "C2".to_owned(), name: "general".to_owned() },
                SlackChannel { id: "C3".to_owned(), name: "jokes".to_owned() },
            ]
        );
    }

    #[tokio::test]
    async fn post_message_sends_as_bot_user() {
        let server = MockServer::start();
        let post = server.mock(|when, then| {
            when.method(POST)
                .path("/chat.postMessage")
                .body_includes("\"channel\":\"C123\"")
                .body_includes("\"as_user\":true")
                .body_includes("Chuck Norris can divide by zero.");
            then.status(200).json_body(json!({"ok": true, "channel": "C123", "ts": "1.0"}));
        });

        let channel = SlackChannel { id: "C123".to_owned(), name: "general".to_owned() };
        client(&server)
            .post_message_to_channel(&channel, "Chuck Norris can divide by zero.")
            .await
            .expect("post");
        post.assert();
    }

    #[tokio::test]
    async fn http_failure_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat.postMessage");
            then.status(500).body("boom");
        });

        let channel = SlackChannel { id: "C1".to_owned(), name: "general".to_owned() };
        let error = client(&server)
            .post_message_to_channel(&channel, "hello")
            .await
            .expect_err("should fail");
        assert!(matches!(error, ClientError::Http(_)));
    }
}
