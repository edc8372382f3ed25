//! API Client
//!
//! Typed wrapper over the Confab HTTP surface. Thin by design: each method
//! issues one request and reshapes the response; all state lives in
//! [`ClientState`](crate::client::ClientState), which the caller updates
//! from these results.

use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::client::config::ClientConfig;
use crate::shared::profile::{
    AuthResponse, AvatarUploadResponse, LoginRequest, ProfileUpdateResponse, RegisterRequest,
    SearchUsersResponse, UpdateEmailRequest, UpdatePasswordRequest, UpdateUsernameRequest,
};
use crate::shared::{
    CancelFriendRequestRequest, CancelFriendRequestResponse, DirectMessage, FriendListResponse,
    IncomingFriendRequest, ListIncomingResponse, ListOutgoingResponse, MessageHistoryResponse,
    OutgoingFriendRequest, Profile, RespondFriendRequestRequest, RespondFriendRequestResponse,
    SendFriendRequestRequest, SendFriendRequestResponse, SendMessageRequest, SendMessageResponse,
};

/// Errors surfaced by the API client
#[derive(Debug, Error)]
pub enum ClientError {
    /// No session token is stored
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The request never completed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("Request failed ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server-provided error message
        message: String,
    },
}

/// HTTP client for the Confab server
pub struct ApiClient {
    config: ClientConfig,
    client: Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn token(&self) -> Result<&str, ClientError> {
        self.config.token().ok_or(ClientError::NotAuthenticated)
    }

    /// Deserialize a response, turning error statuses into [`ClientError::Api`]
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<serde_json::Value>().await {
                Ok(body) => body
                    .get("error")
                    .and_then(|e| e.as_str())
                    .unwrap_or("request failed")
                    .to_string(),
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn get_authed<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let token = self.token()?.to_string();
        let response = self
            .client
            .get(self.config.api_url(path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_authed<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let token = self.token()?.to_string();
        let response = self
            .client
            .post(self.config.api_url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn patch_authed<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let token = self.token()?.to_string();
        let response = self
            .client
            .patch(self.config.api_url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    // ---- Identity ----

    /// Register a new account; the returned session token is stored
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let response = self
            .client
            .post(self.config.api_url("/api/auth/register"))
            .json(request)
            .send()
            .await?;
        let auth: AuthResponse = Self::decode(response).await?;
        self.config.set_token(auth.token.clone());
        Ok(auth)
    }

    /// Log in; the returned session token is stored
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.config.api_url("/api/auth/login"))
            .json(&request)
            .send()
            .await?;
        let auth: AuthResponse = Self::decode(response).await?;
        self.config.set_token(auth.token.clone());
        Ok(auth)
    }

    /// Discard the session. JWTs are stateless, so sign-out is local.
    pub fn logout(&mut self) {
        self.config.clear_token();
    }

    /// Fetch the authenticated user's profile
    pub async fn me(&self) -> Result<Profile, ClientError> {
        self.get_authed("/api/auth/me").await
    }

    // ---- Profile ----

    pub async fn update_username(
        &self,
        username: &str,
    ) -> Result<ProfileUpdateResponse, ClientError> {
        let request = UpdateUsernameRequest {
            username: username.to_string(),
        };
        self.patch_authed("/api/profile/username", &request).await
    }

    pub async fn update_email(&self, email: &str) -> Result<ProfileUpdateResponse, ClientError> {
        let request = UpdateEmailRequest {
            email: email.to_string(),
        };
        self.patch_authed("/api/profile/email", &request).await
    }

    pub async fn update_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<ProfileUpdateResponse, ClientError> {
        let request = UpdatePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
            confirm_password: confirm_password.to_string(),
        };
        self.patch_authed("/api/profile/password", &request).await
    }

    /// Upload an avatar image; returns the signed retrieval URL
    pub async fn upload_avatar(
        &self,
        extension: &str,
        bytes: Vec<u8>,
    ) -> Result<AvatarUploadResponse, ClientError> {
        let token = self.token()?.to_string();
        let url = format!(
            "{}?ext={}",
            self.config.api_url("/api/profile/avatar"),
            extension
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .body(bytes)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Search users with no existing relation to the caller
    pub async fn search_users(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Profile>, ClientError> {
        let path = format!("/api/users/search?q={}&limit={}", query, limit);
        let response: SearchUsersResponse = self.get_authed(&path).await?;
        Ok(response.users)
    }

    // ---- Friend lifecycle ----

    pub async fn send_friend_request(
        &self,
        to_user_id: Uuid,
    ) -> Result<SendFriendRequestResponse, ClientError> {
        let request = SendFriendRequestRequest { to_user_id };
        self.post_authed("/api/friends/request", &request).await
    }

    pub async fn cancel_friend_request(
        &self,
        request_id: Uuid,
    ) -> Result<CancelFriendRequestResponse, ClientError> {
        let request = CancelFriendRequestRequest { request_id };
        self.post_authed("/api/friends/cancel", &request).await
    }

    pub async fn accept_friend_request(
        &self,
        from_user: Uuid,
        request_id: Uuid,
    ) -> Result<RespondFriendRequestResponse, ClientError> {
        let request = RespondFriendRequestRequest {
            from_user,
            request_id,
            accept: true,
        };
        self.post_authed("/api/friends/respond", &request).await
    }

    pub async fn decline_friend_request(
        &self,
        from_user: Uuid,
        request_id: Uuid,
    ) -> Result<RespondFriendRequestResponse, ClientError> {
        let request = RespondFriendRequestRequest {
            from_user,
            request_id,
            accept: false,
        };
        self.post_authed("/api/friends/respond", &request).await
    }

    pub async fn incoming_requests(&self) -> Result<Vec<IncomingFriendRequest>, ClientError> {
        let response: ListIncomingResponse = self.get_authed("/api/friends/requests").await?;
        Ok(response.requests)
    }

    pub async fn outgoing_requests(&self) -> Result<Vec<OutgoingFriendRequest>, ClientError> {
        let response: ListOutgoingResponse = self.get_authed("/api/friends/sent").await?;
        Ok(response.requests)
    }

    pub async fn friends(&self) -> Result<Vec<Profile>, ClientError> {
        let response: FriendListResponse = self.get_authed("/api/friends").await?;
        Ok(response.friends)
    }

    // ---- Messaging ----

    /// Perform the durable write for a staged send
    pub async fn send_message(
        &self,
        receiver_id: Uuid,
        content: &str,
    ) -> Result<SendMessageResponse, ClientError> {
        let request = SendMessageRequest {
            receiver_id,
            content: content.to_string(),
        };
        self.post_authed("/api/messages", &request).await
    }

    /// Fetch the full conversation history with a peer, ascending by time
    pub async fn message_history(&self, peer_id: Uuid) -> Result<Vec<DirectMessage>, ClientError> {
        let path = format!("/api/messages/{}", peer_id);
        let response: MessageHistoryResponse = self.get_authed(&path).await?;
        Ok(response.messages)
    }

    /// Subscribe to the conversation with a peer
    ///
    /// Opens the SSE stream and yields each delivered message. The stream
    /// ends when the server closes the connection; reconnecting is the
    /// caller's decision (there is no automatic backoff).
    pub async fn subscribe_messages(
        &self,
        peer_id: Uuid,
    ) -> Result<impl Stream<Item = DirectMessage>, ClientError> {
        let token = self.token()?.to_string();
        let path = format!("/api/realtime/{}", peer_id);

        let response = self
            .client
            .get(self.config.api_url(&path))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("subscription refused")
                    .to_string(),
            });
        }

        let body = Box::pin(response.bytes_stream());

        // Minimal SSE framing: accumulate chunks, yield each `data:` line
        // that parses as a message; event names and comments are framing
        Ok(futures_util::stream::unfold(
            (body, String::new()),
            |(mut body, mut buffer)| async move {
                loop {
                    while let Some(pos) = buffer.find('\n') {
                        let line = buffer[..pos].trim_end_matches('\r').to_string();
                        buffer.drain(..=pos);

                        if let Some(data) = line.strip_prefix("data:") {
                            if let Ok(message) =
                                serde_json::from_str::<DirectMessage>(data.trim_start())
                            {
                                return Some((message, (body, buffer)));
                            }
                        }
                    }

                    match body.next().await {
                        Some(Ok(chunk)) => {
                            buffer.push_str(&String::from_utf8_lossy(&chunk));
                        }
                        Some(Err(e)) => {
                            tracing::warn!("Subscription stream error: {}", e);
                            return None;
                        }
                        None => return None,
                    }
                }
            },
        ))
    }
}
