//! Client Configuration
//!
//! Where the server lives and the current session token, if any. The token
//! is process-local; logging out simply discards it (JWTs are stateless).

/// Client configuration and session storage
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Confab server, without trailing slash
    pub server_url: String,
    /// Bearer token of the active session
    token: Option<String>,
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        let mut server_url = server_url.into();
        while server_url.ends_with('/') {
            server_url.pop();
        }
        Self {
            server_url,
            token: None,
        }
    }

    /// Full URL for an API path
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    /// The active session token, if logged in
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Store a session token after login or registration
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Discard the session token
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:3000")
    }
}
