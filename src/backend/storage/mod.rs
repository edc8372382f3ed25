//! Avatar Object Store
//!
//! Filesystem-backed object storage for profile images. Uploads overwrite
//! the user's previous avatar; retrieval goes through time-limited signed
//! URLs so the store can stay private.
//!
//! The signed URL embeds a JWT whose subject is the stored path. The serve
//! handler verifies the token, checks it matches the requested path, and
//! only then reads the file.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::path::{Component, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::backend::auth::sessions::jwt_secret;
use crate::backend::error::ApiError;

/// Default signed-URL lifetime: 1 hour
pub const SIGNED_URL_TTL_SECS: u64 = 60 * 60;

/// File extensions accepted for avatar uploads
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Claims embedded in a signed retrieval URL
#[derive(Debug, Serialize, Deserialize)]
struct StorageClaims {
    /// The relative object path this token grants access to
    sub: String,
    /// Expiration time (Unix timestamp)
    exp: u64,
}

/// Filesystem-backed avatar store
#[derive(Clone, Debug)]
pub struct AvatarStore {
    root: PathBuf,
}

impl AvatarStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Build the store from `AVATAR_STORAGE_ROOT`, defaulting to
    /// `./data/avatars`.
    pub fn from_env() -> Self {
        let root = std::env::var("AVATAR_STORAGE_ROOT")
            .unwrap_or_else(|_| "./data/avatars".to_string());
        Self::new(root)
    }

    /// Store an avatar for a user, overwriting any previous one.
    ///
    /// Returns the relative object path.
    pub async fn put(
        &self,
        user_id: Uuid,
        extension: &str,
        bytes: &[u8],
    ) -> Result<String, ApiError> {
        if !ALLOWED_EXTENSIONS.contains(&extension) {
            return Err(ApiError::Validation(crate::shared::SharedError::validation(
                "avatar",
                "Unsupported image extension",
            )));
        }

        let relative = format!("{}/avatar.{}", user_id, extension);
        let dir = self.root.join(user_id.to_string());

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApiError::storage(format!("create {}: {}", dir.display(), e)))?;

        let full = self.root.join(&relative);
        tokio::fs::write(&full, bytes)
            .await
            .map_err(|e| ApiError::storage(format!("write {}: {}", full.display(), e)))?;

        tracing::info!("Stored avatar at {} ({} bytes)", relative, bytes.len());
        Ok(relative)
    }

    /// Generate a time-limited signed retrieval URL for an object path
    pub fn signed_url(&self, path: &str, ttl_secs: u64) -> Result<String, ApiError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let claims = StorageClaims {
            sub: path.to_string(),
            exp: now + ttl_secs,
        };

        let key = EncodingKey::from_secret(jwt_secret().as_ref());
        let token = encode(&Header::default(), &claims, &key)?;

        Ok(format!("/storage/{}?token={}", path, token))
    }

    /// Verify a retrieval token against the requested path
    pub fn verify(&self, path: &str, token: &str) -> bool {
        let key = DecodingKey::from_secret(jwt_secret().as_ref());
        match decode::<StorageClaims>(token, &key, &Validation::default()) {
            Ok(data) => data.claims.sub == path,
            Err(e) => {
                tracing::warn!("Rejected storage token for {}: {:?}", path, e);
                false
            }
        }
    }

    /// Read an object back. The path must be relative and free of `..`.
    pub async fn read(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let relative = PathBuf::from(path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(ApiError::Forbidden);
        }

        let full = self.root.join(relative);
        tokio::fs::read(&full)
            .await
            .map_err(|_| ApiError::not_found("avatar"))
    }
}

/// Query parameters of a signed retrieval URL
#[derive(Debug, Deserialize)]
pub struct RetrievalParams {
    pub token: String,
}

/// Content type for a stored object path
fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Serve a stored avatar (GET /storage/{*path})
///
/// The route is public; access control is the signed token in the query
/// string. An expired or mismatched token yields 401.
pub async fn serve_avatar(
    State(store): State<AvatarStore>,
    Path(path): Path<String>,
    Query(params): Query<RetrievalParams>,
) -> Result<Response, ApiError> {
    if !store.verify(&path, &params.token) {
        return Err(ApiError::Authentication);
    }

    let bytes = store.read(&path).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type_for(&path))],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = AvatarStore::new(dir.path());
        let user = Uuid::new_v4();

        let path = store.put(user, "png", b"image-bytes").await.unwrap();
        assert_eq!(path, format!("{}/avatar.png", user));

        let bytes = store.read(&path).await.unwrap();
        assert_eq!(bytes, b"image-bytes");
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_avatar() {
        let dir = tempfile::tempdir().unwrap();
        let store = AvatarStore::new(dir.path());
        let user = Uuid::new_v4();

        store.put(user, "png", b"first").await.unwrap();
        let path = store.put(user, "png", b"second").await.unwrap();

        assert_eq!(store.read(&path).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_put_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        let result = store.put(Uuid::new_v4(), "exe", b"nope").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_signed_url_verifies_for_matching_path() {
        let store = AvatarStore::new("/tmp/does-not-matter");
        let url = store.signed_url("abc/avatar.png", 60).unwrap();

        let token = url.split("token=").nth(1).unwrap();
        assert!(store.verify("abc/avatar.png", token));
        assert!(!store.verify("other/avatar.png", token));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let store = AvatarStore::new("/tmp/does-not-matter");
        assert!(!store.verify("abc/avatar.png", "not-a-token"));
    }

    #[tokio::test]
    async fn test_read_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = AvatarStore::new(dir.path());

        let result = store.read("../etc/passwd").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(content_type_for("a/avatar.png"), "image/png");
        assert_eq!(content_type_for("a/avatar.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("weird"), "application/octet-stream");
    }
}
