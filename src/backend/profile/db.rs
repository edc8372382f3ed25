//! Database operations for profiles
//!
//! Thin query wrappers over the `profiles` table, plus the stranger search
//! used by the add-friend flow.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::shared::Profile;

fn profile_from_row(row: &sqlx::postgres::PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        avatar_url: row.get("avatar_url"),
    }
}

/// Get a profile by user ID
pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, username, email, avatar_url
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| profile_from_row(&r)))
}

/// Get a profile by username
pub async fn get_profile_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<Profile>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, username, email, avatar_url
        FROM profiles
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| profile_from_row(&r)))
}

/// Update the display username of a profile
pub async fn update_username(
    pool: &PgPool,
    user_id: Uuid,
    username: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE profiles SET username = $1 WHERE id = $2
        "#,
    )
    .bind(username)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Store the signed avatar URL on the profile
pub async fn update_avatar_url(
    pool: &PgPool,
    user_id: Uuid,
    avatar_url: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE profiles SET avatar_url = $1 WHERE id = $2
        "#,
    )
    .bind(avatar_url)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Search users the viewer has no relation with
///
/// Case-insensitive substring match on the username, excluding the viewer
/// and anyone with a friend-request row involving them in either direction.
/// Accepted requests remain as rows, so existing friends are excluded too.
pub async fn search_strangers(
    pool: &PgPool,
    viewer_id: Uuid,
    query: &str,
    limit: i64,
) -> Result<Vec<Profile>, sqlx::Error> {
    let pattern = format!("%{}%", query.trim());

    let rows = sqlx::query(
        r#"
        SELECT p.id, p.username, p.email, p.avatar_url
        FROM profiles p
        WHERE p.id <> $1
          AND p.username ILIKE $2
          AND p.id NOT IN (
              SELECT CASE WHEN fr.from_user = $1 THEN fr.to_user ELSE fr.from_user END
              FROM friend_requests fr
              WHERE fr.from_user = $1 OR fr.to_user = $1
          )
        ORDER BY p.username ASC
        LIMIT $3
        "#,
    )
    .bind(viewer_id)
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(profile_from_row).collect())
}
