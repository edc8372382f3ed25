//! Database operations for direct messages

use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::shared::DirectMessage;

/// Store a direct message
///
/// The server assigns the id and creation time; the stored record is what
/// gets broadcast and echoed back to clients.
pub async fn insert_message(
    pool: &PgPool,
    sender_id: Uuid,
    receiver_id: Uuid,
    content: &str,
) -> Result<DirectMessage, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO messages (id, sender_id, receiver_id, content, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(sender_id)
    .bind(receiver_id)
    .bind(content)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(DirectMessage {
        id,
        sender_id,
        receiver_id,
        content: content.to_string(),
        created_at: now,
    })
}

/// Full history between two users, ordered ascending by creation time
pub async fn history_between(
    pool: &PgPool,
    a: Uuid,
    b: Uuid,
) -> Result<Vec<DirectMessage>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, sender_id, receiver_id, content, created_at
        FROM messages
        WHERE (sender_id = $1 AND receiver_id = $2)
           OR (sender_id = $2 AND receiver_id = $1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| DirectMessage {
            id: row.get("id"),
            sender_id: row.get("sender_id"),
            receiver_id: row.get("receiver_id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
        })
        .collect())
}
