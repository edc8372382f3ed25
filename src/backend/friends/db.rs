//! Database operations for the friend-request lifecycle
//!
//! Authorization is enforced as query predicates: a mutation by the wrong
//! caller matches zero rows and changes nothing. Accepting a request updates
//! the request row and inserts the friendship in one transaction, so there is
//! no window with an accepted request and no friendship.

use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::shared::{
    FriendRequestStatus, IncomingFriendRequest, OutgoingFriendRequest, Profile,
};

/// Create a pending friend request
///
/// The `(from_user, to_user)` pair is unique; a duplicate insert fails with
/// a unique violation.
pub async fn create_friend_request(
    pool: &PgPool,
    from_user: Uuid,
    to_user: Uuid,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO friend_requests (id, from_user, to_user, status, created_at)
        VALUES ($1, $2, $3, 'pending', $4)
        "#,
    )
    .bind(id)
    .bind(from_user)
    .bind(to_user)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Whether a pending request links the two users, in either direction
pub async fn pending_between(pool: &PgPool, a: Uuid, b: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count
        FROM friend_requests
        WHERE status = 'pending'
          AND ((from_user = $1 AND to_user = $2) OR (from_user = $2 AND to_user = $1))
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_one(pool)
    .await?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

/// Whether the two users are friends
///
/// Friendship rows are single but visibility is bidirectional: a row with
/// either side matching counts.
pub async fn are_friends(pool: &PgPool, a: Uuid, b: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count
        FROM friendships
        WHERE (user_id = $1 AND friend_id = $2) OR (user_id = $2 AND friend_id = $1)
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_one(pool)
    .await?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

/// Cancel a sent friend request
///
/// Deletes the row only when the caller is the sender and the request is
/// still pending. Returns the number of rows deleted; zero means the
/// predicate matched nothing and the call was a no-op.
pub async fn cancel_request(
    pool: &PgPool,
    request_id: Uuid,
    caller: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM friend_requests
        WHERE id = $1 AND from_user = $2 AND status = 'pending'
        "#,
    )
    .bind(request_id)
    .bind(caller)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Accept a friend request, atomically creating the friendship
///
/// Both writes run in one transaction: the status flips pending -> accepted
/// and a friendship row (recipient as `user_id`) is inserted. Returns false
/// when no pending row matched the (id, from, to) predicate; nothing is
/// written in that case.
pub async fn accept_request(
    pool: &PgPool,
    request_id: Uuid,
    from_user: Uuid,
    caller: Uuid,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE friend_requests
        SET status = 'accepted'
        WHERE id = $1 AND from_user = $2 AND to_user = $3 AND status = 'pending'
        "#,
    )
    .bind(request_id)
    .bind(from_user)
    .bind(caller)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO friendships (id, user_id, friend_id, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(caller)
    .bind(from_user)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(true)
}

/// Decline a friend request
///
/// Deletes the row; no terminal "declined" state is retained. Returns the
/// number of rows deleted; zero means the predicate matched nothing.
pub async fn decline_request(
    pool: &PgPool,
    request_id: Uuid,
    from_user: Uuid,
    caller: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM friend_requests
        WHERE id = $1 AND from_user = $2 AND to_user = $3 AND status = 'pending'
        "#,
    )
    .bind(request_id)
    .bind(from_user)
    .bind(caller)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

fn profile_from_prefixed_row(row: &sqlx::postgres::PgRow) -> Profile {
    Profile {
        id: row.get("profile_id"),
        username: row.get("username"),
        email: row.get("email"),
        avatar_url: row.get("avatar_url"),
    }
}

/// Pending requests addressed to a user, sender profiles joined inline
pub async fn incoming_requests(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<IncomingFriendRequest>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT fr.id, fr.status, fr.created_at,
               p.id AS profile_id, p.username, p.email, p.avatar_url
        FROM friend_requests fr
        INNER JOIN profiles p ON p.id = fr.from_user
        WHERE fr.to_user = $1 AND fr.status = 'pending'
        ORDER BY fr.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| IncomingFriendRequest {
            id: row.get("id"),
            status: FriendRequestStatus::parse(row.get::<String, _>("status").as_str())
                .unwrap_or_default(),
            from: profile_from_prefixed_row(&row),
            created_at: row.get("created_at"),
        })
        .collect())
}

/// All requests a user has sent, recipient profiles joined inline
pub async fn outgoing_requests(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<OutgoingFriendRequest>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT fr.id, fr.status, fr.created_at,
               p.id AS profile_id, p.username, p.email, p.avatar_url
        FROM friend_requests fr
        INNER JOIN profiles p ON p.id = fr.to_user
        WHERE fr.from_user = $1
        ORDER BY fr.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| OutgoingFriendRequest {
            id: row.get("id"),
            status: FriendRequestStatus::parse(row.get::<String, _>("status").as_str())
                .unwrap_or_default(),
            to: profile_from_prefixed_row(&row),
            created_at: row.get("created_at"),
        })
        .collect())
}

/// Friends of a user, mapped to the other party's profile
pub async fn friends_of(pool: &PgPool, user_id: Uuid) -> Result<Vec<Profile>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT p.id AS profile_id, p.username, p.email, p.avatar_url
        FROM friendships f
        INNER JOIN profiles p
            ON p.id = CASE WHEN f.user_id = $1 THEN f.friend_id ELSE f.user_id END
        WHERE f.user_id = $1 OR f.friend_id = $1
        ORDER BY p.username ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(profile_from_prefixed_row).collect())
}
