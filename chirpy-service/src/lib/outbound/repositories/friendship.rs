use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::relationship::errors::RelationshipError;
use crate::domain::relationship::models::Friendship;
use crate::domain::relationship::models::FriendshipStatus;
use crate::domain::relationship::ports::FriendshipRepository;
use crate::domain::user::models::UserId;

const FRIENDSHIP_COLUMNS: &str = "user_id, friend_id, status, created_at, updated_at";

pub struct PostgresFriendshipRepository {
    pool: PgPool,
}

impl PostgresFriendshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_friendship(row: &PgRow) -> Result<Friendship, RelationshipError> {
        let status: String = row.get("status");
        Ok(Friendship {
            user_id: UserId(row.get("user_id")),
            friend_id: UserId(row.get("friend_id")),
            status: status.parse()?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    async fn fetch_where(
        &self,
        condition: &str,
        user: &UserId,
    ) -> Result<Vec<Friendship>, RelationshipError> {
        let rows = sqlx::query(&format!(
            "SELECT {FRIENDSHIP_COLUMNS} FROM friendships WHERE {condition} ORDER BY updated_at DESC"
        ))
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RelationshipError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::row_to_friendship).collect()
    }
}

#[async_trait]
impl FriendshipRepository for PostgresFriendshipRepository {
    async fn insert(&self, friendship: Friendship) -> Result<Friendship, RelationshipError> {
        sqlx::query(
            r#"
            INSERT INTO friendships (user_id, friend_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(friendship.user_id.as_uuid())
        .bind(friendship.friend_id.as_uuid())
        .bind(friendship.status.as_str())
        .bind(friendship.created_at)
        .bind(friendship.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return RelationshipError::AlreadyExists(friendship.friend_id.to_string());
                }
                if db_err.is_foreign_key_violation() {
                    return RelationshipError::UserNotFound(friendship.friend_id.to_string());
                }
            }
            RelationshipError::DatabaseError(e.to_string())
        })?;

        Ok(friendship)
    }

    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, RelationshipError> {
        let row = sqlx::query(&format!(
            r#"
            SELECT {FRIENDSHIP_COLUMNS}
            FROM friendships
            WHERE (user_id = $1 AND friend_id = $2) OR (user_id = $2 AND friend_id = $1)
            LIMIT 1
            "#
        ))
        .bind(a.as_uuid())
        .bind(b.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RelationshipError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::row_to_friendship).transpose()
    }

    async fn update_status(
        &self,
        requester: &UserId,
        addressee: &UserId,
        status: FriendshipStatus,
        now: DateTime<Utc>,
    ) -> Result<Friendship, RelationshipError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE friendships
            SET status = $3, updated_at = $4
            WHERE user_id = $1 AND friend_id = $2
            RETURNING {FRIENDSHIP_COLUMNS}
            "#
        ))
        .bind(requester.as_uuid())
        .bind(addressee.as_uuid())
        .bind(status.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RelationshipError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => Self::row_to_friendship(&row),
            None => Err(RelationshipError::RequestNotFound(requester.to_string())),
        }
    }

    async fn delete(&self, requester: &UserId, addressee: &UserId) -> Result<u64, RelationshipError> {
        let result = sqlx::query("DELETE FROM friendships WHERE user_id = $1 AND friend_id = $2")
            .bind(requester.as_uuid())
            .bind(addressee.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| RelationshipError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn list_accepted(&self, user: &UserId) -> Result<Vec<Friendship>, RelationshipError> {
        self.fetch_where(
            "(user_id = $1 OR friend_id = $1) AND status = 'accepted'",
            user,
        )
        .await
    }

    async fn list_pending_received(
        &self,
        addressee: &UserId,
    ) -> Result<Vec<Friendship>, RelationshipError> {
        self.fetch_where("friend_id = $1 AND status = 'pending'", addressee)
            .await
    }

    async fn list_pending_sent(
        &self,
        requester: &UserId,
    ) -> Result<Vec<Friendship>, RelationshipError> {
        self.fetch_where("user_id = $1 AND status = 'pending'", requester)
            .await
    }
}
