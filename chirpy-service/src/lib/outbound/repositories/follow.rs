use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::relationship::errors::RelationshipError;
use crate::domain::relationship::models::Follow;
use crate::domain::relationship::ports::FollowRepository;
use crate::domain::user::models::UserId;

pub struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_follow(row: &PgRow) -> Follow {
        Follow {
            follower_id: UserId(row.get("follower_id")),
            followee_id: UserId(row.get("followee_id")),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn insert(&self, follow: Follow) -> Result<Follow, RelationshipError> {
        // Following twice keeps the original edge and its timestamp.
        let row = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followee_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (follower_id, followee_id)
            DO UPDATE SET created_at = follows.created_at
            RETURNING follower_id, followee_id, created_at
            "#,
        )
        .bind(follow.follower_id.as_uuid())
        .bind(follow.followee_id.as_uuid())
        .bind(follow.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return RelationshipError::UserNotFound(follow.followee_id.to_string());
                }
            }
            RelationshipError::DatabaseError(e.to_string())
        })?;

        Ok(Self::row_to_follow(&row))
    }

    async fn delete(&self, follower: &UserId, followee: &UserId) -> Result<(), RelationshipError> {
        sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(follower.as_uuid())
            .bind(followee.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| RelationshipError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn followers(&self, followee: &UserId) -> Result<Vec<Follow>, RelationshipError> {
        let rows = sqlx::query(
            r#"
            SELECT follower_id, followee_id, created_at
            FROM follows
            WHERE followee_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(followee.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RelationshipError::DatabaseError(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_follow).collect())
    }

    async fn following(&self, follower: &UserId) -> Result<Vec<Follow>, RelationshipError> {
        let rows = sqlx::query(
            r#"
            SELECT follower_id, followee_id, created_at
            FROM follows
            WHERE follower_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(follower.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RelationshipError::DatabaseError(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_follow).collect())
    }
}
