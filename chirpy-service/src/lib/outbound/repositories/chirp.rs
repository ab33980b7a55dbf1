use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpBody;
use crate::domain::chirp::models::ChirpFilter;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::Page;
use crate::domain::chirp::ports::ChirpRepository;
use crate::domain::user::models::UserId;

pub struct PostgresChirpRepository {
    pool: PgPool,
}

impl PostgresChirpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_chirp(row: &PgRow) -> Result<Chirp, ChirpError> {
        Ok(Chirp {
            id: ChirpId(row.get("id")),
            body: ChirpBody::new(row.get("body"))?,
            user_id: UserId(row.get("user_id")),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl ChirpRepository for PostgresChirpRepository {
    async fn create(&self, chirp: Chirp) -> Result<Chirp, ChirpError> {
        sqlx::query(
            r#"
            INSERT INTO chirps (id, body, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(chirp.id.as_uuid())
        .bind(chirp.body.as_str())
        .bind(chirp.user_id.as_uuid())
        .bind(chirp.created_at)
        .bind(chirp.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return ChirpError::AccountMissing;
                }
            }
            ChirpError::DatabaseError(e.to_string())
        })?;

        Ok(chirp)
    }

    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError> {
        let row = sqlx::query(
            r#"
            SELECT id, body, user_id, created_at, updated_at
            FROM chirps
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ChirpError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::row_to_chirp).transpose()
    }

    async fn list(&self, filter: ChirpFilter) -> Result<Vec<Chirp>, ChirpError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT id, body, user_id, created_at, updated_at
            FROM chirps
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at {}
            "#,
            filter.sort.as_sql()
        ))
        .bind(filter.author.map(|a| a.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ChirpError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::row_to_chirp).collect()
    }

    async fn list_by_authors(&self, authors: &[UserId], page: Page) -> Result<Vec<Chirp>, ChirpError> {
        let authors: Vec<Uuid> = authors.iter().map(UserId::as_uuid).collect();

        let rows = sqlx::query(
            r#"
            SELECT id, body, user_id, created_at, updated_at
            FROM chirps
            WHERE user_id = ANY($1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(authors)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ChirpError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::row_to_chirp).collect()
    }

    async fn update(&self, chirp: Chirp) -> Result<Chirp, ChirpError> {
        let result = sqlx::query("UPDATE chirps SET body = $2, updated_at = $3 WHERE id = $1")
            .bind(chirp.id.as_uuid())
            .bind(chirp.body.as_str())
            .bind(chirp.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| ChirpError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ChirpError::NotFound(chirp.id.to_string()));
        }

        Ok(chirp)
    }

    async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError> {
        let result = sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| ChirpError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ChirpError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
