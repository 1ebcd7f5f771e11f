use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// User row. Not `Serialize`: every response goes through
/// `dto::UserResponse`, which has no hash field.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub nama: String,
    pub email: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, nama, email, password, created_at, updated_at
            FROM users
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, nama, email, password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Exact-match lookup backing the create-path uniqueness pre-check.
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, nama, email, password, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Uniqueness pre-check for updates; the row being updated is excluded.
    pub async fn find_by_email_excluding(
        db: &PgPool,
        email: &str,
        id: i64,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, nama, email, password, created_at, updated_at
            FROM users
            WHERE email = $1 AND id <> $2
            "#,
        )
        .bind(email)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn insert(
        db: &PgPool,
        nama: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (nama, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, nama, email, password, created_at, updated_at
            "#,
        )
        .bind(nama)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Persist this row's current fields; the database refreshes updated_at.
    pub async fn save(&self, db: &PgPool) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET nama = $2, email = $3, password = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, nama, email, password, created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&self.nama)
        .bind(&self.email)
        .bind(&self.password_hash)
        .fetch_one(db)
        .await
    }

    pub async fn delete_by_id(db: &PgPool, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
