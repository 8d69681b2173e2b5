use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{NewUser, User};
use crate::db::{PgStore, StoreResult};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>>;
    /// Fails with `UniqueViolation` when the email is taken.
    async fn create_user(&self, user: NewUser<'_>) -> StoreResult<User>;
}

/// Server-side session rows, keyed by the token's `jti`.
#[async_trait]
pub trait SessionRepo: Send + Sync {
    async fn create_session(
        &self,
        token_id: Uuid,
        user_id: i64,
        expires_at: OffsetDateTime,
    ) -> StoreResult<()>;
    /// True when a row for this token and user exists and has not expired at `now`.
    async fn session_active(
        &self,
        token_id: Uuid,
        user_id: i64,
        now: OffsetDateTime,
    ) -> StoreResult<bool>;
    /// Returns whether a row was removed.
    async fn delete_session(&self, token_id: Uuid, user_id: i64) -> StoreResult<bool>;
    /// Deletes every expired row, whoever owns it.
    async fn purge_expired_sessions(&self, now: OffsetDateTime) -> StoreResult<u64>;
}

#[async_trait]
impl UserRepo for PgStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser<'_>) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl SessionRepo for PgStore {
    async fn create_session(
        &self,
        token_id: Uuid,
        user_id: i64,
        expires_at: OffsetDateTime,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO sessions (token_id, user_id, expires_at) VALUES ($1, $2, $3)"#,
        )
        .bind(token_id)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn session_active(
        &self,
        token_id: Uuid,
        user_id: i64,
        now: OffsetDateTime,
    ) -> StoreResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM sessions
            WHERE token_id = $1 AND user_id = $2 AND expires_at >= $3
            "#,
        )
        .bind(token_id)
        .bind(user_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found.is_some())
    }

    async fn delete_session(&self, token_id: Uuid, user_id: i64) -> StoreResult<bool> {
        let res = sqlx::query(r#"DELETE FROM sessions WHERE token_id = $1 AND user_id = $2"#)
            .bind(token_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn purge_expired_sessions(&self, now: OffsetDateTime) -> StoreResult<u64> {
        let res = sqlx::query(r#"DELETE FROM sessions WHERE expires_at < $1"#)
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
