use async_trait::async_trait;

use super::repo_types::Category;
use crate::db::{PgStore, StoreResult};

/// Every method is scoped to `user_id`; rows of other users are invisible.
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    async fn list_categories(&self, user_id: i64) -> StoreResult<Vec<Category>>;
    async fn get_category(&self, user_id: i64, id: i64) -> StoreResult<Option<Category>>;
    /// Names are unique per user; a duplicate fails with `UniqueViolation`.
    async fn create_category(&self, user_id: i64, name: &str) -> StoreResult<Category>;
    async fn update_category(&self, user_id: i64, id: i64, name: &str)
        -> StoreResult<Option<Category>>;
    async fn delete_category(&self, user_id: i64, id: i64) -> StoreResult<bool>;
}

#[async_trait]
impl CategoryRepo for PgStore {
    async fn list_categories(&self, user_id: i64) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, user_id, created_at
            FROM categories
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_category(&self, user_id: i64, id: i64) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, user_id, created_at
            FROM categories
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_category(&self, user_id: i64, name: &str) -> StoreResult<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, user_id)
            VALUES ($1, $2)
            RETURNING id, name, user_id, created_at
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_category(
        &self,
        user_id: i64,
        id: i64,
        name: &str,
    ) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = $1
            WHERE id = $2 AND user_id = $3
            RETURNING id, name, user_id, created_at
            "#,
        )
        .bind(name)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_category(&self, user_id: i64, id: i64) -> StoreResult<bool> {
        let res = sqlx::query(r#"DELETE FROM categories WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
