use async_trait::async_trait;

use super::repo_types::{Project, ProjectFields};
use crate::db::{PgStore, StoreResult};

#[async_trait]
pub trait ProjectRepo: Send + Sync {
    async fn list_projects(&self, user_id: i64) -> StoreResult<Vec<Project>>;
    async fn get_project(&self, user_id: i64, id: i64) -> StoreResult<Option<Project>>;
    async fn create_project(&self, user_id: i64, fields: &ProjectFields) -> StoreResult<Project>;
    async fn update_project(
        &self,
        user_id: i64,
        id: i64,
        fields: &ProjectFields,
    ) -> StoreResult<Option<Project>>;
    async fn delete_project(&self, user_id: i64, id: i64) -> StoreResult<bool>;
}

#[async_trait]
impl ProjectRepo for PgStore {
    async fn list_projects(&self, user_id: i64) -> StoreResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, user_id, created_at
            FROM projects
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_project(&self, user_id: i64, id: i64) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, user_id, created_at
            FROM projects
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_project(&self, user_id: i64, fields: &ProjectFields) -> StoreResult<Project> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, user_id, created_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_project(
        &self,
        user_id: i64,
        id: i64,
        fields: &ProjectFields,
    ) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET name = $1, description = $2
            WHERE id = $3 AND user_id = $4
            RETURNING id, name, description, user_id, created_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_project(&self, user_id: i64, id: i64) -> StoreResult<bool> {
        let res = sqlx::query(r#"DELETE FROM projects WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
