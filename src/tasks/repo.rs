use async_trait::async_trait;

use super::repo_types::{Task, TaskFields, TaskFilter};
use crate::db::{PgStore, StoreResult};

#[async_trait]
pub trait TaskRepo: Send + Sync {
    async fn list_tasks(&self, user_id: i64, filter: TaskFilter) -> StoreResult<Vec<Task>>;
    async fn get_task(&self, user_id: i64, id: i64) -> StoreResult<Option<Task>>;
    async fn create_task(&self, user_id: i64, fields: &TaskFields) -> StoreResult<Task>;
    async fn update_task(
        &self,
        user_id: i64,
        id: i64,
        fields: &TaskFields,
    ) -> StoreResult<Option<Task>>;
    async fn delete_task(&self, user_id: i64, id: i64) -> StoreResult<bool>;
}

const TASK_COLUMNS: &str =
    "id, title, description, is_completed, project_id, category_id, user_id, created_at";

#[async_trait]
impl TaskRepo for PgStore {
    async fn list_tasks(&self, user_id: i64, filter: TaskFilter) -> StoreResult<Vec<Task>> {
        let sql = format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE user_id = $1
              AND ($2::BIGINT IS NULL OR project_id = $2)
              AND ($3::BIGINT IS NULL OR category_id = $3)
            ORDER BY created_at, id
            "#
        );
        let rows = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .bind(filter.project_id)
            .bind(filter.category_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_task(&self, user_id: i64, id: i64) -> StoreResult<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_task(&self, user_id: i64, fields: &TaskFields) -> StoreResult<Task> {
        let sql = format!(
            r#"
            INSERT INTO tasks (title, description, is_completed, project_id, category_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Task>(&sql)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(fields.is_completed)
            .bind(fields.project_id)
            .bind(fields.category_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_task(
        &self,
        user_id: i64,
        id: i64,
        fields: &TaskFields,
    ) -> StoreResult<Option<Task>> {
        let sql = format!(
            r#"
            UPDATE tasks
            SET title = $1, description = $2, is_completed = $3, project_id = $4, category_id = $5
            WHERE id = $6 AND user_id = $7
            RETURNING {TASK_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Task>(&sql)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(fields.is_completed)
            .bind(fields.project_id)
            .bind(fields.category_id)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_task(&self, user_id: i64, id: i64) -> StoreResult<bool> {
        let res = sqlx::query(r#"DELETE FROM tasks WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
