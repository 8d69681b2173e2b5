use serde::Deserialize;

use super::repo_types::{TaskFields, TaskFilter};
use crate::{
    error::AppError,
    http::{parse_ref, required_text, RawId},
};

/// Body for create and full update.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub project_id: Option<RawId>,
    pub category_id: Option<RawId>,
}

impl TaskInput {
    pub fn validate(self) -> Result<TaskFields, AppError> {
        let title = required_text(self.title.as_deref())
            .ok_or_else(|| AppError::validation("Task title is required"))?;
        Ok(TaskFields {
            title,
            description: required_text(self.description.as_deref()),
            is_completed: self.is_completed.unwrap_or(false),
            project_id: parse_ref(self.project_id.as_ref(), "projectId")?,
            category_id: parse_ref(self.category_id.as_ref(), "categoryId")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskQuery {
    pub project_id: Option<String>,
    pub category_id: Option<String>,
}

impl TaskQuery {
    pub fn filter(self) -> Result<TaskFilter, AppError> {
        Ok(TaskFilter {
            project_id: parse_ref(self.project_id.map(RawId::Text).as_ref(), "projectId")?,
            category_id: parse_ref(self.category_id.map(RawId::Text).as_ref(), "categoryId")?,
        })
    }
}
