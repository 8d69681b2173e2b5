use serde::Deserialize;

use super::repo_types::ProjectFields;
use crate::{error::AppError, http::required_text};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ProjectInput {
    pub fn validate(self) -> Result<ProjectFields, AppError> {
        let name = required_text(self.name.as_deref())
            .ok_or_else(|| AppError::validation("Project name is required"))?;
        Ok(ProjectFields {
            name,
            description: required_text(self.description.as_deref()),
        })
    }
}
