use serde::Deserialize;

/// Body for create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CategoryInput {
    pub name: Option<String>,
}
