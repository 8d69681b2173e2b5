use serde::Serialize;

use crate::{categories::repo_types::Category, projects::repo_types::Project, tasks::repo_types::Task};

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub tasks_count: usize,
    pub completed_tasks_count: usize,
    pub projects_count: usize,
    pub categories_count: usize,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub categories: Vec<Category>,
    pub stats: DashboardStats,
}

impl Dashboard {
    pub fn new(tasks: Vec<Task>, projects: Vec<Project>, categories: Vec<Category>) -> Self {
        let stats = DashboardStats {
            tasks_count: tasks.len(),
            completed_tasks_count: tasks.iter().filter(|t| t.is_completed).count(),
            projects_count: projects.len(),
            categories_count: categories.len(),
        };
        Self {
            tasks,
            projects,
            categories,
            stats,
        }
    }
}
