use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Planning,
        ProjectStatus::InProgress,
        ProjectStatus::OnHold,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Invalid project status '{}'. Expected one of: planning, in_progress, on_hold, completed, cancelled",
                    s
                ))
            })
    }
}

/// Kind of engagement sold to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    AiAgents,
    Automation,
    ItConsulting,
    Custom,
}

impl ProjectType {
    pub const ALL: [ProjectType; 4] = [
        ProjectType::AiAgents,
        ProjectType::Automation,
        ProjectType::ItConsulting,
        ProjectType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::AiAgents => "ai_agents",
            ProjectType::Automation => "automation",
            ProjectType::ItConsulting => "it_consulting",
            ProjectType::Custom => "custom",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Invalid project type '{}'. Expected one of: ai_agents, automation, it_consulting, custom",
                    s
                ))
            })
    }
}

/// Row of the `projects` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub project_type: String,
    pub budget: Option<f64>,
    pub deadline: Option<DateTime<Utc>>,
    pub client_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Row of the `project_updates` table: a progress note on a project.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// A project together with its updates, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectWithUpdates {
    #[serde(flatten)]
    pub project: Project,
    pub updates: Vec<ProjectUpdate>,
}

/// Body of `POST /api/v1/projects`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub project_type: String,
    pub budget: Option<f64>,
    pub deadline: Option<DateTime<Utc>>,
    pub client_id: Uuid,
}

impl NewProject {
    pub fn validated(self) -> Result<(Self, ProjectType), AppError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        let project_type: ProjectType = self.project_type.parse()?;
        validate_budget(self.budget)?;

        Ok((
            Self {
                title,
                project_type: project_type.as_str().to_string(),
                ..self
            },
            project_type,
        ))
    }
}

/// Body of `PUT /api/v1/projects/{id}`.
///
/// Absent fields are left unchanged. The nullable columns use a nested
/// `Option`: `Some(None)` is an explicit `null` and clears the column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectChanges {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub budget: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub deadline: Option<Option<DateTime<Utc>>>,
}

impl ProjectChanges {
    pub fn validated(self) -> Result<Self, AppError> {
        let title = match self.title {
            Some(t) if t.trim().is_empty() => {
                return Err(AppError::BadRequest("title cannot be empty".to_string()))
            }
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };
        let status = self
            .status
            .as_deref()
            .map(str::parse::<ProjectStatus>)
            .transpose()?
            .map(|s| s.as_str().to_string());
        validate_budget(self.budget.flatten())?;

        Ok(Self {
            title,
            status,
            ..self
        })
    }
}

/// Body of `POST /api/v1/projects/{id}/updates`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProjectUpdate {
    pub project_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

impl NewProjectUpdate {
    /// Rejects blank text and a body addressed to a different project.
    pub fn validated_for(self, path_project_id: Uuid) -> Result<Self, AppError> {
        if self.project_id != path_project_id {
            return Err(AppError::BadRequest("Project ID mismatch".to_string()));
        }
        let title = self.title.trim().to_string();
        let content = self.content.trim().to_string();
        if title.is_empty() || content.is_empty() {
            return Err(AppError::BadRequest(
                "title and content are required".to_string(),
            ));
        }
        Ok(Self {
            title,
            content,
            ..self
        })
    }
}

/// Query parameters for `GET /api/v1/projects`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectListParams {
    pub client_id: Option<Uuid>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

/// Marks a field as sent, keeping a `null` value as `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn default_is_public() -> bool {
    true
}

fn validate_budget(budget: Option<f64>) -> Result<(), AppError> {
    match budget {
        Some(b) if !b.is_finite() || b < 0.0 => Err(AppError::BadRequest(
            "budget must be a non-negative number".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_type_is_normalized() {
        let (project, kind) = NewProject {
            title: " Clinic receptionist bot ".to_string(),
            description: None,
            project_type: "AI_Agents".to_string(),
            budget: Some(12_000.0),
            deadline: None,
            client_id: Uuid::nil(),
        }
        .validated()
        .unwrap();
        assert_eq!(kind, ProjectType::AiAgents);
        assert_eq!(project.project_type, "ai_agents");
        assert_eq!(project.title, "Clinic receptionist bot");
    }

    #[test]
    fn negative_budget_is_rejected() {
        let changes = ProjectChanges {
            budget: Some(Some(-1.0)),
            ..Default::default()
        };
        assert!(changes.validated().is_err());
    }

    #[test]
    fn explicit_null_clears_while_absent_keeps() {
        let changes: ProjectChanges = serde_json::from_value(serde_json::json!({
            "description": null,
            "budget": 4_200.0
        }))
        .unwrap();
        let changes = changes.validated().unwrap();
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.budget, Some(Some(4_200.0)));
        assert_eq!(changes.deadline, None);
        assert_eq!(changes.title, None);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let changes = ProjectChanges {
            status: Some("paused".to_string()),
            ..Default::default()
        };
        assert!(matches!(changes.validated(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn update_for_other_project_is_rejected() {
        let update: NewProjectUpdate = serde_json::from_value(serde_json::json!({
            "project_id": Uuid::nil(),
            "title": "Kickoff",
            "content": "Scope agreed"
        }))
        .unwrap();
        assert!(update.is_public);

        let err = update.validated_for(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Project ID mismatch");
    }
}
