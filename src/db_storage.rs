use crate::errors::{AppError, ResultExt};
use crate::inquiry_models::{Inquiry, InquiryStatus, NewInquiry};
use crate::project_models::{
    NewProject, NewProjectUpdate, Project, ProjectChanges, ProjectStatus, ProjectUpdate,
    ProjectWithUpdates,
};
use sqlx::PgPool;
use uuid::Uuid;

const INQUIRY_COLUMNS: &str = "id, name, email, phone, company, subject, message, status, \
     service_interest, created_at, updated_at";

const PROJECT_COLUMNS: &str = "id, title, description, status, project_type, budget, deadline, \
     client_id, created_at, updated_at";

/// Storage for contact-form inquiries.
pub struct InquiryStorage {
    pool: PgPool,
}

impl InquiryStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts an already-validated inquiry with status `new`.
    pub async fn create(&self, inquiry: &NewInquiry) -> Result<Inquiry, AppError> {
        let sql = format!(
            "INSERT INTO inquiries (id, name, email, phone, company, subject, message, status, service_interest, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
             RETURNING {}",
            INQUIRY_COLUMNS
        );

        let created = sqlx::query_as::<_, Inquiry>(&sql)
            .bind(Uuid::new_v4())
            .bind(&inquiry.name)
            .bind(&inquiry.email)
            .bind(&inquiry.phone)
            .bind(&inquiry.company)
            .bind(&inquiry.subject)
            .bind(&inquiry.message)
            .bind(InquiryStatus::New.as_str())
            .bind(&inquiry.service_interest)
            .fetch_one(&self.pool)
            .await
            .context("inserting inquiry")?;

        tracing::info!("Stored inquiry {} from {}", created.id, created.email);
        Ok(created)
    }

    /// Newest first.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Inquiry>, AppError> {
        let sql = format!(
            "SELECT {} FROM inquiries ORDER BY created_at DESC OFFSET $1 LIMIT $2",
            INQUIRY_COLUMNS
        );

        sqlx::query_as::<_, Inquiry>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("listing inquiries")
    }

    pub async fn get(&self, id: Uuid) -> Result<Inquiry, AppError> {
        let sql = format!("SELECT {} FROM inquiries WHERE id = $1", INQUIRY_COLUMNS);

        sqlx::query_as::<_, Inquiry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("loading inquiry {}", id))?
            .ok_or_else(|| AppError::NotFound("Inquiry not found".to_string()))
    }

    /// Sets the status when given; always bumps `updated_at`.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: Option<InquiryStatus>,
    ) -> Result<Inquiry, AppError> {
        let sql = format!(
            "UPDATE inquiries SET status = COALESCE($2, status), updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            INQUIRY_COLUMNS
        );

        sqlx::query_as::<_, Inquiry>(&sql)
            .bind(id)
            .bind(status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("updating inquiry {}", id))?
            .ok_or_else(|| AppError::NotFound("Inquiry not found".to_string()))
    }
}

/// Storage for client projects and their progress updates.
pub struct ProjectStorage {
    pool: PgPool,
}

impl ProjectStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a validated project in the `planning` state.
    pub async fn create(&self, project: &NewProject) -> Result<Project, AppError> {
        let sql = format!(
            "INSERT INTO projects (id, title, description, status, project_type, budget, deadline, client_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
             RETURNING {}",
            PROJECT_COLUMNS
        );

        let created = sqlx::query_as::<_, Project>(&sql)
            .bind(Uuid::new_v4())
            .bind(&project.title)
            .bind(&project.description)
            .bind(ProjectStatus::Planning.as_str())
            .bind(&project.project_type)
            .bind(project.budget)
            .bind(project.deadline)
            .bind(project.client_id)
            .fetch_one(&self.pool)
            .await
            .context("inserting project")?;

        tracing::info!(
            "Created project {} ({}) for client {}",
            created.id,
            created.project_type,
            created.client_id
        );
        Ok(created)
    }

    /// Newest first, optionally restricted to one client.
    pub async fn list(
        &self,
        client_id: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Project>, AppError> {
        let sql = format!(
            "SELECT {} FROM projects
             WHERE ($1::uuid IS NULL OR client_id = $1)
             ORDER BY created_at DESC
             OFFSET $2 LIMIT $3",
            PROJECT_COLUMNS
        );

        sqlx::query_as::<_, Project>(&sql)
            .bind(client_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("listing projects")
    }

    pub async fn get(&self, id: Uuid) -> Result<Project, AppError> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);

        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("loading project {}", id))?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    pub async fn get_with_updates(&self, id: Uuid) -> Result<ProjectWithUpdates, AppError> {
        let project = self.get(id).await?;

        let updates = sqlx::query_as::<_, ProjectUpdate>(
            "SELECT id, project_id, title, content, is_public, created_at
             FROM project_updates
             WHERE project_id = $1
             ORDER BY created_at DESC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("loading updates for project {}", id))?;

        Ok(ProjectWithUpdates { project, updates })
    }

    /// Applies the present fields of `changes`; absent ones keep their value.
    /// Nullable columns carry a "sent" flag so an explicit `null` clears them.
    pub async fn update(&self, id: Uuid, changes: &ProjectChanges) -> Result<Project, AppError> {
        let sql = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                status = COALESCE($3, status),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                budget = CASE WHEN $6 THEN $7 ELSE budget END,
                deadline = CASE WHEN $8 THEN $9 ELSE deadline END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            PROJECT_COLUMNS
        );

        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.status)
            .bind(changes.description.is_some())
            .bind(changes.description.clone().flatten())
            .bind(changes.budget.is_some())
            .bind(changes.budget.flatten())
            .bind(changes.deadline.is_some())
            .bind(changes.deadline.flatten())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("updating project {}", id))?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
    }

    /// Adds a progress note. The project must exist.
    pub async fn add_update(&self, update: &NewProjectUpdate) -> Result<ProjectUpdate, AppError> {
        self.get(update.project_id).await?;

        let created = sqlx::query_as::<_, ProjectUpdate>(
            "INSERT INTO project_updates (id, project_id, title, content, is_public, created_at)
             VALUES ($1, $2, $3, $4, $5, NOW())
             RETURNING id, project_id, title, content, is_public, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(update.project_id)
        .bind(&update.title)
        .bind(&update.content)
        .bind(update.is_public)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("inserting update for project {}", update.project_id))?;

        tracing::info!(
            "Added update {} to project {} (public: {})",
            created.id,
            created.project_id,
            created.is_public
        );
        Ok(created)
    }
}
