use crate::db_storage::ProjectStorage;
use crate::errors::AppError;
use crate::handlers::{require_admin, AppState};
use crate::models::Pagination;
use crate::project_models::{
    NewProject, NewProjectUpdate, Project, ProjectChanges, ProjectListParams, ProjectUpdate,
    ProjectWithUpdates,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// POST /api/v1/projects (admin)
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    require_admin(&state, &headers)?;

    let (project, project_type) = payload.validated()?;
    tracing::info!("POST /projects - {} ({})", project.title, project_type);

    let created = ProjectStorage::new(state.db.clone()).create(&project).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/projects (admin)
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<ProjectListParams>,
) -> Result<Json<Vec<Project>>, AppError> {
    require_admin(&state, &headers)?;

    let (offset, limit) = Pagination {
        skip: params.skip,
        limit: params.limit,
    }
    .bounds();

    let projects = ProjectStorage::new(state.db.clone())
        .list(params.client_id, offset, limit)
        .await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/:id (admin)
///
/// The project with all of its updates.
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectWithUpdates>, AppError> {
    require_admin(&state, &headers)?;

    let project = ProjectStorage::new(state.db.clone())
        .get_with_updates(id)
        .await?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/:id (admin)
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(changes): Json<ProjectChanges>,
) -> Result<Json<Project>, AppError> {
    require_admin(&state, &headers)?;

    let changes = changes.validated()?;
    let project = ProjectStorage::new(state.db.clone())
        .update(id, &changes)
        .await?;

    tracing::info!("Project {} updated (status: {})", project.id, project.status);
    Ok(Json(project))
}

/// POST /api/v1/projects/:id/updates (admin)
///
/// The body's `project_id` must name the project in the path.
pub async fn create_project_update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<NewProjectUpdate>,
) -> Result<(StatusCode, Json<ProjectUpdate>), AppError> {
    require_admin(&state, &headers)?;

    let update = payload.validated_for(project_id)?;
    let created = ProjectStorage::new(state.db.clone())
        .add_update(&update)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
