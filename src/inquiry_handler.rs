use crate::db_storage::InquiryStorage;
use crate::errors::AppError;
use crate::handlers::{require_admin, AppState};
use crate::inquiry_models::{Inquiry, InquiryChanges, NewInquiry};
use crate::models::Pagination;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// POST /api/v1/inquiries
///
/// Public contact form. Validates before touching the database.
pub async fn create_inquiry(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewInquiry>,
) -> Result<(StatusCode, Json<Inquiry>), AppError> {
    let inquiry = payload.validated()?;
    tracing::info!("POST /inquiries - subject: {:?}", inquiry.subject);

    let created = InquiryStorage::new(state.db.clone()).create(&inquiry).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/inquiries (admin)
pub async fn list_inquiries(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Inquiry>>, AppError> {
    require_admin(&state, &headers)?;

    let (offset, limit) = pagination.bounds();
    let inquiries = InquiryStorage::new(state.db.clone())
        .list(offset, limit)
        .await?;

    tracing::debug!("Listed {} inquiries (skip {}, limit {})", inquiries.len(), offset, limit);
    Ok(Json(inquiries))
}

/// GET /api/v1/inquiries/:id (admin)
pub async fn get_inquiry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Inquiry>, AppError> {
    require_admin(&state, &headers)?;

    let inquiry = InquiryStorage::new(state.db.clone()).get(id).await?;
    Ok(Json(inquiry))
}

/// PUT /api/v1/inquiries/:id (admin)
///
/// Only the status can change; an unknown status is a 400.
pub async fn update_inquiry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(changes): Json<InquiryChanges>,
) -> Result<Json<Inquiry>, AppError> {
    require_admin(&state, &headers)?;

    let status = changes.parsed_status()?;
    let inquiry = InquiryStorage::new(state.db.clone())
        .update_status(id, status)
        .await?;

    tracing::info!("Inquiry {} now {}", inquiry.id, inquiry.status);
    Ok(Json(inquiry))
}
