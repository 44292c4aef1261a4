//! Report handlers
//!
//! Posts and users are reported through parallel endpoint sets backed by the
//! same report service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{default_limit, non_negative};
use crate::domain::entities::{PostId, PostReport, ReportId, ReportStatus, UserId, UserReport};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for listing reports
#[derive(Debug, Deserialize)]
pub struct ListReportsQuery {
    pub status: Option<ReportStatus>,
    #[serde(default = "default_limit", deserialize_with = "non_negative")]
    pub limit: i64,
    #[serde(default, deserialize_with = "non_negative")]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostReportRequest {
    pub post_id: Uuid,
    pub reporter: Uuid,
    pub title: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserReportRequest {
    pub user_id: Uuid,
    pub reporter: Uuid,
    pub title: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Deserialize)]
pub struct SetReportStatusRequest {
    pub status: ReportStatus,
}

// ============================================================================
// Post reports
// ============================================================================

/// GET /admin/reports/posts
pub async fn list_post_reports(
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<Vec<PostReport>>, AppError> {
    let reports = state
        .post_report_service
        .list(query.status, query.limit, query.offset)
        .await?;
    Ok(Json(reports))
}

/// POST /admin/reports/posts
///
/// New reports start out INITIATED.
pub async fn create_post_report(
    State(state): State<AppState>,
    Json(request): Json<CreatePostReportRequest>,
) -> Result<(StatusCode, Json<PostReport>), AppError> {
    let report = state
        .post_report_service
        .file(
            PostId(request.post_id),
            UserId(request.reporter),
            &request.title,
            &request.details,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /admin/reports/posts/:id
pub async fn get_post_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostReport>, AppError> {
    let report = state.post_report_service.get(&ReportId(id)).await?;
    Ok(Json(report))
}

/// PUT /admin/reports/posts/:id/status
pub async fn set_post_report_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetReportStatusRequest>,
) -> Result<Json<PostReport>, AppError> {
    let report = state
        .post_report_service
        .set_status(&ReportId(id), request.status)
        .await?;
    Ok(Json(report))
}

// ============================================================================
// User reports
// ============================================================================

/// GET /admin/reports/users
pub async fn list_user_reports(
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> Result<Json<Vec<UserReport>>, AppError> {
    let reports = state
        .user_report_service
        .list(query.status, query.limit, query.offset)
        .await?;
    Ok(Json(reports))
}

/// POST /admin/reports/users
pub async fn create_user_report(
    State(state): State<AppState>,
    Json(request): Json<CreateUserReportRequest>,
) -> Result<(StatusCode, Json<UserReport>), AppError> {
    let report = state
        .user_report_service
        .file(
            UserId(request.user_id),
            UserId(request.reporter),
            &request.title,
            &request.details,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /admin/reports/users/:id
pub async fn get_user_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserReport>, AppError> {
    let report = state.user_report_service.get(&ReportId(id)).await?;
    Ok(Json(report))
}

/// PUT /admin/reports/users/:id/status
pub async fn set_user_report_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetReportStatusRequest>,
) -> Result<Json<UserReport>, AppError> {
    let report = state
        .user_report_service
        .set_status(&ReportId(id), request.status)
        .await?;
    Ok(Json(report))
}
