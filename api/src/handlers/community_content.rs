//! Community content handlers
//!
//! Pages, rules and flairs belonging to a community.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::{FlairUpdate, PageUpdate, RuleUpdate};
use crate::domain::entities::{
    CommunityFlair, CommunityId, CommunityPage, CommunityRule, FlairId, PageId, RuleId, RuleType,
};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePageRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// POSTS, COMMENTS or BOTH; defaults to BOTH
    #[serde(default)]
    pub rule_type: RuleType,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRuleRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rule_type: Option<RuleType>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFlairRequest {
    pub name: String,
    /// `#RRGGBB`
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlairRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

// ============================================================================
// Pages
// ============================================================================

/// GET /admin/communities/:id/pages
pub async fn list_pages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommunityPage>>, AppError> {
    let pages = state.content_service.list_pages(&CommunityId(id)).await?;
    Ok(Json(pages))
}

/// POST /admin/communities/:id/pages
pub async fn create_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreatePageRequest>,
) -> Result<(StatusCode, Json<CommunityPage>), AppError> {
    let page = state
        .content_service
        .create_page(&CommunityId(id), &request.title, &request.content)
        .await?;

    Ok((StatusCode::CREATED, Json(page)))
}

/// PATCH /admin/pages/:id
pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePageRequest>,
) -> Result<Json<CommunityPage>, AppError> {
    let page = state
        .content_service
        .update_page(
            &PageId(id),
            PageUpdate {
                title: request.title,
                content: request.content,
            },
        )
        .await?;

    Ok(Json(page))
}

/// DELETE /admin/pages/:id
pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.content_service.delete_page(&PageId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Rules
// ============================================================================

/// GET /admin/communities/:id/rules
pub async fn list_rules(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommunityRule>>, AppError> {
    let rules = state.content_service.list_rules(&CommunityId(id)).await?;
    Ok(Json(rules))
}

/// POST /admin/communities/:id/rules
pub async fn create_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateRuleRequest>,
) -> Result<(StatusCode, Json<CommunityRule>), AppError> {
    let rule = state
        .content_service
        .create_rule(
            &CommunityId(id),
            &request.title,
            &request.description,
            request.rule_type,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(rule)))
}

/// PATCH /admin/rules/:id
pub async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRuleRequest>,
) -> Result<Json<CommunityRule>, AppError> {
    let rule = state
        .content_service
        .update_rule(
            &RuleId(id),
            RuleUpdate {
                title: request.title,
                description: request.description,
                rule_type: request.rule_type,
            },
        )
        .await?;

    Ok(Json(rule))
}

/// DELETE /admin/rules/:id
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.content_service.delete_rule(&RuleId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Flairs
// ============================================================================

/// GET /admin/communities/:id/flairs
pub async fn list_flairs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommunityFlair>>, AppError> {
    let flairs = state.content_service.list_flairs(&CommunityId(id)).await?;
    Ok(Json(flairs))
}

/// POST /admin/communities/:id/flairs
///
/// Flairs without a colour get the default one.
pub async fn create_flair(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateFlairRequest>,
) -> Result<(StatusCode, Json<CommunityFlair>), AppError> {
    let flair = state
        .content_service
        .create_flair(&CommunityId(id), &request.name, request.color.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(flair)))
}

/// PATCH /admin/flairs/:id
pub async fn update_flair(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFlairRequest>,
) -> Result<Json<CommunityFlair>, AppError> {
    let flair = state
        .content_service
        .update_flair(
            &FlairId(id),
            FlairUpdate {
                name: request.name,
                color: request.color,
            },
        )
        .await?;

    Ok(Json(flair))
}

/// DELETE /admin/flairs/:id
///
/// Posts wearing the flair keep existing without one.
pub async fn delete_flair(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.content_service.delete_flair(&FlairId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
