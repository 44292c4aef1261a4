//! Community handlers
//!
//! Public CRUD endpoints for communities.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{deserialize_some, ListQuery};
use crate::domain::entities::{
    Community, CommunityChanges, CommunityId, CommunityType, NewCommunity,
};
use crate::error::AppError;
use crate::AppState;

/// Request to create a community
#[derive(Debug, Deserialize)]
pub struct CreateCommunityRequest {
    pub name: String,
    pub header: Option<String>,
    pub description: Option<String>,
    pub banner: Option<String>,
    pub logo: Option<String>,
    #[serde(default)]
    pub related_communities: Vec<String>,
    /// PUBLIC, RESTRICTED or PRIVATE; defaults to PUBLIC
    #[serde(default)]
    pub community_type: CommunityType,
    #[serde(default)]
    pub archive_posts: bool,
}

/// Partial update. Optional text fields accept `null` to clear them.
#[derive(Debug, Deserialize)]
pub struct UpdateCommunityRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub header: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub banner: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub logo: Option<Option<String>>,
    pub related_communities: Option<Vec<String>>,
    pub community_type: Option<CommunityType>,
    pub archive_posts: Option<bool>,
}

/// GET /communities
///
/// List communities, newest first.
pub async fn list_communities(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Community>>, AppError> {
    let communities = state
        .community_service
        .list(query.limit, query.offset)
        .await?;

    Ok(Json(communities))
}

/// GET /communities/:id
pub async fn get_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Community>, AppError> {
    let community = state.community_service.get(&CommunityId(id)).await?;
    Ok(Json(community))
}

/// POST /communities
///
/// Create a community. Names are unique.
pub async fn create_community(
    State(state): State<AppState>,
    Json(request): Json<CreateCommunityRequest>,
) -> Result<(StatusCode, Json<Community>), AppError> {
    let community = state
        .community_service
        .create(NewCommunity {
            name: request.name,
            header: request.header,
            description: request.description,
            banner: request.banner,
            logo: request.logo,
            related_communities: request.related_communities,
            community_type: request.community_type,
            archive_posts: request.archive_posts,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(community)))
}

/// PATCH /communities/:id
pub async fn update_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCommunityRequest>,
) -> Result<Json<Community>, AppError> {
    let changes = CommunityChanges {
        name: request.name,
        header: request.header,
        description: request.description,
        banner: request.banner,
        logo: request.logo,
        related_communities: request.related_communities,
        community_type: request.community_type,
        archive_posts: request.archive_posts,
    };

    let community = state
        .community_service
        .update(&CommunityId(id), changes)
        .await?;

    Ok(Json(community))
}

/// DELETE /communities/:id
///
/// Delete a community together with its members, content and posts.
pub async fn delete_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.community_service.delete(&CommunityId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults() {
        let request: CreateCommunityRequest =
            serde_json::from_str(r#"{"name": "golang"}"#).unwrap();

        assert_eq!(request.community_type, CommunityType::Public);
        assert!(!request.archive_posts);
        assert!(request.related_communities.is_empty());
    }

    #[test]
    fn community_type_uses_symbolic_names() {
        let request: CreateCommunityRequest =
            serde_json::from_str(r#"{"name": "golang", "community_type": "RESTRICTED"}"#).unwrap();

        assert_eq!(request.community_type, CommunityType::Restricted);
    }

    #[test]
    fn update_request_can_clear_header() {
        let request: UpdateCommunityRequest =
            serde_json::from_str(r#"{"header": null, "archive_posts": true}"#).unwrap();

        assert_eq!(request.header, Some(None));
        assert_eq!(request.description, None);
        assert_eq!(request.archive_posts, Some(true));
    }
}
