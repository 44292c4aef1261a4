//! Post handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{default_limit, non_negative, parse_segment};
use crate::domain::entities::{
    CommunityId, FlairId, NewPost, Post, PostChanges, PostId, PostRelation, PostStatus, UserId,
};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for listing a community's posts
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    /// User reading the list; private communities need a member
    pub viewer: Option<Uuid>,
    pub status: Option<PostStatus>,
    #[serde(default = "default_limit", deserialize_with = "non_negative")]
    pub limit: i64,
    #[serde(default, deserialize_with = "non_negative")]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub creator: Uuid,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: PostStatus,
    pub flair_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: PostStatus,
}

#[derive(Debug, Deserialize)]
pub struct SetFlairRequest {
    /// `null` clears the flair
    pub flair_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ArchiveResponse {
    pub archived: u64,
}

/// GET /admin/communities/:id/posts
///
/// Newest first, optionally filtered by status.
pub async fn list_posts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<Vec<Post>>, AppError> {
    let viewer = query.viewer.map(UserId);
    let posts = state
        .post_service
        .list_for_community(
            &CommunityId(id),
            viewer.as_ref(),
            query.status,
            query.limit,
            query.offset,
        )
        .await?;

    Ok(Json(posts))
}

/// POST /admin/communities/:id/posts
pub async fn create_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let post = state
        .post_service
        .create(NewPost {
            community_id: CommunityId(id),
            title: request.title,
            url: request.url,
            content: request.content,
            creator: UserId(request.creator),
            status: request.status,
            flair_id: request.flair_id.map(FlairId),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /admin/communities/:id/archive
///
/// Archive public posts older than the configured age. Only communities with
/// `archive_posts` set are swept.
pub async fn archive_stale_posts(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArchiveResponse>, AppError> {
    let archived = state
        .post_service
        .archive_stale(&CommunityId(id), Utc::now())
        .await?;

    Ok(Json(ArchiveResponse { archived }))
}

/// GET /admin/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, AppError> {
    let post = state.post_service.get(&PostId(id)).await?;
    Ok(Json(post))
}

/// PATCH /admin/posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<Post>, AppError> {
    let changes = PostChanges {
        title: request.title,
        url: request.url,
        content: request.content,
    };

    let post = state.post_service.update(&PostId(id), changes).await?;
    Ok(Json(post))
}

/// DELETE /admin/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.post_service.delete(&PostId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /admin/posts/:id/status
pub async fn set_post_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<Post>, AppError> {
    let post = state
        .post_service
        .set_status(&PostId(id), request.status)
        .await?;
    Ok(Json(post))
}

/// PUT /admin/posts/:id/flair
pub async fn set_post_flair(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetFlairRequest>,
) -> Result<Json<Post>, AppError> {
    let post = state
        .post_service
        .set_flair(&PostId(id), request.flair_id.map(FlairId))
        .await?;
    Ok(Json(post))
}

/// PUT /admin/posts/:id/relations/:relation/:user_id
///
/// `relation` is one of like, dislike, follow or bookmark. Adding a user
/// already present is a no-op.
pub async fn relate_post(
    State(state): State<AppState>,
    Path((id, relation, user_id)): Path<(Uuid, String, Uuid)>,
) -> Result<StatusCode, AppError> {
    let relation: PostRelation = parse_segment(&relation)?;
    state
        .post_service
        .relate(&PostId(id), relation, &UserId(user_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /admin/posts/:id/relations/:relation/:user_id
pub async fn unrelate_post(
    State(state): State<AppState>,
    Path((id, relation, user_id)): Path<(Uuid, String, Uuid)>,
) -> Result<StatusCode, AppError> {
    let relation: PostRelation = parse_segment(&relation)?;
    state
        .post_service
        .unrelate(&PostId(id), relation, &UserId(user_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_names_are_case_insensitive() {
        let relation: PostRelation = parse_segment("bookmark").unwrap();
        assert_eq!(relation, PostRelation::Bookmark);

        let err = parse_segment::<PostRelation>("share").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn create_request_defaults_to_public() {
        let request: CreatePostRequest = serde_json::from_str(
            r#"{"creator": "00000000-0000-0000-0000-000000000001", "title": "Hello"}"#,
        )
        .unwrap();

        assert_eq!(request.status, PostStatus::Public);
        assert!(request.flair_id.is_none());
        assert!(request.url.is_empty());
    }

    #[test]
    fn flair_can_be_cleared() {
        let request: SetFlairRequest = serde_json::from_str(r#"{"flair_id": null}"#).unwrap();
        assert!(request.flair_id.is_none());
    }
}
