//! Comment handlers
//!
//! Responses always carry the effective text; a removed comment reads as the
//! removal placeholder. Only `GET /admin/comments/:id/raw` exposes what was
//! originally written.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::parse_segment;
use crate::app::CommentDraft;
use crate::domain::entities::{
    CommentId, CommentRelation, PostComment, PostId, Timestamps, UserId, UserSet,
};
use crate::error::AppError;
use crate::AppState;

/// Comment as seen by readers
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: CommentId,
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    pub creator: UserId,
    pub text: String,
    pub is_removed: bool,
    pub is_nesting_permitted: bool,
    pub likes: UserSet,
    pub dislikes: UserSet,
    pub mentioned_users: UserSet,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl From<&PostComment> for CommentResponse {
    fn from(comment: &PostComment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            creator: comment.creator,
            text: comment.text().to_string(),
            is_removed: comment.is_removed(),
            is_nesting_permitted: comment.is_nesting_permitted,
            likes: comment.likes.clone(),
            dislikes: comment.dislikes.clone(),
            mentioned_users: comment.mentioned_users.clone(),
            timestamps: comment.timestamps,
        }
    }
}

impl From<PostComment> for CommentResponse {
    fn from(comment: PostComment) -> Self {
        Self::from(&comment)
    }
}

/// One entry of a flattened thread
#[derive(Debug, Serialize)]
pub struct ThreadEntry {
    pub depth: usize,
    #[serde(flatten)]
    pub comment: CommentResponse,
}

#[derive(Debug, Serialize)]
pub struct RawTextResponse {
    pub id: CommentId,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteCommentResponse {
    pub deleted: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub creator: Uuid,
    pub parent_id: Option<Uuid>,
    pub text: String,
    #[serde(default)]
    pub is_nesting_permitted: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SetRemovedRequest {
    pub removed: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetNestingRequest {
    pub permitted: bool,
}

/// GET /admin/posts/:id/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    let comments = state.comment_service.list_for_post(&PostId(id)).await?;
    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}

/// GET /admin/posts/:id/thread
///
/// The post's comments in reply order, each with its depth.
pub async fn get_thread(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ThreadEntry>>, AppError> {
    let tree = state.comment_service.thread_for_post(&PostId(id)).await?;

    let entries = tree
        .flatten()
        .into_iter()
        .map(|(depth, comment)| ThreadEntry {
            depth,
            comment: CommentResponse::from(comment),
        })
        .collect();

    Ok(Json(entries))
}

/// POST /admin/posts/:id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let comment = state
        .comment_service
        .create(CommentDraft {
            post_id: PostId(id),
            parent_id: request.parent_id.map(CommentId),
            creator: UserId(request.creator),
            text: request.text,
            is_nesting_permitted: request.is_nesting_permitted,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// GET /admin/comments/:id
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = state.comment_service.get(&CommentId(id)).await?;
    Ok(Json(comment.into()))
}

/// GET /admin/comments/:id/raw
///
/// Stored text, even while the comment is removed.
pub async fn get_comment_raw(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RawTextResponse>, AppError> {
    let id = CommentId(id);
    let text = state.comment_service.raw_text(&id).await?;
    Ok(Json(RawTextResponse { id, text }))
}

/// PATCH /admin/comments/:id
pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = state
        .comment_service
        .edit_text(&CommentId(id), &request.text)
        .await?;
    Ok(Json(comment.into()))
}

/// DELETE /admin/comments/:id
///
/// Deletes the comment and every reply beneath it.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteCommentResponse>, AppError> {
    let deleted = state.comment_service.delete(&CommentId(id)).await?;
    Ok(Json(DeleteCommentResponse { deleted }))
}

/// PUT /admin/comments/:id/removed
pub async fn set_comment_removed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetRemovedRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = state
        .comment_service
        .set_removed(&CommentId(id), request.removed)
        .await?;
    Ok(Json(comment.into()))
}

/// PUT /admin/comments/:id/nesting
pub async fn set_comment_nesting(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetNestingRequest>,
) -> Result<Json<CommentResponse>, AppError> {
    let comment = state
        .comment_service
        .set_nesting_permitted(&CommentId(id), request.permitted)
        .await?;
    Ok(Json(comment.into()))
}

/// PUT /admin/comments/:id/relations/:relation/:user_id
pub async fn relate_comment(
    State(state): State<AppState>,
    Path((id, relation, user_id)): Path<(Uuid, String, Uuid)>,
) -> Result<StatusCode, AppError> {
    let relation: CommentRelation = parse_segment(&relation)?;
    state
        .comment_service
        .relate(&CommentId(id), relation, &UserId(user_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /admin/comments/:id/relations/:relation/:user_id
pub async fn unrelate_comment(
    State(state): State<AppState>,
    Path((id, relation, user_id)): Path<(Uuid, String, Uuid)>,
) -> Result<StatusCode, AppError> {
    let relation: CommentRelation = parse_segment(&relation)?;
    state
        .comment_service
        .unrelate(&CommentId(id), relation, &UserId(user_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
