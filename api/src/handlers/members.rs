//! Membership handlers
//!
//! Admin endpoints for members, invites and join requests.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::JoinOutcome;
use crate::domain::entities::{
    CommunityId, CommunityInvite, CommunityMember, CommunityMemberRequest, InviteId, InviteRole,
    MemberRequestId, MemberRole, MemberStatus, UserId,
};
use crate::error::AppError;
use crate::AppState;

/// Members of a community split by role
#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub admins: Vec<CommunityMember>,
    pub moderators: Vec<CommunityMember>,
    pub members: Vec<CommunityMember>,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub role: MemberRole,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub role: Option<MemberRole>,
    pub status: Option<MemberStatus>,
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub user_id: Uuid,
}

/// Result of a join: a membership, or a request awaiting approval
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinResponse {
    Joined { member: CommunityMember },
    Requested { request: CommunityMemberRequest },
}

#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    pub inviter: Uuid,
    pub invitee: Uuid,
    #[serde(default)]
    pub invite_as: InviteRole,
}

/// GET /admin/communities/:id/members
///
/// Members grouped into admins, moderators and members.
pub async fn get_roster(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RosterResponse>, AppError> {
    let roster = state.community_service.roster(&CommunityId(id)).await?;

    Ok(Json(RosterResponse {
        admins: roster.admins().into_iter().cloned().collect(),
        moderators: roster.moderators().into_iter().cloned().collect(),
        members: roster.members().into_iter().cloned().collect(),
    }))
}

/// POST /admin/communities/:id/members
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<CommunityMember>), AppError> {
    let member = state
        .community_service
        .add_member(&CommunityId(id), &UserId(request.user_id), request.role)
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// PATCH /admin/communities/:id/members/:user_id
///
/// Change a member's role and/or status.
pub async fn update_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<Json<CommunityMember>, AppError> {
    let member = state
        .community_service
        .update_member(
            &CommunityId(id),
            &UserId(user_id),
            request.role,
            request.status,
        )
        .await?;

    Ok(Json(member))
}

/// DELETE /admin/communities/:id/members/:user_id
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state
        .community_service
        .remove_member(&CommunityId(id), &UserId(user_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /admin/communities/:id/join
///
/// Join on behalf of a user. Restricted and private communities file a
/// request instead.
pub async fn join_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, AppError> {
    let outcome = state
        .community_service
        .join(&CommunityId(id), &UserId(request.user_id))
        .await?;

    Ok(Json(match outcome {
        JoinOutcome::Joined(member) => JoinResponse::Joined { member },
        JoinOutcome::Requested(request) => JoinResponse::Requested { request },
    }))
}

/// GET /admin/communities/:id/invites
pub async fn list_invites(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommunityInvite>>, AppError> {
    let invites = state.community_service.list_invites(&CommunityId(id)).await?;
    Ok(Json(invites))
}

/// POST /admin/communities/:id/invites
pub async fn create_invite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<CommunityInvite>), AppError> {
    let invite = state
        .community_service
        .invite(
            &CommunityId(id),
            &UserId(request.inviter),
            &UserId(request.invitee),
            request.invite_as,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(invite)))
}

/// POST /admin/invites/:id/accept
///
/// The invitee becomes a member with the offered role; the invite is consumed.
pub async fn accept_invite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CommunityMember>, AppError> {
    let member = state.community_service.accept_invite(&InviteId(id)).await?;
    Ok(Json(member))
}

/// DELETE /admin/invites/:id
pub async fn decline_invite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.community_service.decline_invite(&InviteId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/communities/:id/requests
pub async fn list_requests(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommunityMemberRequest>>, AppError> {
    let requests = state
        .community_service
        .list_requests(&CommunityId(id))
        .await?;
    Ok(Json(requests))
}

/// POST /admin/requests/:id/approve
pub async fn approve_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CommunityMember>, AppError> {
    let member = state
        .community_service
        .approve_request(&MemberRequestId(id))
        .await?;
    Ok(Json(member))
}

/// DELETE /admin/requests/:id
pub async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .community_service
        .reject_request(&MemberRequestId(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
