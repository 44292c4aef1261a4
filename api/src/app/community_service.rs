//! Community service
//!
//! Community lifecycle plus the membership workflows around it: joining,
//! invites, join requests and the role roster.

use std::sync::Arc;

use crate::app::validation::{limit_optional, require_text};
use crate::domain::entities::{
    Community, CommunityChanges, CommunityId, CommunityInvite, CommunityMember,
    CommunityMemberRequest, InviteId, InviteRole, MemberRequestId, MemberRole, MemberStatus,
    NewCommunity, NewCommunityInvite, NewCommunityMember, Roster, UserId,
    COMMUNITY_HEADER_MAX_LEN, COMMUNITY_NAME_MAX_LEN,
};
use crate::domain::ports::CommunityRepository;
use crate::error::{AppError, DomainError};

/// What a join attempt produced
#[derive(Debug, Clone)]
pub enum JoinOutcome {
    /// Public community: the user is a member now
    Joined(CommunityMember),
    /// Restricted or private community: staff must approve the request
    Requested(CommunityMemberRequest),
}

/// Service for communities and their membership
pub struct CommunityService<C>
where
    C: CommunityRepository,
{
    communities: Arc<C>,
}

impl<C> CommunityService<C>
where
    C: CommunityRepository,
{
    pub fn new(communities: Arc<C>) -> Self {
        Self { communities }
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Community>, AppError> {
        Ok(self.communities.list(limit, offset).await?)
    }

    /// Get a community, failing with NotFound when absent
    pub async fn get(&self, id: &CommunityId) -> Result<Community, AppError> {
        self.communities
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Community {}", id)))
    }

    pub async fn create(&self, community: NewCommunity) -> Result<Community, AppError> {
        validate_name(&community.name)?;
        limit_optional(
            "Community header",
            community.header.as_deref(),
            COMMUNITY_HEADER_MAX_LEN,
        )?;

        // The unique index settles races; this gives the common case a clear message
        if self
            .communities
            .find_by_name(&community.name)
            .await?
            .is_some()
        {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "Community with name '{}' already exists",
                community.name
            ))));
        }

        let created = self.communities.create(&community).await?;
        tracing::info!(community_id = %created.id, name = %created.name, "Community created");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: &CommunityId,
        changes: CommunityChanges,
    ) -> Result<Community, AppError> {
        if changes.is_empty() {
            return self.get(id).await;
        }
        if let Some(name) = &changes.name {
            validate_name(name)?;
        }
        if let Some(Some(header)) = &changes.header {
            limit_optional("Community header", Some(header), COMMUNITY_HEADER_MAX_LEN)?;
        }

        Ok(self.communities.update(id, &changes).await?)
    }

    /// Delete a community with everything it owns
    pub async fn delete(&self, id: &CommunityId) -> Result<(), AppError> {
        self.communities.delete(id).await?;
        tracing::info!(community_id = %id, "Community deleted");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------------

    /// Join a community.
    ///
    /// Public communities admit the user directly; the others file a join
    /// request for staff to approve.
    pub async fn join(&self, id: &CommunityId, user_id: &UserId) -> Result<JoinOutcome, AppError> {
        let community = self.get(id).await?;

        if self.communities.find_member(id, user_id).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "User {} is already a member of '{}'",
                user_id, community.name
            ))));
        }

        if community.community_type.requires_approval() {
            let request = self.communities.create_request(id, user_id).await?;
            tracing::info!(community_id = %id, user_id = %user_id, "Join request filed");
            return Ok(JoinOutcome::Requested(request));
        }

        let member = self
            .communities
            .add_member(&NewCommunityMember {
                community_id: *id,
                user_id: *user_id,
                role: MemberRole::Member,
                status: MemberStatus::Active,
            })
            .await?;
        Ok(JoinOutcome::Joined(member))
    }

    pub async fn add_member(
        &self,
        id: &CommunityId,
        user_id: &UserId,
        role: MemberRole,
    ) -> Result<CommunityMember, AppError> {
        let member = self
            .communities
            .add_member(&NewCommunityMember {
                community_id: *id,
                user_id: *user_id,
                role,
                status: MemberStatus::Active,
            })
            .await?;
        tracing::info!(community_id = %id, user_id = %user_id, role = %role, "Member added");
        Ok(member)
    }

    /// Change a member's role and/or status
    pub async fn update_member(
        &self,
        id: &CommunityId,
        user_id: &UserId,
        role: Option<MemberRole>,
        status: Option<MemberStatus>,
    ) -> Result<CommunityMember, AppError> {
        if role.is_none() && status.is_none() {
            return self
                .communities
                .find_member(id, user_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Member {}", user_id)));
        }

        Ok(self
            .communities
            .update_member(id, user_id, role, status)
            .await?)
    }

    pub async fn remove_member(&self, id: &CommunityId, user_id: &UserId) -> Result<(), AppError> {
        self.communities.remove_member(id, user_id).await?;
        tracing::info!(community_id = %id, user_id = %user_id, "Member removed");
        Ok(())
    }

    /// Admins, moderators and members of a community
    pub async fn roster(&self, id: &CommunityId) -> Result<Roster, AppError> {
        self.get(id).await?;
        let members = self.communities.list_members(id).await?;
        Ok(Roster::new(members))
    }

    // ------------------------------------------------------------------------
    // Invites
    // ------------------------------------------------------------------------

    pub async fn invite(
        &self,
        id: &CommunityId,
        inviter: &UserId,
        invitee: &UserId,
        invite_as: InviteRole,
    ) -> Result<CommunityInvite, AppError> {
        self.get(id).await?;

        if self.communities.find_member(id, invitee).await?.is_some() {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "User {} is already a member",
                invitee
            ))));
        }

        let invite = self
            .communities
            .create_invite(&NewCommunityInvite {
                community_id: *id,
                inviter: *inviter,
                invitee: *invitee,
                invite_as,
            })
            .await?;
        tracing::info!(community_id = %id, invitee = %invitee, "Invite sent");
        Ok(invite)
    }

    pub async fn list_invites(&self, id: &CommunityId) -> Result<Vec<CommunityInvite>, AppError> {
        Ok(self.communities.list_invites(id).await?)
    }

    /// Accept an invite: the invitee becomes a member with the offered role
    pub async fn accept_invite(&self, invite_id: &InviteId) -> Result<CommunityMember, AppError> {
        let member = self.communities.accept_invite(invite_id).await?;
        tracing::info!(
            community_id = %member.community_id,
            user_id = %member.user_id,
            role = %member.role,
            "Invite accepted"
        );
        Ok(member)
    }

    pub async fn decline_invite(&self, invite_id: &InviteId) -> Result<(), AppError> {
        Ok(self.communities.delete_invite(invite_id).await?)
    }

    // ------------------------------------------------------------------------
    // Join requests
    // ------------------------------------------------------------------------

    pub async fn list_requests(
        &self,
        id: &CommunityId,
    ) -> Result<Vec<CommunityMemberRequest>, AppError> {
        Ok(self.communities.list_requests(id).await?)
    }

    pub async fn approve_request(
        &self,
        request_id: &MemberRequestId,
    ) -> Result<CommunityMember, AppError> {
        let member = self.communities.approve_request(request_id).await?;
        tracing::info!(
            community_id = %member.community_id,
            user_id = %member.user_id,
            "Join request approved"
        );
        Ok(member)
    }

    /// Reject a request by deleting it
    pub async fn reject_request(&self, request_id: &MemberRequestId) -> Result<(), AppError> {
        Ok(self.communities.delete_request(request_id).await?)
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    require_text("Community name", name, COMMUNITY_NAME_MAX_LEN)
}

/// Check that a viewer may read a community's posts.
///
/// Anonymous viewers only see communities open to non-members.
pub(crate) async fn ensure_visible<C>(
    communities: &C,
    community: &Community,
    viewer: Option<&UserId>,
) -> Result<(), AppError>
where
    C: CommunityRepository,
{
    let is_member = match viewer {
        Some(user_id) => communities
            .find_member(&community.id, user_id)
            .await?
            .is_some(),
        None => false,
    };

    if !community.community_type.allows_viewing(is_member) {
        return Err(AppError::Domain(DomainError::Forbidden(format!(
            "Only members may view '{}'",
            community.name
        ))));
    }
    Ok(())
}

/// Check that a user may post, comment or react in a community.
///
/// The community type decides whether non-members may take part at all;
/// muted and banned members never may.
pub(crate) async fn ensure_participation<C>(
    communities: &C,
    community: &Community,
    user_id: &UserId,
) -> Result<(), AppError>
where
    C: CommunityRepository,
{
    let member = communities.find_member(&community.id, user_id).await?;

    if !community.community_type.allows_posting(member.is_some()) {
        return Err(AppError::Domain(DomainError::Forbidden(format!(
            "Only members may take part in '{}'",
            community.name
        ))));
    }
    if let Some(member) = member {
        if !member.status.can_participate() {
            return Err(AppError::Domain(DomainError::Forbidden(format!(
                "Member is {} in '{}'",
                member.status, community.name
            ))));
        }
    }
    Ok(())
}
