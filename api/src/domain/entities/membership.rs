//! Community membership entities
//!
//! Members, invites and join requests, plus the role partition of a roster.

use serde::{Deserialize, Serialize};

use super::{CommunityId, InviteId, MemberRequestId, Timestamps, UserId};

/// Role of a member within a community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    /// Can add or remove moderators, ban or mute members
    Admin,
    /// Can add, remove, ban or mute members
    Moderator,
    /// Can post, like, comment, share and bookmark
    #[default]
    Member,
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberRole::Admin => write!(f, "ADMIN"),
            MemberRole::Moderator => write!(f, "MODERATOR"),
            MemberRole::Member => write!(f, "MEMBER"),
        }
    }
}

impl std::str::FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(MemberRole::Admin),
            "MODERATOR" => Ok(MemberRole::Moderator),
            "MEMBER" => Ok(MemberRole::Member),
            _ => Err(format!("Unknown member role: {}", s)),
        }
    }
}

/// Standing of a member within a community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    #[default]
    Active,
    /// No activity allowed for the duration of the mute
    Muted,
    /// No activity allowed, permanently
    Banned,
}

impl MemberStatus {
    /// Whether the member may post, comment or react
    pub fn can_participate(&self) -> bool {
        match self {
            MemberStatus::Active => true,
            MemberStatus::Muted | MemberStatus::Banned => false,
        }
    }
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberStatus::Active => write!(f, "ACTIVE"),
            MemberStatus::Muted => write!(f, "MUTED"),
            MemberStatus::Banned => write!(f, "BANNED"),
        }
    }
}

impl std::str::FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(MemberStatus::Active),
            "MUTED" => Ok(MemberStatus::Muted),
            "BANNED" => Ok(MemberStatus::Banned),
            _ => Err(format!("Unknown member status: {}", s)),
        }
    }
}

/// A user's membership in a community
#[derive(Debug, Clone, Serialize)]
pub struct CommunityMember {
    pub community_id: CommunityId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub status: MemberStatus,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl std::fmt::Display for CommunityMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} added to {} as {}",
            self.user_id, self.community_id, self.role
        )
    }
}

/// Data needed to add a member
#[derive(Debug, Clone)]
pub struct NewCommunityMember {
    pub community_id: CommunityId,
    pub user_id: UserId,
    pub role: MemberRole,
    pub status: MemberStatus,
}

/// Role offered by an invite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InviteRole {
    #[default]
    Member,
    Moderator,
}

impl From<InviteRole> for MemberRole {
    fn from(role: InviteRole) -> Self {
        match role {
            InviteRole::Member => MemberRole::Member,
            InviteRole::Moderator => MemberRole::Moderator,
        }
    }
}

impl std::fmt::Display for InviteRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InviteRole::Member => write!(f, "MEMBER"),
            InviteRole::Moderator => write!(f, "MODERATOR"),
        }
    }
}

impl std::str::FromStr for InviteRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MEMBER" => Ok(InviteRole::Member),
            "MODERATOR" => Ok(InviteRole::Moderator),
            _ => Err(format!("Unknown invite role: {}", s)),
        }
    }
}

/// An invitation to join a community
#[derive(Debug, Clone, Serialize)]
pub struct CommunityInvite {
    pub id: InviteId,
    pub community_id: CommunityId,
    pub inviter: UserId,
    pub invitee: UserId,
    pub invite_as: InviteRole,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Data needed to create an invite
#[derive(Debug, Clone)]
pub struct NewCommunityInvite {
    pub community_id: CommunityId,
    pub inviter: UserId,
    pub invitee: UserId,
    pub invite_as: InviteRole,
}

/// A user's request to join a community that needs approval
#[derive(Debug, Clone, Serialize)]
pub struct CommunityMemberRequest {
    pub id: MemberRequestId,
    pub community_id: CommunityId,
    pub user_id: UserId,
    pub is_approved: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Read-only role views over a community's live membership rows
#[derive(Debug, Clone, Default)]
pub struct Roster {
    members: Vec<CommunityMember>,
}

impl Roster {
    pub fn new(members: Vec<CommunityMember>) -> Self {
        Self { members }
    }

    /// Members holding exactly the given role
    pub fn with_role(&self, role: MemberRole) -> Vec<&CommunityMember> {
        self.members.iter().filter(|m| m.role == role).collect()
    }

    pub fn admins(&self) -> Vec<&CommunityMember> {
        self.with_role(MemberRole::Admin)
    }

    pub fn moderators(&self) -> Vec<&CommunityMember> {
        self.with_role(MemberRole::Moderator)
    }

    pub fn members(&self) -> Vec<&CommunityMember> {
        self.with_role(MemberRole::Member)
    }

    /// Every membership row regardless of role
    pub fn all(&self) -> &[CommunityMember] {
        &self.members
    }

    pub fn find(&self, user_id: &UserId) -> Option<&CommunityMember> {
        self.members.iter().find(|m| &m.user_id == user_id)
    }
}
