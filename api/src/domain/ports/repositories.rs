//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Relation edits (`add_relation`, `remove_relation`, followers) are
//! idempotent: adding a present user or removing an absent one succeeds
//! without changing anything.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::entities::{
    CommentId, CommentRelation, Community, CommunityChanges, CommunityFlair, CommunityId,
    CommunityInvite, CommunityList, CommunityMember, CommunityMemberRequest, CommunityPage,
    CommunityRule, FlairId, InviteId, MemberRequestId, MemberRole, MemberStatus, NewCommunity,
    NewCommunityFlair, NewCommunityInvite, NewCommunityMember, NewCommunityPage,
    NewCommunityRule, NewPost, NewPostComment, NewReport, PageId, Post, PostChanges, PostComment,
    PostId, PostRelation, PostStatus, Profile, ProfileChanges, Report, ReportId, ReportStatus,
    ReportSubject, RuleId, UserId,
};
use crate::error::DomainError;

/// Repository for communities and everything they own
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// Find a community by ID
    async fn find_by_id(&self, id: &CommunityId) -> Result<Option<Community>, DomainError>;

    /// Find a community by its unique name
    async fn find_by_name(&self, name: &str) -> Result<Option<Community>, DomainError>;

    /// List communities, newest first
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Community>, DomainError>;

    /// Create a community. Fails with `AlreadyExists` on a duplicate name.
    async fn create(&self, community: &NewCommunity) -> Result<Community, DomainError>;

    /// Apply a partial update
    async fn update(
        &self,
        id: &CommunityId,
        changes: &CommunityChanges,
    ) -> Result<Community, DomainError>;

    /// Delete a community together with its members, invites, requests,
    /// pages, rules, flairs and posts
    async fn delete(&self, id: &CommunityId) -> Result<(), DomainError>;

    // Members

    /// All membership rows of a community
    async fn list_members(&self, id: &CommunityId) -> Result<Vec<CommunityMember>, DomainError>;

    async fn find_member(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
    ) -> Result<Option<CommunityMember>, DomainError>;

    /// Add a member. Fails with `AlreadyExists` if the user already has a row.
    async fn add_member(&self, member: &NewCommunityMember)
        -> Result<CommunityMember, DomainError>;

    /// Change a member's role and/or status
    async fn update_member(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
        role: Option<MemberRole>,
        status: Option<MemberStatus>,
    ) -> Result<CommunityMember, DomainError>;

    async fn remove_member(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
    ) -> Result<(), DomainError>;

    // Invites

    async fn create_invite(
        &self,
        invite: &NewCommunityInvite,
    ) -> Result<CommunityInvite, DomainError>;

    async fn find_invite(&self, id: &InviteId) -> Result<Option<CommunityInvite>, DomainError>;

    async fn list_invites(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityInvite>, DomainError>;

    /// Turn an invite into a membership with the invited role and consume it,
    /// atomically
    async fn accept_invite(&self, id: &InviteId) -> Result<CommunityMember, DomainError>;

    async fn delete_invite(&self, id: &InviteId) -> Result<(), DomainError>;

    // Join requests

    async fn create_request(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
    ) -> Result<CommunityMemberRequest, DomainError>;

    async fn find_request(
        &self,
        id: &MemberRequestId,
    ) -> Result<Option<CommunityMemberRequest>, DomainError>;

    async fn list_requests(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityMemberRequest>, DomainError>;

    /// Mark a request approved and add the requester as a MEMBER, atomically
    async fn approve_request(&self, id: &MemberRequestId) -> Result<CommunityMember, DomainError>;

    async fn delete_request(&self, id: &MemberRequestId) -> Result<(), DomainError>;
}

/// Repository for community pages, rules and flairs
#[async_trait]
pub trait CommunityContentRepository: Send + Sync {
    async fn create_page(&self, page: &NewCommunityPage) -> Result<CommunityPage, DomainError>;

    async fn find_page(&self, id: &PageId) -> Result<Option<CommunityPage>, DomainError>;

    async fn list_pages(&self, community_id: &CommunityId)
        -> Result<Vec<CommunityPage>, DomainError>;

    /// Persist the title and content of an existing page
    async fn update_page(&self, page: &CommunityPage) -> Result<CommunityPage, DomainError>;

    async fn delete_page(&self, id: &PageId) -> Result<(), DomainError>;

    async fn create_rule(&self, rule: &NewCommunityRule) -> Result<CommunityRule, DomainError>;

    async fn find_rule(&self, id: &RuleId) -> Result<Option<CommunityRule>, DomainError>;

    async fn list_rules(&self, community_id: &CommunityId)
        -> Result<Vec<CommunityRule>, DomainError>;

    /// Persist the title, description and type of an existing rule
    async fn update_rule(&self, rule: &CommunityRule) -> Result<CommunityRule, DomainError>;

    async fn delete_rule(&self, id: &RuleId) -> Result<(), DomainError>;

    async fn create_flair(&self, flair: &NewCommunityFlair)
        -> Result<CommunityFlair, DomainError>;

    async fn find_flair(&self, id: &FlairId) -> Result<Option<CommunityFlair>, DomainError>;

    async fn list_flairs(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityFlair>, DomainError>;

    /// Persist the name and colour of an existing flair
    async fn update_flair(&self, flair: &CommunityFlair) -> Result<CommunityFlair, DomainError>;

    /// Delete a flair. Posts carrying it keep existing with no flair.
    async fn delete_flair(&self, id: &FlairId) -> Result<(), DomainError>;
}

/// Repository for posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError>;

    /// Posts of a community, newest first, optionally filtered by status
    async fn list_by_community(
        &self,
        community_id: &CommunityId,
        status: Option<PostStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, DomainError>;

    async fn create(&self, post: &NewPost) -> Result<Post, DomainError>;

    async fn update(&self, id: &PostId, changes: &PostChanges) -> Result<Post, DomainError>;

    async fn set_status(&self, id: &PostId, status: PostStatus) -> Result<Post, DomainError>;

    async fn set_flair(&self, id: &PostId, flair_id: Option<FlairId>)
        -> Result<Post, DomainError>;

    async fn add_relation(
        &self,
        id: &PostId,
        relation: PostRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError>;

    async fn remove_relation(
        &self,
        id: &PostId,
        relation: PostRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError>;

    /// Archive the community's PUBLIC posts created before `cutoff`.
    /// Returns how many posts changed.
    async fn archive_created_before(
        &self,
        community_id: &CommunityId,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, DomainError>;

    /// Delete a post with its comments and reports
    async fn delete(&self, id: &PostId) -> Result<(), DomainError>;
}

/// Repository for post comments
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<PostComment>, DomainError>;

    /// Every comment of a post, oldest first
    async fn list_by_post(&self, post_id: &PostId) -> Result<Vec<PostComment>, DomainError>;

    async fn create(&self, comment: &NewPostComment) -> Result<PostComment, DomainError>;

    /// Overwrite the stored text, leaving the removal flag alone
    async fn update_text(&self, id: &CommentId, text: &str) -> Result<PostComment, DomainError>;

    /// Set the removal flag, leaving the stored text alone
    async fn set_removed(&self, id: &CommentId, removed: bool)
        -> Result<PostComment, DomainError>;

    async fn set_nesting_permitted(
        &self,
        id: &CommentId,
        permitted: bool,
    ) -> Result<PostComment, DomainError>;

    async fn add_relation(
        &self,
        id: &CommentId,
        relation: CommentRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError>;

    async fn remove_relation(
        &self,
        id: &CommentId,
        relation: CommentRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError>;

    /// Delete the given comments in one transaction.
    /// Callers pass a whole reply subtree, descendants first.
    async fn delete_many(&self, ids: &[CommentId]) -> Result<u64, DomainError>;
}

/// Repository for reports against one kind of subject
#[async_trait]
pub trait ReportRepository<S: ReportSubject>: Send + Sync {
    /// File a report. Fails with `NotFound` if the subject does not exist.
    async fn create(&self, report: &NewReport<S>) -> Result<Report<S>, DomainError>;

    async fn find_by_id(&self, id: &ReportId) -> Result<Option<Report<S>>, DomainError>;

    /// Reports, newest first, optionally filtered by status
    async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Report<S>>, DomainError>;

    async fn list_for_subject(&self, subject: &S) -> Result<Vec<Report<S>>, DomainError>;

    async fn set_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<Report<S>, DomainError>;
}

/// Repository for user profiles
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError>;

    /// Create an empty profile. Fails with `AlreadyExists` if one exists.
    async fn create(&self, user_id: &UserId) -> Result<Profile, DomainError>;

    /// Write the descriptive fields present in `changes`, leaving every
    /// other column as stored.
    async fn update(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Profile, DomainError>;

    /// Append `name` to a community list unless it is already there.
    /// The check and the write happen in one statement.
    async fn add_community(
        &self,
        user_id: &UserId,
        list: CommunityList,
        name: &str,
    ) -> Result<(), DomainError>;

    async fn remove_community(
        &self,
        user_id: &UserId,
        list: CommunityList,
        name: &str,
    ) -> Result<(), DomainError>;

    async fn set_requesting_delete(
        &self,
        user_id: &UserId,
        requested: bool,
    ) -> Result<(), DomainError>;

    async fn set_banned_until(
        &self,
        user_id: &UserId,
        until: Option<NaiveDate>,
    ) -> Result<(), DomainError>;

    async fn add_follower(&self, user_id: &UserId, follower: &UserId)
        -> Result<(), DomainError>;

    async fn remove_follower(
        &self,
        user_id: &UserId,
        follower: &UserId,
    ) -> Result<(), DomainError>;
}
