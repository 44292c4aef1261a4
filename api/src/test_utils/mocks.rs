//! In-memory implementations of port traits
//!
//! `InMemoryStore` implements every repository trait over one shared set of
//! tables, so cascades and cross-table checks behave like the database:
//! unique pairs are rejected, missing parents are `NotFound`, and deleting a
//! parent removes what it owns.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    CommentBody, CommentId, CommentRelation, Community, CommunityChanges, CommunityFlair,
    CommunityId, CommunityInvite, CommunityList, CommunityMember, CommunityMemberRequest,
    CommunityPage, CommunityRule, FlairId, InviteId, MemberRequestId, MemberRole, MemberStatus,
    NewCommunity, NewCommunityFlair, NewCommunityInvite, NewCommunityMember, NewCommunityPage,
    NewCommunityRule, NewPost, NewPostComment, NewReport, PageId, Post, PostChanges, PostComment,
    PostId, PostRelation, PostReport, PostStatus, Profile, ProfileChanges, Report, ReportId,
    ReportStatus, RuleId, Timestamps, UserId, UserReport, UserSet,
};
use crate::domain::ports::{
    CommentRepository, CommunityContentRepository, CommunityRepository, PostRepository,
    ProfileRepository, ReportRepository,
};
use crate::error::DomainError;

#[derive(Default)]
struct Tables {
    communities: Vec<Community>,
    members: Vec<CommunityMember>,
    invites: Vec<CommunityInvite>,
    requests: Vec<CommunityMemberRequest>,
    pages: Vec<CommunityPage>,
    rules: Vec<CommunityRule>,
    flairs: Vec<CommunityFlair>,
    posts: Vec<Post>,
    comments: Vec<PostComment>,
    post_reports: Vec<PostReport>,
    user_reports: Vec<UserReport>,
    profiles: Vec<Profile>,
}

impl Tables {
    fn community_exists(&self, id: &CommunityId) -> Result<(), DomainError> {
        if self.communities.iter().any(|c| &c.id == id) {
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("Community {}", id)))
        }
    }

    fn post_mut(&mut self, id: &PostId) -> Result<&mut Post, DomainError> {
        self.posts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Post {}", id)))
    }

    fn comment_mut(&mut self, id: &CommentId) -> Result<&mut PostComment, DomainError> {
        self.comments
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Comment {}", id)))
    }

    fn profile_mut(&mut self, user_id: &UserId) -> Result<&mut Profile, DomainError> {
        self.profiles
            .iter_mut()
            .find(|p| &p.user_id == user_id)
            .ok_or_else(|| DomainError::NotFound(format!("Profile {}", user_id)))
    }

    fn insert_member(
        &mut self,
        community_id: CommunityId,
        user_id: UserId,
        role: MemberRole,
        status: MemberStatus,
    ) -> Result<CommunityMember, DomainError> {
        self.community_exists(&community_id)?;
        if self
            .members
            .iter()
            .any(|m| m.community_id == community_id && m.user_id == user_id)
        {
            return Err(DomainError::AlreadyExists(format!(
                "Member {} already in community {}",
                user_id, community_id
            )));
        }
        let member = CommunityMember {
            community_id,
            user_id,
            role,
            status,
            timestamps: Timestamps::new(),
        };
        self.members.push(member.clone());
        Ok(member)
    }

    /// Remove posts matching `doomed` with their comments and reports
    fn delete_posts(&mut self, doomed: &HashSet<PostId>) {
        self.posts.retain(|p| !doomed.contains(&p.id));
        self.comments.retain(|c| !doomed.contains(&c.post_id));
        self.post_reports.retain(|r| !doomed.contains(&r.subject));
    }
}

/// In-memory store implementing every repository port
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a community
    pub fn with_community(self, community: Community) -> Self {
        self.tables.write().unwrap().communities.push(community);
        self
    }

    /// Pre-populate with a membership row
    pub fn with_member(self, member: CommunityMember) -> Self {
        self.tables.write().unwrap().members.push(member);
        self
    }

    pub fn with_flair(self, flair: CommunityFlair) -> Self {
        self.tables.write().unwrap().flairs.push(flair);
        self
    }

    pub fn with_post(self, post: Post) -> Self {
        self.tables.write().unwrap().posts.push(post);
        self
    }

    pub fn with_comment(self, comment: PostComment) -> Self {
        self.tables.write().unwrap().comments.push(comment);
        self
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.tables.write().unwrap().profiles.push(profile);
        self
    }

    pub fn comment_count(&self) -> usize {
        self.tables.read().unwrap().comments.len()
    }

    pub fn post_count(&self) -> usize {
        self.tables.read().unwrap().posts.len()
    }

    pub fn member_count(&self) -> usize {
        self.tables.read().unwrap().members.len()
    }
}

// ============================================================================
// Communities
// ============================================================================

#[async_trait]
impl CommunityRepository for InMemoryStore {
    async fn find_by_id(&self, id: &CommunityId) -> Result<Option<Community>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.communities.iter().find(|c| &c.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Community>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.communities.iter().find(|c| c.name == name).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Community>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .communities
            .iter()
            .rev()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, community: &NewCommunity) -> Result<Community, DomainError> {
        let mut tables = self.tables.write().unwrap();
        if tables.communities.iter().any(|c| c.name == community.name) {
            return Err(DomainError::AlreadyExists(community.name.clone()));
        }

        let created = Community {
            id: CommunityId::new(),
            name: community.name.clone(),
            header: community.header.clone(),
            description: community.description.clone(),
            banner: community.banner.clone(),
            logo: community.logo.clone(),
            related_communities: community.related_communities.clone(),
            community_type: community.community_type,
            archive_posts: community.archive_posts,
            timestamps: Timestamps::new(),
        };
        tables.communities.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &CommunityId,
        changes: &CommunityChanges,
    ) -> Result<Community, DomainError> {
        let mut tables = self.tables.write().unwrap();
        if let Some(name) = &changes.name {
            if tables
                .communities
                .iter()
                .any(|c| &c.name == name && &c.id != id)
            {
                return Err(DomainError::AlreadyExists(name.clone()));
            }
        }

        let community = tables
            .communities
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Community {}", id)))?;
        changes.apply_to(community);
        Ok(community.clone())
    }

    async fn delete(&self, id: &CommunityId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.community_exists(id)?;

        tables.communities.retain(|c| &c.id != id);
        tables.members.retain(|m| &m.community_id != id);
        tables.invites.retain(|i| &i.community_id != id);
        tables.requests.retain(|r| &r.community_id != id);
        tables.pages.retain(|p| &p.community_id != id);
        tables.rules.retain(|r| &r.community_id != id);
        tables.flairs.retain(|f| &f.community_id != id);
        let doomed: HashSet<PostId> = tables
            .posts
            .iter()
            .filter(|p| &p.community_id == id)
            .map(|p| p.id)
            .collect();
        tables.delete_posts(&doomed);
        Ok(())
    }

    async fn list_members(&self, id: &CommunityId) -> Result<Vec<CommunityMember>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .members
            .iter()
            .filter(|m| &m.community_id == id)
            .cloned()
            .collect())
    }

    async fn find_member(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
    ) -> Result<Option<CommunityMember>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .members
            .iter()
            .find(|m| &m.community_id == community_id && &m.user_id == user_id)
            .cloned())
    }

    async fn add_member(
        &self,
        member: &NewCommunityMember,
    ) -> Result<CommunityMember, DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.insert_member(
            member.community_id,
            member.user_id,
            member.role,
            member.status,
        )
    }

    async fn update_member(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
        role: Option<MemberRole>,
        status: Option<MemberStatus>,
    ) -> Result<CommunityMember, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let member = tables
            .members
            .iter_mut()
            .find(|m| &m.community_id == community_id && &m.user_id == user_id)
            .ok_or_else(|| DomainError::NotFound(format!("Member {}", user_id)))?;

        if let Some(role) = role {
            member.role = role;
        }
        if let Some(status) = status {
            member.status = status;
        }
        member.timestamps.touch();
        Ok(member.clone())
    }

    async fn remove_member(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.members.len();
        tables
            .members
            .retain(|m| !(&m.community_id == community_id && &m.user_id == user_id));
        if tables.members.len() == before {
            Err(DomainError::NotFound(format!("Member {}", user_id)))
        } else {
            Ok(())
        }
    }

    async fn create_invite(
        &self,
        invite: &NewCommunityInvite,
    ) -> Result<CommunityInvite, DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.community_exists(&invite.community_id)?;

        let created = CommunityInvite {
            id: InviteId::new(),
            community_id: invite.community_id,
            inviter: invite.inviter,
            invitee: invite.invitee,
            invite_as: invite.invite_as,
            timestamps: Timestamps::new(),
        };
        tables.invites.push(created.clone());
        Ok(created)
    }

    async fn find_invite(&self, id: &InviteId) -> Result<Option<CommunityInvite>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.invites.iter().find(|i| &i.id == id).cloned())
    }

    async fn list_invites(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityInvite>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .invites
            .iter()
            .rev()
            .filter(|i| &i.community_id == community_id)
            .cloned()
            .collect())
    }

    async fn accept_invite(&self, id: &InviteId) -> Result<CommunityMember, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let invite = tables
            .invites
            .iter()
            .find(|i| &i.id == id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("Invite {}", id)))?;

        let member = tables.insert_member(
            invite.community_id,
            invite.invitee,
            invite.invite_as.into(),
            MemberStatus::Active,
        )?;
        tables.invites.retain(|i| &i.id != id);
        Ok(member)
    }

    async fn delete_invite(&self, id: &InviteId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.invites.len();
        tables.invites.retain(|i| &i.id != id);
        if tables.invites.len() == before {
            Err(DomainError::NotFound(format!("Invite {}", id)))
        } else {
            Ok(())
        }
    }

    async fn create_request(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
    ) -> Result<CommunityMemberRequest, DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.community_exists(community_id)?;
        if tables
            .requests
            .iter()
            .any(|r| &r.community_id == community_id && &r.user_id == user_id)
        {
            return Err(DomainError::AlreadyExists(format!(
                "Member request for {} in {}",
                user_id, community_id
            )));
        }

        let created = CommunityMemberRequest {
            id: MemberRequestId::new(),
            community_id: *community_id,
            user_id: *user_id,
            is_approved: false,
            timestamps: Timestamps::new(),
        };
        tables.requests.push(created.clone());
        Ok(created)
    }

    async fn find_request(
        &self,
        id: &MemberRequestId,
    ) -> Result<Option<CommunityMemberRequest>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.requests.iter().find(|r| &r.id == id).cloned())
    }

    async fn list_requests(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityMemberRequest>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .requests
            .iter()
            .filter(|r| &r.community_id == community_id)
            .cloned()
            .collect())
    }

    async fn approve_request(&self, id: &MemberRequestId) -> Result<CommunityMember, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let request = tables
            .requests
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("Member request {}", id)))?;
        if request.is_approved {
            return Err(DomainError::Conflict(format!(
                "Member request {} is already approved",
                id
            )));
        }

        let member = tables.insert_member(
            request.community_id,
            request.user_id,
            MemberRole::Member,
            MemberStatus::Active,
        )?;
        if let Some(stored) = tables.requests.iter_mut().find(|r| &r.id == id) {
            stored.is_approved = true;
            stored.timestamps.touch();
        }
        Ok(member)
    }

    async fn delete_request(&self, id: &MemberRequestId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.requests.len();
        tables.requests.retain(|r| &r.id != id);
        if tables.requests.len() == before {
            Err(DomainError::NotFound(format!("Member request {}", id)))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Pages, rules, flairs
// ============================================================================

#[async_trait]
impl CommunityContentRepository for InMemoryStore {
    async fn create_page(&self, page: &NewCommunityPage) -> Result<CommunityPage, DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.community_exists(&page.community_id)?;
        let created = CommunityPage {
            id: PageId::new(),
            community_id: page.community_id,
            title: page.title.clone(),
            content: page.content.clone(),
            timestamps: Timestamps::new(),
        };
        tables.pages.push(created.clone());
        Ok(created)
    }

    async fn find_page(&self, id: &PageId) -> Result<Option<CommunityPage>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.pages.iter().find(|p| &p.id == id).cloned())
    }

    async fn list_pages(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityPage>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .pages
            .iter()
            .filter(|p| &p.community_id == community_id)
            .cloned()
            .collect())
    }

    async fn update_page(&self, page: &CommunityPage) -> Result<CommunityPage, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let stored = tables
            .pages
            .iter_mut()
            .find(|p| p.id == page.id)
            .ok_or_else(|| DomainError::NotFound(format!("Page {}", page.id)))?;
        stored.title = page.title.clone();
        stored.content = page.content.clone();
        stored.timestamps.touch();
        Ok(stored.clone())
    }

    async fn delete_page(&self, id: &PageId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.pages.len();
        tables.pages.retain(|p| &p.id != id);
        if tables.pages.len() == before {
            Err(DomainError::NotFound(format!("Page {}", id)))
        } else {
            Ok(())
        }
    }

    async fn create_rule(&self, rule: &NewCommunityRule) -> Result<CommunityRule, DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.community_exists(&rule.community_id)?;
        let created = CommunityRule {
            id: RuleId::new(),
            community_id: rule.community_id,
            title: rule.title.clone(),
            description: rule.description.clone(),
            rule_type: rule.rule_type,
            timestamps: Timestamps::new(),
        };
        tables.rules.push(created.clone());
        Ok(created)
    }

    async fn find_rule(&self, id: &RuleId) -> Result<Option<CommunityRule>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.rules.iter().find(|r| &r.id == id).cloned())
    }

    async fn list_rules(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityRule>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .rules
            .iter()
            .filter(|r| &r.community_id == community_id)
            .cloned()
            .collect())
    }

    async fn update_rule(&self, rule: &CommunityRule) -> Result<CommunityRule, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let stored = tables
            .rules
            .iter_mut()
            .find(|r| r.id == rule.id)
            .ok_or_else(|| DomainError::NotFound(format!("Rule {}", rule.id)))?;
        stored.title = rule.title.clone();
        stored.description = rule.description.clone();
        stored.rule_type = rule.rule_type;
        stored.timestamps.touch();
        Ok(stored.clone())
    }

    async fn delete_rule(&self, id: &RuleId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.rules.len();
        tables.rules.retain(|r| &r.id != id);
        if tables.rules.len() == before {
            Err(DomainError::NotFound(format!("Rule {}", id)))
        } else {
            Ok(())
        }
    }

    async fn create_flair(
        &self,
        flair: &NewCommunityFlair,
    ) -> Result<CommunityFlair, DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.community_exists(&flair.community_id)?;
        let created = CommunityFlair {
            id: FlairId::new(),
            community_id: flair.community_id,
            name: flair.name.clone(),
            color: flair.color.clone(),
            timestamps: Timestamps::new(),
        };
        tables.flairs.push(created.clone());
        Ok(created)
    }

    async fn find_flair(&self, id: &FlairId) -> Result<Option<CommunityFlair>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.flairs.iter().find(|f| &f.id == id).cloned())
    }

    async fn list_flairs(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityFlair>, DomainError> {
        let tables = self.tables.read().unwrap();
        let mut flairs: Vec<CommunityFlair> = tables
            .flairs
            .iter()
            .filter(|f| &f.community_id == community_id)
            .cloned()
            .collect();
        flairs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(flairs)
    }

    async fn update_flair(&self, flair: &CommunityFlair) -> Result<CommunityFlair, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let stored = tables
            .flairs
            .iter_mut()
            .find(|f| f.id == flair.id)
            .ok_or_else(|| DomainError::NotFound(format!("Flair {}", flair.id)))?;
        stored.name = flair.name.clone();
        stored.color = flair.color.clone();
        stored.timestamps.touch();
        Ok(stored.clone())
    }

    async fn delete_flair(&self, id: &FlairId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.flairs.len();
        tables.flairs.retain(|f| &f.id != id);
        if tables.flairs.len() == before {
            return Err(DomainError::NotFound(format!("Flair {}", id)));
        }

        for post in tables.posts.iter_mut().filter(|p| p.flair_id == Some(*id)) {
            post.flair_id = None;
            post.timestamps.touch();
        }
        Ok(())
    }
}

// ============================================================================
// Posts
// ============================================================================

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.posts.iter().find(|p| &p.id == id).cloned())
    }

    async fn list_by_community(
        &self,
        community_id: &CommunityId,
        status: Option<PostStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .posts
            .iter()
            .rev()
            .filter(|p| &p.community_id == community_id)
            .filter(|p| status.map_or(true, |s| p.status == s))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, post: &NewPost) -> Result<Post, DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.community_exists(&post.community_id)?;
        if let Some(flair_id) = post.flair_id {
            if !tables.flairs.iter().any(|f| f.id == flair_id) {
                return Err(DomainError::NotFound(format!("Flair {}", flair_id)));
            }
        }

        let created = Post {
            id: PostId::new(),
            community_id: post.community_id,
            title: post.title.clone(),
            url: post.url.clone(),
            content: post.content.clone(),
            creator: post.creator,
            status: post.status,
            flair_id: post.flair_id,
            likes: UserSet::new(),
            dislikes: UserSet::new(),
            followers: UserSet::new(),
            bookmarks: UserSet::new(),
            timestamps: Timestamps::new(),
        };
        tables.posts.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &PostId, changes: &PostChanges) -> Result<Post, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let post = tables.post_mut(id)?;
        changes.apply_to(post);
        Ok(post.clone())
    }

    async fn set_status(&self, id: &PostId, status: PostStatus) -> Result<Post, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let post = tables.post_mut(id)?;
        post.status = status;
        post.timestamps.touch();
        Ok(post.clone())
    }

    async fn set_flair(
        &self,
        id: &PostId,
        flair_id: Option<FlairId>,
    ) -> Result<Post, DomainError> {
        let mut tables = self.tables.write().unwrap();
        if let Some(flair_id) = flair_id {
            if !tables.flairs.iter().any(|f| f.id == flair_id) {
                return Err(DomainError::NotFound(format!("Flair {}", flair_id)));
            }
        }
        let post = tables.post_mut(id)?;
        post.flair_id = flair_id;
        post.timestamps.touch();
        Ok(post.clone())
    }

    async fn add_relation(
        &self,
        id: &PostId,
        relation: PostRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.post_mut(id)?.relation_mut(relation).add_member(*user_id);
        Ok(())
    }

    async fn remove_relation(
        &self,
        id: &PostId,
        relation: PostRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        if let Some(post) = tables.posts.iter_mut().find(|p| &p.id == id) {
            post.relation_mut(relation).remove_member(user_id);
        }
        Ok(())
    }

    async fn archive_created_before(
        &self,
        community_id: &CommunityId,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let mut archived = 0;
        for post in tables.posts.iter_mut().filter(|p| {
            &p.community_id == community_id
                && p.status == PostStatus::Public
                && p.timestamps.created_at < cutoff
        }) {
            post.status = PostStatus::Archived;
            post.timestamps.touch();
            archived += 1;
        }
        Ok(archived)
    }

    async fn delete(&self, id: &PostId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.post_mut(id)?;
        tables.delete_posts(&HashSet::from([*id]));
        Ok(())
    }
}

// ============================================================================
// Comments
// ============================================================================

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<PostComment>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.comments.iter().find(|c| &c.id == id).cloned())
    }

    async fn list_by_post(&self, post_id: &PostId) -> Result<Vec<PostComment>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .comments
            .iter()
            .filter(|c| &c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn create(&self, comment: &NewPostComment) -> Result<PostComment, DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.post_mut(&comment.post_id)?;
        if let Some(parent_id) = comment.parent_id {
            tables.comment_mut(&parent_id)?;
        }

        let created = PostComment {
            id: CommentId::new(),
            post_id: comment.post_id,
            parent_id: comment.parent_id,
            creator: comment.creator,
            body: CommentBody::new(comment.text.clone(), comment.is_removed),
            is_nesting_permitted: comment.is_nesting_permitted,
            likes: UserSet::new(),
            dislikes: UserSet::new(),
            mentioned_users: UserSet::new(),
            timestamps: Timestamps::new(),
        };
        tables.comments.push(created.clone());
        Ok(created)
    }

    async fn update_text(&self, id: &CommentId, text: &str) -> Result<PostComment, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let comment = tables.comment_mut(id)?;
        comment.set_text(text);
        Ok(comment.clone())
    }

    async fn set_removed(
        &self,
        id: &CommentId,
        removed: bool,
    ) -> Result<PostComment, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let comment = tables.comment_mut(id)?;
        comment.set_removed(removed);
        Ok(comment.clone())
    }

    async fn set_nesting_permitted(
        &self,
        id: &CommentId,
        permitted: bool,
    ) -> Result<PostComment, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let comment = tables.comment_mut(id)?;
        comment.is_nesting_permitted = permitted;
        comment.timestamps.touch();
        Ok(comment.clone())
    }

    async fn add_relation(
        &self,
        id: &CommentId,
        relation: CommentRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables
            .comment_mut(id)?
            .relation_mut(relation)
            .add_member(*user_id);
        Ok(())
    }

    async fn remove_relation(
        &self,
        id: &CommentId,
        relation: CommentRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        if let Some(comment) = tables.comments.iter_mut().find(|c| &c.id == id) {
            comment.relation_mut(relation).remove_member(user_id);
        }
        Ok(())
    }

    async fn delete_many(&self, ids: &[CommentId]) -> Result<u64, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let doomed: HashSet<&CommentId> = ids.iter().collect();
        let before = tables.comments.len();
        tables.comments.retain(|c| !doomed.contains(&c.id));
        Ok((before - tables.comments.len()) as u64)
    }
}

// ============================================================================
// Reports
// ============================================================================

fn new_report<S: Copy>(report: &NewReport<S>) -> Report<S> {
    Report {
        id: ReportId::new(),
        subject: report.subject,
        reporter: report.reporter,
        title: report.title.clone(),
        details: report.details.clone(),
        status: ReportStatus::Initiated,
        timestamps: Timestamps::new(),
    }
}

fn page_of<S: Clone>(
    reports: &[Report<S>],
    status: Option<ReportStatus>,
    limit: i64,
    offset: i64,
) -> Vec<Report<S>> {
    reports
        .iter()
        .rev()
        .filter(|r| status.map_or(true, |s| r.status == s))
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}

fn restatus<S: Clone>(
    reports: &mut [Report<S>],
    id: &ReportId,
    status: ReportStatus,
) -> Result<Report<S>, DomainError> {
    let report = reports
        .iter_mut()
        .find(|r| &r.id == id)
        .ok_or_else(|| DomainError::NotFound(format!("Report {}", id)))?;
    report.status = status;
    report.timestamps.touch();
    Ok(report.clone())
}

#[async_trait]
impl ReportRepository<PostId> for InMemoryStore {
    async fn create(&self, report: &NewReport<PostId>) -> Result<PostReport, DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.post_mut(&report.subject)?;
        let created = new_report(report);
        tables.post_reports.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &ReportId) -> Result<Option<PostReport>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.post_reports.iter().find(|r| &r.id == id).cloned())
    }

    async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostReport>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(page_of(&tables.post_reports, status, limit, offset))
    }

    async fn list_for_subject(&self, subject: &PostId) -> Result<Vec<PostReport>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .post_reports
            .iter()
            .rev()
            .filter(|r| &r.subject == subject)
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<PostReport, DomainError> {
        let mut tables = self.tables.write().unwrap();
        restatus(&mut tables.post_reports, id, status)
    }
}

#[async_trait]
impl ReportRepository<UserId> for InMemoryStore {
    async fn create(&self, report: &NewReport<UserId>) -> Result<UserReport, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let created = new_report(report);
        tables.user_reports.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &ReportId) -> Result<Option<UserReport>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.user_reports.iter().find(|r| &r.id == id).cloned())
    }

    async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserReport>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(page_of(&tables.user_reports, status, limit, offset))
    }

    async fn list_for_subject(&self, subject: &UserId) -> Result<Vec<UserReport>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .user_reports
            .iter()
            .rev()
            .filter(|r| &r.subject == subject)
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<UserReport, DomainError> {
        let mut tables = self.tables.write().unwrap();
        restatus(&mut tables.user_reports, id, status)
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn find(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .profiles
            .iter()
            .find(|p| &p.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: &UserId) -> Result<Profile, DomainError> {
        let mut tables = self.tables.write().unwrap();
        if tables.profiles.iter().any(|p| &p.user_id == user_id) {
            return Err(DomainError::AlreadyExists(format!("Profile {}", user_id)));
        }
        let profile = Profile::new(*user_id);
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Profile, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let profile = tables.profile_mut(user_id)?;
        changes.apply_to(profile);
        Ok(profile.clone())
    }

    async fn add_community(
        &self,
        user_id: &UserId,
        list: CommunityList,
        name: &str,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        let names = community_list(tables.profile_mut(user_id)?, list);
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        Ok(())
    }

    async fn remove_community(
        &self,
        user_id: &UserId,
        list: CommunityList,
        name: &str,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        community_list(tables.profile_mut(user_id)?, list).retain(|n| n != name);
        Ok(())
    }

    async fn set_requesting_delete(
        &self,
        user_id: &UserId,
        requested: bool,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        let profile = tables.profile_mut(user_id)?;
        profile.is_requesting_delete = requested;
        profile.timestamps.touch();
        Ok(())
    }

    async fn set_banned_until(
        &self,
        user_id: &UserId,
        until: Option<NaiveDate>,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        let profile = tables.profile_mut(user_id)?;
        profile.banned_until = until;
        profile.timestamps.touch();
        Ok(())
    }

    async fn add_follower(
        &self,
        user_id: &UserId,
        follower: &UserId,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        tables.profile_mut(user_id)?.followers.add_member(*follower);
        Ok(())
    }

    async fn remove_follower(
        &self,
        user_id: &UserId,
        follower: &UserId,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        if let Some(profile) = tables.profiles.iter_mut().find(|p| &p.user_id == user_id) {
            profile.followers.remove_member(follower);
        }
        Ok(())
    }
}

fn community_list(profile: &mut Profile, list: CommunityList) -> &mut Vec<String> {
    match list {
        CommunityList::Favourite => &mut profile.favourite_communities,
        CommunityList::Muted => &mut profile.muted_communities,
    }
}
