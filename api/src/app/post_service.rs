//! Post service
//!
//! Creation and moderation of posts, user reactions, and the archive sweep
//! for communities that archive old posts.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::app::community_service::{ensure_participation, ensure_visible};
use crate::app::validation::{limit_text, require_text};
use crate::domain::entities::{
    Community, CommunityId, FlairId, NewPost, Post, PostChanges, PostId, PostRelation, PostStatus,
    UserId, POST_TITLE_MAX_LEN, POST_URL_MAX_LEN,
};
use crate::domain::ports::{CommunityContentRepository, CommunityRepository, PostRepository};
use crate::error::{AppError, DomainError};

pub struct PostService<P, C, K>
where
    P: PostRepository,
    C: CommunityRepository,
    K: CommunityContentRepository,
{
    posts: Arc<P>,
    communities: Arc<C>,
    content: Arc<K>,
    /// Age after which public posts get archived. `None` when the age is too
    /// large to represent, in which case nothing is ever old enough.
    archive_after: Option<Duration>,
}

impl<P, C, K> PostService<P, C, K>
where
    P: PostRepository,
    C: CommunityRepository,
    K: CommunityContentRepository,
{
    pub fn new(
        posts: Arc<P>,
        communities: Arc<C>,
        content: Arc<K>,
        archive_after_days: u32,
    ) -> Self {
        Self {
            posts,
            communities,
            content,
            archive_after: Duration::try_days(i64::from(archive_after_days)),
        }
    }

    /// Create a post on behalf of its creator
    pub async fn create(&self, post: NewPost) -> Result<Post, AppError> {
        validate_title(&post.title)?;
        limit_text("Post URL", &post.url, POST_URL_MAX_LEN)?;
        if post.content.trim().is_empty() {
            return Err(AppError::BadRequest("Post content must not be empty".to_string()));
        }

        let community = self.community(&post.community_id).await?;
        ensure_participation(self.communities.as_ref(), &community, &post.creator).await?;
        if let Some(flair_id) = &post.flair_id {
            self.ensure_flair_in(flair_id, &community).await?;
        }

        let created = self.posts.create(&post).await?;
        tracing::info!(
            post_id = %created.id,
            community_id = %created.community_id,
            "Post created"
        );
        Ok(created)
    }

    pub async fn get(&self, id: &PostId) -> Result<Post, AppError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {}", id)))
    }

    /// Newest first, optionally restricted to one status.
    /// Private communities list only for members.
    pub async fn list_for_community(
        &self,
        community_id: &CommunityId,
        viewer: Option<&UserId>,
        status: Option<PostStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, AppError> {
        let community = self.community(community_id).await?;
        ensure_visible(self.communities.as_ref(), &community, viewer).await?;

        Ok(self
            .posts
            .list_by_community(community_id, status, limit, offset)
            .await?)
    }

    pub async fn update(&self, id: &PostId, changes: PostChanges) -> Result<Post, AppError> {
        if changes.is_empty() {
            return self.get(id).await;
        }
        if let Some(title) = &changes.title {
            validate_title(title)?;
        }
        if let Some(url) = &changes.url {
            limit_text("Post URL", url, POST_URL_MAX_LEN)?;
        }
        if let Some(content) = &changes.content {
            if content.trim().is_empty() {
                return Err(AppError::BadRequest("Post content must not be empty".to_string()));
            }
        }

        Ok(self.posts.update(id, &changes).await?)
    }

    pub async fn set_status(&self, id: &PostId, status: PostStatus) -> Result<Post, AppError> {
        let post = self.posts.set_status(id, status).await?;
        tracing::info!(post_id = %id, status = %status, "Post status changed");
        Ok(post)
    }

    /// Attach a flair from the post's own community, or clear it with `None`
    pub async fn set_flair(
        &self,
        id: &PostId,
        flair_id: Option<FlairId>,
    ) -> Result<Post, AppError> {
        if let Some(flair_id) = &flair_id {
            let post = self.get(id).await?;
            let community = self.community(&post.community_id).await?;
            self.ensure_flair_in(flair_id, &community).await?;
        }

        Ok(self.posts.set_flair(id, flair_id).await?)
    }

    /// Add a user to one of the post's user sets. Repeats are no-ops.
    pub async fn relate(
        &self,
        id: &PostId,
        relation: PostRelation,
        user_id: &UserId,
    ) -> Result<(), AppError> {
        let post = self.get(id).await?;
        if matches!(relation, PostRelation::Like | PostRelation::Dislike) {
            let community = self.community(&post.community_id).await?;
            ensure_participation(self.communities.as_ref(), &community, user_id).await?;
        }

        Ok(self.posts.add_relation(id, relation, user_id).await?)
    }

    /// Remove a user from one of the post's user sets. Absent users are no-ops.
    pub async fn unrelate(
        &self,
        id: &PostId,
        relation: PostRelation,
        user_id: &UserId,
    ) -> Result<(), AppError> {
        Ok(self.posts.remove_relation(id, relation, user_id).await?)
    }

    /// Delete a post with its comments and reports
    pub async fn delete(&self, id: &PostId) -> Result<(), AppError> {
        self.posts.delete(id).await?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Archive public posts older than the configured age.
    ///
    /// Communities without `archive_posts` are left alone. Returns the
    /// number of posts archived.
    pub async fn archive_stale(
        &self,
        community_id: &CommunityId,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let community = self.community(community_id).await?;
        if !community.archive_posts {
            return Ok(0);
        }

        let Some(cutoff) = self
            .archive_after
            .and_then(|age| now.checked_sub_signed(age))
        else {
            return Ok(0);
        };
        let archived = self
            .posts
            .archive_created_before(community_id, cutoff)
            .await?;
        tracing::info!(community_id = %community_id, archived, %cutoff, "Archived stale posts");
        Ok(archived)
    }

    async fn community(&self, id: &CommunityId) -> Result<Community, AppError> {
        self.communities
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Community {}", id)))
    }

    async fn ensure_flair_in(
        &self,
        flair_id: &FlairId,
        community: &Community,
    ) -> Result<(), AppError> {
        let flair = self
            .content
            .find_flair(flair_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Flair {}", flair_id)))?;

        if flair.community_id != community.id {
            return Err(AppError::Domain(DomainError::Validation(format!(
                "Flair {} does not belong to '{}'",
                flair_id, community.name
            ))));
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), AppError> {
    require_text("Post title", title, POST_TITLE_MAX_LEN)
}
