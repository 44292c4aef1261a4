//! Comment service
//!
//! Threaded comments under posts. Readers only ever get the effective text;
//! moderators remove and restore comments without losing what was written.

use std::sync::Arc;

use crate::app::community_service::ensure_participation;
use crate::domain::entities::{
    CommentId, CommentRelation, CommentTree, Community, NewPostComment, Post, PostComment, PostId,
    UserId,
};
use crate::domain::ports::{CommentRepository, CommunityRepository, PostRepository};
use crate::error::{AppError, DomainError};

/// Data for a new comment
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    pub creator: UserId,
    pub text: String,
    /// Whether replies may nest under this comment
    pub is_nesting_permitted: bool,
}

pub struct CommentService<M, P, C>
where
    M: CommentRepository,
    P: PostRepository,
    C: CommunityRepository,
{
    comments: Arc<M>,
    posts: Arc<P>,
    communities: Arc<C>,
}

impl<M, P, C> CommentService<M, P, C>
where
    M: CommentRepository,
    P: PostRepository,
    C: CommunityRepository,
{
    pub fn new(comments: Arc<M>, posts: Arc<P>, communities: Arc<C>) -> Self {
        Self {
            comments,
            posts,
            communities,
        }
    }

    /// Comment on a post or reply to another comment on the same post
    pub async fn create(&self, draft: CommentDraft) -> Result<PostComment, AppError> {
        let post = self.post(&draft.post_id).await?;
        let community = self.community_of(&post).await?;
        ensure_participation(self.communities.as_ref(), &community, &draft.creator).await?;

        if let Some(parent_id) = &draft.parent_id {
            let parent = self.get(parent_id).await?;
            if parent.post_id != post.id {
                return Err(AppError::Domain(DomainError::Validation(format!(
                    "Comment {} belongs to another post",
                    parent_id
                ))));
            }
        }

        let created = self
            .comments
            .create(&NewPostComment {
                post_id: draft.post_id,
                parent_id: draft.parent_id,
                creator: draft.creator,
                text: draft.text,
                is_removed: false,
                is_nesting_permitted: draft.is_nesting_permitted,
            })
            .await?;
        tracing::debug!(comment_id = %created.id, post_id = %created.post_id, "Comment created");
        Ok(created)
    }

    pub async fn get(&self, id: &CommentId) -> Result<PostComment, AppError> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {}", id)))
    }

    /// Every comment on a post, oldest first
    pub async fn list_for_post(&self, post_id: &PostId) -> Result<Vec<PostComment>, AppError> {
        self.post(post_id).await?;
        Ok(self.comments.list_by_post(post_id).await?)
    }

    /// The post's comments arranged as a reply tree
    pub async fn thread_for_post(&self, post_id: &PostId) -> Result<CommentTree, AppError> {
        let comments = self.list_for_post(post_id).await?;
        Ok(CommentTree::from_comments(comments))
    }

    /// Replace the stored text. A removed comment stays removed.
    pub async fn edit_text(&self, id: &CommentId, text: &str) -> Result<PostComment, AppError> {
        Ok(self.comments.update_text(id, text).await?)
    }

    /// Hide a comment behind the removal placeholder, or restore it
    pub async fn set_removed(
        &self,
        id: &CommentId,
        removed: bool,
    ) -> Result<PostComment, AppError> {
        let comment = self.comments.set_removed(id, removed).await?;
        tracing::info!(comment_id = %id, removed, "Comment moderation changed");
        Ok(comment)
    }

    pub async fn set_nesting_permitted(
        &self,
        id: &CommentId,
        permitted: bool,
    ) -> Result<PostComment, AppError> {
        Ok(self.comments.set_nesting_permitted(id, permitted).await?)
    }

    /// The stored text regardless of removal, for audits
    pub async fn raw_text(&self, id: &CommentId) -> Result<String, AppError> {
        let comment = self.get(id).await?;
        tracing::info!(comment_id = %id, "Raw comment text read");
        Ok(comment.body.raw_text().to_string())
    }

    pub async fn relate(
        &self,
        id: &CommentId,
        relation: CommentRelation,
        user_id: &UserId,
    ) -> Result<(), AppError> {
        let comment = self.get(id).await?;
        if matches!(relation, CommentRelation::Like | CommentRelation::Dislike) {
            let post = self.post(&comment.post_id).await?;
            let community = self.community_of(&post).await?;
            ensure_participation(self.communities.as_ref(), &community, user_id).await?;
        }

        Ok(self.comments.add_relation(id, relation, user_id).await?)
    }

    pub async fn unrelate(
        &self,
        id: &CommentId,
        relation: CommentRelation,
        user_id: &UserId,
    ) -> Result<(), AppError> {
        Ok(self.comments.remove_relation(id, relation, user_id).await?)
    }

    /// Delete a comment and all replies beneath it. Returns how many went.
    pub async fn delete(&self, id: &CommentId) -> Result<u64, AppError> {
        let comment = self.get(id).await?;
        let tree = CommentTree::from_comments(self.comments.list_by_post(&comment.post_id).await?);

        let doomed = tree.subtree(id);
        let deleted = self.comments.delete_many(&doomed).await?;
        tracing::info!(comment_id = %id, deleted, "Comment thread deleted");
        Ok(deleted)
    }

    async fn post(&self, id: &PostId) -> Result<Post, AppError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post {}", id)))
    }

    async fn community_of(&self, post: &Post) -> Result<Community, AppError> {
        self.communities
            .find_by_id(&post.community_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Community {}", post.community_id)))
    }
}
