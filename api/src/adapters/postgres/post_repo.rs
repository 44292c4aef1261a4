//! PostgreSQL adapter for PostRepository
//!
//! User sets live in `post_relations`, one row per (post, kind, user).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{db_err, now, timestamps};
use crate::domain::entities::{
    CommunityId, FlairId, NewPost, Post, PostChanges, PostId, PostRelation, PostStatus, UserId,
    UserSet,
};
use crate::domain::ports::PostRepository;
use crate::entity::{post_relations, posts};
use crate::error::DomainError;

/// PostgreSQL implementation of PostRepository
pub struct PostgresPostRepository {
    db: DatabaseConnection,
}

impl PostgresPostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach the user sets to freshly loaded rows
    async fn with_relations(&self, models: Vec<posts::Model>) -> Result<Vec<Post>, DomainError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let rows = post_relations::Entity::find()
            .filter(post_relations::Column::PostId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut by_post: HashMap<Uuid, Vec<post_relations::Model>> = HashMap::new();
        for row in rows {
            by_post.entry(row.post_id).or_default().push(row);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let rows = by_post.remove(&model.id).unwrap_or_default();
                let mut post: Post = model.into();
                for row in rows {
                    if let Ok(relation) = row.relation.parse::<PostRelation>() {
                        post.relation_mut(relation).add_member(UserId(row.user_id));
                    }
                }
                post
            })
            .collect())
    }

    async fn load_one(&self, model: posts::Model) -> Result<Post, DomainError> {
        let id = model.id;
        self.with_relations(vec![model])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal(format!("Post {} vanished while loading", id)))
    }

    async fn find_model(&self, id: &PostId) -> Result<posts::Model, DomainError> {
        posts::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound(format!("Post {}", id)))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        let result = posts::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match result {
            Some(model) => Ok(Some(self.load_one(model).await?)),
            None => Ok(None),
        }
    }

    async fn list_by_community(
        &self,
        community_id: &CommunityId,
        status: Option<PostStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, DomainError> {
        let mut query = posts::Entity::find().filter(posts::Column::CommunityId.eq(community_id.0));

        if let Some(status) = status {
            query = query.filter(posts::Column::Status.eq(status.to_string()));
        }

        let results = query
            .order_by_desc(posts::Column::CreatedAt)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        self.with_relations(results).await
    }

    async fn create(&self, post: &NewPost) -> Result<Post, DomainError> {
        let now = now();

        let model = posts::ActiveModel {
            id: Set(Uuid::new_v4()),
            community_id: Set(post.community_id.0),
            title: Set(post.title.clone()),
            url: Set(post.url.clone()),
            content: Set(post.content.clone()),
            creator: Set(post.creator.0),
            status: Set(post.status.to_string()),
            flair_id: Set(post.flair_id.map(|f| f.0)),
            created_at: Set(now),
            modified_at: Set(now),
            edited: Set(false),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(&self, id: &PostId, changes: &PostChanges) -> Result<Post, DomainError> {
        let mut active_model = self.find_model(id).await?.into_active_model();
        if let Some(title) = &changes.title {
            active_model.title = Set(title.clone());
        }
        if let Some(url) = &changes.url {
            active_model.url = Set(url.clone());
        }
        if let Some(content) = &changes.content {
            active_model.content = Set(content.clone());
        }

        let result = active_model.update(&self.db).await.map_err(db_err)?;

        self.load_one(result).await
    }

    async fn set_status(&self, id: &PostId, status: PostStatus) -> Result<Post, DomainError> {
        let result = posts::ActiveModel {
            id: Set(id.0),
            status: Set(status.to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        self.load_one(result).await
    }

    async fn set_flair(
        &self,
        id: &PostId,
        flair_id: Option<FlairId>,
    ) -> Result<Post, DomainError> {
        let result = posts::ActiveModel {
            id: Set(id.0),
            flair_id: Set(flair_id.map(|f| f.0)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        self.load_one(result).await
    }

    async fn add_relation(
        &self,
        id: &PostId,
        relation: PostRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let model = post_relations::ActiveModel {
            post_id: Set(id.0),
            relation: Set(relation.to_string()),
            user_id: Set(user_id.0),
        };

        post_relations::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    post_relations::Column::PostId,
                    post_relations::Column::Relation,
                    post_relations::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn remove_relation(
        &self,
        id: &PostId,
        relation: PostRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        post_relations::Entity::delete_many()
            .filter(post_relations::Column::PostId.eq(id.0))
            .filter(post_relations::Column::Relation.eq(relation.to_string()))
            .filter(post_relations::Column::UserId.eq(user_id.0))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn archive_created_before(
        &self,
        community_id: &CommunityId,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let result = posts::Entity::update_many()
            .col_expr(
                posts::Column::Status,
                Expr::value(PostStatus::Archived.to_string()),
            )
            .col_expr(posts::Column::ModifiedAt, Expr::value(now()))
            .col_expr(posts::Column::Edited, Expr::value(true))
            .filter(posts::Column::CommunityId.eq(community_id.0))
            .filter(posts::Column::Status.eq(PostStatus::Public.to_string()))
            .filter(posts::Column::CreatedAt.lt(cutoff.fixed_offset()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn delete(&self, id: &PostId) -> Result<(), DomainError> {
        let result = posts::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!("Post {}", id)))
        } else {
            Ok(())
        }
    }
}

/// Convert SeaORM model to domain entity. User sets start empty.
impl From<posts::Model> for Post {
    fn from(model: posts::Model) -> Self {
        Post {
            id: PostId(model.id),
            community_id: CommunityId(model.community_id),
            title: model.title,
            url: model.url,
            content: model.content,
            creator: UserId(model.creator),
            status: model.status.parse().unwrap_or(PostStatus::Public),
            flair_id: model.flair_id.map(FlairId),
            likes: UserSet::new(),
            dislikes: UserSet::new(),
            followers: UserSet::new(),
            bookmarks: UserSet::new(),
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}
