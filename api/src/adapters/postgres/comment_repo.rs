//! PostgreSQL adapter for CommentRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::{db_err, now, timestamps};
use crate::domain::entities::{
    CommentBody, CommentId, CommentRelation, NewPostComment, PostComment, PostId, UserId, UserSet,
};
use crate::domain::ports::CommentRepository;
use crate::entity::{comment_relations, post_comments};
use crate::error::DomainError;

/// Ids bound per statement, well under the Postgres parameter limit
const ID_CHUNK: usize = 1000;

/// PostgreSQL implementation of CommentRepository
pub struct PostgresCommentRepository {
    db: DatabaseConnection,
}

impl PostgresCommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_relations(
        &self,
        models: Vec<post_comments::Model>,
    ) -> Result<Vec<PostComment>, DomainError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut by_comment: HashMap<Uuid, Vec<comment_relations::Model>> = HashMap::new();
        for chunk in ids.chunks(ID_CHUNK) {
            let rows = comment_relations::Entity::find()
                .filter(comment_relations::Column::CommentId.is_in(chunk.to_vec()))
                .all(&self.db)
                .await
                .map_err(db_err)?;
            for row in rows {
                by_comment.entry(row.comment_id).or_default().push(row);
            }
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let rows = by_comment.remove(&model.id).unwrap_or_default();
                let mut comment: PostComment = model.into();
                for row in rows {
                    if let Ok(relation) = row.relation.parse::<CommentRelation>() {
                        comment.relation_mut(relation).add_member(UserId(row.user_id));
                    }
                }
                comment
            })
            .collect())
    }

    async fn load_one(&self, model: post_comments::Model) -> Result<PostComment, DomainError> {
        let id = model.id;
        self.with_relations(vec![model]).await?.pop().ok_or_else(|| {
            DomainError::Internal(format!("Comment {} vanished while loading", id))
        })
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<PostComment>, DomainError> {
        let result = post_comments::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match result {
            Some(model) => Ok(Some(self.load_one(model).await?)),
            None => Ok(None),
        }
    }

    async fn list_by_post(&self, post_id: &PostId) -> Result<Vec<PostComment>, DomainError> {
        let results = post_comments::Entity::find()
            .filter(post_comments::Column::PostId.eq(post_id.0))
            .order_by_asc(post_comments::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        self.with_relations(results).await
    }

    async fn create(&self, comment: &NewPostComment) -> Result<PostComment, DomainError> {
        let now = now();

        let model = post_comments::ActiveModel {
            id: Set(Uuid::new_v4()),
            post_id: Set(comment.post_id.0),
            parent_id: Set(comment.parent_id.map(|p| p.0)),
            creator: Set(comment.creator.0),
            text: Set(comment.text.clone()),
            is_removed: Set(comment.is_removed),
            is_nesting_permitted: Set(comment.is_nesting_permitted),
            created_at: Set(now),
            modified_at: Set(now),
            edited: Set(false),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn update_text(&self, id: &CommentId, text: &str) -> Result<PostComment, DomainError> {
        let result = post_comments::ActiveModel {
            id: Set(id.0),
            text: Set(text.to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        self.load_one(result).await
    }

    async fn set_removed(
        &self,
        id: &CommentId,
        removed: bool,
    ) -> Result<PostComment, DomainError> {
        let result = post_comments::ActiveModel {
            id: Set(id.0),
            is_removed: Set(removed),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        self.load_one(result).await
    }

    async fn set_nesting_permitted(
        &self,
        id: &CommentId,
        permitted: bool,
    ) -> Result<PostComment, DomainError> {
        let result = post_comments::ActiveModel {
            id: Set(id.0),
            is_nesting_permitted: Set(permitted),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        self.load_one(result).await
    }

    async fn add_relation(
        &self,
        id: &CommentId,
        relation: CommentRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let model = comment_relations::ActiveModel {
            comment_id: Set(id.0),
            relation: Set(relation.to_string()),
            user_id: Set(user_id.0),
        };

        comment_relations::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    comment_relations::Column::CommentId,
                    comment_relations::Column::Relation,
                    comment_relations::Column::UserId,
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
        id: &CommentId,
        relation: CommentRelation,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        comment_relations::Entity::delete_many()
            .filter(comment_relations::Column::CommentId.eq(id.0))
            .filter(comment_relations::Column::Relation.eq(relation.to_string()))
            .filter(comment_relations::Column::UserId.eq(user_id.0))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn delete_many(&self, ids: &[CommentId]) -> Result<u64, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let mut deleted = 0;
        for chunk in ids.chunks(ID_CHUNK) {
            let chunk: Vec<Uuid> = chunk.iter().map(|id| id.0).collect();
            let result = post_comments::Entity::delete_many()
                .filter(post_comments::Column::Id.is_in(chunk))
                .exec(&txn)
                .await
                .map_err(db_err)?;
            deleted += result.rows_affected;
        }

        txn.commit().await.map_err(db_err)?;

        Ok(deleted)
    }
}

/// Convert SeaORM model to domain entity. User sets start empty.
impl From<post_comments::Model> for PostComment {
    fn from(model: post_comments::Model) -> Self {
        PostComment {
            id: CommentId(model.id),
            post_id: PostId(model.post_id),
            parent_id: model.parent_id.map(CommentId),
            creator: UserId(model.creator),
            body: CommentBody::new(model.text, model.is_removed),
            is_nesting_permitted: model.is_nesting_permitted,
            likes: UserSet::new(),
            dislikes: UserSet::new(),
            mentioned_users: UserSet::new(),
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}
