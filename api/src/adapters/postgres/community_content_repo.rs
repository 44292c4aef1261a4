//! PostgreSQL adapter for CommunityContentRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::{db_err, now, timestamps};
use crate::domain::entities::{
    CommunityFlair, CommunityId, CommunityPage, CommunityRule, FlairId, NewCommunityFlair,
    NewCommunityPage, NewCommunityRule, PageId, RuleId, RuleType,
};
use crate::domain::ports::CommunityContentRepository;
use crate::entity::{community_flairs, community_pages, community_rules, posts};
use crate::error::DomainError;

/// PostgreSQL implementation of CommunityContentRepository
pub struct PostgresCommunityContentRepository {
    db: DatabaseConnection,
}

impl PostgresCommunityContentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommunityContentRepository for PostgresCommunityContentRepository {
    async fn create_page(&self, page: &NewCommunityPage) -> Result<CommunityPage, DomainError> {
        let now = now();

        let model = community_pages::ActiveModel {
            id: Set(Uuid::new_v4()),
            community_id: Set(page.community_id.0),
            title: Set(page.title.clone()),
            content: Set(page.content.clone()),
            created_at: Set(now),
            modified_at: Set(now),
            edited: Set(false),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_page(&self, id: &PageId) -> Result<Option<CommunityPage>, DomainError> {
        let result = community_pages::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list_pages(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityPage>, DomainError> {
        let results = community_pages::Entity::find()
            .filter(community_pages::Column::CommunityId.eq(community_id.0))
            .order_by_asc(community_pages::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn update_page(&self, page: &CommunityPage) -> Result<CommunityPage, DomainError> {
        let result = community_pages::ActiveModel {
            id: Set(page.id.0),
            title: Set(page.title.clone()),
            content: Set(page.content.clone()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete_page(&self, id: &PageId) -> Result<(), DomainError> {
        let result = community_pages::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!("Page {}", id)))
        } else {
            Ok(())
        }
    }

    async fn create_rule(&self, rule: &NewCommunityRule) -> Result<CommunityRule, DomainError> {
        let now = now();

        let model = community_rules::ActiveModel {
            id: Set(Uuid::new_v4()),
            community_id: Set(rule.community_id.0),
            title: Set(rule.title.clone()),
            description: Set(rule.description.clone()),
            rule_type: Set(rule.rule_type.to_string()),
            created_at: Set(now),
            modified_at: Set(now),
            edited: Set(false),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_rule(&self, id: &RuleId) -> Result<Option<CommunityRule>, DomainError> {
        let result = community_rules::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list_rules(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityRule>, DomainError> {
        let results = community_rules::Entity::find()
            .filter(community_rules::Column::CommunityId.eq(community_id.0))
            .order_by_asc(community_rules::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn update_rule(&self, rule: &CommunityRule) -> Result<CommunityRule, DomainError> {
        let result = community_rules::ActiveModel {
            id: Set(rule.id.0),
            title: Set(rule.title.clone()),
            description: Set(rule.description.clone()),
            rule_type: Set(rule.rule_type.to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete_rule(&self, id: &RuleId) -> Result<(), DomainError> {
        let result = community_rules::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!("Rule {}", id)))
        } else {
            Ok(())
        }
    }

    async fn create_flair(
        &self,
        flair: &NewCommunityFlair,
    ) -> Result<CommunityFlair, DomainError> {
        let now = now();

        let model = community_flairs::ActiveModel {
            id: Set(Uuid::new_v4()),
            community_id: Set(flair.community_id.0),
            name: Set(flair.name.clone()),
            color: Set(flair.color.clone()),
            created_at: Set(now),
            modified_at: Set(now),
            edited: Set(false),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_flair(&self, id: &FlairId) -> Result<Option<CommunityFlair>, DomainError> {
        let result = community_flairs::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list_flairs(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityFlair>, DomainError> {
        let results = community_flairs::Entity::find()
            .filter(community_flairs::Column::CommunityId.eq(community_id.0))
            .order_by_asc(community_flairs::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn update_flair(&self, flair: &CommunityFlair) -> Result<CommunityFlair, DomainError> {
        let result = community_flairs::ActiveModel {
            id: Set(flair.id.0),
            name: Set(flair.name.clone()),
            color: Set(flair.color.clone()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete_flair(&self, id: &FlairId) -> Result<(), DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Posts keep existing without a flair
        posts::Entity::update_many()
            .col_expr(posts::Column::FlairId, Expr::value(Option::<Uuid>::None))
            .col_expr(posts::Column::ModifiedAt, Expr::value(now()))
            .col_expr(posts::Column::Edited, Expr::value(true))
            .filter(posts::Column::FlairId.eq(id.0))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let result = community_flairs::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Flair {}", id)));
        }

        txn.commit().await.map_err(db_err)?;

        Ok(())
    }
}

impl From<community_pages::Model> for CommunityPage {
    fn from(model: community_pages::Model) -> Self {
        CommunityPage {
            id: PageId(model.id),
            community_id: CommunityId(model.community_id),
            title: model.title,
            content: model.content,
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}

impl From<community_rules::Model> for CommunityRule {
    fn from(model: community_rules::Model) -> Self {
        CommunityRule {
            id: RuleId(model.id),
            community_id: CommunityId(model.community_id),
            title: model.title,
            description: model.description,
            rule_type: model.rule_type.parse().unwrap_or(RuleType::Both),
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}

impl From<community_flairs::Model> for CommunityFlair {
    fn from(model: community_flairs::Model) -> Self {
        CommunityFlair {
            id: FlairId(model.id),
            community_id: CommunityId(model.community_id),
            name: model.name,
            color: model.color,
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}
