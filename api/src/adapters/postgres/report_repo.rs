//! PostgreSQL adapter for ReportRepository
//!
//! Post reports and user reports live in separate tables; one repository
//! serves both subjects.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::{db_err, now, timestamps};
use crate::domain::entities::{
    NewReport, PostId, PostReport, ReportId, ReportStatus, UserId, UserReport,
};
use crate::domain::ports::ReportRepository;
use crate::entity::{post_reports, user_reports};
use crate::error::DomainError;

/// PostgreSQL implementation of ReportRepository for posts and users
pub struct PostgresReportRepository {
    db: DatabaseConnection,
}

impl PostgresReportRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportRepository<PostId> for PostgresReportRepository {
    async fn create(&self, report: &NewReport<PostId>) -> Result<PostReport, DomainError> {
        let now = now();

        let model = post_reports::ActiveModel {
            id: Set(Uuid::new_v4()),
            post_id: Set(report.subject.0),
            reporter: Set(report.reporter.0),
            title: Set(report.title.clone()),
            details: Set(report.details.clone()),
            status: Set(ReportStatus::Initiated.to_string()),
            created_at: Set(now),
            modified_at: Set(now),
            edited: Set(false),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_by_id(&self, id: &ReportId) -> Result<Option<PostReport>, DomainError> {
        let result = post_reports::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostReport>, DomainError> {
        let mut query = post_reports::Entity::find();

        if let Some(status) = status {
            query = query.filter(post_reports::Column::Status.eq(status.to_string()));
        }

        let results = query
            .order_by_desc(post_reports::Column::CreatedAt)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn list_for_subject(&self, subject: &PostId) -> Result<Vec<PostReport>, DomainError> {
        let results = post_reports::Entity::find()
            .filter(post_reports::Column::PostId.eq(subject.0))
            .order_by_desc(post_reports::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn set_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<PostReport, DomainError> {
        let result = post_reports::ActiveModel {
            id: Set(id.0),
            status: Set(status.to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }
}

#[async_trait]
impl ReportRepository<UserId> for PostgresReportRepository {
    async fn create(&self, report: &NewReport<UserId>) -> Result<UserReport, DomainError> {
        let now = now();

        let model = user_reports::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(report.subject.0),
            reporter: Set(report.reporter.0),
            title: Set(report.title.clone()),
            details: Set(report.details.clone()),
            status: Set(ReportStatus::Initiated.to_string()),
            created_at: Set(now),
            modified_at: Set(now),
            edited: Set(false),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_by_id(&self, id: &ReportId) -> Result<Option<UserReport>, DomainError> {
        let result = user_reports::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(
        &self,
        status: Option<ReportStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserReport>, DomainError> {
        let mut query = user_reports::Entity::find();

        if let Some(status) = status {
            query = query.filter(user_reports::Column::Status.eq(status.to_string()));
        }

        let results = query
            .order_by_desc(user_reports::Column::CreatedAt)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn list_for_subject(&self, subject: &UserId) -> Result<Vec<UserReport>, DomainError> {
        let results = user_reports::Entity::find()
            .filter(user_reports::Column::UserId.eq(subject.0))
            .order_by_desc(user_reports::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn set_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<UserReport, DomainError> {
        let result = user_reports::ActiveModel {
            id: Set(id.0),
            status: Set(status.to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }
}

impl From<post_reports::Model> for PostReport {
    fn from(model: post_reports::Model) -> Self {
        PostReport {
            id: ReportId(model.id),
            subject: PostId(model.post_id),
            reporter: UserId(model.reporter),
            title: model.title,
            details: model.details,
            status: model.status.parse().unwrap_or_default(),
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}

impl From<user_reports::Model> for UserReport {
    fn from(model: user_reports::Model) -> Self {
        UserReport {
            id: ReportId(model.id),
            subject: UserId(model.user_id),
            reporter: UserId(model.reporter),
            title: model.title,
            details: model.details,
            status: model.status.parse().unwrap_or_default(),
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}
