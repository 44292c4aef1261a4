//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod comment_repo;
pub mod community_content_repo;
pub mod community_repo;
pub mod post_repo;
pub mod profile_repo;
pub mod report_repo;


pub use comment_repo::PostgresCommentRepository;
pub use community_content_repo::PostgresCommunityContentRepository;
pub use community_repo::PostgresCommunityRepository;
pub use post_repo::PostgresPostRepository;
pub use profile_repo::PostgresProfileRepository;
pub use report_repo::PostgresReportRepository;

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DbErr, SqlErr};

use crate::domain::entities::Timestamps;
use crate::error::DomainError;

/// Map a SeaORM error onto the domain.
///
/// Unique violations become `AlreadyExists`, foreign key violations and
/// updates that matched no row become `NotFound`.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    if matches!(e, DbErr::RecordNotUpdated) {
        return DomainError::NotFound("Record not found".to_string());
    }
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::AlreadyExists(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DomainError::NotFound(msg),
        _ => DomainError::Database(e.to_string()),
    }
}

/// Rebuild domain timestamps from the three bookkeeping columns
pub(crate) fn timestamps(
    created_at: DateTimeWithTimeZone,
    modified_at: DateTimeWithTimeZone,
    edited: bool,
) -> Timestamps {
    Timestamps {
        created_at: created_at.with_timezone(&Utc),
        modified_at: modified_at.with_timezone(&Utc),
        edited,
    }
}

pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().fixed_offset()
}
