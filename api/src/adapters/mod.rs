//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod postgres;

pub use postgres::{
    PostgresCommentRepository, PostgresCommunityContentRepository, PostgresCommunityRepository,
    PostgresPostRepository, PostgresProfileRepository, PostgresReportRepository,
};
