//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and the repository ports.

pub mod comment_service;
pub mod community_content_service;
pub mod community_service;
pub mod post_service;
pub mod profile_service;
pub mod report_service;
pub mod validation;

pub use comment_service::{CommentDraft, CommentService};
pub use community_content_service::{
    CommunityContentService, FlairUpdate, PageUpdate, RuleUpdate,
};
pub use community_service::{CommunityService, JoinOutcome};
pub use post_service::PostService;
pub use profile_service::ProfileService;
pub use report_service::ReportService;
