//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod comment;
pub mod comment_tree;
pub mod community;
pub mod community_content;
pub mod ids;
pub mod membership;
pub mod post;
pub mod profile;
pub mod report;
pub mod timestamps;
pub mod user_set;

pub use comment::{CommentBody, CommentRelation, NewPostComment, PostComment};
#[cfg(test)]
pub use comment::REMOVED_COMMENT_TEXT;
pub use comment_tree::CommentTree;
pub use community::{
    Community, CommunityChanges, CommunityType, NewCommunity, COMMUNITY_HEADER_MAX_LEN,
    COMMUNITY_NAME_MAX_LEN,
};
pub use community_content::{
    CommunityFlair, CommunityPage, CommunityRule, NewCommunityFlair, NewCommunityPage,
    NewCommunityRule, RuleType, DEFAULT_FLAIR_COLOR, FLAIR_NAME_MAX_LEN, PAGE_TITLE_MAX_LEN,
    RULE_TITLE_MAX_LEN,
};
pub use ids::{
    CommentId, CommunityId, FlairId, InviteId, MemberRequestId, PageId, PostId, ReportId, RuleId,
    UserId,
};
pub use membership::{
    CommunityInvite, CommunityMember, CommunityMemberRequest, InviteRole, MemberRole,
    MemberStatus, NewCommunityInvite, NewCommunityMember, Roster,
};
pub use post::{
    NewPost, Post, PostChanges, PostRelation, PostStatus, POST_TITLE_MAX_LEN, POST_URL_MAX_LEN,
};
pub use profile::{CommunityList, Profile, ProfileChanges, DISPLAY_NAME_MAX_LEN};
pub use report::{
    NewReport, PostReport, Report, ReportStatus, ReportSubject, UserReport, REPORT_TITLE_MAX_LEN,
};
pub use timestamps::Timestamps;
pub use user_set::UserSet;
