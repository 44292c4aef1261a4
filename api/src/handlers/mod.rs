//! HTTP handlers
//!
//! Axum request handlers for the API endpoints. `communities` is the public
//! surface; everything else is mounted under `/admin`.

use serde::{Deserialize, Deserializer};

use crate::error::AppError;

pub mod comments;
pub mod communities;
pub mod community_content;
pub mod members;
pub mod posts;
pub mod profiles;
pub mod reports;

pub use comments::{
    create_comment, delete_comment, get_comment, get_comment_raw, get_thread, list_comments,
    relate_comment, set_comment_nesting, set_comment_removed, unrelate_comment, update_comment,
};
pub use communities::{
    create_community, delete_community, get_community, list_communities, update_community,
};
pub use community_content::{
    create_flair, create_page, create_rule, delete_flair, delete_page, delete_rule, list_flairs,
    list_pages, list_rules, update_flair, update_page, update_rule,
};
pub use members::{
    accept_invite, add_member, approve_request, create_invite, decline_invite, get_roster,
    join_community, list_invites, list_requests, reject_request, remove_member, update_member,
};
pub use posts::{
    archive_stale_posts, create_post, delete_post, get_post, list_posts, relate_post,
    set_post_flair, set_post_status, unrelate_post, update_post,
};
pub use profiles::{
    add_profile_community, ban_profile, follow_profile, get_profile, lift_profile_ban,
    remove_profile_community, set_profile_deletion, unfollow_profile, update_profile,
};
pub use reports::{
    create_post_report, create_user_report, get_post_report, get_user_report, list_post_reports,
    list_user_reports, set_post_report_status, set_user_report_status,
};

/// Pagination parameters shared by list endpoints
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit", deserialize_with = "non_negative")]
    pub limit: i64,
    #[serde(default, deserialize_with = "non_negative")]
    pub offset: i64,
}

pub fn default_limit() -> i64 {
    20
}

/// Reject negative pagination values so they surface as a 400
pub fn non_negative<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64::deserialize(deserializer)?;
    if value < 0 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative number, got {}",
            value
        )));
    }
    Ok(value)
}

/// Distinguish an absent field from an explicit `null`.
///
/// Used as `#[serde(default, deserialize_with = "deserialize_some")]` on
/// `Option<Option<T>>`: absent stays `None`, `null` becomes `Some(None)`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Parse an enum carried in a path segment, e.g. `/relations/like/...`
pub fn parse_segment<T>(segment: &str) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = String>,
{
    segment.parse().map_err(AppError::BadRequest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        header: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"header": null}"#).unwrap();
        let value: Patch = serde_json::from_str(r#"{"header": "hi"}"#).unwrap();

        assert_eq!(absent.header, None);
        assert_eq!(null.header, Some(None));
        assert_eq!(value.header, Some(Some("hi".to_string())));
    }

    #[test]
    fn list_query_defaults() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn negative_pagination_is_rejected() {
        assert!(serde_json::from_str::<ListQuery>(r#"{"limit": -1}"#).is_err());
        assert!(serde_json::from_str::<ListQuery>(r#"{"offset": -5}"#).is_err());

        let query: ListQuery = serde_json::from_str(r#"{"limit": 0, "offset": 40}"#).unwrap();
        assert_eq!(query.limit, 0);
        assert_eq!(query.offset, 40);
    }
}
