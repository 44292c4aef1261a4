//! Community-owned content: wiki pages, rules and post flairs

use serde::{Deserialize, Serialize};

use super::{CommunityId, FlairId, PageId, RuleId, Timestamps};

pub const PAGE_TITLE_MAX_LEN: usize = 16;
pub const RULE_TITLE_MAX_LEN: usize = 512;
pub const FLAIR_NAME_MAX_LEN: usize = 512;

/// Flair colour used when none is given
pub const DEFAULT_FLAIR_COLOR: &str = "#FF0000";

/// A static page of a community
#[derive(Debug, Clone, Serialize)]
pub struct CommunityPage {
    pub id: PageId,
    pub community_id: CommunityId,
    pub title: String,
    pub content: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// What a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    Posts,
    Comments,
    #[default]
    Both,
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleType::Posts => write!(f, "POSTS"),
            RuleType::Comments => write!(f, "COMMENTS"),
            RuleType::Both => write!(f, "BOTH"),
        }
    }
}

impl std::str::FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "POSTS" => Ok(RuleType::Posts),
            "COMMENTS" => Ok(RuleType::Comments),
            "BOTH" => Ok(RuleType::Both),
            _ => Err(format!("Unknown rule type: {}", s)),
        }
    }
}

/// A community rule
#[derive(Debug, Clone, Serialize)]
pub struct CommunityRule {
    pub id: RuleId,
    pub community_id: CommunityId,
    pub title: String,
    pub description: String,
    pub rule_type: RuleType,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// A tag posts of a community can carry
#[derive(Debug, Clone, Serialize)]
pub struct CommunityFlair {
    pub id: FlairId,
    pub community_id: CommunityId,
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Data needed to create a page
#[derive(Debug, Clone)]
pub struct NewCommunityPage {
    pub community_id: CommunityId,
    pub title: String,
    pub content: String,
}

/// Data needed to create a rule
#[derive(Debug, Clone)]
pub struct NewCommunityRule {
    pub community_id: CommunityId,
    pub title: String,
    pub description: String,
    pub rule_type: RuleType,
}

/// Data needed to create a flair
#[derive(Debug, Clone)]
pub struct NewCommunityFlair {
    pub community_id: CommunityId,
    pub name: String,
    pub color: String,
}
