//! Community domain entity
//!
//! A community is the container for members, posts and moderation content.

use serde::{Deserialize, Serialize};

use super::{CommunityId, Timestamps};

/// Maximum length of a community name
pub const COMMUNITY_NAME_MAX_LEN: usize = 32;

/// Maximum length of a community header
pub const COMMUNITY_HEADER_MAX_LEN: usize = 256;

/// Who can see and post in a community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommunityType {
    /// Anyone can view, post and comment
    #[default]
    Public,
    /// Anyone can view, only approved users can post
    Restricted,
    /// Only approved users can view and post
    Private,
}

impl CommunityType {
    /// Whether a viewer can read the community's content
    pub fn allows_viewing(&self, is_member: bool) -> bool {
        match self {
            CommunityType::Public | CommunityType::Restricted => true,
            CommunityType::Private => is_member,
        }
    }

    /// Whether a user can submit posts and comments
    pub fn allows_posting(&self, is_member: bool) -> bool {
        match self {
            CommunityType::Public => true,
            CommunityType::Restricted | CommunityType::Private => is_member,
        }
    }

    /// Whether joining needs approval by the community staff
    pub fn requires_approval(&self) -> bool {
        match self {
            CommunityType::Public => false,
            CommunityType::Restricted | CommunityType::Private => true,
        }
    }
}

impl std::fmt::Display for CommunityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommunityType::Public => write!(f, "PUBLIC"),
            CommunityType::Restricted => write!(f, "RESTRICTED"),
            CommunityType::Private => write!(f, "PRIVATE"),
        }
    }
}

impl std::str::FromStr for CommunityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PUBLIC" => Ok(CommunityType::Public),
            "RESTRICTED" => Ok(CommunityType::Restricted),
            "PRIVATE" => Ok(CommunityType::Private),
            _ => Err(format!("Unknown community type: {}", s)),
        }
    }
}

/// A community
#[derive(Debug, Clone, Serialize)]
pub struct Community {
    pub id: CommunityId,
    pub name: String,
    pub header: Option<String>,
    pub description: Option<String>,
    /// Asset path of the banner image
    pub banner: Option<String>,
    /// Asset path of the logo image
    pub logo: Option<String>,
    pub related_communities: Vec<String>,
    pub community_type: CommunityType,
    /// Posts older than the configured age get archived by the archive sweep
    pub archive_posts: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Data needed to create a new community
#[derive(Debug, Clone, Default)]
pub struct NewCommunity {
    pub name: String,
    pub header: Option<String>,
    pub description: Option<String>,
    pub banner: Option<String>,
    pub logo: Option<String>,
    pub related_communities: Vec<String>,
    pub community_type: CommunityType,
    pub archive_posts: bool,
}

/// Partial update of a community.
///
/// `None` leaves a field unchanged; `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default)]
pub struct CommunityChanges {
    pub name: Option<String>,
    pub header: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub banner: Option<Option<String>>,
    pub logo: Option<Option<String>>,
    pub related_communities: Option<Vec<String>>,
    pub community_type: Option<CommunityType>,
    pub archive_posts: Option<bool>,
}

impl CommunityChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.header.is_none()
            && self.description.is_none()
            && self.banner.is_none()
            && self.logo.is_none()
            && self.related_communities.is_none()
            && self.community_type.is_none()
            && self.archive_posts.is_none()
    }

    /// Apply the changes to an in-memory community, touching its timestamps
    pub fn apply_to(&self, community: &mut Community) {
        if let Some(name) = &self.name {
            community.name = name.clone();
        }
        if let Some(header) = &self.header {
            community.header = header.clone();
        }
        if let Some(description) = &self.description {
            community.description = description.clone();
        }
        if let Some(banner) = &self.banner {
            community.banner = banner.clone();
        }
        if let Some(logo) = &self.logo {
            community.logo = logo.clone();
        }
        if let Some(related) = &self.related_communities {
            community.related_communities = related.clone();
        }
        if let Some(community_type) = self.community_type {
            community.community_type = community_type;
        }
        if let Some(archive_posts) = self.archive_posts {
            community.archive_posts = archive_posts;
        }
        community.timestamps.touch();
    }
}
