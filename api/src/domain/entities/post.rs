//! Post domain entity

use serde::{Deserialize, Serialize};

use super::{CommunityId, FlairId, PostId, Timestamps, UserId, UserSet};

pub const POST_TITLE_MAX_LEN: usize = 512;
pub const POST_URL_MAX_LEN: usize = 1024;

/// Lifecycle of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    Draft,
    #[default]
    Public,
    Archived,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "DRAFT"),
            PostStatus::Public => write!(f, "PUBLIC"),
            PostStatus::Archived => write!(f, "ARCHIVED"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Ok(PostStatus::Draft),
            "PUBLIC" => Ok(PostStatus::Public),
            "ARCHIVED" => Ok(PostStatus::Archived),
            _ => Err(format!("Unknown post status: {}", s)),
        }
    }
}

/// The user sets a post carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostRelation {
    Like,
    Dislike,
    Follow,
    Bookmark,
}

impl std::fmt::Display for PostRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostRelation::Like => write!(f, "LIKE"),
            PostRelation::Dislike => write!(f, "DISLIKE"),
            PostRelation::Follow => write!(f, "FOLLOW"),
            PostRelation::Bookmark => write!(f, "BOOKMARK"),
        }
    }
}

impl std::str::FromStr for PostRelation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LIKE" => Ok(PostRelation::Like),
            "DISLIKE" => Ok(PostRelation::Dislike),
            "FOLLOW" => Ok(PostRelation::Follow),
            "BOOKMARK" => Ok(PostRelation::Bookmark),
            _ => Err(format!("Unknown post relation: {}", s)),
        }
    }
}

/// A post in a community
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: PostId,
    pub community_id: CommunityId,
    pub title: String,
    pub url: String,
    pub content: String,
    pub creator: UserId,
    pub status: PostStatus,
    pub flair_id: Option<FlairId>,
    pub likes: UserSet,
    pub dislikes: UserSet,
    pub followers: UserSet,
    pub bookmarks: UserSet,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Post {
    /// The user set backing a relation kind
    pub fn relation(&self, relation: PostRelation) -> &UserSet {
        match relation {
            PostRelation::Like => &self.likes,
            PostRelation::Dislike => &self.dislikes,
            PostRelation::Follow => &self.followers,
            PostRelation::Bookmark => &self.bookmarks,
        }
    }

    pub fn relation_mut(&mut self, relation: PostRelation) -> &mut UserSet {
        match relation {
            PostRelation::Like => &mut self.likes,
            PostRelation::Dislike => &mut self.dislikes,
            PostRelation::Follow => &mut self.followers,
            PostRelation::Bookmark => &mut self.bookmarks,
        }
    }
}

/// Data needed to create a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub community_id: CommunityId,
    pub title: String,
    pub url: String,
    pub content: String,
    pub creator: UserId,
    pub status: PostStatus,
    pub flair_id: Option<FlairId>,
}

/// Partial update of a post's text fields
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub url: Option<String>,
    pub content: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.content.is_none()
    }

    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(url) = &self.url {
            post.url = url.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        post.timestamps.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_post() -> Post {
        Post {
            id: PostId::new(),
            community_id: CommunityId::new(),
            title: "Intro".to_string(),
            url: String::new(),
            content: "Hi all".to_string(),
            creator: UserId::new(),
            status: PostStatus::Public,
            flair_id: None,
            likes: UserSet::new(),
            dislikes: UserSet::new(),
            followers: UserSet::new(),
            bookmarks: UserSet::new(),
            timestamps: Timestamps::new(),
        }
    }

    #[test]
    fn post_status_display_and_parse() {
        assert_eq!(PostStatus::Draft.to_string(), "DRAFT");
        assert_eq!(PostStatus::Archived.to_string(), "ARCHIVED");
        assert_eq!("public".parse::<PostStatus>().unwrap(), PostStatus::Public);
        assert!("deleted".parse::<PostStatus>().is_err());
    }

    #[test]
    fn post_relation_display_and_parse() {
        assert_eq!(PostRelation::Bookmark.to_string(), "BOOKMARK");
        assert_eq!(
            "follow".parse::<PostRelation>().unwrap(),
            PostRelation::Follow
        );
        assert!("mention".parse::<PostRelation>().is_err());
    }

    #[test]
    fn relation_sets_are_independent() {
        let mut post = make_post();
        let user = UserId::new();

        post.relation_mut(PostRelation::Like).add_member(user);
        post.relation_mut(PostRelation::Bookmark).add_member(user);

        assert!(post.relation(PostRelation::Like).contains(&user));
        assert!(post.relation(PostRelation::Bookmark).contains(&user));
        assert!(!post.relation(PostRelation::Dislike).contains(&user));
        assert!(!post.relation(PostRelation::Follow).contains(&user));
    }

    #[test]
    fn apply_changes_touches_timestamps() {
        let mut post = make_post();
        let changes = PostChanges {
            title: Some("Welcome".to_string()),
            ..Default::default()
        };
        changes.apply_to(&mut post);
        assert_eq!(post.title, "Welcome");
        assert_eq!(post.content, "Hi all");
        assert!(post.timestamps.edited);
    }
}
