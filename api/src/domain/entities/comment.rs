//! Post comment domain entity
//!
//! A comment keeps its author's text even after moderation removes it.
//! Readers only ever see the effective text, which is derived on every call
//! from the stored text and the removal flag.

use serde::{Deserialize, Serialize};

use super::{CommentId, PostId, Timestamps, UserId, UserSet};

/// Text shown in place of a removed comment
pub const REMOVED_COMMENT_TEXT: &str = "This comment has been removed.";

/// Text a reader sees for a comment with the given stored state
pub fn effective_text(raw_text: &str, is_removed: bool) -> &str {
    if is_removed {
        REMOVED_COMMENT_TEXT
    } else {
        raw_text
    }
}

/// Stored text of a comment together with its moderation flag.
///
/// The raw text is only reachable through [`CommentBody::raw_text`], which is
/// meant for audit and restoration paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody {
    raw_text: String,
    is_removed: bool,
}

impl CommentBody {
    pub fn new(raw_text: impl Into<String>, is_removed: bool) -> Self {
        Self {
            raw_text: raw_text.into(),
            is_removed,
        }
    }

    /// The text readers see
    pub fn text(&self) -> &str {
        effective_text(&self.raw_text, self.is_removed)
    }

    /// Overwrite the stored text. The removal flag is left alone.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.raw_text = text.into();
    }

    /// Hide or restore the comment. The stored text is left alone.
    pub fn set_removed(&mut self, removed: bool) {
        self.is_removed = removed;
    }

    pub fn is_removed(&self) -> bool {
        self.is_removed
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

/// The user sets a comment carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentRelation {
    Like,
    Dislike,
    Mention,
}

impl std::fmt::Display for CommentRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentRelation::Like => write!(f, "LIKE"),
            CommentRelation::Dislike => write!(f, "DISLIKE"),
            CommentRelation::Mention => write!(f, "MENTION"),
        }
    }
}

impl std::str::FromStr for CommentRelation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LIKE" => Ok(CommentRelation::Like),
            "DISLIKE" => Ok(CommentRelation::Dislike),
            "MENTION" => Ok(CommentRelation::Mention),
            _ => Err(format!("Unknown comment relation: {}", s)),
        }
    }
}

/// A comment on a post, optionally replying to another comment
#[derive(Debug, Clone)]
pub struct PostComment {
    pub id: CommentId,
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    pub creator: UserId,
    pub body: CommentBody,
    pub is_nesting_permitted: bool,
    pub likes: UserSet,
    pub dislikes: UserSet,
    pub mentioned_users: UserSet,
    pub timestamps: Timestamps,
}

impl PostComment {
    /// Effective text: the placeholder while removed, the stored text otherwise
    pub fn text(&self) -> &str {
        self.body.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.body.set_text(text);
        self.timestamps.touch();
    }

    pub fn set_removed(&mut self, removed: bool) {
        self.body.set_removed(removed);
        self.timestamps.touch();
    }

    pub fn is_removed(&self) -> bool {
        self.body.is_removed()
    }

    pub fn relation(&self, relation: CommentRelation) -> &UserSet {
        match relation {
            CommentRelation::Like => &self.likes,
            CommentRelation::Dislike => &self.dislikes,
            CommentRelation::Mention => &self.mentioned_users,
        }
    }

    pub fn relation_mut(&mut self, relation: CommentRelation) -> &mut UserSet {
        match relation {
            CommentRelation::Like => &mut self.likes,
            CommentRelation::Dislike => &mut self.dislikes,
            CommentRelation::Mention => &mut self.mentioned_users,
        }
    }
}

/// Data needed to create a comment
#[derive(Debug, Clone)]
pub struct NewPostComment {
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    pub creator: UserId,
    pub text: String,
    pub is_removed: bool,
    pub is_nesting_permitted: bool,
}
