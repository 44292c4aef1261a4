//! Identifier newtypes
//!
//! Every persisted entity is addressed by a UUID wrapped in its own type so
//! that a post id can never be passed where a comment id is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Opaque reference to a user owned by the identity provider
    UserId
);
entity_id!(
    /// Unique identifier for a community
    CommunityId
);
entity_id!(
    /// Unique identifier for a community invite
    InviteId
);
entity_id!(
    /// Unique identifier for a request to join a community
    MemberRequestId
);
entity_id!(PageId);
entity_id!(RuleId);
entity_id!(FlairId);
entity_id!(
    /// Unique identifier for a post
    PostId
);
entity_id!(
    /// Unique identifier for a post comment
    CommentId
);
entity_id!(
    /// Unique identifier for a report (post and user reports share the space)
    ReportId
);
