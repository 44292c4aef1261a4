//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use crate::domain::entities::{
    CommentBody, CommentId, Community, CommunityFlair, CommunityId, CommunityMember,
    CommunityType, FlairId, MemberRole, MemberStatus, NewCommunity, Post, PostComment, PostId,
    PostStatus, Profile, Timestamps, UserId, UserSet, DEFAULT_FLAIR_COLOR,
};

/// Create a public test community with the given name
pub fn test_community(name: &str) -> Community {
    Community {
        id: CommunityId::new(),
        name: name.to_string(),
        header: Some(format!("Welcome to {}", name)),
        description: None,
        banner: None,
        logo: None,
        related_communities: Vec::new(),
        community_type: CommunityType::Public,
        archive_posts: false,
        timestamps: Timestamps::new(),
    }
}

/// Create a test community of a specific type
pub fn test_community_of_type(name: &str, community_type: CommunityType) -> Community {
    Community {
        community_type,
        ..test_community(name)
    }
}

/// Creation payload for a public community
pub fn new_community(name: &str) -> NewCommunity {
    NewCommunity {
        name: name.to_string(),
        header: None,
        description: None,
        banner: None,
        logo: None,
        related_communities: Vec::new(),
        community_type: CommunityType::Public,
        archive_posts: false,
    }
}

/// Create an active membership row
pub fn test_member(
    community_id: CommunityId,
    user_id: UserId,
    role: MemberRole,
) -> CommunityMember {
    CommunityMember {
        community_id,
        user_id,
        role,
        status: MemberStatus::Active,
        timestamps: Timestamps::new(),
    }
}

/// Create a membership row with a specific status
pub fn test_member_with_status(
    community_id: CommunityId,
    user_id: UserId,
    status: MemberStatus,
) -> CommunityMember {
    CommunityMember {
        status,
        ..test_member(community_id, user_id, MemberRole::Member)
    }
}

pub fn test_flair(community_id: CommunityId, name: &str) -> CommunityFlair {
    CommunityFlair {
        id: FlairId::new(),
        community_id,
        name: name.to_string(),
        color: DEFAULT_FLAIR_COLOR.to_string(),
        timestamps: Timestamps::new(),
    }
}

/// Create a public text post in a community
pub fn test_post(community_id: CommunityId) -> Post {
    Post {
        id: PostId::new(),
        community_id,
        title: "Test post".to_string(),
        url: String::new(),
        content: "Test post content".to_string(),
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

/// Create a post whose creation time lies `days` in the past
pub fn test_post_aged(community_id: CommunityId, days: i64) -> Post {
    let mut post = test_post(community_id);
    post.timestamps.created_at -= chrono::Duration::days(days);
    post.timestamps.modified_at = post.timestamps.created_at;
    post
}

/// Create a comment on a post, optionally replying to another comment
pub fn test_comment(post_id: PostId, parent_id: Option<CommentId>, text: &str) -> PostComment {
    PostComment {
        id: CommentId::new(),
        post_id,
        parent_id,
        creator: UserId::new(),
        body: CommentBody::new(text, false),
        is_nesting_permitted: false,
        likes: UserSet::new(),
        dislikes: UserSet::new(),
        mentioned_users: UserSet::new(),
        timestamps: Timestamps::new(),
    }
}

pub fn test_profile(user_id: UserId) -> Profile {
    Profile {
        display_name: Some("Test User".to_string()),
        ..Profile::new(user_id)
    }
}
