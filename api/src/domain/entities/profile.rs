//! User profile domain entity

use chrono::NaiveDate;
use serde::Serialize;

use super::{Timestamps, UserId, UserSet};

pub const DISPLAY_NAME_MAX_LEN: usize = 512;

/// Public-facing extension of a user identity
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub about: Option<String>,
    #[serde(skip)]
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_birth_visible: bool,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub favourite_communities: Vec<String>,
    pub muted_communities: Vec<String>,
    pub followers: UserSet,
    /// The user banned until and including this date
    pub banned_until: Option<NaiveDate>,
    pub is_requesting_delete: bool,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Profile {
    /// Empty profile for a user
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            display_name: None,
            about: None,
            date_of_birth: None,
            date_of_birth_visible: false,
            avatar: None,
            banner: None,
            favourite_communities: Vec::new(),
            muted_communities: Vec::new(),
            followers: UserSet::new(),
            banned_until: None,
            is_requesting_delete: false,
            timestamps: Timestamps::new(),
        }
    }

    /// Birth date as other users may see it
    pub fn visible_date_of_birth(&self) -> Option<NaiveDate> {
        if self.date_of_birth_visible {
            self.date_of_birth
        } else {
            None
        }
    }

    pub fn is_banned_on(&self, date: NaiveDate) -> bool {
        self.banned_until.is_some_and(|until| date <= until)
    }
}

/// The community name lists a profile keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityList {
    Favourite,
    Muted,
}

impl std::fmt::Display for CommunityList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommunityList::Favourite => write!(f, "favourite"),
            CommunityList::Muted => write!(f, "muted"),
        }
    }
}

impl std::str::FromStr for CommunityList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "favourite" | "favourites" => Ok(CommunityList::Favourite),
            "muted" => Ok(CommunityList::Muted),
            _ => Err(format!("Unknown community list: {}", s)),
        }
    }
}

/// Partial update of a profile's descriptive fields.
///
/// `None` leaves a field unchanged; `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub display_name: Option<Option<String>>,
    pub about: Option<Option<String>>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub date_of_birth_visible: Option<bool>,
    pub avatar: Option<Option<String>>,
    pub banner: Option<Option<String>>,
}

impl ProfileChanges {
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(display_name) = &self.display_name {
            profile.display_name = display_name.clone();
        }
        if let Some(about) = &self.about {
            profile.about = about.clone();
        }
        if let Some(date_of_birth) = self.date_of_birth {
            profile.date_of_birth = date_of_birth;
        }
        if let Some(visible) = self.date_of_birth_visible {
            profile.date_of_birth_visible = visible;
        }
        if let Some(avatar) = &self.avatar {
            profile.avatar = avatar.clone();
        }
        if let Some(banner) = &self.banner {
            profile.banner = banner.clone();
        }
        profile.timestamps.touch();
    }
}
