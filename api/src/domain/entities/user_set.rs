//! Idempotent user sets
//!
//! Likes, dislikes, followers, bookmarks and mentions are all sets of users
//! where adding a present user or removing an absent one is a no-op.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::UserId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserSet(BTreeSet<UserId>);

impl UserSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user. Already present users leave the set unchanged.
    pub fn add_member(&mut self, user: UserId) -> &mut Self {
        self.0.insert(user);
        self
    }

    /// Remove a user. Absent users leave the set unchanged.
    pub fn remove_member(&mut self, user: &UserId) -> &mut Self {
        self.0.remove(user);
        self
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.0.contains(user)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.0.iter()
    }
}

impl FromIterator<UserId> for UserSet {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
