//! Lifecycle timestamps shared by every persisted entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation/modification bookkeeping.
///
/// `edited` stays false until the first mutation after creation and is never
/// cleared afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub edited: bool,
}

impl Timestamps {
    /// Timestamps for an entity created right now
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            modified_at: now,
            edited: false,
        }
    }

    /// Record a mutation
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
        self.edited = true;
    }
}

impl Default for Timestamps {
    fn default() -> Self {
        Self::new()
    }
}
