//! SeaORM entity models
//!
//! One module per table in `migrations/0001_initial.sql`. Choice fields are
//! stored as their symbolic names (`"PUBLIC"`, `"MODERATOR"`, ...) in plain
//! text columns and parsed back by the adapters.

/// `ActiveModelBehavior` for tables carrying `modified_at` / `edited`:
/// every update refreshes `modified_at` and marks the row edited.
macro_rules! touch_on_update {
    () => {
        #[async_trait::async_trait]
        impl ActiveModelBehavior for ActiveModel {
            async fn before_save<C>(
                mut self,
                _db: &C,
                insert: bool,
            ) -> Result<Self, sea_orm::DbErr>
            where
                C: sea_orm::ConnectionTrait,
            {
                if !insert {
                    self.modified_at = sea_orm::ActiveValue::Set(chrono::Utc::now().fixed_offset());
                    self.edited = sea_orm::ActiveValue::Set(true);
                }
                Ok(self)
            }
        }
    };
}

pub(crate) use touch_on_update;

pub mod comment_relations;
pub mod communities;
pub mod community_flairs;
pub mod community_invites;
pub mod community_member_requests;
pub mod community_members;
pub mod community_pages;
pub mod community_rules;
pub mod post_comments;
pub mod post_relations;
pub mod post_reports;
pub mod posts;
pub mod profile_followers;
pub mod profiles;
pub mod user_reports;
