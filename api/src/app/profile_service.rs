//! Profile service
//!
//! Profiles are created lazily the first time a user is looked up, so the
//! identity provider never has to call in when a user signs up.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::app::validation::limit_optional;
use crate::domain::entities::{CommunityList, Profile, ProfileChanges, UserId, DISPLAY_NAME_MAX_LEN};
use crate::domain::ports::ProfileRepository;
use crate::error::{AppError, DomainError};

pub struct ProfileService<U>
where
    U: ProfileRepository,
{
    profiles: Arc<U>,
}

impl<U> ProfileService<U>
where
    U: ProfileRepository,
{
    pub fn new(profiles: Arc<U>) -> Self {
        Self { profiles }
    }

    pub async fn get(&self, user_id: &UserId) -> Result<Profile, AppError> {
        self.profiles
            .find(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {}", user_id)))
    }

    /// Fetch a profile, creating an empty one on first use
    pub async fn get_or_create(&self, user_id: &UserId) -> Result<Profile, AppError> {
        if let Some(profile) = self.profiles.find(user_id).await? {
            return Ok(profile);
        }

        match self.profiles.create(user_id).await {
            Ok(profile) => Ok(profile),
            // Lost a race with a concurrent first lookup
            Err(DomainError::AlreadyExists(_)) => self.get(user_id).await,
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update(
        &self,
        user_id: &UserId,
        changes: ProfileChanges,
    ) -> Result<Profile, AppError> {
        if let Some(display_name) = &changes.display_name {
            limit_optional("Display name", display_name.as_deref(), DISPLAY_NAME_MAX_LEN)?;
        }

        self.get_or_create(user_id).await?;
        Ok(self.profiles.update(user_id, &changes).await?)
    }

    /// Make `follower` follow `user_id`. Repeats are no-ops.
    pub async fn follow(&self, user_id: &UserId, follower: &UserId) -> Result<Profile, AppError> {
        if user_id == follower {
            return Err(AppError::BadRequest("Users cannot follow themselves".to_string()));
        }

        self.get_or_create(user_id).await?;
        self.profiles.add_follower(user_id, follower).await?;
        self.get(user_id).await
    }

    pub async fn unfollow(&self, user_id: &UserId, follower: &UserId) -> Result<Profile, AppError> {
        self.profiles.remove_follower(user_id, follower).await?;
        self.get_or_create(user_id).await
    }

    /// Add a community name to the favourite or muted list. Repeats are no-ops.
    pub async fn add_community(
        &self,
        user_id: &UserId,
        list: CommunityList,
        name: &str,
    ) -> Result<Profile, AppError> {
        self.get_or_create(user_id).await?;
        self.profiles.add_community(user_id, list, name).await?;
        self.get(user_id).await
    }

    pub async fn remove_community(
        &self,
        user_id: &UserId,
        list: CommunityList,
        name: &str,
    ) -> Result<Profile, AppError> {
        self.get_or_create(user_id).await?;
        self.profiles.remove_community(user_id, list, name).await?;
        self.get(user_id).await
    }

    /// Flag or unflag the profile for deletion
    pub async fn request_deletion(
        &self,
        user_id: &UserId,
        requested: bool,
    ) -> Result<Profile, AppError> {
        self.get_or_create(user_id).await?;
        self.profiles.set_requesting_delete(user_id, requested).await?;
        tracing::info!(user_id = %user_id, requested, "Profile deletion request changed");
        self.get(user_id).await
    }

    /// Soft-ban a user through the given date, inclusive
    pub async fn ban_until(&self, user_id: &UserId, until: NaiveDate) -> Result<Profile, AppError> {
        self.get_or_create(user_id).await?;
        self.profiles.set_banned_until(user_id, Some(until)).await?;
        tracing::info!(user_id = %user_id, %until, "Profile banned");
        self.get(user_id).await
    }

    pub async fn lift_ban(&self, user_id: &UserId) -> Result<Profile, AppError> {
        self.get(user_id).await?;
        self.profiles.set_banned_until(user_id, None).await?;
        self.get(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_profile, InMemoryStore};

    fn create_service(store: InMemoryStore) -> ProfileService<InMemoryStore> {
        ProfileService::new(Arc::new(store))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn get_or_create_creates_once() {
        let service = create_service(InMemoryStore::new());
        let user = UserId::new();

        let first = service.get_or_create(&user).await.unwrap();
        let second = service.get_or_create(&user).await.unwrap();

        assert_eq!(first.user_id, user);
        assert_eq!(first.timestamps.created_at, second.timestamps.created_at);
        assert!(first.display_name.is_none());
    }

    #[tokio::test]
    async fn get_missing_profile_is_not_found() {
        let service = create_service(InMemoryStore::new());

        let err = service.get(&UserId::new()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_applies_changes() {
        let user = UserId::new();
        let service = create_service(InMemoryStore::new().with_profile(test_profile(user)));

        let updated = service
            .update(
                &user,
                ProfileChanges {
                    about: Some(Some("Gopher".to_string())),
                    date_of_birth: Some(Some(date(1990, 5, 17))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.about.as_deref(), Some("Gopher"));
        assert_eq!(updated.display_name.as_deref(), Some("Test User"));
        assert!(updated.timestamps.edited);
        // Hidden until the user opts in
        assert_eq!(updated.visible_date_of_birth(), None);

        let shown = service
            .update(
                &user,
                ProfileChanges {
                    date_of_birth_visible: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(shown.visible_date_of_birth(), Some(date(1990, 5, 17)));
    }

    #[tokio::test]
    async fn long_display_name_is_rejected() {
        let service = create_service(InMemoryStore::new());

        let err = service
            .update(
                &UserId::new(),
                ProfileChanges {
                    display_name: Some(Some("n".repeat(513))),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn follow_is_idempotent() {
        let service = create_service(InMemoryStore::new());
        let user = UserId::new();
        let fan = UserId::new();

        service.follow(&user, &fan).await.unwrap();
        let profile = service.follow(&user, &fan).await.unwrap();
        assert_eq!(profile.followers.len(), 1);

        service.unfollow(&user, &fan).await.unwrap();
        let profile = service.unfollow(&user, &fan).await.unwrap();
        assert!(profile.followers.is_empty());
    }

    #[tokio::test]
    async fn cannot_follow_self() {
        let service = create_service(InMemoryStore::new());
        let user = UserId::new();

        assert!(service.follow(&user, &user).await.is_err());
    }

    #[tokio::test]
    async fn community_lists_are_idempotent() {
        let service = create_service(InMemoryStore::new());
        let user = UserId::new();

        service
            .add_community(&user, CommunityList::Favourite, "golang")
            .await
            .unwrap();
        let profile = service
            .add_community(&user, CommunityList::Favourite, "golang")
            .await
            .unwrap();
        assert_eq!(profile.favourite_communities, vec!["golang".to_string()]);
        assert!(profile.muted_communities.is_empty());

        let profile = service
            .remove_community(&user, CommunityList::Muted, "golang")
            .await
            .unwrap();
        assert_eq!(profile.favourite_communities.len(), 1);

        let profile = service
            .remove_community(&user, CommunityList::Favourite, "golang")
            .await
            .unwrap();
        assert!(profile.favourite_communities.is_empty());
    }

    #[tokio::test]
    async fn concurrent_edits_keep_every_field() {
        let service = create_service(InMemoryStore::new());
        let user = UserId::new();
        service.get_or_create(&user).await.unwrap();

        let (favourite, muted, banned, about) = tokio::join!(
            service.add_community(&user, CommunityList::Favourite, "golang"),
            service.add_community(&user, CommunityList::Muted, "python"),
            service.ban_until(&user, date(2030, 1, 31)),
            service.update(
                &user,
                ProfileChanges {
                    about: Some(Some("Gopher".to_string())),
                    ..Default::default()
                },
            ),
        );
        favourite.unwrap();
        muted.unwrap();
        banned.unwrap();
        about.unwrap();

        let profile = service.get(&user).await.unwrap();
        assert_eq!(profile.favourite_communities, vec!["golang"]);
        assert_eq!(profile.muted_communities, vec!["python"]);
        assert_eq!(profile.banned_until, Some(date(2030, 1, 31)));
        assert_eq!(profile.about.as_deref(), Some("Gopher"));
    }

    #[tokio::test]
    async fn ban_until_is_inclusive_and_liftable() {
        let service = create_service(InMemoryStore::new());
        let user = UserId::new();

        let banned = service.ban_until(&user, date(2030, 1, 31)).await.unwrap();
        assert!(banned.is_banned_on(date(2030, 1, 31)));
        assert!(!banned.is_banned_on(date(2030, 2, 1)));

        let lifted = service.lift_ban(&user).await.unwrap();
        assert!(!lifted.is_banned_on(date(2030, 1, 1)));
    }

    #[tokio::test]
    async fn deletion_request_is_recorded() {
        let service = create_service(InMemoryStore::new());
        let user = UserId::new();

        let profile = service.request_deletion(&user, true).await.unwrap();

        assert!(profile.is_requesting_delete);
    }
}
