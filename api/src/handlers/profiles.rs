//! Profile handlers
//!
//! Profiles are created on first access, so every endpoint works for any
//! user id.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{deserialize_some, parse_segment};
use crate::domain::entities::{CommunityList, Profile, ProfileChanges, UserId};
use crate::error::AppError;
use crate::AppState;

/// Profile with the birth date shown only when the user allows it
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub date_of_birth: Option<NaiveDate>,
    /// Whether the ban covers today
    pub is_banned: bool,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let date_of_birth = profile.visible_date_of_birth();
        let is_banned = profile.is_banned_on(Utc::now().date_naive());
        Self {
            profile,
            date_of_birth,
            is_banned,
        }
    }
}

/// Partial update. Optional fields accept `null` to clear them.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub about: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub date_of_birth_visible: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub avatar: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub banner: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct DeletionRequest {
    pub requested: bool,
}

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    /// Last day of the ban, inclusive
    pub until: NaiveDate,
}

/// GET /admin/profiles/:user_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.profile_service.get_or_create(&UserId(user_id)).await?;
    Ok(Json(profile.into()))
}

/// PATCH /admin/profiles/:user_id
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let changes = ProfileChanges {
        display_name: request.display_name,
        about: request.about,
        date_of_birth: request.date_of_birth,
        date_of_birth_visible: request.date_of_birth_visible,
        avatar: request.avatar,
        banner: request.banner,
    };

    let profile = state
        .profile_service
        .update(&UserId(user_id), changes)
        .await?;
    Ok(Json(profile.into()))
}

/// PUT /admin/profiles/:user_id/followers/:follower_id
pub async fn follow_profile(
    State(state): State<AppState>,
    Path((user_id, follower_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .profile_service
        .follow(&UserId(user_id), &UserId(follower_id))
        .await?;
    Ok(Json(profile.into()))
}

/// DELETE /admin/profiles/:user_id/followers/:follower_id
pub async fn unfollow_profile(
    State(state): State<AppState>,
    Path((user_id, follower_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .profile_service
        .unfollow(&UserId(user_id), &UserId(follower_id))
        .await?;
    Ok(Json(profile.into()))
}

/// PUT /admin/profiles/:user_id/communities/:list/:name
///
/// `list` is `favourites` or `muted`.
pub async fn add_profile_community(
    State(state): State<AppState>,
    Path((user_id, list, name)): Path<(Uuid, String, String)>,
) -> Result<Json<ProfileResponse>, AppError> {
    let list: CommunityList = parse_segment(&list)?;
    let profile = state
        .profile_service
        .add_community(&UserId(user_id), list, &name)
        .await?;
    Ok(Json(profile.into()))
}

/// DELETE /admin/profiles/:user_id/communities/:list/:name
pub async fn remove_profile_community(
    State(state): State<AppState>,
    Path((user_id, list, name)): Path<(Uuid, String, String)>,
) -> Result<Json<ProfileResponse>, AppError> {
    let list: CommunityList = parse_segment(&list)?;
    let profile = state
        .profile_service
        .remove_community(&UserId(user_id), list, &name)
        .await?;
    Ok(Json(profile.into()))
}

/// PUT /admin/profiles/:user_id/deletion
pub async fn set_profile_deletion(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<DeletionRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .profile_service
        .request_deletion(&UserId(user_id), request.requested)
        .await?;
    Ok(Json(profile.into()))
}

/// PUT /admin/profiles/:user_id/ban
pub async fn ban_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<BanRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state
        .profile_service
        .ban_until(&UserId(user_id), request.until)
        .await?;
    Ok(Json(profile.into()))
}

/// DELETE /admin/profiles/:user_id/ban
pub async fn lift_profile_ban(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.profile_service.lift_ban(&UserId(user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_born(visible: bool) -> Profile {
        let mut profile = Profile::new(UserId::new());
        profile.date_of_birth = NaiveDate::from_ymd_opt(1990, 5, 17);
        profile.date_of_birth_visible = visible;
        profile
    }

    #[test]
    fn visible_birth_date_is_shown() {
        let json = serde_json::to_value(ProfileResponse::from(profile_born(true))).unwrap();
        assert_eq!(json["date_of_birth"], "1990-05-17");
    }

    #[test]
    fn hidden_birth_date_is_null() {
        let json = serde_json::to_value(ProfileResponse::from(profile_born(false))).unwrap();
        assert!(json["date_of_birth"].is_null());
        assert_eq!(json["date_of_birth_visible"], false);
    }

    #[test]
    fn ban_state_is_reported() {
        let mut profile = profile_born(true);
        let json = serde_json::to_value(ProfileResponse::from(profile.clone())).unwrap();
        assert_eq!(json["is_banned"], false);

        profile.banned_until = Some(Utc::now().date_naive() + chrono::Duration::days(3));
        let json = serde_json::to_value(ProfileResponse::from(profile)).unwrap();
        assert_eq!(json["is_banned"], true);
    }

    #[test]
    fn update_request_can_clear_about() {
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"about": null, "date_of_birth": "2000-01-31"}"#).unwrap();

        assert_eq!(request.about, Some(None));
        assert_eq!(request.date_of_birth, Some(NaiveDate::from_ymd_opt(2000, 1, 31)));
        assert_eq!(request.display_name, None);
    }
}
