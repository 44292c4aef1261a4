//! PostgreSQL adapter for ProfileRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, OnConflict, SimpleExpr};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::{db_err, now, timestamps};
use crate::domain::entities::{CommunityList, Profile, ProfileChanges, UserId, UserSet};
use crate::domain::ports::ProfileRepository;
use crate::entity::{profile_followers, profiles};
use crate::error::DomainError;

/// PostgreSQL implementation of ProfileRepository
pub struct PostgresProfileRepository {
    db: DatabaseConnection,
}

impl PostgresProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_followers(&self, model: profiles::Model) -> Result<Profile, DomainError> {
        let followers = profile_followers::Entity::find()
            .filter(profile_followers::Column::UserId.eq(model.user_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut profile: Profile = model.into();
        profile.followers = followers
            .into_iter()
            .map(|f| UserId(f.follower_id))
            .collect();
        Ok(profile)
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError> {
        let result = profiles::Entity::find_by_id(user_id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match result {
            Some(model) => Ok(Some(self.with_followers(model).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, user_id: &UserId) -> Result<Profile, DomainError> {
        let now = now();

        let model = profiles::ActiveModel {
            user_id: Set(user_id.0),
            display_name: Set(None),
            about: Set(None),
            date_of_birth: Set(None),
            date_of_birth_visible: Set(false),
            avatar: Set(None),
            banner: Set(None),
            favourite_communities: Set(Vec::new()),
            muted_communities: Set(Vec::new()),
            banned_until: Set(None),
            is_requesting_delete: Set(false),
            created_at: Set(now),
            modified_at: Set(now),
            edited: Set(false),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Profile, DomainError> {
        let mut active_model = profiles::ActiveModel {
            user_id: Set(user_id.0),
            ..Default::default()
        };
        if let Some(display_name) = &changes.display_name {
            active_model.display_name = Set(display_name.clone());
        }
        if let Some(about) = &changes.about {
            active_model.about = Set(about.clone());
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            active_model.date_of_birth = Set(date_of_birth);
        }
        if let Some(visible) = changes.date_of_birth_visible {
            active_model.date_of_birth_visible = Set(visible);
        }
        if let Some(avatar) = &changes.avatar {
            active_model.avatar = Set(avatar.clone());
        }
        if let Some(banner) = &changes.banner {
            active_model.banner = Set(banner.clone());
        }

        let result = active_model.update(&self.db).await.map_err(db_err)?;

        self.with_followers(result).await
    }

    async fn add_community(
        &self,
        user_id: &UserId,
        list: CommunityList,
        name: &str,
    ) -> Result<(), DomainError> {
        let (column, sql_name) = list_column(list);
        let append: SimpleExpr = Expr::cust_with_values(
            format!("array_append({}, $1)", sql_name),
            [name.to_string()],
        );
        let absent: SimpleExpr = Expr::cust_with_values(
            format!("NOT ($1 = ANY({}))", sql_name),
            [name.to_string()],
        );

        profiles::Entity::update_many()
            .col_expr(column, append)
            .col_expr(profiles::Column::ModifiedAt, Expr::value(now()))
            .filter(profiles::Column::UserId.eq(user_id.0))
            .filter(absent)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn remove_community(
        &self,
        user_id: &UserId,
        list: CommunityList,
        name: &str,
    ) -> Result<(), DomainError> {
        let (column, sql_name) = list_column(list);
        let remove: SimpleExpr = Expr::cust_with_values(
            format!("array_remove({}, $1)", sql_name),
            [name.to_string()],
        );
        let present: SimpleExpr =
            Expr::cust_with_values(format!("$1 = ANY({})", sql_name), [name.to_string()]);

        profiles::Entity::update_many()
            .col_expr(column, remove)
            .col_expr(profiles::Column::ModifiedAt, Expr::value(now()))
            .filter(profiles::Column::UserId.eq(user_id.0))
            .filter(present)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn set_requesting_delete(
        &self,
        user_id: &UserId,
        requested: bool,
    ) -> Result<(), DomainError> {
        self.set_columns(profiles::ActiveModel {
            user_id: Set(user_id.0),
            is_requesting_delete: Set(requested),
            ..Default::default()
        })
        .await
    }

    async fn set_banned_until(
        &self,
        user_id: &UserId,
        until: Option<NaiveDate>,
    ) -> Result<(), DomainError> {
        self.set_columns(profiles::ActiveModel {
            user_id: Set(user_id.0),
            banned_until: Set(until),
            ..Default::default()
        })
        .await
    }

    async fn add_follower(
        &self,
        user_id: &UserId,
        follower: &UserId,
    ) -> Result<(), DomainError> {
        let model = profile_followers::ActiveModel {
            user_id: Set(user_id.0),
            follower_id: Set(follower.0),
        };

        profile_followers::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    profile_followers::Column::UserId,
                    profile_followers::Column::FollowerId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn remove_follower(
        &self,
        user_id: &UserId,
        follower: &UserId,
    ) -> Result<(), DomainError> {
        profile_followers::Entity::delete_many()
            .filter(profile_followers::Column::UserId.eq(user_id.0))
            .filter(profile_followers::Column::FollowerId.eq(follower.0))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity. Followers start empty.
impl From<profiles::Model> for Profile {
    fn from(model: profiles::Model) -> Self {
        Profile {
            user_id: UserId(model.user_id),
            display_name: model.display_name,
            about: model.about,
            date_of_birth: model.date_of_birth,
            date_of_birth_visible: model.date_of_birth_visible,
            avatar: model.avatar,
            banner: model.banner,
            favourite_communities: model.favourite_communities,
            muted_communities: model.muted_communities,
            followers: UserSet::new(),
            banned_until: model.banned_until,
            is_requesting_delete: model.is_requesting_delete,
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}
