//! PostgreSQL adapter for CommunityRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{db_err, now, timestamps};
use crate::domain::entities::{
    Community, CommunityChanges, CommunityId, CommunityInvite, CommunityMember,
    CommunityMemberRequest, CommunityType, InviteId, InviteRole, MemberRequestId, MemberRole,
    MemberStatus, NewCommunity, NewCommunityInvite, NewCommunityMember, UserId,
};
use crate::domain::ports::CommunityRepository;
use crate::entity::{communities, community_invites, community_member_requests, community_members};
use crate::error::DomainError;

/// PostgreSQL implementation of CommunityRepository
pub struct PostgresCommunityRepository {
    db: DatabaseConnection,
}

impl PostgresCommunityRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn member_model(
    community_id: Uuid,
    user_id: Uuid,
    role: MemberRole,
    status: MemberStatus,
) -> community_members::ActiveModel {
    let now = now();
    community_members::ActiveModel {
        community_id: Set(community_id),
        user_id: Set(user_id),
        role: Set(role.to_string()),
        status: Set(status.to_string()),
        created_at: Set(now),
        modified_at: Set(now),
        edited: Set(false),
    }
}

#[async_trait]
impl CommunityRepository for PostgresCommunityRepository {
    async fn find_by_id(&self, id: &CommunityId) -> Result<Option<Community>, DomainError> {
        let result = communities::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Community>, DomainError> {
        let result = communities::Entity::find()
            .filter(communities::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Community>, DomainError> {
        let results = communities::Entity::find()
            .order_by_desc(communities::Column::CreatedAt)
            .offset(offset as u64)
            .limit(limit as u64)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, community: &NewCommunity) -> Result<Community, DomainError> {
        let now = now();

        let model = communities::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(community.name.clone()),
            header: Set(community.header.clone()),
            description: Set(community.description.clone()),
            banner: Set(community.banner.clone()),
            logo: Set(community.logo.clone()),
            related_communities: Set(community.related_communities.clone()),
            community_type: Set(community.community_type.to_string()),
            archive_posts: Set(community.archive_posts),
            created_at: Set(now),
            modified_at: Set(now),
            edited: Set(false),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: &CommunityId,
        changes: &CommunityChanges,
    ) -> Result<Community, DomainError> {
        let existing = communities::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound(format!("Community {}", id)))?;

        let mut active_model = existing.into_active_model();
        if let Some(name) = &changes.name {
            active_model.name = Set(name.clone());
        }
        if let Some(header) = &changes.header {
            active_model.header = Set(header.clone());
        }
        if let Some(description) = &changes.description {
            active_model.description = Set(description.clone());
        }
        if let Some(banner) = &changes.banner {
            active_model.banner = Set(banner.clone());
        }
        if let Some(logo) = &changes.logo {
            active_model.logo = Set(logo.clone());
        }
        if let Some(related) = &changes.related_communities {
            active_model.related_communities = Set(related.clone());
        }
        if let Some(community_type) = changes.community_type {
            active_model.community_type = Set(community_type.to_string());
        }
        if let Some(archive_posts) = changes.archive_posts {
            active_model.archive_posts = Set(archive_posts);
        }

        let result = active_model.update(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &CommunityId) -> Result<(), DomainError> {
        let result = communities::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!("Community {}", id)))
        } else {
            Ok(())
        }
    }

    async fn list_members(&self, id: &CommunityId) -> Result<Vec<CommunityMember>, DomainError> {
        let results = community_members::Entity::find()
            .filter(community_members::Column::CommunityId.eq(id.0))
            .order_by_asc(community_members::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_member(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
    ) -> Result<Option<CommunityMember>, DomainError> {
        let result = community_members::Entity::find_by_id((community_id.0, user_id.0))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn add_member(
        &self,
        member: &NewCommunityMember,
    ) -> Result<CommunityMember, DomainError> {
        let result = member_model(
            member.community_id.0,
            member.user_id.0,
            member.role,
            member.status,
        )
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }

    async fn update_member(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
        role: Option<MemberRole>,
        status: Option<MemberStatus>,
    ) -> Result<CommunityMember, DomainError> {
        let member = community_members::Entity::find_by_id((community_id.0, user_id.0))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "Member {} not found in community {}",
                    user_id, community_id
                ))
            })?;

        let mut active_model = member.into_active_model();
        if let Some(role) = role {
            active_model.role = Set(role.to_string());
        }
        if let Some(status) = status {
            active_model.status = Set(status.to_string());
        }

        let result = active_model.update(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn remove_member(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let result = community_members::Entity::delete_by_id((community_id.0, user_id.0))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!(
                "Member {} not found in community {}",
                user_id, community_id
            )))
        } else {
            Ok(())
        }
    }

    async fn create_invite(
        &self,
        invite: &NewCommunityInvite,
    ) -> Result<CommunityInvite, DomainError> {
        let now = now();

        let model = community_invites::ActiveModel {
            id: Set(Uuid::new_v4()),
            community_id: Set(invite.community_id.0),
            inviter: Set(invite.inviter.0),
            invitee: Set(invite.invitee.0),
            invite_as: Set(invite.invite_as.to_string()),
            created_at: Set(now),
            modified_at: Set(now),
            edited: Set(false),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_invite(&self, id: &InviteId) -> Result<Option<CommunityInvite>, DomainError> {
        let result = community_invites::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list_invites(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityInvite>, DomainError> {
        let results = community_invites::Entity::find()
            .filter(community_invites::Column::CommunityId.eq(community_id.0))
            .order_by_desc(community_invites::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn accept_invite(&self, id: &InviteId) -> Result<CommunityMember, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let invite = community_invites::Entity::find_by_id(id.0)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound(format!("Invite {}", id)))?;

        let role: InviteRole = invite.invite_as.parse().unwrap_or_default();
        let member = member_model(
            invite.community_id,
            invite.invitee,
            role.into(),
            MemberStatus::Active,
        )
        .insert(&txn)
        .await
        .map_err(db_err)?;

        community_invites::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(member.into())
    }

    async fn delete_invite(&self, id: &InviteId) -> Result<(), DomainError> {
        let result = community_invites::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!("Invite {}", id)))
        } else {
            Ok(())
        }
    }

    async fn create_request(
        &self,
        community_id: &CommunityId,
        user_id: &UserId,
    ) -> Result<CommunityMemberRequest, DomainError> {
        let now = now();

        let model = community_member_requests::ActiveModel {
            id: Set(Uuid::new_v4()),
            community_id: Set(community_id.0),
            user_id: Set(user_id.0),
            is_approved: Set(false),
            created_at: Set(now),
            modified_at: Set(now),
            edited: Set(false),
        };

        let result = model.insert(&self.db).await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn find_request(
        &self,
        id: &MemberRequestId,
    ) -> Result<Option<CommunityMemberRequest>, DomainError> {
        let result = community_member_requests::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list_requests(
        &self,
        community_id: &CommunityId,
    ) -> Result<Vec<CommunityMemberRequest>, DomainError> {
        let results = community_member_requests::Entity::find()
            .filter(community_member_requests::Column::CommunityId.eq(community_id.0))
            .order_by_asc(community_member_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn approve_request(&self, id: &MemberRequestId) -> Result<CommunityMember, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let request = community_member_requests::Entity::find_by_id(id.0)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound(format!("Member request {}", id)))?;

        if request.is_approved {
            return Err(DomainError::Conflict(format!(
                "Member request {} is already approved",
                id
            )));
        }

        let (community_id, user_id) = (request.community_id, request.user_id);
        let mut active_model = request.into_active_model();
        active_model.is_approved = Set(true);
        active_model.update(&txn).await.map_err(db_err)?;

        let member = member_model(community_id, user_id, MemberRole::Member, MemberStatus::Active)
            .insert(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(member.into())
    }

    async fn delete_request(&self, id: &MemberRequestId) -> Result<(), DomainError> {
        let result = community_member_requests::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            Err(DomainError::NotFound(format!("Member request {}", id)))
        } else {
            Ok(())
        }
    }
}

/// Convert SeaORM model to domain entity
impl From<communities::Model> for Community {
    fn from(model: communities::Model) -> Self {
        Community {
            id: CommunityId(model.id),
            name: model.name,
            header: model.header,
            description: model.description,
            banner: model.banner,
            logo: model.logo,
            related_communities: model.related_communities,
            community_type: model
                .community_type
                .parse()
                .unwrap_or(CommunityType::Public),
            archive_posts: model.archive_posts,
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}

/// Convert SeaORM model to domain entity
impl From<community_members::Model> for CommunityMember {
    fn from(model: community_members::Model) -> Self {
        CommunityMember {
            community_id: CommunityId(model.community_id),
            user_id: UserId(model.user_id),
            role: model.role.parse().unwrap_or(MemberRole::Member),
            status: model.status.parse().unwrap_or(MemberStatus::Active),
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}

impl From<community_invites::Model> for CommunityInvite {
    fn from(model: community_invites::Model) -> Self {
        CommunityInvite {
            id: InviteId(model.id),
            community_id: CommunityId(model.community_id),
            inviter: UserId(model.inviter),
            invitee: UserId(model.invitee),
            invite_as: model.invite_as.parse().unwrap_or(InviteRole::Member),
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}

impl From<community_member_requests::Model> for CommunityMemberRequest {
    fn from(model: community_member_requests::Model) -> Self {
        CommunityMemberRequest {
            id: MemberRequestId(model.id),
            community_id: CommunityId(model.community_id),
            user_id: UserId(model.user_id),
            is_approved: model.is_approved,
            timestamps: timestamps(model.created_at, model.modified_at, model.edited),
        }
    }
}
