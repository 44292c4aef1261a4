use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    pub display_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub about: Option<String>,
    pub date_of_birth: Option<Date>,
    pub date_of_birth_visible: bool,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub favourite_communities: Vec<String>,
    pub muted_communities: Vec<String>,
    pub banned_until: Option<Date>,
    pub is_requesting_delete: bool,
    pub created_at: DateTimeWithTimeZone,
    pub modified_at: DateTimeWithTimeZone,
    pub edited: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::profile_followers::Entity")]
    Followers,
}

impl Related<super::profile_followers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Followers.def()
    }
}

super::touch_on_update!();
