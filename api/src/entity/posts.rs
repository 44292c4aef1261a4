use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub community_id: Uuid,
    pub title: String,
    pub url: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub creator: Uuid,
    pub status: String,
    pub flair_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub modified_at: DateTimeWithTimeZone,
    pub edited: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::communities::Entity",
        from = "Column::CommunityId",
        to = "super::communities::Column::Id",
        on_delete = "Cascade"
    )]
    Community,
    #[sea_orm(
        belongs_to = "super::community_flairs::Entity",
        from = "Column::FlairId",
        to = "super::community_flairs::Column::Id",
        on_delete = "SetNull"
    )]
    Flair,
    #[sea_orm(has_many = "super::post_relations::Entity")]
    PostRelations,
}

impl Related<super::communities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Community.def()
    }
}

impl Related<super::community_flairs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flair.def()
    }
}

impl Related<super::post_relations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostRelations.def()
    }
}

super::touch_on_update!();
