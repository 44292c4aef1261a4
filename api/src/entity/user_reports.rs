use sea_orm::entity::prelude::*;

/// Reports against users. Users live in an external identity store, so the
/// reported user is not a foreign key.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub reporter: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub details: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub modified_at: DateTimeWithTimeZone,
    pub edited: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

super::touch_on_update!();
