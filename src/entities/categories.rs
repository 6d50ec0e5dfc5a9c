use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::behaviors::{SoftDeletes, Timestamped};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(default_expr = "Expr::value(true)")]
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::category_genre::Entity")]
    CategoryGenre,
    #[sea_orm(has_many = "super::category_video::Entity")]
    CategoryVideo,
}

impl Related<super::category_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryGenre.def()
    }
}

impl Related<super::category_video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryVideo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDeletes for Entity {
    fn id_column() -> Column {
        Column::Id
    }

    fn deleted_at_column() -> Column {
        Column::DeletedAt
    }
}

impl Timestamped for Entity {
    fn created_at_column() -> Column {
        Column::CreatedAt
    }
}
