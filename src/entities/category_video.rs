use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::services::associations::Pivot;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category_video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub video_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub category_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::videos::Entity",
        from = "Column::VideoId",
        to = "super::videos::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Videos,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Categories,
}

impl Related<super::videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videos.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Pivot for Entity {
    const RELATION: &'static str = "video.categories";

    fn parent_column() -> Column {
        Column::VideoId
    }

    fn child_column() -> Column {
        Column::CategoryId
    }

    fn parent_id(row: &Model) -> &str {
        &row.video_id
    }

    fn child_id(row: &Model) -> &str {
        &row.category_id
    }

    fn link(parent_id: &str, child_id: &str) -> ActiveModel {
        ActiveModel {
            video_id: Set(parent_id.to_owned()),
            category_id: Set(child_id.to_owned()),
        }
    }
}
