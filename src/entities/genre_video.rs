use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::services::associations::Pivot;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "genre_video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub video_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub genre_id: String,
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
        belongs_to = "super::genres::Entity",
        from = "Column::GenreId",
        to = "super::genres::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Genres,
}

impl Related<super::videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videos.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genres.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Pivot for Entity {
    const RELATION: &'static str = "video.genres";

    fn parent_column() -> Column {
        Column::VideoId
    }

    fn child_column() -> Column {
        Column::GenreId
    }

    fn parent_id(row: &Model) -> &str {
        &row.video_id
    }

    fn child_id(row: &Model) -> &str {
        &row.genre_id
    }

    fn link(parent_id: &str, child_id: &str) -> ActiveModel {
        ActiveModel {
            video_id: Set(parent_id.to_owned()),
            genre_id: Set(child_id.to_owned()),
        }
    }
}
