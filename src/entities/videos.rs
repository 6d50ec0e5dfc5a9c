use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::behaviors::{SoftDeletes, Timestamped};

/// Age ratings accepted for a video.
pub const RATING_LIST: &[&str] = &["L", "10", "12", "14", "16", "18"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub year_launched: i32,
    #[sea_orm(default_expr = "Expr::value(false)")]
    pub opened: bool,
    pub rating: String,
    pub duration: i32,
    /// Filename only; the blob lives under `<id>/<thumb_file>`.
    pub thumb_file: Option<String>,
    pub video_file: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::category_video::Entity")]
    CategoryVideo,
    #[sea_orm(has_many = "super::genre_video::Entity")]
    GenreVideo,
}

impl Related<super::category_video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryVideo.def()
    }
}

impl Related<super::genre_video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GenreVideo.def()
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
