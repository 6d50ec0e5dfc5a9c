use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::behaviors::{SoftDeletes, Timestamped};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cast_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    /// Numeric [`CastMemberType`] code.
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub member_type: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

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

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CastMemberType {
    Director = 1,
    Actor = 2,
}

impl CastMemberType {
    pub const CODES: &'static [&'static str] = &["1", "2"];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Director),
            2 => Some(Self::Actor),
            _ => None,
        }
    }
}
