//! Capabilities shared by catalog entities.
//!
//! Every catalog table carries a UUID string key and a nullable `deleted_at`
//! marker. Entities opt into both by implementing [`SoftDeletes`]; the query
//! helpers below never need to know which table they are working on.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Select, prelude::DateTimeUtc,
};
use uuid::Uuid;

/// Generates the primary key for a new catalog row.
pub fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Soft-delete behaviour for an entity keyed by a UUID string.
pub trait SoftDeletes: EntityTrait {
    fn id_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;

    /// Rows that have not been soft-deleted.
    fn find_active() -> Select<Self> {
        Self::find().filter(Self::deleted_at_column().is_null())
    }

    /// Every row, soft-deleted or not.
    fn find_with_trashed() -> Select<Self> {
        Self::find()
    }

    fn find_active_by_id(id: &str) -> Select<Self> {
        Self::find_active().filter(Self::id_column().eq(id))
    }
}

/// Entities carrying `created_at` / `updated_at`.
pub trait Timestamped: EntityTrait {
    fn created_at_column() -> Self::Column;
}

/// Marks the row as deleted. Returns `false` when the row does not exist or
/// is already trashed.
pub async fn soft_delete<E, C>(db: &C, id: &str) -> Result<bool, DbErr>
where
    E: SoftDeletes,
    C: ConnectionTrait,
{
    let res = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(Utc::now()))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

/// Clears the deleted marker. Returns `false` when there was nothing to restore.
pub async fn restore<E, C>(db: &C, id: &str) -> Result<bool, DbErr>
where
    E: SoftDeletes,
    C: ConnectionTrait,
{
    let res = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(Option::<DateTimeUtc>::None))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_not_null())
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}
