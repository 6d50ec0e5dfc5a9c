use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};
use std::collections::{BTreeSet, HashMap};

/// A join table linking one parent row to many child rows.
pub trait Pivot: EntityTrait {
    /// Name used in logs, e.g. `video.genres`.
    const RELATION: &'static str;

    fn parent_column() -> Self::Column;
    fn child_column() -> Self::Column;
    fn parent_id(row: &Self::Model) -> &str;
    fn child_id(row: &Self::Model) -> &str;
    fn link(parent_id: &str, child_id: &str) -> Self::ActiveModel;
}

/// Rows touched by a [`sync`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncChanges {
    pub attached: Vec<String>,
    pub detached: Vec<String>,
}

impl SyncChanges {
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty()
    }
}

/// Child ids currently linked to `parent_id`, in ascending order.
pub async fn related_ids<P, C>(db: &C, parent_id: &str) -> Result<Vec<String>, DbErr>
where
    P: Pivot,
    C: ConnectionTrait,
{
    let rows = P::find()
        .filter(P::parent_column().eq(parent_id))
        .order_by_asc(P::child_column())
        .all(db)
        .await?;
    Ok(rows.iter().map(|r| P::child_id(r).to_owned()).collect())
}

/// Child ids for several parents at once, keyed by parent id.
pub async fn related_ids_by_parent<P, C>(
    db: &C,
    parent_ids: &[String],
) -> Result<HashMap<String, Vec<String>>, DbErr>
where
    P: Pivot,
    C: ConnectionTrait,
{
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    if parent_ids.is_empty() {
        return Ok(grouped);
    }

    let rows = P::find()
        .filter(P::parent_column().is_in(parent_ids.iter().map(String::as_str)))
        .order_by_asc(P::child_column())
        .all(db)
        .await?;
    for row in &rows {
        grouped
            .entry(P::parent_id(row).to_owned())
            .or_default()
            .push(P::child_id(row).to_owned());
    }
    Ok(grouped)
}

/// Makes the join rows of `parent_id` equal to `target`.
///
/// Stale rows are deleted and missing rows inserted in the caller's
/// connection, so running it inside a transaction keeps the change atomic.
/// Ids absent from the referenced table fail on the foreign key.
pub async fn sync<P, C>(db: &C, parent_id: &str, target: &BTreeSet<String>) -> Result<SyncChanges, DbErr>
where
    P: Pivot,
    P::Model: IntoActiveModel<P::ActiveModel>,
    C: ConnectionTrait,
{
    let current: BTreeSet<String> = related_ids::<P, C>(db, parent_id)
        .await?
        .into_iter()
        .collect();

    let detached: Vec<String> = current.difference(target).cloned().collect();
    let attached: Vec<String> = target.difference(&current).cloned().collect();

    if !detached.is_empty() {
        P::delete_many()
            .filter(P::parent_column().eq(parent_id))
            .filter(P::child_column().is_in(detached.iter().map(String::as_str)))
            .exec(db)
            .await?;
    }

    if !attached.is_empty() {
        P::insert_many(attached.iter().map(|child| P::link(parent_id, child)))
            .exec_without_returning(db)
            .await?;
    }

    let changes = SyncChanges { attached, detached };
    if changes.is_empty() {
        tracing::debug!("{} for {} already in sync", P::RELATION, parent_id);
    } else {
        tracing::debug!(
            "Synced {} for {}: +{} -{}",
            P::RELATION,
            parent_id,
            changes.attached.len(),
            changes.detached.len()
        );
    }

    Ok(changes)
}
