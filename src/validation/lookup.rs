use async_trait::async_trait;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};
use std::collections::BTreeSet;

use crate::entities::behaviors::SoftDeletes;
use crate::entities::{categories, category_genre, genres, prelude::*};

use super::rules::Reference;

/// Store queries the rule engine needs.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    /// The subset of `ids` present in `reference` and not soft-deleted.
    async fn existing_ids(
        &self,
        reference: Reference,
        ids: &[String],
    ) -> Result<BTreeSet<String>, DbErr>;

    /// Genres among `genre_ids` linked to at least one of `category_ids`.
    async fn genres_linked_to(
        &self,
        genre_ids: &[String],
        category_ids: &[String],
    ) -> Result<BTreeSet<String>, DbErr>;
}

/// [`ReferenceLookup`] backed by a sea-orm connection.
pub struct StoreLookup<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> StoreLookup<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<'a, C: ConnectionTrait> ReferenceLookup for StoreLookup<'a, C> {
    async fn existing_ids(
        &self,
        reference: Reference,
        ids: &[String],
    ) -> Result<BTreeSet<String>, DbErr> {
        if ids.is_empty() {
            return Ok(BTreeSet::new());
        }

        let found: Vec<String> = match reference {
            Reference::Categories => {
                Categories::find_active()
                    .select_only()
                    .column(categories::Column::Id)
                    .filter(categories::Column::Id.is_in(ids.iter().map(String::as_str)))
                    .into_tuple::<String>()
                    .all(self.db)
                    .await?
            }
            Reference::Genres => {
                Genres::find_active()
                    .select_only()
                    .column(genres::Column::Id)
                    .filter(genres::Column::Id.is_in(ids.iter().map(String::as_str)))
                    .into_tuple::<String>()
                    .all(self.db)
                    .await?
            }
        };

        Ok(found.into_iter().collect())
    }

    async fn genres_linked_to(
        &self,
        genre_ids: &[String],
        category_ids: &[String],
    ) -> Result<BTreeSet<String>, DbErr> {
        let rows = CategoryGenre::find()
            .filter(category_genre::Column::GenreId.is_in(genre_ids.iter().map(String::as_str)))
            .filter(
                category_genre::Column::CategoryId.is_in(category_ids.iter().map(String::as_str)),
            )
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(|r| r.genre_id).collect())
    }
}
