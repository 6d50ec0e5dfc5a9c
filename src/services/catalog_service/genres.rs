use chrono::Utc;
use futures::FutureExt;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use std::collections::BTreeSet;

use super::{CatalogService, GenreDetails, GenreInput, ListOptions};
use crate::api::error::AppError;
use crate::entities::behaviors::new_uuid;
use crate::entities::{genres, prelude::*};
use crate::services::associations;
use crate::services::write_transaction::{WriteStage, WriteTransaction};
use crate::validation::{Reference, RequestInput, Rule, RuleSet};

const LABEL: &str = "Genre";

pub fn genre_rules() -> RuleSet {
    RuleSet::new()
        .field("name", vec![Rule::Required, Rule::MaxLength(255)])
        .field("is_active", vec![Rule::Boolean])
        .field(
            "categories_id",
            vec![
                Rule::Required,
                Rule::Array,
                Rule::Exists(Reference::Categories),
            ],
        )
}

impl CatalogService {
    pub async fn list_genres(&self, options: &ListOptions) -> Result<Vec<GenreDetails>, AppError> {
        let rows = self.list_models::<Genres>(options).await?;
        let ids: Vec<String> = rows.iter().map(|g| g.id.clone()).collect();
        let mut links =
            associations::related_ids_by_parent::<CategoryGenre, _>(&self.db, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|genre| GenreDetails {
                categories_id: links.remove(&genre.id).unwrap_or_default(),
                genre,
            })
            .collect())
    }

    pub async fn get_genre(&self, id: &str) -> Result<GenreDetails, AppError> {
        let genre = self.find_model::<Genres>(LABEL, id).await?;
        self.genre_details(genre).await
    }

    async fn genre_details(&self, genre: genres::Model) -> Result<GenreDetails, AppError> {
        let categories_id =
            associations::related_ids::<CategoryGenre, _>(&self.db, &genre.id).await?;
        Ok(GenreDetails {
            genre,
            categories_id,
        })
    }

    pub async fn create_genre(&self, input: RequestInput) -> Result<GenreDetails, AppError> {
        self.check_request(&genre_rules(), &input).await?;
        let data = GenreInput::from_request(&input)?;
        self.store_genre(None, data).await
    }

    pub async fn update_genre(
        &self,
        id: &str,
        input: RequestInput,
    ) -> Result<GenreDetails, AppError> {
        self.find_model::<Genres>(LABEL, id).await?;
        self.check_request(&genre_rules(), &input).await?;
        let data = GenreInput::from_request(&input)?;
        self.store_genre(Some(id), data).await
    }

    /// Saves the genre row and replaces its categories in one transaction.
    pub async fn store_genre(
        &self,
        id: Option<&str>,
        data: GenreInput,
    ) -> Result<GenreDetails, AppError> {
        use validator::Validate;
        data.validate()?;

        let existing = match id {
            Some(id) => Some(self.find_model::<Genres>(LABEL, id).await?),
            None => None,
        };

        let genre = WriteTransaction::run(&self.db, self.storage.clone(), move |tx| {
            async move {
                let now = Utc::now();
                let saved = match existing {
                    Some(current) => {
                        let mut active = current.into_active_model();
                        active.name = Set(data.name);
                        if let Some(is_active) = data.is_active {
                            active.is_active = Set(is_active);
                        }
                        active.updated_at = Set(now);
                        active.update(tx.conn()).await.map_err(AppError::from_db)?
                    }
                    None => genres::ActiveModel {
                        id: Set(new_uuid()),
                        name: Set(data.name),
                        is_active: Set(data.is_active.unwrap_or(true)),
                        created_at: Set(now),
                        updated_at: Set(now),
                        deleted_at: Set(None),
                    }
                    .insert(tx.conn())
                    .await
                    .map_err(AppError::from_db)?,
                };

                tx.enter(WriteStage::SyncingAssociations)?;
                let categories: BTreeSet<String> = data.categories_id.into_iter().collect();
                associations::sync::<CategoryGenre, _>(tx.conn(), &saved.id, &categories)
                    .await
                    .map_err(AppError::from_db)?;

                Ok(saved)
            }
            .boxed()
        })
        .await?;

        tracing::info!("🏷️ Genre saved: {} ({})", genre.name, genre.id);
        self.genre_details(genre).await
    }

    pub async fn delete_genre(&self, id: &str) -> Result<(), AppError> {
        self.trash::<Genres>(LABEL, id).await
    }

    pub async fn restore_genre(&self, id: &str) -> Result<GenreDetails, AppError> {
        self.untrash::<Genres>(LABEL, id).await?;
        self.get_genre(id).await
    }
}
