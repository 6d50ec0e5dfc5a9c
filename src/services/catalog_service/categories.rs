use chrono::Utc;
use futures::FutureExt;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

use super::{CatalogService, CategoryDetails, CategoryInput, ListOptions};
use crate::api::error::AppError;
use crate::entities::behaviors::new_uuid;
use crate::entities::{categories, prelude::*};
use crate::services::write_transaction::WriteTransaction;
use crate::validation::{RequestInput, Rule, RuleSet};

const LABEL: &str = "Category";

pub fn category_rules() -> RuleSet {
    RuleSet::new()
        .field("name", vec![Rule::Required, Rule::MaxLength(255)])
        .field("description", vec![Rule::Nullable])
        .field("is_active", vec![Rule::Boolean])
}

impl CatalogService {
    pub async fn list_categories(
        &self,
        options: &ListOptions,
    ) -> Result<Vec<CategoryDetails>, AppError> {
        self.list_models::<Categories>(options).await
    }

    pub async fn get_category(&self, id: &str) -> Result<CategoryDetails, AppError> {
        self.find_model::<Categories>(LABEL, id).await
    }

    pub async fn create_category(&self, input: RequestInput) -> Result<CategoryDetails, AppError> {
        self.check_request(&category_rules(), &input).await?;
        let data = CategoryInput::from_request(&input)?;
        self.store_category(None, data).await
    }

    pub async fn update_category(
        &self,
        id: &str,
        input: RequestInput,
    ) -> Result<CategoryDetails, AppError> {
        self.find_model::<Categories>(LABEL, id).await?;
        self.check_request(&category_rules(), &input).await?;
        let data = CategoryInput::from_request(&input)?;
        self.store_category(Some(id), data).await
    }

    /// Inserts a category, or updates `id` when given.
    pub async fn store_category(
        &self,
        id: Option<&str>,
        data: CategoryInput,
    ) -> Result<CategoryDetails, AppError> {
        use validator::Validate;
        data.validate()?;

        let existing = match id {
            Some(id) => Some(self.find_model::<Categories>(LABEL, id).await?),
            None => None,
        };

        let category = WriteTransaction::run(&self.db, self.storage.clone(), move |tx| {
            async move {
                let now = Utc::now();
                let saved = match existing {
                    Some(current) => {
                        let mut active = current.into_active_model();
                        active.name = Set(data.name);
                        if let Some(description) = data.description {
                            active.description = Set(description);
                        }
                        if let Some(is_active) = data.is_active {
                            active.is_active = Set(is_active);
                        }
                        active.updated_at = Set(now);
                        active.update(tx.conn()).await.map_err(AppError::from_db)?
                    }
                    None => categories::ActiveModel {
                        id: Set(new_uuid()),
                        name: Set(data.name),
                        description: Set(data.description.flatten()),
                        is_active: Set(data.is_active.unwrap_or(true)),
                        created_at: Set(now),
                        updated_at: Set(now),
                        deleted_at: Set(None),
                    }
                    .insert(tx.conn())
                    .await
                    .map_err(AppError::from_db)?,
                };
                Ok(saved)
            }
            .boxed()
        })
        .await?;

        tracing::info!("📁 Category saved: {} ({})", category.name, category.id);
        Ok(category)
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), AppError> {
        self.trash::<Categories>(LABEL, id).await
    }

    pub async fn restore_category(&self, id: &str) -> Result<CategoryDetails, AppError> {
        self.untrash::<Categories>(LABEL, id).await?;
        self.get_category(id).await
    }
}
