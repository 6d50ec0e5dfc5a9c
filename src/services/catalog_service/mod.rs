//! Catalog writes and queries.
//!
//! Each write operation validates the raw request against its [`RuleSet`]
//! before any transaction is opened, coerces it into a typed input and hands
//! that to the matching `store_*` method. The `store_*` methods are public so
//! internal callers can skip the request layer; they still enforce the typed
//! input's field invariants.

use crate::api::error::AppError;
use crate::config::CatalogConfig;
use crate::entities::behaviors::{self, SoftDeletes, Timestamped};
use crate::services::storage::StorageService;
use crate::validation::{RequestInput, RuleSet, StoreLookup};
use sea_orm::{DatabaseConnection, QueryOrder, QuerySelect};
use std::sync::Arc;

pub mod cast_members;
pub mod categories;
pub mod genres;
pub mod types;
pub mod videos;

pub use types::*;

pub struct CatalogService {
    db: DatabaseConnection,
    storage: Arc<dyn StorageService>,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<dyn StorageService>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            db,
            storage,
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    async fn check_request(&self, rules: &RuleSet, input: &RequestInput) -> Result<(), AppError> {
        rules.validate(input, &StoreLookup::new(&self.db)).await
    }

    async fn find_model<E>(&self, label: &str, id: &str) -> Result<E::Model, AppError>
    where
        E: SoftDeletes,
    {
        E::find_active_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(label, id))
    }

    async fn list_models<E>(&self, options: &ListOptions) -> Result<Vec<E::Model>, AppError>
    where
        E: SoftDeletes + Timestamped,
    {
        let query = if options.with_trashed {
            E::find_with_trashed()
        } else {
            E::find_active()
        };
        let rows = query
            .order_by_desc(E::created_at_column())
            .order_by_asc(E::id_column())
            .limit(options.limit)
            .offset(options.offset)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn trash<E>(&self, label: &str, id: &str) -> Result<(), AppError>
    where
        E: SoftDeletes,
    {
        if !behaviors::soft_delete::<E, _>(&self.db, id).await? {
            return Err(AppError::not_found(label, id));
        }
        tracing::info!("🗑️ {} {} moved to trash", label, id);
        Ok(())
    }

    async fn untrash<E>(&self, label: &str, id: &str) -> Result<(), AppError>
    where
        E: SoftDeletes,
    {
        if !behaviors::restore::<E, _>(&self.db, id).await? {
            return Err(AppError::not_found(label, id));
        }
        tracing::info!("♻️ {} {} restored", label, id);
        Ok(())
    }

    /// Public URL of a stored file of `owner_id`.
    async fn file_url(&self, owner_id: &str, filename: Option<&str>) -> Result<Option<String>, AppError> {
        match filename {
            Some(name) => {
                let key = crate::services::file_artifacts::file_key(owner_id, name);
                let url = self
                    .storage
                    .get_download_url(&key)
                    .await
                    .map_err(AppError::Storage)?;
                Ok(Some(url))
            }
            None => Ok(None),
        }
    }
}
