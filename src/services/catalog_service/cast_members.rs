use chrono::Utc;
use futures::FutureExt;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

use super::{CastMemberDetails, CastMemberInput, CatalogService, ListOptions};
use crate::api::error::AppError;
use crate::entities::behaviors::new_uuid;
use crate::entities::cast_members::{self, CastMemberType};
use crate::entities::prelude::*;
use crate::services::write_transaction::WriteTransaction;
use crate::validation::{RequestInput, Rule, RuleSet};

const LABEL: &str = "Cast member";

pub fn cast_member_rules() -> RuleSet {
    RuleSet::new()
        .field("name", vec![Rule::Required, Rule::MaxLength(255)])
        .field("type", vec![Rule::Required, Rule::In(CastMemberType::CODES)])
}

impl CatalogService {
    pub async fn list_cast_members(
        &self,
        options: &ListOptions,
    ) -> Result<Vec<CastMemberDetails>, AppError> {
        self.list_models::<CastMembers>(options).await
    }

    pub async fn get_cast_member(&self, id: &str) -> Result<CastMemberDetails, AppError> {
        self.find_model::<CastMembers>(LABEL, id).await
    }

    pub async fn create_cast_member(
        &self,
        input: RequestInput,
    ) -> Result<CastMemberDetails, AppError> {
        self.check_request(&cast_member_rules(), &input).await?;
        let data = CastMemberInput::from_request(&input)?;
        self.store_cast_member(None, data).await
    }

    pub async fn update_cast_member(
        &self,
        id: &str,
        input: RequestInput,
    ) -> Result<CastMemberDetails, AppError> {
        self.find_model::<CastMembers>(LABEL, id).await?;
        self.check_request(&cast_member_rules(), &input).await?;
        let data = CastMemberInput::from_request(&input)?;
        self.store_cast_member(Some(id), data).await
    }

    pub async fn store_cast_member(
        &self,
        id: Option<&str>,
        data: CastMemberInput,
    ) -> Result<CastMemberDetails, AppError> {
        use validator::Validate;
        data.validate()?;

        let existing = match id {
            Some(id) => Some(self.find_model::<CastMembers>(LABEL, id).await?),
            None => None,
        };

        let member = WriteTransaction::run(&self.db, self.storage.clone(), move |tx| {
            async move {
                let now = Utc::now();
                let saved = match existing {
                    Some(current) => {
                        let mut active = current.into_active_model();
                        active.name = Set(data.name);
                        active.member_type = Set(data.member_type.code());
                        active.updated_at = Set(now);
                        active.update(tx.conn()).await.map_err(AppError::from_db)?
                    }
                    None => cast_members::ActiveModel {
                        id: Set(new_uuid()),
                        name: Set(data.name),
                        member_type: Set(data.member_type.code()),
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

        tracing::info!("🎭 Cast member saved: {} ({})", member.name, member.id);
        Ok(member)
    }

    pub async fn delete_cast_member(&self, id: &str) -> Result<(), AppError> {
        self.trash::<CastMembers>(LABEL, id).await
    }

    pub async fn restore_cast_member(&self, id: &str) -> Result<CastMemberDetails, AppError> {
        self.untrash::<CastMembers>(LABEL, id).await?;
        self.get_cast_member(id).await
    }
}
