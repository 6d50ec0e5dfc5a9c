use chrono::Utc;
use futures::FutureExt;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
use std::collections::BTreeSet;

use super::{CatalogService, ListOptions, VideoDetails, VideoInput};
use crate::api::error::AppError;
use crate::config::CatalogConfig;
use crate::entities::behaviors::new_uuid;
use crate::entities::{prelude::*, videos};
use crate::services::associations;
use crate::services::file_artifacts::{self, FileSlot, StagedFiles};
use crate::services::write_transaction::{WriteStage, WriteTransaction};
use crate::validation::{Reference, RequestInput, Rule, RuleSet};

const LABEL: &str = "Video";

pub fn video_rules(config: &CatalogConfig) -> RuleSet {
    RuleSet::new()
        .field("title", vec![Rule::Required, Rule::MaxLength(255)])
        .field("description", vec![Rule::Required])
        .field("year_launched", vec![Rule::Required, Rule::Year])
        .field("opened", vec![Rule::Boolean])
        .field("rating", vec![Rule::Required, Rule::In(videos::RATING_LIST)])
        .field(
            "duration",
            vec![
                Rule::Required,
                Rule::Integer,
                Rule::Positive,
                Rule::MaxNumber(i32::MAX as i64),
            ],
        )
        .field(
            "categories_id",
            vec![
                Rule::Required,
                Rule::Array,
                Rule::Exists(Reference::Categories),
            ],
        )
        .field(
            "genres_id",
            vec![
                Rule::Required,
                Rule::Array,
                Rule::Exists(Reference::Genres),
                Rule::GenresHaveCategories {
                    categories_field: "categories_id",
                },
            ],
        )
        .field(FileSlot::Thumb.field(), FileSlot::Thumb.rules(config))
        .field(FileSlot::Video.field(), FileSlot::Video.rules(config))
}

fn staged_files(video: &videos::Model) -> StagedFiles {
    StagedFiles {
        thumb_file: video.thumb_file.clone(),
        video_file: video.video_file.clone(),
    }
}

impl CatalogService {
    pub async fn list_videos(&self, options: &ListOptions) -> Result<Vec<VideoDetails>, AppError> {
        let rows = self.list_models::<Videos>(options).await?;
        let ids: Vec<String> = rows.iter().map(|v| v.id.clone()).collect();
        let mut categories =
            associations::related_ids_by_parent::<CategoryVideo, _>(&self.db, &ids).await?;
        let mut genres =
            associations::related_ids_by_parent::<GenreVideo, _>(&self.db, &ids).await?;

        let mut details = Vec::with_capacity(rows.len());
        for video in rows {
            details.push(VideoDetails {
                categories_id: categories.remove(&video.id).unwrap_or_default(),
                genres_id: genres.remove(&video.id).unwrap_or_default(),
                thumb_file_url: self.file_url(&video.id, video.thumb_file.as_deref()).await?,
                video_file_url: self.file_url(&video.id, video.video_file.as_deref()).await?,
                video,
            });
        }
        Ok(details)
    }

    pub async fn get_video(&self, id: &str) -> Result<VideoDetails, AppError> {
        let video = self.find_model::<Videos>(LABEL, id).await?;
        self.video_details(video).await
    }

    async fn video_details(&self, video: videos::Model) -> Result<VideoDetails, AppError> {
        let categories_id =
            associations::related_ids::<CategoryVideo, _>(&self.db, &video.id).await?;
        let genres_id = associations::related_ids::<GenreVideo, _>(&self.db, &video.id).await?;
        Ok(VideoDetails {
            categories_id,
            genres_id,
            thumb_file_url: self.file_url(&video.id, video.thumb_file.as_deref()).await?,
            video_file_url: self.file_url(&video.id, video.video_file.as_deref()).await?,
            video,
        })
    }

    pub async fn create_video(&self, input: RequestInput) -> Result<VideoDetails, AppError> {
        self.check_request(&video_rules(&self.config), &input).await?;
        let data = VideoInput::from_request(input)?;
        self.store_video(None, data).await
    }

    pub async fn update_video(
        &self,
        id: &str,
        input: RequestInput,
    ) -> Result<VideoDetails, AppError> {
        self.find_model::<Videos>(LABEL, id).await?;
        self.check_request(&video_rules(&self.config), &input).await?;
        let data = VideoInput::from_request(input)?;
        self.store_video(Some(id), data).await
    }

    /// Saves the video row, replaces its categories and genres, and stores
    /// new uploads, all or nothing.
    ///
    /// Replaced files are deleted only once the rows have committed. On any
    /// failure the files written by this call are removed again and files
    /// from earlier writes are left in place.
    pub async fn store_video(
        &self,
        id: Option<&str>,
        data: VideoInput,
    ) -> Result<VideoDetails, AppError> {
        data.check()?;

        let existing = match id {
            Some(id) => Some(self.find_model::<Videos>(LABEL, id).await?),
            None => None,
        };

        let video = WriteTransaction::run(&self.db, self.storage.clone(), move |tx| {
            async move {
                let now = Utc::now();
                let mut saved = match existing {
                    Some(current) => {
                        let mut active = current.into_active_model();
                        active.title = Set(data.title);
                        active.description = Set(data.description);
                        active.year_launched = Set(data.year_launched);
                        if let Some(opened) = data.opened {
                            active.opened = Set(opened);
                        }
                        active.rating = Set(data.rating);
                        active.duration = Set(data.duration);
                        active.updated_at = Set(now);
                        active.update(tx.conn()).await.map_err(AppError::from_db)?
                    }
                    None => videos::ActiveModel {
                        id: Set(new_uuid()),
                        title: Set(data.title),
                        description: Set(data.description),
                        year_launched: Set(data.year_launched),
                        opened: Set(data.opened.unwrap_or(false)),
                        rating: Set(data.rating),
                        duration: Set(data.duration),
                        thumb_file: Set(None),
                        video_file: Set(None),
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
                let genres: BTreeSet<String> = data.genres_id.into_iter().collect();
                associations::sync::<CategoryVideo, _>(tx.conn(), &saved.id, &categories)
                    .await
                    .map_err(AppError::from_db)?;
                associations::sync::<GenreVideo, _>(tx.conn(), &saved.id, &genres)
                    .await
                    .map_err(AppError::from_db)?;

                tx.enter(WriteStage::CommittingFiles)?;
                if !data.uploads.is_empty() {
                    let current = staged_files(&saved);
                    let staged =
                        file_artifacts::stage_uploads(tx, &saved.id, data.uploads, &current)
                            .await?;
                    if staged != current {
                        let mut active = saved.into_active_model();
                        active.thumb_file = Set(staged.thumb_file);
                        active.video_file = Set(staged.video_file);
                        saved = active.update(tx.conn()).await.map_err(AppError::from_db)?;
                    }
                }

                Ok(saved)
            }
            .boxed()
        })
        .await?;

        tracing::info!("🎬 Video saved: {} ({})", video.title, video.id);
        self.video_details(video).await
    }

    /// Soft delete keeps the stored files so the video can be restored.
    pub async fn delete_video(&self, id: &str) -> Result<(), AppError> {
        self.trash::<Videos>(LABEL, id).await
    }

    pub async fn restore_video(&self, id: &str) -> Result<VideoDetails, AppError> {
        self.untrash::<Videos>(LABEL, id).await?;
        self.get_video(id).await
    }
}
