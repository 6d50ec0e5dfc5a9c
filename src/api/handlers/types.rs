use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::{cast_members, categories};
use crate::services::catalog_service::{GenreDetails, ListOptions, VideoDetails};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Include soft-deleted rows
    #[serde(default)]
    pub with_trashed: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl From<ListQuery> for ListOptions {
    fn from(query: ListQuery) -> Self {
        Self {
            with_trashed: query.with_trashed,
            limit: query.limit,
            offset: query.offset,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<categories::Model> for CategoryResponse {
    fn from(m: categories::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
            deleted_at: m.deleted_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CastMemberRequest {
    pub name: String,
    /// 1 = director, 2 = actor
    #[serde(rename = "type")]
    pub member_type: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CastMemberResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<cast_members::Model> for CastMemberResponse {
    fn from(m: cast_members::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            member_type: m.member_type,
            created_at: m.created_at,
            updated_at: m.updated_at,
            deleted_at: m.deleted_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct GenreRequest {
    pub name: String,
    pub is_active: Option<bool>,
    pub categories_id: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenreResponse {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub categories_id: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<GenreDetails> for GenreResponse {
    fn from(d: GenreDetails) -> Self {
        let g = d.genre;
        Self {
            id: g.id,
            name: g.name,
            is_active: g.is_active,
            categories_id: d.categories_id,
            created_at: g.created_at,
            updated_at: g.updated_at,
            deleted_at: g.deleted_at,
        }
    }
}

/// Video fields. Sent as JSON, or as multipart form data when uploading
/// `thumb_file` / `video_file` (lists as repeated `categories_id[]` parts).
#[derive(Serialize, Deserialize, ToSchema)]
pub struct VideoRequest {
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub opened: Option<bool>,
    /// One of L, 10, 12, 14, 16, 18
    pub rating: String,
    /// Minutes
    pub duration: i32,
    pub categories_id: Vec<String>,
    pub genres_id: Vec<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub thumb_file: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub video_file: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub opened: bool,
    pub rating: String,
    pub duration: i32,
    pub thumb_file: Option<String>,
    pub video_file: Option<String>,
    pub thumb_file_url: Option<String>,
    pub video_file_url: Option<String>,
    pub categories_id: Vec<String>,
    pub genres_id: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<VideoDetails> for VideoResponse {
    fn from(d: VideoDetails) -> Self {
        let v = d.video;
        Self {
            id: v.id,
            title: v.title,
            description: v.description,
            year_launched: v.year_launched,
            opened: v.opened,
            rating: v.rating,
            duration: v.duration,
            thumb_file: v.thumb_file,
            video_file: v.video_file,
            thumb_file_url: d.thumb_file_url,
            video_file_url: d.video_file_url,
            categories_id: d.categories_id,
            genres_id: d.genres_id,
            created_at: v.created_at,
            updated_at: v.updated_at,
            deleted_at: v.deleted_at,
        }
    }
}
