use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::api::error::AppError;
use crate::entities::cast_members::CastMemberType;
use crate::entities::{cast_members, categories, genres, videos};
use crate::services::file_artifacts::{FileSlot, SlotUpload};
use crate::validation::RequestInput;

/// Paging and trash filter for list operations.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub with_trashed: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn valid_rating(rating: &str) -> Result<(), ValidationError> {
    if videos::RATING_LIST.contains(&rating) {
        return Ok(());
    }
    let mut err = ValidationError::new("in");
    err.add_param(Cow::from("values"), &videos::RATING_LIST.join(","));
    Err(err)
}

fn year_format(year: i32) -> Result<(), ValidationError> {
    if (1000..=9999).contains(&year) {
        return Ok(());
    }
    let mut err = ValidationError::new("date_format");
    err.add_param(Cow::from("format"), &"Y");
    Err(err)
}

fn missing(field: &str) -> AppError {
    AppError::BadRequest(format!("Field {} is missing or malformed", field))
}

/// `Some(None)` clears the column, `None` leaves it as it is.
fn optional_text(input: &RequestInput, field: &str) -> Option<Option<String>> {
    input.contains(field).then(|| input.text(field))
}

/// Category fields after validation.
#[derive(Debug, Clone, Validate)]
pub struct CategoryInput {
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, code = "max.string")
    )]
    pub name: String,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl CategoryInput {
    pub fn from_request(input: &RequestInput) -> Result<Self, AppError> {
        Ok(Self {
            name: input.text("name").ok_or_else(|| missing("name"))?,
            description: optional_text(input, "description"),
            is_active: input.boolean("is_active"),
        })
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CastMemberInput {
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, code = "max.string")
    )]
    pub name: String,
    pub member_type: CastMemberType,
}

impl CastMemberInput {
    pub fn from_request(input: &RequestInput) -> Result<Self, AppError> {
        Ok(Self {
            name: input.text("name").ok_or_else(|| missing("name"))?,
            member_type: input
                .integer("type")
                .and_then(CastMemberType::from_code)
                .ok_or_else(|| missing("type"))?,
        })
    }
}

#[derive(Debug, Clone, Validate)]
pub struct GenreInput {
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, code = "max.string")
    )]
    pub name: String,
    pub is_active: Option<bool>,
    #[validate(length(min = 1, code = "required"))]
    pub categories_id: Vec<String>,
}

impl GenreInput {
    pub fn from_request(input: &RequestInput) -> Result<Self, AppError> {
        Ok(Self {
            name: input.text("name").ok_or_else(|| missing("name"))?,
            is_active: input.boolean("is_active"),
            categories_id: input.list("categories_id"),
        })
    }
}

#[derive(Debug, Clone, Validate)]
pub struct VideoInput {
    #[validate(
        custom(function = "not_blank"),
        length(max = 255, code = "max.string")
    )]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    pub year_launched: i32,
    pub opened: Option<bool>,
    #[validate(custom(function = "valid_rating"))]
    pub rating: String,
    #[validate(range(min = 1, code = "min.numeric"))]
    pub duration: i32,
    #[validate(length(min = 1, code = "required"))]
    pub categories_id: Vec<String>,
    #[validate(length(min = 1, code = "required"))]
    pub genres_id: Vec<String>,
    /// New files only; slots without an upload keep their current file.
    pub uploads: Vec<SlotUpload>,
}

impl VideoInput {
    /// Moves uploaded files out of `input`.
    pub fn from_request(mut input: RequestInput) -> Result<Self, AppError> {
        let uploads = FileSlot::ALL
            .into_iter()
            .filter_map(|slot| {
                input
                    .take_file(slot.field())
                    .map(|file| SlotUpload { slot, file })
            })
            .collect();

        let int = |field: &str| -> Result<i32, AppError> {
            input
                .integer(field)
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| missing(field))
        };

        Ok(Self {
            title: input.text("title").ok_or_else(|| missing("title"))?,
            description: input
                .text("description")
                .ok_or_else(|| missing("description"))?,
            year_launched: int("year_launched")?,
            opened: input.boolean("opened"),
            rating: input.text("rating").ok_or_else(|| missing("rating"))?,
            duration: int("duration")?,
            categories_id: input.list("categories_id"),
            genres_id: input.list("genres_id"),
            uploads,
        })
    }

    /// Field checks the derive cannot express.
    pub fn check(&self) -> Result<(), AppError> {
        let mut errors = match self.validate() {
            Ok(()) => validator::ValidationErrors::new(),
            Err(errors) => errors,
        };
        if let Err(e) = year_format(self.year_launched) {
            errors.add("year_launched", e);
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreDetails {
    pub genre: genres::Model,
    pub categories_id: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub video: videos::Model,
    pub categories_id: Vec<String>,
    pub genres_id: Vec<String>,
    pub thumb_file_url: Option<String>,
    pub video_file_url: Option<String>,
}

pub type CategoryDetails = categories::Model;
pub type CastMemberDetails = cast_members::Model;
