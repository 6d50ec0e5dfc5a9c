use sea_orm::DbErr;

use super::input::{FieldValue, RequestInput};
use super::lookup::ReferenceLookup;
use super::report::Violation;

/// Tables that request ids may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Categories,
    Genres,
}

impl Reference {
    pub fn table(self) -> &'static str {
        match self {
            Reference::Categories => "categories",
            Reference::Genres => "genres",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    /// Null or blank values skip the remaining rules.
    Nullable,
    MaxLength(usize),
    MaxKilobytes(u64),
    Boolean,
    Integer,
    Positive,
    /// Integer no greater than the bound.
    MaxNumber(i64),
    /// Four digit year (`Y`).
    Year,
    In(&'static [&'static str]),
    Array,
    /// Every id exists and is not soft-deleted.
    Exists(Reference),
    File,
    MimeTypes(Vec<String>),
    /// Every genre in the field is linked to one of the categories submitted
    /// in `categories_field` of the same request.
    GenresHaveCategories { categories_field: &'static str },
}

impl Rule {
    /// Checks a present, non-blank value.
    pub async fn check(
        &self,
        field: &str,
        value: &FieldValue,
        input: &RequestInput,
        lookup: &dyn ReferenceLookup,
    ) -> Result<Option<Violation>, DbErr> {
        let violation = match self {
            Rule::Required | Rule::Nullable => None,
            Rule::MaxLength(max) => value
                .as_text()
                .filter(|s| s.chars().count() > *max)
                .map(|_| Violation::new("max.string", field, &[("max", max.to_string())])),
            Rule::MaxKilobytes(max) => value
                .as_file()
                .filter(|f| f.size() as u64 > max * 1024)
                .map(|_| Violation::new("max.file", field, &[("max", max.to_string())])),
            Rule::Boolean => value
                .as_bool()
                .is_none()
                .then(|| Violation::new("boolean", field, &[])),
            Rule::Integer => value
                .as_integer()
                .is_none()
                .then(|| Violation::new("integer", field, &[])),
            Rule::Positive => match value.as_integer() {
                Some(n) if n >= 1 => None,
                _ => Some(Violation::new("min.numeric", field, &[("min", "1".to_string())])),
            },
            Rule::MaxNumber(max) => value
                .as_integer()
                .filter(|n| n > max)
                .map(|_| Violation::new("max.numeric", field, &[("max", max.to_string())])),
            Rule::Year => {
                let valid = value
                    .as_text()
                    .map(|s| s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()))
                    .unwrap_or(false);
                (!valid).then(|| Violation::new("date_format", field, &[("format", "Y".to_string())]))
            }
            Rule::In(allowed) => {
                let valid = value
                    .as_text()
                    .map(|s| allowed.iter().any(|a| *a == s.as_ref()))
                    .unwrap_or(false);
                (!valid).then(|| Violation::new("in", field, &[("values", allowed.join(","))]))
            }
            Rule::Array => value
                .as_list()
                .is_none()
                .then(|| Violation::new("array", field, &[])),
            Rule::Exists(reference) => match value.as_list() {
                Some(ids) => {
                    let found = lookup.existing_ids(*reference, ids).await?;
                    ids.iter()
                        .any(|id| !found.contains(id))
                        .then(|| {
                            Violation::new("exists", field, &[("table", reference.table().to_string())])
                        })
                }
                None => Some(Violation::new(
                    "exists",
                    field,
                    &[("table", reference.table().to_string())],
                )),
            },
            Rule::File => value
                .as_file()
                .is_none()
                .then(|| Violation::new("file", field, &[])),
            Rule::MimeTypes(allowed) => {
                let valid = value
                    .as_file()
                    .and_then(|f| f.detected_mime())
                    .map(|mime| allowed.iter().any(|a| a == &mime))
                    .unwrap_or(false);
                (!valid).then(|| Violation::new("mimetypes", field, &[("values", allowed.join(","))]))
            }
            Rule::GenresHaveCategories { categories_field } => {
                let genres = value.as_list().unwrap_or(&[]);
                let categories = input.list(categories_field);
                let linked = if categories.is_empty() || genres.is_empty() {
                    Default::default()
                } else {
                    lookup.genres_linked_to(genres, &categories).await?
                };
                genres
                    .iter()
                    .any(|g| !linked.contains(g))
                    .then(|| Violation::new("genres_has_categories", field, &[]))
            }
        };
        Ok(violation)
    }
}
