//! Request validation.
//!
//! A [`RuleSet`] lists, per field, the [`Rule`]s a write request must satisfy.
//! Rules run in order and a field stops at its first violation. Missing or
//! blank fields are only checked by [`Rule::Required`]. Rules that need the
//! store (`Exists`, the genre/category cross check) go through a
//! [`ReferenceLookup`] so the engine stays independent of the connection.

pub mod input;
pub mod lookup;
pub mod report;
pub mod rules;

pub use input::{FieldValue, RequestInput, UploadedFile};
pub use lookup::{ReferenceLookup, StoreLookup};
pub use report::{ValidationReport, Violation};
pub use rules::{Reference, Rule};

use crate::api::error::AppError;

#[derive(Debug, Clone)]
struct FieldRules {
    field: &'static str,
    rules: Vec<Rule>,
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: &'static str, rules: Vec<Rule>) -> Self {
        self.fields.push(FieldRules { field, rules });
        self
    }

    /// Runs every field and collects the violations.
    pub async fn evaluate(
        &self,
        input: &RequestInput,
        lookup: &dyn ReferenceLookup,
    ) -> Result<ValidationReport, sea_orm::DbErr> {
        let mut report = ValidationReport::default();

        for FieldRules { field, rules } in &self.fields {
            let value = match input.get(field) {
                Some(v) if !v.is_blank() => v,
                _ => {
                    if rules.contains(&Rule::Required) {
                        report.add(field, Violation::new("required", field, &[]));
                    }
                    continue;
                }
            };

            for rule in rules {
                if let Some(violation) = rule.check(field, value, input, lookup).await? {
                    report.add(field, violation);
                    break;
                }
            }
        }

        Ok(report)
    }

    /// Fails with [`AppError::Validation`] when any rule is violated.
    pub async fn validate(
        &self,
        input: &RequestInput,
        lookup: &dyn ReferenceLookup,
    ) -> Result<(), AppError> {
        let report = self.evaluate(input, lookup).await?;
        if report.is_empty() {
            Ok(())
        } else {
            tracing::debug!("Validation failed: {}", report);
            Err(AppError::Validation(report))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sea_orm::DbErr;
    use std::collections::{BTreeMap, BTreeSet};

    #[derive(Default)]
    struct FakeLookup {
        categories: BTreeSet<String>,
        genres: BTreeSet<String>,
        links: BTreeMap<String, Vec<String>>,
    }

    #[async_trait]
    impl ReferenceLookup for FakeLookup {
        async fn existing_ids(
            &self,
            reference: Reference,
            ids: &[String],
        ) -> Result<BTreeSet<String>, DbErr> {
            let known = match reference {
                Reference::Categories => &self.categories,
                Reference::Genres => &self.genres,
            };
            Ok(ids.iter().filter(|id| known.contains(*id)).cloned().collect())
        }

        async fn genres_linked_to(
            &self,
            genre_ids: &[String],
            category_ids: &[String],
        ) -> Result<BTreeSet<String>, DbErr> {
            Ok(genre_ids
                .iter()
                .filter(|g| {
                    self.links
                        .get(*g)
                        .map(|cats| cats.iter().any(|c| category_ids.contains(c)))
                        .unwrap_or(false)
                })
                .cloned()
                .collect())
        }
    }

    fn lookup() -> FakeLookup {
        FakeLookup {
            categories: ["c1", "c2"].iter().map(|s| s.to_string()).collect(),
            genres: ["g1", "g2"].iter().map(|s| s.to_string()).collect(),
            links: BTreeMap::from([
                ("g1".to_string(), vec!["c1".to_string()]),
                ("g2".to_string(), vec!["c2".to_string()]),
            ]),
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_missing_fields_only_report_required() {
        let rules = RuleSet::new()
            .field("name", vec![Rule::Required, Rule::MaxLength(255)])
            .field("is_active", vec![Rule::Boolean])
            .field("categories_id", vec![Rule::Required, Rule::Array]);

        let input = RequestInput::new().with("categories_id", Vec::<String>::new());
        let report = rules.evaluate(&input, &lookup()).await.unwrap();

        assert!(report.has("name", "required"));
        assert!(report.has("categories_id", "required"));
        assert!(report.violations("is_active").is_empty());
    }

    #[tokio::test]
    async fn test_type_rules() {
        let rules = RuleSet::new()
            .field("title", vec![Rule::Required, Rule::MaxLength(255)])
            .field("opened", vec![Rule::Boolean])
            .field("duration", vec![Rule::Required, Rule::Integer, Rule::Positive])
            .field("year_launched", vec![Rule::Required, Rule::Year])
            .field("rating", vec![Rule::Required, Rule::In(&["L", "10"])])
            .field("categories_id", vec![Rule::Required, Rule::Array]);

        let input = RequestInput::new()
            .with("title", "x".repeat(256))
            .with("opened", "t")
            .with("duration", "10m")
            .with("year_launched", "10/10/2010")
            .with("rating", 0i64)
            .with("categories_id", "a");
        let report = rules.evaluate(&input, &lookup()).await.unwrap();

        assert!(report.has("title", "max.string"));
        assert_eq!(report.violations("title")[0].params["max"], "255");
        assert!(report.has("opened", "boolean"));
        assert!(report.has("duration", "integer"));
        assert!(report.has("year_launched", "date_format"));
        assert!(report.has("rating", "in"));
        assert!(report.has("categories_id", "array"));
    }

    #[tokio::test]
    async fn test_exists_rejects_unknown_ids() {
        let rules = RuleSet::new().field(
            "categories_id",
            vec![Rule::Required, Rule::Array, Rule::Exists(Reference::Categories)],
        );

        let ok = RequestInput::new().with("categories_id", ids(&["c1", "c2"]));
        assert!(rules.evaluate(&ok, &lookup()).await.unwrap().is_empty());

        let bad = RequestInput::new().with("categories_id", ids(&["c1", "999"]));
        let report = rules.evaluate(&bad, &lookup()).await.unwrap();
        assert!(report.has("categories_id", "exists"));
        assert_eq!(report.violations("categories_id").len(), 1);
    }

    #[tokio::test]
    async fn test_genres_must_share_a_submitted_category() {
        let rules = RuleSet::new().field(
            "genres_id",
            vec![
                Rule::Required,
                Rule::Array,
                Rule::Exists(Reference::Genres),
                Rule::GenresHaveCategories {
                    categories_field: "categories_id",
                },
            ],
        );

        let ok = RequestInput::new()
            .with("genres_id", ids(&["g1"]))
            .with("categories_id", ids(&["c1"]));
        assert!(rules.evaluate(&ok, &lookup()).await.unwrap().is_empty());

        let bad = RequestInput::new()
            .with("genres_id", ids(&["g1", "g2"]))
            .with("categories_id", ids(&["c1"]));
        let report = rules.evaluate(&bad, &lookup()).await.unwrap();
        assert!(report.has("genres_id", "genres_has_categories"));
    }

    #[tokio::test]
    async fn test_file_rules() {
        let rules = RuleSet::new().field(
            "video_file",
            vec![
                Rule::File,
                Rule::MaxKilobytes(1),
                Rule::MimeTypes(vec!["video/mp4".to_string()]),
            ],
        );

        let mut mp4 = vec![0x00, 0x00, 0x00, 0x18];
        mp4.extend_from_slice(b"ftypmp42");
        mp4.extend_from_slice(&[0u8; 12]);

        let ok = RequestInput::new().with("video_file", UploadedFile::new("a.mp4", "video/mp4", mp4));
        assert!(rules.evaluate(&ok, &lookup()).await.unwrap().is_empty());

        let big = RequestInput::new().with(
            "video_file",
            UploadedFile::new("a.mp4", "video/mp4", vec![0u8; 2048]),
        );
        let report = rules.evaluate(&big, &lookup()).await.unwrap();
        assert!(report.has("video_file", "max.file"));

        let text = RequestInput::new().with(
            "video_file",
            UploadedFile::new("a.txt", "text/plain", b"hello".to_vec()),
        );
        let report = rules.evaluate(&text, &lookup()).await.unwrap();
        assert!(report.has("video_file", "mimetypes"));

        let not_a_file = RequestInput::new().with("video_file", "movie.mp4");
        let report = rules.evaluate(&not_a_file, &lookup()).await.unwrap();
        assert!(report.has("video_file", "file"));
    }

    #[tokio::test]
    async fn test_validate_returns_app_error() {
        let rules = RuleSet::new().field("name", vec![Rule::Required]);
        let err = rules
            .validate(&RequestInput::new(), &lookup())
            .await
            .unwrap_err();
        match err {
            AppError::Validation(report) => assert!(report.has("name", "required")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
