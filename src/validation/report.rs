use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

/// A single failed rule on a field.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Violation {
    pub rule: String,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl Violation {
    pub fn new(rule: &str, field: &str, params: &[(&str, String)]) -> Self {
        let params: BTreeMap<String, String> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Self {
            rule: rule.to_string(),
            message: render_message(rule, field, &params),
            params,
        }
    }
}

fn render_message(rule: &str, field: &str, params: &BTreeMap<String, String>) -> String {
    let attribute = field.replace('_', " ");
    let param = |name: &str| params.get(name).cloned().unwrap_or_default();

    match rule {
        "required" => format!("The {} field is required.", attribute),
        "max.string" => format!(
            "The {} may not be greater than {} characters.",
            attribute,
            param("max")
        ),
        "max.file" => format!(
            "The {} may not be greater than {} kilobytes.",
            attribute,
            param("max")
        ),
        "boolean" => format!("The {} field must be true or false.", attribute),
        "integer" => format!("The {} must be an integer.", attribute),
        "max.numeric" => format!(
            "The {} may not be greater than {}.",
            attribute,
            param("max")
        ),
        "min.numeric" => format!("The {} must be at least {}.", attribute, param("min")),
        "date_format" => format!(
            "The {} does not match the format {}.",
            attribute,
            params.get("format").map(String::as_str).unwrap_or("Y")
        ),
        "in" | "exists" => format!("The selected {} is invalid.", attribute),
        "array" => format!("The {} must be an array.", attribute),
        "file" => format!("The {} must be a file.", attribute),
        "mimetypes" => format!(
            "The {} must be a file of type: {}.",
            attribute,
            param("values")
        ),
        "genres_has_categories" => format!(
            "Each selected {} must be related to at least one of the selected categories.",
            attribute
        ),
        _ => format!("The {} is invalid.", attribute),
    }
}

/// Failed rules grouped by field, serialized as the body of a 422 response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ValidationReport(BTreeMap<String, Vec<Violation>>);

impl ValidationReport {
    pub fn add(&mut self, field: &str, violation: Violation) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn violations(&self, field: &str) -> &[Violation] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when `field` failed on `rule`.
    pub fn has(&self, field: &str, rule: &str) -> bool {
        self.violations(field).iter().any(|v| v.rule == rule)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violations in self.0.values() {
            for v in violations {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{}", v.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for ValidationReport {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut report = ValidationReport::default();
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            for err in field_errors.iter() {
                let owned: Vec<(String, String)> = err
                    .params
                    .iter()
                    .map(|(k, v)| {
                        let rendered = match v {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        (k.to_string(), rendered)
                    })
                    .filter(|(k, _)| k != "value")
                    .collect();
                let params: Vec<(&str, String)> =
                    owned.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
                report.add(&field, Violation::new(&err.code, &field, &params));
            }
        }
        report
    }
}
