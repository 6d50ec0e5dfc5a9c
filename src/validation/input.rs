use bytes::Bytes;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::api::error::AppError;

/// A binary part received with the request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            original_name: Some(original_name.into()),
            content_type: Some(content_type.into()),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// MIME type sniffed from the content, falling back to the declared type.
    pub fn detected_mime(&self) -> Option<String> {
        if let Some(kind) = infer::get(&self.data) {
            return Some(kind.mime_type().to_string());
        }
        self.content_type.as_deref().map(normalize_mime)
    }

    /// Extension derived from the content, else from the original filename.
    pub fn extension(&self) -> Option<String> {
        if let Some(kind) = infer::get(&self.data) {
            return Some(kind.extension().to_string());
        }
        self.original_name
            .as_deref()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_lowercase())
    }
}

fn normalize_mime(content_type: &str) -> String {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    match mime.as_str() {
        "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
        "video/m4v" | "video/x-m4v" => "video/mp4".to_string(),
        _ => mime,
    }
}

/// One request field before validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<String>),
    File(UploadedFile),
}

impl FieldValue {
    /// Empty values only satisfy rules when the field is optional.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) | FieldValue::File(_) => false,
        }
    }

    /// Scalar rendering used by string and enumeration rules.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            FieldValue::Number(n) => Some(Cow::Owned(n.to_string())),
            FieldValue::Bool(b) => Some(Cow::Borrowed(if *b { "1" } else { "0" })),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            FieldValue::Text(s) => match s.trim() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => n.as_i64(),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            FieldValue::File(file) => Some(file),
            _ => None,
        }
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n),
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => FieldValue::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            other @ Value::Object(_) => FieldValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<UploadedFile> for FieldValue {
    fn from(value: UploadedFile) -> Self {
        FieldValue::File(value)
    }
}

/// The raw field mapping of a write request.
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    fields: BTreeMap<String, FieldValue>,
}

impl RequestInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and internal callers.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Appends to a list field (`categories_id[]` style form parts).
    pub fn push(&mut self, field: &str, item: String) {
        match self.fields.get_mut(field) {
            Some(FieldValue::List(items)) => items.push(item),
            _ => {
                self.fields
                    .insert(field.to_string(), FieldValue::List(vec![item]));
            }
        }
    }

    /// Accepts a JSON object body.
    pub fn from_json(body: Value) -> Result<Self, AppError> {
        match body {
            Value::Object(map) => Ok(Self {
                fields: map
                    .into_iter()
                    .map(|(k, v)| (k, FieldValue::from_json(v)))
                    .collect(),
            }),
            Value::Null => Ok(Self::default()),
            _ => Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            )),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field)
            .filter(|v| !v.is_blank())
            .and_then(|v| v.as_text())
            .map(|s| s.into_owned())
    }

    pub fn boolean(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_integer)
    }

    /// List items, or an empty list when the field is absent or not a list.
    pub fn list(&self, field: &str) -> Vec<String> {
        self.get(field)
            .and_then(FieldValue::as_list)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    pub fn take_file(&mut self, field: &str) -> Option<UploadedFile> {
        match self.fields.remove(field) {
            Some(FieldValue::File(file)) => Some(file),
            Some(other) => {
                self.fields.insert(field.to_string(), other);
                None
            }
            None => None,
        }
    }
}
