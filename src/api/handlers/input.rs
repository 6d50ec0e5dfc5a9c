//! Request body extraction for the write routes.
//!
//! Write routes accept either a JSON object or `multipart/form-data`. Both are
//! flattened into a [`RequestInput`] so validation sees the same field mapping
//! regardless of encoding. Form parts named `field[]` accumulate into a list;
//! parts carrying a filename become uploaded files.

use crate::api::error::AppError;
use crate::validation::{RequestInput, UploadedFile};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::{StatusCode, header::CONTENT_TYPE},
};

pub struct FormInput(pub RequestInput);

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .map(|m| m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA)
        .unwrap_or(false)
}

fn body_error(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the maximum allowed limit".to_string())
    } else {
        AppError::BadRequest(text)
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    body_error(e.status(), e.body_text())
}

async fn read_multipart(mut multipart: Multipart) -> Result<RequestInput, AppError> {
    let mut input = RequestInput::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(filename) = field.file_name().map(str::to_string) {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field.bytes().await.map_err(multipart_error)?;
            // Browsers send an empty part for a file input left blank.
            if filename.is_empty() && data.is_empty() {
                continue;
            }
            tracing::debug!("Received file part {} ({} bytes)", name, data.len());
            input.insert(&name, UploadedFile::new(filename, content_type, data));
        } else if let Some(list) = name.strip_suffix("[]") {
            let text = field.text().await.map_err(multipart_error)?;
            input.push(list, text);
        } else {
            let text = field.text().await.map_err(multipart_error)?;
            input.insert(&name, text);
        }
    }

    Ok(input)
}

#[async_trait]
impl<S> FromRequest<S> for FormInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| body_error(e.status(), e.body_text()))?;
            return read_multipart(multipart).await.map(FormInput);
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| body_error(e.status(), e.body_text()))?;
        if bytes.is_empty() {
            return Ok(FormInput(RequestInput::new()));
        }

        let body: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;
        RequestInput::from_json(body).map(FormInput)
    }
}
