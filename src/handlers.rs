//! HTTP endpoints composing the upload store and the chat gateway.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::gateway::ChatGateway;
use crate::media;
use crate::pages;
use crate::store::UploadStore;

/// Forwarded with every chat payload regardless of the actual image type,
/// matching upstream behavior. See DESIGN.md before changing this.
const CHAT_IMAGE_MIME: &str = "image/jpeg";

#[derive(Clone)]
pub struct AppState {
    pub store: UploadStore,
    pub gateway: Arc<dyn ChatGateway>,
}

/// `GET /` — gallery. A listing failure logs and renders an empty gallery
/// rather than erroring the page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let images = match state.store.list_images().await {
        Ok(images) => images,
        Err(e) => {
            error!("failed to list uploads: {e}");
            Vec::new()
        }
    };
    Html(pages::gallery_page(&images))
}

/// `GET /upload`
pub async fn upload_form() -> Html<String> {
    Html(pages::upload_page(None))
}

/// `POST /upload` — multipart form with a `file` field. Failures re-render
/// the form with a message; success redirects to the gallery.
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut file: Option<(String, Bytes)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(data) => file = Some((filename, data)),
                    Err(e) => return upload_error(&format!("Error uploading file: {e}")),
                }
                break;
            }
            Ok(None) => break,
            Err(e) => return upload_error(&format!("Error uploading file: {e}")),
        }
    }

    let Some((filename, data)) = file else {
        return upload_error("No file part");
    };
    if filename.is_empty() {
        return upload_error("No selected file");
    }
    if !state.store.is_allowed(&filename) {
        return upload_error("Allowed image types are png, jpg, jpeg, gif");
    }

    match state.store.save(&filename, &data).await {
        Ok(name) => {
            info!("image successfully uploaded as {name}");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            error!("upload of {filename} failed: {e}");
            upload_error(&format!("Error uploading file: {e}"))
        }
    }
}

fn upload_error(message: &str) -> Response {
    Html(pages::upload_page(Some(message))).into_response()
}

/// `GET /uploads/{filename}` — raw stored bytes with an extension-derived
/// content type.
pub async fn uploaded_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state.store.fetch(&filename).await?;
    let headers = [(header::CONTENT_TYPE, media::mime_for(&filename))];
    Ok((headers, bytes).into_response())
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// `POST /chat_with_llm` — JSON `{query, image}` in, `{response}` out.
/// Both fields are checked here so a bad request never reaches the gateway.
pub async fn chat_with_llm(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let query = req.query.unwrap_or_default();
    let image = req.image.unwrap_or_default();
    if query.is_empty() || image.is_empty() {
        return Err(AppError::InvalidRequest(
            "Missing query or image data".to_string(),
        ));
    }

    let response = state
        .gateway
        .generate(&query, &image, CHAT_IMAGE_MIME)
        .await
        .map_err(|e| {
            warn!("chat request failed: {e}");
            e
        })?;
    Ok(Json(ChatResponse { response }))
}
