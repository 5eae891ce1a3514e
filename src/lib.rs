//! Image gallery web app with multimodal Gemini chat.
//!
//! Uploaded images live as flat files under a configured directory; the
//! gallery is re-derived from that directory on every request. The chat
//! endpoint forwards a text query plus a base64 image to the Gemini
//! `generateContent` API and relays the generated text.

pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod media;
pub mod pages;
pub mod store;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub use config::AppConfig;
pub use error::AppError;
pub use gateway::{ChatGateway, GeminiAuth, GeminiGateway};
pub use handlers::AppState;
pub use store::UploadStore;

/// The full HTTP surface. Taking the state (and body cap) as arguments is
/// what lets the integration tests run the app against a scratch upload
/// directory and a fake gateway.
pub fn app(state: AppState, max_body: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/upload", get(handlers::upload_form).post(handlers::upload))
        .route("/uploads/:filename", get(handlers::uploaded_file))
        .route("/chat_with_llm", post(handlers::chat_with_llm))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
