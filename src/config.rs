//! Process configuration, read once from the environment at startup.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

pub const MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024; // 16 MiB upload cap
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Immutable application configuration. There is no runtime reload;
/// fixing credentials means restarting the process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upload_dir: PathBuf,
    pub allowed_extensions: HashSet<String>,
    pub max_content_length: usize,
    pub bind_addr: String,
    pub model_name: String,
    /// Google AI Studio API key (`GEMINI_API_KEY`).
    pub gemini_api_key: Option<String>,
    /// Vertex AI project (`GCP_PROJECT_ID`), the alternative auth mode.
    pub gcp_project_id: Option<String>,
    pub gcp_location: String,
    /// Bearer token for Vertex AI calls (`GCP_ACCESS_TOKEN`).
    pub gcp_access_token: Option<String>,
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Build from environment variables, falling back to the defaults
    /// above. `dotenvy::dotenv()` should already have run.
    pub fn from_env() -> Self {
        Self {
            upload_dir: env_opt("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static/uploads")),
            allowed_extensions: ["png", "jpg", "jpeg", "gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_content_length: MAX_CONTENT_LENGTH,
            bind_addr: env_opt("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            model_name: env_opt("GEMINI_MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_key: env_opt("GEMINI_API_KEY"),
            gcp_project_id: env_opt("GCP_PROJECT_ID"),
            gcp_location: env_opt("GCP_LOCATION").unwrap_or_else(|| "us-central1".to_string()),
            gcp_access_token: env_opt("GCP_ACCESS_TOKEN"),
        }
    }
}
