//! Gateway to the Gemini `generateContent` API.
//!
//! Handlers talk to the model through the [`ChatGateway`] trait so tests can
//! substitute a fake; [`GeminiGateway`] is the production implementation. The
//! gateway resolves its credentials exactly once at construction: it is
//! either `Ready` for the whole process lifetime or permanently
//! `Unconfigured`, and an operator fixes the latter by restarting.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info, warn};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::AppError;

const AI_STUDIO_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One operation: text prompt + base64 image payload in, generated text out.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// `image_payload` is base64, optionally wrapped in a
    /// `data:image/...;base64,` URI prefix.
    async fn generate(
        &self,
        query: &str,
        image_payload: &str,
        mime_type: &str,
    ) -> Result<String, AppError>;
}

/// Authentication mode, resolved once at startup. Exactly one is active.
#[derive(Debug, Clone)]
pub enum GeminiAuth {
    /// Google AI Studio API key, sent as a `key` query parameter.
    ApiKey(String),
    /// Vertex AI: regional endpoint plus a bearer token.
    VertexAi {
        project: String,
        location: String,
        access_token: String,
    },
}

pub struct GeminiGateway {
    state: State,
}

enum State {
    Ready {
        client: reqwest::Client,
        base_url: String,
        model: String,
        auth: GeminiAuth,
    },
    Unconfigured,
}

impl GeminiGateway {
    pub fn new(model: impl Into<String>, auth: GeminiAuth) -> Self {
        let base_url = match &auth {
            GeminiAuth::ApiKey(_) => AI_STUDIO_BASE_URL.to_string(),
            GeminiAuth::VertexAi { location, .. } => {
                format!("https://{location}-aiplatform.googleapis.com/v1")
            }
        };
        Self {
            state: State::Ready {
                client: reqwest::Client::new(),
                base_url,
                model: model.into(),
                auth,
            },
        }
    }

    /// A gateway with no usable credentials; every call fails with
    /// [`AppError::NotConfigured`] and no network I/O.
    pub fn unconfigured() -> Self {
        Self {
            state: State::Unconfigured,
        }
    }

    /// Point the gateway at a different backend host.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        if let State::Ready { base_url, .. } = &mut self.state {
            *base_url = url.into();
        }
        self
    }

    /// Resolve the configured auth mode. API key takes precedence; a GCP
    /// project without an access token cannot authenticate and resolves to
    /// unconfigured.
    pub fn from_config(cfg: &AppConfig) -> Self {
        if let Some(key) = &cfg.gemini_api_key {
            info!(
                "configured Gemini with AI Studio API key, model {}",
                cfg.model_name
            );
            return Self::new(&cfg.model_name, GeminiAuth::ApiKey(key.clone()));
        }
        if let Some(project) = &cfg.gcp_project_id {
            match &cfg.gcp_access_token {
                Some(token) => {
                    info!(
                        "configured Gemini for Vertex AI, project {} location {}",
                        project, cfg.gcp_location
                    );
                    return Self::new(
                        &cfg.model_name,
                        GeminiAuth::VertexAi {
                            project: project.clone(),
                            location: cfg.gcp_location.clone(),
                            access_token: token.clone(),
                        },
                    );
                }
                None => {
                    warn!("GCP_PROJECT_ID is set but GCP_ACCESS_TOKEN is not; chat is unavailable");
                    return Self::unconfigured();
                }
            }
        }
        warn!("neither GEMINI_API_KEY nor GCP_PROJECT_ID is set; chat is unavailable");
        Self::unconfigured()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready { .. })
    }
}

#[async_trait]
impl ChatGateway for GeminiGateway {
    async fn generate(
        &self,
        query: &str,
        image_payload: &str,
        mime_type: &str,
    ) -> Result<String, AppError> {
        let State::Ready {
            client,
            base_url,
            model,
            auth,
        } = &self.state
        else {
            return Err(AppError::NotConfigured);
        };

        if query.is_empty() || image_payload.is_empty() {
            return Err(AppError::InvalidRequest(
                "Missing query or image data".to_string(),
            ));
        }

        let data = strip_data_uri(image_payload);
        STANDARD
            .decode(data)
            .map_err(|e| AppError::InvalidRequest(format!("invalid base64 image data: {e}")))?;

        // Part order matters to some backends: text first, then image.
        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": query },
                    { "inline_data": { "mime_type": mime_type, "data": data } }
                ]
            }]
        });

        debug!("sending chat request to model {model}");

        let request = match auth {
            GeminiAuth::ApiKey(key) => client
                .post(format!("{base_url}/models/{model}:generateContent"))
                .query(&[("key", key)]),
            GeminiAuth::VertexAi {
                project,
                location,
                access_token,
            } => client
                .post(format!(
                    "{base_url}/projects/{project}/locations/{location}\
                     /publishers/google/models/{model}:generateContent"
                ))
                .bearer_auth(access_token),
        };

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Gateway(format!("API error {status}: {text}")));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Gateway(e.to_string()))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Gateway("no candidates in response".to_string()))?;

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        Ok(text)
    }
}

fn strip_data_uri(payload: &str) -> &str {
    if payload.starts_with("data:image/") {
        payload
            .split_once(',')
            .map(|(_, rest)| rest)
            .unwrap_or(payload)
    } else {
        payload
    }
}

// Wire shape of a generateContent response; only the fields we read.

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_data_uri_prefix() {
        assert_eq!(strip_data_uri("data:image/jpeg;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("data:image/png;base64,QUJD"), "QUJD");
    }

    #[test]
    fn leaves_bare_base64_alone() {
        assert_eq!(strip_data_uri("AAAA"), "AAAA");
        assert_eq!(strip_data_uri(""), "");
    }

    #[test]
    fn auth_modes_resolve_from_config() {
        let mut cfg = crate::config::AppConfig {
            upload_dir: "uploads".into(),
            allowed_extensions: Default::default(),
            max_content_length: 0,
            bind_addr: String::new(),
            model_name: "gemini-1.5-flash".to_string(),
            gemini_api_key: Some("k".to_string()),
            gcp_project_id: None,
            gcp_location: "us-central1".to_string(),
            gcp_access_token: None,
        };
        assert!(GeminiGateway::from_config(&cfg).is_ready());

        cfg.gemini_api_key = None;
        cfg.gcp_project_id = Some("proj".to_string());
        assert!(!GeminiGateway::from_config(&cfg).is_ready());

        cfg.gcp_access_token = Some("tok".to_string());
        assert!(GeminiGateway::from_config(&cfg).is_ready());

        cfg.gcp_project_id = None;
        assert!(!GeminiGateway::from_config(&cfg).is_ready());
    }
}
