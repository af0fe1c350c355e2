//! Gemini `generateContent` client for speech output.
//!
//! The response is a deeply nested structure where every level may be
//! missing, so each level is an explicit `Option` and [`extract_inline_audio`]
//! walks them in order.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{SpeechCall, SpeechProvider};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

// --- request ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_modalities: [&'static str; 1],
    speech_config: SpeechConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    voice_config: VoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig<'a> {
    voice_name: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn for_speech(call: &'a SpeechCall) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![TextPart { text: &call.prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: &call.voice,
                        },
                    },
                },
            },
        }
    }
}

// --- response ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub parts: Option<Vec<Part>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: Option<String>,
    pub data: Option<String>,
}

/// Base64 audio and its declared mime type, both present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAudio {
    pub data: String,
    pub mime_type: String,
}

fn missing(path: &str) -> AppError {
    AppError::UpstreamProtocol(format!("Provider response has no {}", path))
}

/// Take the first part of the first candidate and return its inline audio.
pub fn extract_inline_audio(response: GenerateContentResponse) -> Result<InlineAudio, AppError> {
    let candidate = response
        .candidates
        .and_then(|c| c.into_iter().next())
        .ok_or_else(|| missing("candidates[0]"))?;

    let content = candidate
        .content
        .ok_or_else(|| missing("candidates[0].content"))?;

    let part = content
        .parts
        .and_then(|p| p.into_iter().next())
        .ok_or_else(|| missing("candidates[0].content.parts[0]"))?;

    let inline_data = part
        .inline_data
        .ok_or_else(|| missing("candidates[0].content.parts[0].inlineData"))?;

    let data = inline_data.data.filter(|d| !d.is_empty());
    let mime_type = inline_data.mime_type.filter(|m| !m.is_empty());

    match (data, mime_type) {
        (Some(data), Some(mime_type)) => Ok(InlineAudio { data, mime_type }),
        _ => Err(AppError::UpstreamProtocol(
            "Provider response is missing audio data or mimeType".into(),
        )),
    }
}

// --- client ---

pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    if e.is_builder() {
        AppError::Internal(format!("Failed to build provider request: {}", e))
    } else {
        AppError::Network(e.to_string())
    }
}

#[async_trait]
impl SpeechProvider for GeminiClient {
    async fn generate(&self, call: &SpeechCall) -> Result<GenerateContentResponse, AppError> {
        let body = GenerateContentRequest::for_speech(call);

        let response = self
            .http
            .post(self.endpoint(&call.model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(AppError::Provider {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::UpstreamProtocol(format!("Provider response is not valid JSON: {}", e))
        })
    }
}
