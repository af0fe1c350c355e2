pub mod gemini;
pub mod voice;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppError;

pub use gemini::{GeminiClient, GenerateContentResponse};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_VOICE: &str = "Kore";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: Option<String>,
    pub style_prompt: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisResult {
    pub audio_content: String,
    pub mime_type: String,
}

/// A fully resolved outbound call: defaults applied, prompt built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechCall {
    pub model: String,
    pub prompt: String,
    pub voice: String,
}

#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn generate(&self, call: &SpeechCall) -> Result<GenerateContentResponse, AppError>;
}

pub struct SpeechService {
    provider: Arc<dyn SpeechProvider>,
}

impl SpeechService {
    pub fn new(provider: Arc<dyn SpeechProvider>) -> Self {
        Self { provider }
    }

    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResult, AppError> {
        if request.text.trim().is_empty() {
            return Err(AppError::BadRequest("Text input is required.".into()));
        }

        let call = SpeechCall {
            model: non_empty(&request.model).unwrap_or(DEFAULT_MODEL).to_string(),
            prompt: build_prompt(&request.text, non_empty(&request.style_prompt)),
            voice: non_empty(&request.voice).unwrap_or(DEFAULT_VOICE).to_string(),
        };

        tracing::info!(
            model = %call.model,
            voice = %call.voice,
            chars = request.text.chars().count(),
            "Forwarding speech request"
        );

        let response = self.provider.generate(&call).await?;
        let audio = gemini::extract_inline_audio(response)?;

        tracing::debug!(mime_type = %audio.mime_type, bytes = audio.data.len(), "Received audio");

        Ok(SynthesisResult {
            audio_content: audio.data,
            mime_type: audio.mime_type,
        })
    }
}

/// Prefix the style instruction when one is given, otherwise send the text as is.
pub fn build_prompt(text: &str, style_prompt: Option<&str>) -> String {
    match style_prompt {
        Some(style) => format!("Read aloud {}: {}", style, text),
        None => text.to_string(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}


#[cfg(test)]
mod tests {
    use super::testing::MockProvider;
    use super::*;

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn prompt_with_style() {
        assert_eq!(build_prompt("Hi", Some("cheerfully")), "Read aloud cheerfully: Hi");
    }

    #[test]
    fn prompt_without_style() {
        assert_eq!(build_prompt("Hi", None), "Hi");
    }

    #[tokio::test]
    async fn forwards_once_and_returns_both_fields() {
        let provider = MockProvider::with_audio("AAAA", "audio/L16;codec=pcm;rate=24000");
        let service = SpeechService::new(provider.clone());

        let result = service
            .synthesize(&SynthesisRequest {
                text: "Hi".into(),
                voice: Some("Puck".into()),
                style_prompt: Some("cheerfully".into()),
                model: Some("gemini-2.5-pro-preview-tts".into()),
            })
            .await
            .unwrap();

        assert_eq!(result.audio_content, "AAAA");
        assert_eq!(result.mime_type, "audio/L16;codec=pcm;rate=24000");
        assert_eq!(
            provider.calls(),
            vec![SpeechCall {
                model: "gemini-2.5-pro-preview-tts".into(),
                prompt: "Read aloud cheerfully: Hi".into(),
                voice: "Puck".into(),
            }]
        );
    }

    #[tokio::test]
    async fn applies_defaults_for_missing_or_empty_fields() {
        let provider = MockProvider::with_audio("AAAA", "audio/L16");
        let service = SpeechService::new(provider.clone());

        service.synthesize(&request("Hi")).await.unwrap();
        service
            .synthesize(&SynthesisRequest {
                text: "Hi".into(),
                voice: Some(String::new()),
                style_prompt: Some(String::new()),
                model: Some(String::new()),
            })
            .await
            .unwrap();

        for call in provider.calls() {
            assert_eq!(call.model, DEFAULT_MODEL);
            assert_eq!(call.voice, DEFAULT_VOICE);
            assert_eq!(call.prompt, "Hi");
        }
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn text_is_sent_untrimmed() {
        let provider = MockProvider::with_audio("AAAA", "audio/L16");
        let service = SpeechService::new(provider.clone());

        service.synthesize(&request("  Hi there ")).await.unwrap();
        assert_eq!(provider.calls()[0].prompt, "  Hi there ");
    }

    #[tokio::test]
    async fn blank_text_is_rejected_without_calling_provider() {
        let provider = MockProvider::with_audio("AAAA", "audio/L16");
        let service = SpeechService::new(provider.clone());

        for text in ["", "   ", "\n\t"] {
            let err = service.synthesize(&request(text)).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_inline_data_is_a_protocol_error() {
        let provider = MockProvider::replying(Ok(serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "no audio" }] } }]
        }))
        .unwrap()));
        let service = SpeechService::new(provider.clone());

        let err = service.synthesize(&request("Hi")).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamProtocol(_)));
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn provider_failure_is_surfaced_without_retry() {
        let provider = MockProvider::replying(Err(AppError::Network("connection reset".into())));
        let service = SpeechService::new(provider.clone());

        let err = service.synthesize(&request("Hi")).await.unwrap_err();
        assert!(matches!(err, AppError::Network(msg) if msg == "connection reset"));
        assert_eq!(provider.calls().len(), 1);
    }
}
