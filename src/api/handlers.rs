use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{GenerateSpeechRequest, HealthResponse, VoicesResponse};
use crate::api::routes::AppState;
use crate::audio;
use crate::error::AppError;
use crate::tts::{voice, SynthesisRequest, SynthesisResult, DEFAULT_MODEL, DEFAULT_VOICE};

/// Parse the body as JSON whatever its Content-Type. An unreadable body or a
/// mistyped field is a server-side failure; a JSON value that is not an object
/// carries no text and fails validation downstream.
fn parse_body(body: &[u8]) -> Result<SynthesisRequest, AppError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Internal(format!("Unreadable request body: {}", e)))?;

    let body = match value {
        serde_json::Value::Object(_) => serde_json::from_value::<GenerateSpeechRequest>(value)
            .map_err(|e| AppError::Internal(format!("Unreadable request body: {}", e)))?,
        serde_json::Value::Null => {
            return Err(AppError::Internal("Request body is null".into()));
        }
        _ => GenerateSpeechRequest::default(),
    };
    Ok(body.into())
}

pub async fn generate_speech(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SynthesisResult>, AppError> {
    let request = parse_body(&body)?;
    let result = state.speech.synthesize(&request).await?;
    Ok(Json(result))
}

/// Same as [`generate_speech`] but returns a ready-to-play WAV attachment.
pub async fn generate_speech_wav(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = parse_body(&body)?;
    let result = state.speech.synthesize(&request).await?;

    let pcm = audio::decode_audio_content(&result.audio_content)?;
    let wav = audio::build_container(&pcm, &result.mime_type);
    let filename = audio::timestamp_filename(chrono::Local::now().naive_local(), "wav");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        wav,
    )
        .into_response())
}

pub async fn list_voices() -> Json<VoicesResponse> {
    Json(VoicesResponse {
        voices: voice::VOICES,
        models: voice::MODELS,
        default_voice: DEFAULT_VOICE,
        default_model: DEFAULT_MODEL,
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
