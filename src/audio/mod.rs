pub mod wav;

use base64::{engine::general_purpose, Engine as _};
use chrono::NaiveDateTime;

use crate::error::AppError;

pub use wav::build_container;

/// Decode the provider's base64 audio payload into raw PCM bytes.
pub fn decode_audio_content(audio_content: &str) -> Result<Vec<u8>, AppError> {
    general_purpose::STANDARD
        .decode(audio_content)
        .map_err(|e| AppError::UpstreamProtocol(format!("Audio payload is not valid base64: {}", e)))
}

/// Sortable download name, e.g. `audio_2025-06-01_09-05-03.wav`.
pub fn timestamp_filename(at: NaiveDateTime, extension: &str) -> String {
    format!("audio_{}.{}", at.format("%Y-%m-%d_%H-%M-%S"), extension)
}
