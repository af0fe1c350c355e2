pub mod handlers;
pub mod routes;

use serde::{Deserialize, Serialize};

use crate::tts::voice::VoiceInfo;
use crate::tts::SynthesisRequest;

/// Body of `POST /api/generate-speech`. Every field may be absent on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateSpeechRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
    pub style_prompt: Option<String>,
    pub model: Option<String>,
}

impl From<GenerateSpeechRequest> for SynthesisRequest {
    fn from(body: GenerateSpeechRequest) -> Self {
        Self {
            text: body.text.unwrap_or_default(),
            voice: body.voice,
            style_prompt: body.style_prompt,
            model: body.model,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoicesResponse {
    pub voices: &'static [VoiceInfo],
    pub models: &'static [&'static str],
    pub default_voice: &'static str,
    pub default_model: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
