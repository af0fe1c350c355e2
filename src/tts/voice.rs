use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VoiceInfo {
    pub id: &'static str,
    pub style: &'static str,
}

const fn voice(id: &'static str, style: &'static str) -> VoiceInfo {
    VoiceInfo { id, style }
}

/// Prebuilt voices offered by the UI. The provider is the final authority.
pub const VOICES: &[VoiceInfo] = &[
    voice("Zephyr", "Bright"),
    voice("Puck", "Upbeat"),
    voice("Charon", "Informative"),
    voice("Kore", "Firm"),
    voice("Fenrir", "Excitable"),
    voice("Leda", "Youthful"),
    voice("Orus", "Firm"),
    voice("Aoede", "Breezy"),
    voice("Callirrhoe", "Easy-going"),
    voice("Autonoe", "Bright"),
    voice("Enceladus", "Breathy"),
    voice("Iapetus", "Clear"),
    voice("Umbriel", "Easy-going"),
    voice("Algieba", "Smooth"),
    voice("Despina", "Smooth"),
    voice("Erinome", "Clear"),
    voice("Algenib", "Gravelly"),
    voice("Rasalgethi", "Informative"),
    voice("Laomedeia", "Upbeat"),
    voice("Achernar", "Soft"),
    voice("Alnilam", "Firm"),
    voice("Schedar", "Even"),
    voice("Gacrux", "Mature"),
    voice("Pulcherrima", "Forward"),
    voice("Achird", "Friendly"),
    voice("Zubenelgenubi", "Casual"),
    voice("Vindemiatrix", "Gentle"),
    voice("Sadachbia", "Lively"),
    voice("Sadaltager", "Knowledgeable"),
    voice("Sulafat", "Warm"),
];

pub const MODELS: &[&str] = &["gemini-2.5-flash-preview-tts", "gemini-2.5-pro-preview-tts"];
