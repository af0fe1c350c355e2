use lazy_static::lazy_static;
use regex::Regex;

/// Size of the RIFF/WAVE header written in front of the samples.
pub const HEADER_LEN: usize = 44;

/// Largest payload whose RIFF chunk size (`36 + len`) still fits in 32 bits.
pub const MAX_DATA_LEN: u32 = u32::MAX - 36;

/// Used when the mime type carries no `rate=` parameter.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

lazy_static! {
    static ref RATE_REGEX: Regex = Regex::new(r"rate=(\d+)").unwrap();
}

/// Linear PCM layout described by the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl PcmFormat {
    /// 16-bit mono, the layout the provider returns.
    pub fn mono16(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
            bits_per_sample: 16,
        }
    }

    pub fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.wrapping_mul(self.block_align() as u32)
    }
}

/// Pull the sample rate out of a hint like `audio/L16;codec=pcm;rate=24000`.
pub fn sample_rate_from_mime(mime_type: &str) -> u32 {
    RATE_REGEX
        .captures(mime_type)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_SAMPLE_RATE)
}

fn capped_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX).min(MAX_DATA_LEN)
}

pub fn header(format: PcmFormat, data_len: usize) -> [u8; HEADER_LEN] {
    let data_len = capped_len(data_len);

    let mut out = [0u8; HEADER_LEN];
    out[0..4].copy_from_slice(b"RIFF");
    out[4..8].copy_from_slice(&(data_len + 36).to_le_bytes());
    out[8..12].copy_from_slice(b"WAVE");

    out[12..16].copy_from_slice(b"fmt ");
    out[16..20].copy_from_slice(&16u32.to_le_bytes());
    out[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    out[22..24].copy_from_slice(&format.channels.to_le_bytes());
    out[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    out[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
    out[32..34].copy_from_slice(&format.block_align().to_le_bytes());
    out[34..36].copy_from_slice(&format.bits_per_sample.to_le_bytes());

    out[36..40].copy_from_slice(b"data");
    out[40..44].copy_from_slice(&data_len.to_le_bytes());
    out
}

/// Wrap raw 16-bit mono PCM in a playable WAV file. Sample bytes are copied
/// verbatim; anything past [`MAX_DATA_LEN`] is dropped so the header lengths
/// always match the appended payload.
pub fn build_container(pcm: &[u8], mime_type: &str) -> Vec<u8> {
    let format = PcmFormat::mono16(sample_rate_from_mime(mime_type));
    let pcm = &pcm[..capped_len(pcm.len()) as usize];

    let mut wav = Vec::with_capacity(HEADER_LEN + pcm.len());
    wav.extend_from_slice(&header(format, pcm.len()));
    wav.extend_from_slice(pcm);
    wav
}
