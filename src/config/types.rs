//! Core config types: model precision and voice presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PRECISION
// ============================================================================

/// Numeric precision of the published ONNX export to load.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Fp32,
    Fp16,
    #[default]
    Q8,
    Q4,
    Q4f16,
}

impl Precision {
    pub const ALL: [Precision; 5] = [
        Precision::Fp32,
        Precision::Fp16,
        Precision::Q8,
        Precision::Q4,
        Precision::Q4f16,
    ];

    /// Path of the model file inside the model repository
    pub fn model_file(&self) -> &'static str {
        match self {
            Precision::Fp32 => "onnx/model.onnx",
            Precision::Fp16 => "onnx/model_fp16.onnx",
            Precision::Q8 => "onnx/model_quantized.onnx",
            Precision::Q4 => "onnx/model_q4.onnx",
            Precision::Q4f16 => "onnx/model_q4f16.onnx",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Precision::Fp32 => "fp32",
            Precision::Fp16 => "fp16",
            Precision::Q8 => "q8",
            Precision::Q4 => "q4",
            Precision::Q4f16 => "q4f16",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Precision {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fp32" | "high" => Ok(Precision::Fp32),
            "fp16" => Ok(Precision::Fp16),
            "q8" | "medium" => Ok(Precision::Q8),
            "q4" | "low" => Ok(Precision::Q4),
            "q4f16" => Ok(Precision::Q4f16),
            other => Err(anyhow::anyhow!("unknown precision '{}'", other)),
        }
    }
}

// ============================================================================
// VOICE PRESETS
// ============================================================================

/// A voice shown in the selector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoicePreset {
    /// Identifier understood by the model (e.g., "af", "bm_george")
    pub id: &'static str,
    /// Human-readable name for display
    pub name: &'static str,
}

impl VoicePreset {
    const fn new(id: &'static str, name: &'static str) -> Self {
        Self { id, name }
    }

    /// espeak voice matching the accent encoded in the id prefix
    pub fn espeak_language(&self) -> &'static str {
        espeak_language_for(self.id)
    }
}

pub const VOICE_PRESETS: &[VoicePreset] = &[
    VoicePreset::new("af", "Default (American, female)"),
    VoicePreset::new("af_bella", "Bella (American, female)"),
    VoicePreset::new("af_nicole", "Nicole (American, female)"),
    VoicePreset::new("af_sarah", "Sarah (American, female)"),
    VoicePreset::new("af_sky", "Sky (American, female)"),
    VoicePreset::new("am_adam", "Adam (American, male)"),
    VoicePreset::new("am_michael", "Michael (American, male)"),
    VoicePreset::new("bf_emma", "Emma (British, female)"),
    VoicePreset::new("bf_isabella", "Isabella (British, female)"),
    VoicePreset::new("bm_george", "George (British, male)"),
    VoicePreset::new("bm_lewis", "Lewis (British, male)"),
];

pub fn find_voice(id: &str) -> Option<&'static VoicePreset> {
    VOICE_PRESETS.iter().find(|v| v.id == id)
}

/// British voices start with 'b', everything else is read as American English.
pub fn espeak_language_for(voice_id: &str) -> &'static str {
    if voice_id.starts_with('b') {
        "en-gb"
    } else {
        "en-us"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_accepts_dtype_and_coarse_names() {
        assert_eq!("q8".parse::<Precision>().unwrap(), Precision::Q8);
        assert_eq!("medium".parse::<Precision>().unwrap(), Precision::Q8);
        assert_eq!("HIGH".parse::<Precision>().unwrap(), Precision::Fp32);
        assert_eq!("low".parse::<Precision>().unwrap(), Precision::Q4);
        assert!("int3".parse::<Precision>().is_err());
    }

    #[test]
    fn precision_serializes_lowercase() {
        let json = serde_json::to_string(&Precision::Q4f16).unwrap();
        assert_eq!(json, "\"q4f16\"");
        let back: Precision = serde_json::from_str("\"fp16\"").unwrap();
        assert_eq!(back, Precision::Fp16);
    }

    #[test]
    fn every_precision_has_a_distinct_file() {
        let mut files: Vec<_> = Precision::ALL.iter().map(|p| p.model_file()).collect();
        files.sort();
        files.dedup();
        assert_eq!(files.len(), Precision::ALL.len());
        assert_eq!(Precision::Q8.model_file(), "onnx/model_quantized.onnx");
    }

    #[test]
    fn voice_accent_follows_prefix() {
        assert_eq!(find_voice("bm_lewis").unwrap().espeak_language(), "en-gb");
        assert_eq!(find_voice("af").unwrap().espeak_language(), "en-us");
        assert!(find_voice("zz_unknown").is_none());
    }
}
