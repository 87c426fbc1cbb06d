//! Config Default implementation and serde default helpers.

use super::config_struct::Config;
use super::types::Precision;

pub const DEFAULT_MODEL_ID: &str = "onnx-community/Kokoro-82M-ONNX";
pub const DEFAULT_VOICE: &str = "af";

pub fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

pub fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

pub fn default_initial_text() -> String {
    "Life is like a box of chocolates. You never know what you're gonna get.".to_string()
}

pub fn default_hub_endpoint() -> String {
    "https://huggingface.co".to_string()
}

pub fn default_espeak_program() -> String {
    "espeak-ng".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            precision: Precision::default(),
            voice: default_voice(),
            initial_text: default_initial_text(),
            hub_endpoint: default_hub_endpoint(),
            cache_dir: None,
            espeak_program: default_espeak_program(),
        }
    }
}
