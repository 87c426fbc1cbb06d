//! Config struct definition.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{
    default_espeak_program, default_hub_endpoint, default_initial_text, default_model_id,
    default_voice,
};
use super::types::Precision;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Model repository id on the hub, or a local directory holding the same layout
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default)]
    pub precision: Precision,
    #[serde(default = "default_voice")]
    pub voice: String,
    /// Text placed in the input box at startup (never written back)
    #[serde(default = "default_initial_text", skip_serializing)]
    pub initial_text: String,

    // --- Model Assets ---
    #[serde(default = "default_hub_endpoint")]
    pub hub_endpoint: String,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>, // None = platform data dir
    #[serde(default = "default_espeak_program")]
    pub espeak_program: String,
}
