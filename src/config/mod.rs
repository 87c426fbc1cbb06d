//! Configuration module for kokoro-desk.
//!
//! This module is split into several sub-modules:
//! - `types`: Precision and voice preset types
//! - `config_struct`: Config struct definition
//! - `defaults`: Config Default implementation
//! - `io`: Config loading, saving, and path utilities

mod config_struct;
mod defaults;
mod io;
mod types;

// Re-export public types for external use
pub use config_struct::Config;
pub use defaults::{DEFAULT_MODEL_ID, DEFAULT_VOICE};
pub use io::{get_config_path, get_model_cache_dir, load_config, load_config_from, save_config, save_config_to};
pub use types::{espeak_language_for, find_voice, Precision, VoicePreset, VOICE_PRESETS};
