//! Config I/O operations: load, save, and path resolution.

use std::path::{Path, PathBuf};

use super::config_struct::Config;
use super::types::find_voice;
use super::defaults::DEFAULT_VOICE;

const APP_DIR: &str = "kokoro-desk";

// ============================================================================
// PATHS
// ============================================================================

/// Get the config file path
pub fn get_config_path() -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_default().join(APP_DIR);
    let _ = std::fs::create_dir_all(&config_dir);
    config_dir.join("config.json")
}

/// Directory downloaded model assets are cached in
pub fn get_model_cache_dir(config: &Config) -> PathBuf {
    config.cache_dir.clone().unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("models")
    })
}

// ============================================================================
// CONFIG LOADING
// ============================================================================

/// Load config from disk, falling back to defaults
pub fn load_config() -> Config {
    load_config_from(&get_config_path())
}

pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }

    let data = match std::fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("Failed to read config {}: {}", path.display(), e);
            return Config::default();
        }
    };

    let mut config: Config = match serde_json::from_str(&data) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Ignoring invalid config {}: {}", path.display(), e);
            return Config::default();
        }
    };

    sanitize_config(&mut config);
    config
}

/// Reset values the UI cannot represent
fn sanitize_config(config: &mut Config) {
    if find_voice(&config.voice).is_none() {
        log::warn!("Unknown voice '{}' in config, using '{}'", config.voice, DEFAULT_VOICE);
        config.voice = DEFAULT_VOICE.to_string();
    }
    if config.model_id.trim().is_empty() {
        config.model_id = super::defaults::default_model_id();
    }
}

// ============================================================================
// CONFIG SAVING
// ============================================================================

/// Save config to disk
pub fn save_config(config: &Config) {
    let path = get_config_path();
    if let Err(e) = save_config_to(config, &path) {
        log::warn!("Failed to save config {}: {}", path.display(), e);
    }
}

pub fn save_config_to(config: &Config, path: &Path) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(config)?;
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Precision;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.json"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_json_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config_from(&path), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "precision": "fp16", "voice": "bm_george" }"#).unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.precision, Precision::Fp16);
        assert_eq!(config.voice, "bm_george");
        assert_eq!(config.model_id, "onnx-community/Kokoro-82M-ONNX");
        assert_eq!(config.espeak_program, "espeak-ng");
    }

    #[test]
    fn unknown_voice_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "voice": "xx_nobody" }"#).unwrap();
        assert_eq!(load_config_from(&path).voice, "af");
    }

    #[test]
    fn save_does_not_write_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::default();
        config.voice = "af_sky".to_string();
        config.initial_text = "private words".to_string();

        save_config_to(&config, &path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("private words"));

        let loaded = load_config_from(&path);
        assert_eq!(loaded.voice, "af_sky");
        assert_eq!(loaded.initial_text, Config::default().initial_text);
    }
}
