use anyhow::{anyhow, bail, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::collections::HashMap;
use std::path::PathBuf;

use super::model_loader::ModelSource;
use super::phonemizer::{EspeakPhonemizer, Phonemizer};
use super::tokenizer::PhonemeVocab;
use super::voices::VoiceStyles;
use super::{ModelProvider, SpeechEngine, SAMPLE_RATE};
use crate::audio::encode_wav;
use crate::config::{espeak_language_for, get_model_cache_dir, Config, Precision};

const TOKENIZER_FILE: &str = "tokenizer.json";

/// Loads Kokoro ONNX exports from a local directory or the model hub.
pub struct KokoroProvider {
    cache_dir: PathBuf,
    hub_endpoint: String,
    espeak_program: String,
}

impl KokoroProvider {
    pub fn new(
        cache_dir: PathBuf,
        hub_endpoint: impl Into<String>,
        espeak_program: impl Into<String>,
    ) -> Self {
        Self {
            cache_dir,
            hub_endpoint: hub_endpoint.into(),
            espeak_program: espeak_program.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            get_model_cache_dir(config),
            config.hub_endpoint.clone(),
            config.espeak_program.clone(),
        )
    }
}

impl ModelProvider for KokoroProvider {
    fn load(&mut self, model_id: &str, precision: Precision) -> Result<Box<dyn SpeechEngine>> {
        let source = ModelSource::resolve(model_id, &self.hub_endpoint, &self.cache_dir)?;
        log::info!(
            "Loading model {} ({}) from {}",
            model_id,
            precision,
            source.dir().display()
        );

        let vocab = PhonemeVocab::load(&source.fetch(TOKENIZER_FILE)?)?;
        let model_path = source.fetch(precision.model_file())?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        Ok(Box::new(KokoroEngine {
            session,
            vocab,
            source,
            voices: HashMap::new(),
            phonemizer: Box::new(EspeakPhonemizer::new(self.espeak_program.clone())),
        }))
    }
}

pub struct KokoroEngine {
    session: Session,
    vocab: PhonemeVocab,
    source: ModelSource,
    voices: HashMap<String, VoiceStyles>,
    phonemizer: Box<dyn Phonemizer>,
}

impl KokoroEngine {
    fn voice_styles(&mut self, voice: &str) -> Result<&VoiceStyles> {
        if !self.voices.contains_key(voice) {
            let path = self
                .source
                .fetch(&voice_file(voice)?)
                .map_err(|e| anyhow!("Voice \"{}\" not found: {}", voice, e))?;
            let styles = VoiceStyles::load(&path)?;
            self.voices.insert(voice.to_string(), styles);
        }
        self.voices
            .get(voice)
            .ok_or_else(|| anyhow!("Voice \"{}\" not found", voice))
    }

    fn infer(&mut self, tokens: Vec<i64>, style: Vec<f32>) -> Result<Vec<f32>> {
        let token_count = tokens.len();
        let style_len = style.len();

        let outputs = self.session.run(ort::inputs![
            "input_ids" => Tensor::from_array(([1usize, token_count], tokens))?,
            "style" => Tensor::from_array(([1usize, style_len], style))?,
            "speed" => Tensor::from_array(([1usize], vec![1.0f32]))?
        ])?;

        if outputs.len() == 0 {
            bail!("Model returned no output tensors");
        }
        let (_, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to read waveform output")?;
        Ok(data.to_vec())
    }
}

impl SpeechEngine for KokoroEngine {
    fn synthesize(&mut self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let text = normalize_text(text);
        if text.is_empty() {
            bail!("Text is empty");
        }

        // Unknown voices fail before the phonemizer runs
        self.voice_styles(voice)?;
        let phonemes = self
            .phonemizer
            .phonemize(&text, espeak_language_for(voice))?;
        let tokens = self.vocab.encode(&phonemes)?;
        let style = self.voice_styles(voice)?.style_for(tokens.len()).to_vec();

        log::debug!("Synthesizing {} tokens with voice {}", tokens.len(), voice);
        let waveform = self.infer(tokens, style)?;
        if waveform.is_empty() {
            bail!("Model produced no audio");
        }

        encode_wav(&waveform, SAMPLE_RATE, 1)
    }
}

/// Relative path of a voice pack. Ids are `[A-Za-z0-9_]+` so they stay inside `voices/`.
fn voice_file(voice: &str) -> Result<String> {
    if voice.is_empty() || !voice.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!("Voice \"{}\" not found", voice);
    }
    Ok(format!("voices/{}.bin", voice))
}

/// Collapse runs of whitespace (including newlines) to single spaces
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(normalize_text("  Hello\n\n  world\t!  "), "Hello world !");
        assert_eq!(normalize_text(" \n\t "), "");
    }

    #[test]
    fn voice_ids_map_into_the_voices_dir() {
        assert_eq!(voice_file("af").unwrap(), "voices/af.bin");
        assert_eq!(voice_file("bm_george").unwrap(), "voices/bm_george.bin");
    }

    #[test]
    fn voice_ids_cannot_leave_the_voices_dir() {
        for bad in ["", "../x", "a/b", "af.bin", "a\\b", " af"] {
            let err = voice_file(bad).unwrap_err().to_string();
            assert_eq!(err, format!("Voice \"{}\" not found", bad));
        }
    }

    #[test]
    fn provider_reads_paths_from_config() {
        let mut config = Config::default();
        config.cache_dir = Some(PathBuf::from("/tmp/kokoro-cache"));
        config.espeak_program = "espeak".to_string();

        let provider = KokoroProvider::from_config(&config);
        assert_eq!(provider.cache_dir, PathBuf::from("/tmp/kokoro-cache"));
        assert_eq!(provider.hub_endpoint, "https://huggingface.co");
        assert_eq!(provider.espeak_program, "espeak");
    }

    #[test]
    fn bad_model_id_fails_to_load() {
        let cache = tempfile::tempdir().unwrap();
        let mut provider = KokoroProvider::new(cache.path().to_path_buf(), "http://127.0.0.1:9", "espeak-ng");
        assert!(provider.load("bad-id", Precision::Q8).is_err());
    }
}
