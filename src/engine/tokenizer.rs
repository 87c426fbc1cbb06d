use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Longest id sequence the model accepts, padding included
pub const MAX_TOKENS: usize = 512;
pub const PAD_ID: i64 = 0;

#[derive(Deserialize)]
struct TokenizerFile {
    model: TokenizerModel,
}

#[derive(Deserialize)]
struct TokenizerModel {
    vocab: HashMap<String, i64>,
}

/// Character-level phoneme vocabulary read from `tokenizer.json`.
#[derive(Debug, Clone)]
pub struct PhonemeVocab {
    ids: HashMap<char, i64>,
}

impl PhonemeVocab {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let file: TokenizerFile =
            serde_json::from_str(data).context("Malformed tokenizer.json")?;

        let ids: HashMap<char, i64> = file
            .model
            .vocab
            .into_iter()
            .filter_map(|(key, id)| {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some((c, id)),
                    _ => None,
                }
            })
            .collect();

        if ids.is_empty() {
            bail!("Tokenizer vocabulary is empty");
        }
        Ok(Self { ids })
    }

    /// Ids for `phonemes` wrapped in padding. Characters outside the vocabulary
    /// are dropped; anything past `MAX_TOKENS` is cut off.
    pub fn encode(&self, phonemes: &str) -> Result<Vec<i64>> {
        let mut tokens = Vec::with_capacity(phonemes.len() + 2);
        tokens.push(PAD_ID);
        tokens.extend(phonemes.chars().filter_map(|c| self.ids.get(&c).copied()));

        if tokens.len() == 1 {
            bail!("Text produced no known phonemes");
        }
        if tokens.len() > MAX_TOKENS - 1 {
            log::warn!(
                "Truncating {} phonemes to {}",
                tokens.len() - 1,
                MAX_TOKENS - 2
            );
            tokens.truncate(MAX_TOKENS - 1);
        }
        tokens.push(PAD_ID);
        Ok(tokens)
    }
}
