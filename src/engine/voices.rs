use anyhow::{bail, Context, Result};
use std::path::Path;

/// Width of one style vector
pub const STYLE_DIM: usize = 256;

/// Style vectors of one voice, one row per input length.
#[derive(Debug, Clone)]
pub struct VoiceStyles {
    data: Vec<f32>,
}

impl VoiceStyles {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_bytes(&bytes)
    }

    /// Raw little-endian f32 data
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() % (STYLE_DIM * 4) != 0 {
            bail!(
                "Voice file has {} bytes, expected a multiple of {}",
                bytes.len(),
                STYLE_DIM * 4
            );
        }
        let data = bytes
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        Ok(Self { data })
    }

    pub fn rows(&self) -> usize {
        self.data.len() / STYLE_DIM
    }

    /// Style for a padded token sequence of `token_count` ids.
    pub fn style_for(&self, token_count: usize) -> &[f32] {
        let row = token_count.saturating_sub(2).min(self.rows() - 1);
        &self.data[row * STYLE_DIM..(row + 1) * STYLE_DIM]
    }
}
