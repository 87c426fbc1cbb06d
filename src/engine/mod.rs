//! Model provider seam.
//!
//! The bridge only ever talks to a [`ModelProvider`], which loads a
//! [`SpeechEngine`] for a model id and precision. The engine turns text and a
//! voice id into an encoded audio buffer. [`KokoroProvider`] is the on-device
//! implementation backed by ONNX Runtime.

pub mod kokoro;
pub mod model_loader;
pub mod phonemizer;
pub mod tokenizer;
pub mod voices;

use anyhow::Result;

use crate::config::Precision;

pub use kokoro::{KokoroEngine, KokoroProvider};

/// Output sample rate of the Kokoro vocoder
pub const SAMPLE_RATE: u32 = 24000;

/// A loaded, invokable text-to-speech model.
pub trait SpeechEngine: Send {
    /// Synthesize `text` with `voice`, returning an encoded (WAV) buffer.
    fn synthesize(&mut self, text: &str, voice: &str) -> Result<Vec<u8>>;
}

/// Loads speech engines. Lives on the worker thread for its whole lifetime.
pub trait ModelProvider: Send {
    fn load(&mut self, model_id: &str, precision: Precision) -> Result<Box<dyn SpeechEngine>>;
}
