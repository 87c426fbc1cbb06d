//! Audio decoding and playback.

pub mod convert;
pub mod decode;
pub mod player;
pub mod wav;

use anyhow::Result;

pub use decode::{decode, DecodedAudio};
pub use player::AudioPlayback;
pub use wav::encode_wav;

/// Consumer of encoded audio produced by the bridge.
pub trait AudioSink {
    /// Start playing `audio` and return without waiting for it to finish.
    fn play(&self, audio: &[u8]) -> Result<()>;
}
