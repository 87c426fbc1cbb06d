use anyhow::{anyhow, Context, Result};
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Interleaved float samples ready for an output stream
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f32 / self.sample_rate as f32
        }
    }
}

/// Decode an encoded audio buffer (WAV, MP3, FLAC, OGG, ...) into samples.
pub fn decode(bytes: &[u8]) -> Result<DecodedAudio> {
    if bytes.is_empty() {
        return Err(anyhow!("Audio buffer is empty"));
    }

    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Unrecognized audio format")?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| anyhow!("No audio track found"))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Unsupported audio codec")?;

    let mut samples: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            // Corrupt packet, skip it
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    if samples.is_empty() || sample_rate == 0 || channels == 0 {
        return Err(anyhow!("Audio buffer contains no samples"));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encode_wav;

    #[test]
    fn decodes_generated_wav() {
        let tone: Vec<f32> = (0..2400).map(|i| ((i as f32) * 0.05).sin() * 0.5).collect();
        let wav = encode_wav(&tone, 24000, 1).unwrap();

        let audio = decode(&wav).unwrap();
        assert_eq!(audio.sample_rate, 24000);
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.frames(), 2400);
        assert!((audio.duration_secs() - 0.1).abs() < 1e-3);
        assert!((audio.samples[100] - tone[100]).abs() < 1e-3);
    }

    #[test]
    fn stereo_wav_keeps_interleaving() {
        let frames = [0.25f32, -0.25, 0.5, -0.5];
        let wav = encode_wav(&frames, 48000, 2).unwrap();
        let audio = decode(&wav).unwrap();
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.frames(), 2);
        assert!(audio.samples[1] < 0.0 && audio.samples[0] > 0.0);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode(&[]).is_err());
        assert!(decode(b"definitely not audio data at all").is_err());
    }
}
