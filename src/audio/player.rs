use anyhow::{anyhow, bail, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::convert::{remix_channels, resample_linear};
use super::decode::{decode, DecodedAudio};
use super::AudioSink;

/// Plays each buffer once on the default output device.
///
/// Every call gets its own thread and output stream, so overlapping calls
/// are mixed by the device rather than replacing each other.
#[derive(Debug, Default, Clone, Copy)]
pub struct AudioPlayback;

impl AudioSink for AudioPlayback {
    fn play(&self, audio: &[u8]) -> Result<()> {
        let decoded = decode(audio)?;
        log::debug!(
            "Playing {:.2}s of audio ({} Hz, {} ch)",
            decoded.duration_secs(),
            decoded.sample_rate,
            decoded.channels
        );

        std::thread::Builder::new()
            .name("playback".to_string())
            .spawn(move || {
                if let Err(e) = play_blocking(decoded) {
                    log::error!("Playback failed: {}", e);
                }
            })?;
        Ok(())
    }
}

/// Play `audio` to the end, returning once the device has drained it.
pub fn play_blocking(audio: DecodedAudio) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("No audio output device found"))?;
    let config = device.default_output_config()?;

    let sample_rate = config.sample_rate();
    let channels = config.channels() as usize;
    let sample_format = config.sample_format();
    let stream_config: cpal::StreamConfig = config.into();

    let samples = remix_channels(&audio.samples, audio.channels, channels);
    let samples = resample_linear(&samples, channels, audio.sample_rate, sample_rate);

    let shared_buffer: Arc<Mutex<VecDeque<f32>>> = Arc::new(Mutex::new(samples.into()));
    let finished = Arc::new(AtomicBool::new(false));

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            let buf = shared_buffer.clone();
            let done = finished.clone();
            device.build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    fill(data, &buf, &done, |s| s)
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )?
        }
        cpal::SampleFormat::I16 => {
            let buf = shared_buffer.clone();
            let done = finished.clone();
            device.build_output_stream(
                &stream_config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    fill(data, &buf, &done, |s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )?
        }
        cpal::SampleFormat::U16 => {
            let buf = shared_buffer.clone();
            let done = finished.clone();
            device.build_output_stream(
                &stream_config,
                move |data: &mut [u16], _: &cpal::OutputCallbackInfo| {
                    fill(data, &buf, &done, |s| {
                        ((s.clamp(-1.0, 1.0) + 1.0) * 0.5 * u16::MAX as f32) as u16
                    })
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )?
        }
        other => bail!("Unsupported output sample format {:?}", other),
    };

    stream.play()?;

    // The callback may stall if the device disappears, so bound the wait
    let deadline = Instant::now()
        + Duration::from_secs_f32(audio.duration_secs())
        + Duration::from_secs(2);
    while !finished.load(Ordering::SeqCst) && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(50));
    }
    // Extra grace period for audio hardware
    std::thread::sleep(Duration::from_millis(100));

    drop(stream);
    Ok(())
}

fn fill<T: Copy>(
    data: &mut [T],
    buffer: &Mutex<VecDeque<f32>>,
    finished: &AtomicBool,
    convert: impl Fn(f32) -> T,
) {
    let mut buf = match buffer.lock() {
        Ok(b) => b,
        Err(_) => {
            data.iter_mut().for_each(|s| *s = convert(0.0));
            return;
        }
    };
    for sample in data.iter_mut() {
        *sample = convert(buf.pop_front().unwrap_or(0.0));
    }
    if buf.is_empty() {
        finished.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_drains_then_pads_with_silence() {
        let buffer = Mutex::new(VecDeque::from(vec![0.5f32, -0.5, 0.25]));
        let finished = AtomicBool::new(false);

        let mut first = [1.0f32; 2];
        fill(&mut first, &buffer, &finished, |s| s);
        assert_eq!(first, [0.5, -0.5]);
        assert!(!finished.load(Ordering::SeqCst));

        let mut second = [1.0f32; 3];
        fill(&mut second, &buffer, &finished, |s| s);
        assert_eq!(second, [0.25, 0.0, 0.0]);
        assert!(finished.load(Ordering::SeqCst));
    }

    #[test]
    fn fill_converts_sample_type() {
        let buffer = Mutex::new(VecDeque::from(vec![1.0f32, -2.0]));
        let finished = AtomicBool::new(false);
        let mut out = [0i16; 2];
        fill(&mut out, &buffer, &finished, |s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16);
        assert_eq!(out, [i16::MAX, -i16::MAX]);
    }

    #[test]
    fn undecodable_buffer_is_reported_not_played() {
        assert!(AudioPlayback.play(b"nope").is_err());
    }
}
