/// Map interleaved frames from `from` channels to `to` channels.
/// Mono is duplicated to every output channel; more channels are averaged down.
pub fn remix_channels(samples: &[f32], from: usize, to: usize) -> Vec<f32> {
    if from == to || from == 0 || to == 0 {
        return samples.to_vec();
    }

    let mut output = Vec::with_capacity(samples.len() / from * to);
    for frame in samples.chunks_exact(from) {
        if from == 1 {
            output.extend(std::iter::repeat(frame[0]).take(to));
        } else if to == 1 {
            output.push(frame.iter().sum::<f32>() / from as f32);
        } else {
            // Keep the channels both layouts share, pad the rest with the mix
            let mix = frame.iter().sum::<f32>() / from as f32;
            for ch in 0..to {
                output.push(frame.get(ch).copied().unwrap_or(mix));
            }
        }
    }
    output
}

/// Simple linear resampling of interleaved audio (good enough for TTS)
pub fn resample_linear(samples: &[f32], channels: usize, from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || channels == 0 || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let frames = samples.len() / channels;
    let ratio = from_rate as f64 / to_rate as f64;
    let new_frames = (frames as f64 / ratio) as usize;
    let mut output = Vec::with_capacity(new_frames * channels);

    for i in 0..new_frames {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        for ch in 0..channels {
            let s1 = samples.get(src_idx * channels + ch).copied().unwrap_or(0.0);
            let s2 = samples
                .get((src_idx + 1) * channels + ch)
                .copied()
                .unwrap_or(s1);
            output.push(s1 * (1.0 - frac) + s2 * frac);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_is_duplicated_to_stereo() {
        assert_eq!(remix_channels(&[0.1, 0.2], 1, 2), vec![0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn stereo_is_averaged_to_mono() {
        assert_eq!(remix_channels(&[0.2, 0.4, -1.0, 1.0], 2, 1), vec![0.3, 0.0]);
    }

    #[test]
    fn stereo_to_surround_keeps_front_pair() {
        let out = remix_channels(&[0.2, 0.4], 2, 4);
        assert_eq!(out.len(), 4);
        assert_eq!(&out[..2], &[0.2, 0.4]);
        assert!((out[2] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn upsampling_doubles_length_and_interpolates() {
        let out = resample_linear(&[0.0, 1.0, 0.0, 1.0], 1, 24000, 48000);
        assert_eq!(out.len(), 8);
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 0.5).abs() < 1e-6);
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn downsampling_keeps_channels_apart() {
        let stereo: Vec<f32> = (0..8).flat_map(|_| [1.0f32, -1.0]).collect();
        let out = resample_linear(&stereo, 2, 48000, 24000);
        assert_eq!(out.len(), 8);
        assert!(out.chunks(2).all(|f| f[0] == 1.0 && f[1] == -1.0));
    }

    #[test]
    fn same_rate_is_a_copy() {
        assert_eq!(resample_linear(&[0.5, 0.25], 1, 24000, 24000), vec![0.5, 0.25]);
    }
}
