//! WAV output for finished recordings

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::application::ports::AudioError;

/// Width of the `i16` samples every recording is stored as
const BITS_PER_SAMPLE: u16 = i16::BITS as u16;

/// Convert interleaved samples from one channel count to another.
///
/// Downmixing averages every frame; upmixing repeats the last source channel.
pub fn remix_channels(samples: &[i16], from: u16, to: u16) -> Vec<i16> {
    if from == to || from == 0 || to == 0 {
        return samples.to_vec();
    }

    let from = from as usize;
    let to = to as usize;
    let mut output = Vec::with_capacity(samples.len() / from * to);

    for frame in samples.chunks_exact(from) {
        if to == 1 {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            output.push((sum / from as i32) as i16);
        } else {
            for channel in 0..to {
                output.push(frame[channel.min(from - 1)]);
            }
        }
    }

    output
}

/// Write 16-bit PCM samples to a WAV file
pub fn write_wav(
    path: &Path,
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
) -> Result<(), AudioError> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .map_err(|e| AudioError::ResourceError(format!("Failed to create WAV file: {}", e)))?;

    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| AudioError::ResourceError(format!("Failed to write sample: {}", e)))?;
    }

    writer
        .finalize()
        .map_err(|e| AudioError::ResourceError(format!("Failed to finalize WAV: {}", e)))
}
