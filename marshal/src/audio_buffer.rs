//! Audio buffer translation (`spec.md` §4.E.7) and the post-`process` output limiter
//! (`spec.md` §4.E, "Audio buffer checking").

use crate::error::MarshalError;
use crate::wire::write_word;
use wclap_common::abi::layout::OUTPUT_CLIP_THRESHOLD;
use wclap_common::abi::SandboxWord;
use wclap_engine::{ArenaScope, Instance};

/// One native channel buffer, borrowed for the duration of a single `process` call. Mirrors the
/// CLAP `clap_audio_buffer` channel-pointer-array shape, already split by sample width since a
/// buffer carries either 32-bit or 64-bit channels, never both, per the ABI.
pub enum AudioBuffer<'a> {
    F32(Vec<&'a mut [f32]>),
    F64(Vec<&'a mut [f64]>),
}

impl<'a> AudioBuffer<'a> {
    pub fn channel_count(&self) -> usize {
        match self {
            Self::F32(channels) => channels.len(),
            Self::F64(channels) => channels.len(),
        }
    }
}

/// `nativeToWasm`: writes `buffer`'s channels into freshly reserved sandbox arrays and returns
/// the sandbox pointer to the channel-pointer array the plugin's `process` expects (either the
/// 32-bit or 64-bit slot is populated; the other stays null, matching the native ABI).
pub fn audio_buffer_to_sandbox(
    scope: &mut ArenaScope<'_>,
    buffer: &AudioBuffer<'_>,
    frames_count: usize,
) -> Result<SandboxWord, MarshalError> {
    let width = if scope.is_sixty_four_bit() { 8 } else { 4 };
    let channel_count = buffer.channel_count();

    let (array_offset, array_ptr) = scope.array(channel_count, width, width)?;
    for (i, channel_ptr) in channel_pointers(scope, buffer, frames_count)?.into_iter().enumerate() {
        write_word(scope, array_offset + i * width, channel_ptr, width);
    }
    Ok(array_ptr)
}

fn channel_pointers(
    scope: &mut ArenaScope<'_>,
    buffer: &AudioBuffer<'_>,
    frames_count: usize,
) -> Result<Vec<SandboxWord>, MarshalError> {
    let mut out = Vec::with_capacity(buffer.channel_count());
    match buffer {
        AudioBuffer::F32(channels) => {
            for channel in channels {
                let (offset, ptr) = scope.array(frames_count, 4, 4)?;
                for (i, sample) in channel.iter().take(frames_count).enumerate() {
                    scope.write_native(offset + i * 4, &sample.to_le_bytes());
                }
                out.push(ptr);
            }
        }
        AudioBuffer::F64(channels) => {
            for channel in channels {
                let (offset, ptr) = scope.array(frames_count, 8, 8)?;
                for (i, sample) in channel.iter().take(frames_count).enumerate() {
                    scope.write_native(offset + i * 8, &sample.to_le_bytes());
                }
                out.push(ptr);
            }
        }
    }
    Ok(out)
}

/// `wasmToNative`: copies `frames_count` 32-bit float samples per channel out of sandbox memory
/// and back into `buffer`'s native channels, then applies the output limiter. Called after
/// `process` returns success (`spec.md` §4.E, "Audio buffer checking").
pub fn f32_channels_from_sandbox(
    instance: &Instance,
    channel_ptrs: &[SandboxWord],
    frames_count: usize,
    out: &mut [&mut [f32]],
) -> Result<(), MarshalError> {
    for (ptr, channel) in channel_ptrs.iter().zip(out.iter_mut()) {
        let raw = instance.read_memory(*ptr, frames_count * 4)?;
        for (i, sample) in channel.iter_mut().take(frames_count).enumerate() {
            let bytes: [u8; 4] = raw[i * 4..i * 4 + 4].try_into().unwrap();
            *sample = clip_output(f32::from_le_bytes(bytes) as f64) as f32;
        }
    }
    Ok(())
}

/// Same as [`f32_channels_from_sandbox`] for 64-bit channels.
pub fn f64_channels_from_sandbox(
    instance: &Instance,
    channel_ptrs: &[SandboxWord],
    frames_count: usize,
    out: &mut [&mut [f64]],
) -> Result<(), MarshalError> {
    for (ptr, channel) in channel_ptrs.iter().zip(out.iter_mut()) {
        let raw = instance.read_memory(*ptr, frames_count * 8)?;
        for (i, sample) in channel.iter_mut().take(frames_count).enumerate() {
            let bytes: [u8; 8] = raw[i * 8..i * 8 + 8].try_into().unwrap();
            *sample = clip_output(f64::from_le_bytes(bytes));
        }
    }
    Ok(())
}

/// The soft output limiter: any non-finite sample, or one whose magnitude is not strictly less
/// than [`OUTPUT_CLIP_THRESHOLD`], is replaced with silence.
fn clip_output(sample: f64) -> f64 {
    if sample.is_finite() && sample.abs() < OUTPUT_CLIP_THRESHOLD {
        sample
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_bounds_samples_pass_through() {
        assert_eq!(clip_output(0.5), 0.5);
        assert_eq!(clip_output(-99.9), -99.9);
    }

    #[test]
    fn out_of_bounds_and_non_finite_samples_are_zeroed() {
        assert_eq!(clip_output(100.0), 0.0);
        assert_eq!(clip_output(-100.0), 0.0);
        assert_eq!(clip_output(f64::NAN), 0.0);
        assert_eq!(clip_output(f64::INFINITY), 0.0);
        assert_eq!(clip_output(f64::NEG_INFINITY), 0.0);
    }
}
