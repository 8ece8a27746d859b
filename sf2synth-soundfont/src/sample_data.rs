use log::trace;
use std::sync::Arc;

use crate::error::SoundFontError;
use crate::riff::Chunk;
use crate::sample_header::SampleHeader;

/// The PCM of one sample header, sliced out of the `smpl` chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleData {
    pub data: Arc<[i16]>,
    /// How many times each original frame was repeated by upsampling.
    pub rate_multiplier: u32,
}

/// Upsampling never repeats a frame more often than this. Slower headers are
/// rejected as malformed.
pub(crate) const MAX_RATE_MULTIPLIER: u32 = 64;

/// Duplicates every frame until `sample_rate` reaches `minimum_rate`.
/// Returns the new data and the integer multiplier applied, or `None` when the
/// multiplier would exceed [`MAX_RATE_MULTIPLIER`].
pub(crate) fn upsample(data: Vec<i16>, sample_rate: u32, minimum_rate: u32) -> Option<(Vec<i16>, u32)> {
    if sample_rate == 0 {
        return Some((data, 1));
    }

    let mut multiplier = 1;
    let mut rate = sample_rate;
    while rate < minimum_rate {
        multiplier *= 2;
        rate *= 2;
        if multiplier > MAX_RATE_MULTIPLIER {
            return None;
        }
    }

    if multiplier == 1 {
        return Some((data, 1));
    }
    let data = data
        .iter()
        .flat_map(|&x| std::iter::repeat_n(x, multiplier as usize))
        .collect();
    Some((data, multiplier))
}

/// Extracts every sample's PCM, upsampling slow samples in place and scaling the
/// header's loop points and rate to match.
pub(crate) fn load_samples(
    data: &[u8],
    smpl: &Chunk,
    headers: &mut [SampleHeader],
    minimum_rate: u32,
) -> Result<Vec<SampleData>, SoundFontError> {
    let mut samples = Vec::with_capacity(headers.len());

    for (i, header) in headers.iter_mut().enumerate() {
        let start = smpl.offset + 2 * header.start as usize;
        let end = smpl.offset + 2 * header.end as usize;
        if header.end < header.start || end > smpl.end() {
            return Err(SoundFontError::InvalidSampleHeader(i));
        }

        let pcm: Vec<i16> = data[start..end]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();

        let Some((pcm, multiplier)) = upsample(pcm, header.sample_rate, minimum_rate) else {
            return Err(SoundFontError::InvalidSampleHeader(i));
        };
        if multiplier > 1 {
            trace!(
                "upsampled '{}' from {} Hz by {}",
                header.name, header.sample_rate, multiplier
            );
            header.sample_rate = header.sample_rate.saturating_mul(multiplier);
            header.loop_start = header.loop_start.saturating_mul(multiplier);
            header.loop_end = header.loop_end.saturating_mul(multiplier);
        }

        samples.push(SampleData {
            data: pcm.into(),
            rate_multiplier: multiplier,
        });
    }

    Ok(samples)
}
