//! Uniform per-channel quantization.

use num_traits::clamp;

/// Rounds a channel value to the nearest multiple of `step`, clamped to `0..=255`.
///
/// Ties round up. A step of 1 (or 0) is the identity.
#[inline]
#[must_use]
pub fn quantize_channel(value: u8, step: u8) -> u8 {
    if step <= 1 {
        return value;
    }

    let step = u32::from(step);
    let rounded = (2 * u32::from(value) + step) / (2 * step) * step;

    clamp(rounded, 0, 255) as u8
}

/// Builds the 256-entry lookup table for a step so the pixel pass is a single indexed load per
/// channel.
#[must_use]
pub fn channel_table(step: u8) -> [u8; 256] {
    let mut table = [0; 256];
    for (value, slot) in (0..=255u8).zip(table.iter_mut()) {
        *slot = quantize_channel(value, step);
    }

    table
}

/// Quantizes the RGB channels of a packed pixel buffer in place. The alpha channel, if any, is
/// left untouched.
pub fn quantize_in_place(data: &mut [u8], channels: usize, step: u8) {
    if step <= 1 {
        return;
    }

    let table = channel_table(step);
    for px in data.chunks_exact_mut(channels) {
        for c in &mut px[..3] {
            *c = table[*c as usize];
        }
    }
}
