//! Distinct color counting.

use std::collections::HashSet;

/// Counts the distinct colors of a packed pixel buffer.
///
/// RGBA pixels are compared on all four channels, except that every pixel with an alpha of
/// exactly 0 counts as the same transparent color whatever its RGB. Empty buffers have zero
/// colors.
#[must_use]
pub fn count_distinct(data: &[u8], channels: usize) -> usize {
    let mut seen = HashSet::new();

    match channels {
        4 => {
            for px in data.chunks_exact(4) {
                let key = if px[3] == 0 {
                    0
                } else {
                    u32::from_be_bytes([px[0], px[1], px[2], px[3]])
                };
                seen.insert(key);
            }
        }
        _ => {
            for px in data.chunks_exact(channels) {
                seen.insert(u32::from_be_bytes([0, px[0], px[1], px[2]]));
            }
        }
    }

    seen.len()
}
