//! Greedy palette clustering.
//!
//! Colors are visited in palette order, which is the order in which each color first appears
//! when scanning the buffer row by row. Each unvisited color seeds a new group which absorbs
//! every remaining unvisited color within the threshold of the seed. The visiting order is
//! therefore the tie-break: a color within reach of two seeds joins whichever seed appeared
//! first in the image.

use crate::pixel::Rgb;
use num_traits::clamp;
use std::collections::HashMap;

/// The distinct colors of a buffer together with the number of pixels of each color.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    entries: Vec<(Rgb, u64)>,
}

impl Palette {
    /// Scans a packed pixel buffer once and builds its palette in order of first appearance.
    /// Only the RGB channels are considered.
    #[must_use]
    pub fn from_buffer(data: &[u8], channels: usize) -> Self {
        let mut index = HashMap::<Rgb, usize>::new();
        let mut entries = Vec::new();

        for px in data.chunks_exact(channels) {
            let color = Rgb::from_slice(px);
            let slot = *index.entry(color).or_insert_with(|| {
                entries.push((color, 0));
                entries.len() - 1
            });
            entries[slot].1 += 1;
        }

        Self { entries }
    }

    /// Creates a palette from explicit entries, kept in the given order.
    #[must_use]
    pub fn from_entries(entries: Vec<(Rgb, u64)>) -> Self {
        Self { entries }
    }

    /// Returns the number of distinct colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the palette has no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the total pixel count.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Returns the entries in palette order.
    #[must_use]
    pub fn entries(&self) -> &[(Rgb, u64)] {
        &self.entries
    }
}

/// A group of palette colors merged into one representative color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    seed: Rgb,
    members: Vec<(Rgb, u64)>,
    color: Rgb,
}

impl Group {
    fn finalize(seed: Rgb, members: Vec<(Rgb, u64)>) -> Self {
        let color = weighted_centroid(&members);

        Self {
            seed,
            members,
            color,
        }
    }

    /// The color that started this group.
    #[must_use]
    pub const fn seed(&self) -> Rgb {
        self.seed
    }

    /// The colors in this group with their pixel counts, seed first.
    #[must_use]
    pub fn members(&self) -> &[(Rgb, u64)] {
        &self.members
    }

    /// The pixel-count weighted average of the members.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }
}

/// Returns `Σ(color × count) / Σ(count)` per channel, rounded and clamped.
#[must_use]
pub fn weighted_centroid(members: &[(Rgb, u64)]) -> Rgb {
    let (mut r, mut g, mut b, mut total) = (0u64, 0u64, 0u64, 0u64);
    for &(color, count) in members {
        r += u64::from(color.r) * count;
        g += u64::from(color.g) * count;
        b += u64::from(color.b) * count;
        total += count;
    }

    if total == 0 {
        return members.first().map(|&(color, _)| color).unwrap_or_default();
    }
    let mean = |sum: u64| clamp((sum as f64 / total as f64).round(), 0.0, 255.0) as u8;

    Rgb::new(mean(r), mean(g), mean(b))
}

/// Greedily groups palette colors within `threshold` (Euclidean RGB distance, inclusive) of
/// each group's seed.
///
/// The comparison is made on the distance itself rather than its square so that a threshold of
/// [`MAX_DISTANCE`](crate::pixel::MAX_DISTANCE) reaches every color.
///
/// This is quadratic in the number of distinct colors, see [`merge_in_place`] for the guarded
/// entry point.
#[must_use]
pub fn cluster(palette: &Palette, threshold: f64) -> Vec<Group> {
    let entries = palette.entries();
    let mut used = vec![false; entries.len()];
    let mut groups = Vec::new();

    for (i, &(seed, count)) in entries.iter().enumerate() {
        if used[i] {
            continue;
        }
        used[i] = true;

        let mut members = vec![(seed, count)];
        for (j, &(color, count)) in entries.iter().enumerate().skip(i + 1) {
            if !used[j] && seed.distance(&color) <= threshold {
                used[j] = true;
                members.push((color, count));
            }
        }

        groups.push(Group::finalize(seed, members));
    }

    groups
}

/// Builds the color to color lookup table the buffer is remapped with. Colors that already map
/// to themselves are left out.
#[must_use]
pub fn remap_table(groups: &[Group]) -> HashMap<Rgb, Rgb> {
    groups
        .iter()
        .flat_map(|group| {
            group
                .members()
                .iter()
                .filter(move |(color, _)| *color != group.color())
                .map(move |&(color, _)| (color, group.color()))
        })
        .collect()
}

/// Clusters the palette of a packed buffer and remaps every pixel to its group's representative
/// color, in place. Alpha is untouched.
///
/// Returns `false` without touching the buffer when the palette has more than `ceiling` distinct
/// colors.
pub fn merge_in_place(data: &mut [u8], channels: usize, threshold: f64, ceiling: usize) -> bool {
    let palette = Palette::from_buffer(data, channels);
    if palette.len() > ceiling {
        tracing::debug!(
            distinct = palette.len(),
            ceiling,
            "palette too large, skipping clustering"
        );
        return false;
    }

    let groups = cluster(&palette, threshold);
    tracing::trace!(
        distinct = palette.len(),
        groups = groups.len(),
        threshold,
        "clustered palette"
    );

    let table = remap_table(&groups);
    if table.is_empty() {
        return true;
    }
    for px in data.chunks_exact_mut(channels) {
        if let Some(color) = table.get(&Rgb::from_slice(px)) {
            px[..3].copy_from_slice(&color.as_array());
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_counts_sum_to_pixel_count() {
        let data = [1, 1, 1, 2, 2, 2, 1, 1, 1, 3, 3, 3];
        let palette = Palette::from_buffer(&data, 3);

        assert_eq!(palette.len(), 3);
        assert_eq!(palette.total(), 4);
        assert_eq!(palette.entries()[0], (Rgb::new(1, 1, 1), 2));
    }

    #[test]
    fn test_centroid_is_count_weighted() {
        let members = [(Rgb::new(0, 0, 0), 3), (Rgb::new(100, 100, 100), 1)];

        assert_eq!(weighted_centroid(&members), Rgb::new(25, 25, 25));
    }

    #[test]
    fn test_groups_measure_from_seed() {
        // 10 and 20 are within 10 of their neighbours but 20 is not within 10 of the seed.
        let palette = Palette::from_entries(vec![
            (Rgb::new(0, 0, 0), 1),
            (Rgb::new(10, 0, 0), 1),
            (Rgb::new(20, 0, 0), 1),
        ]);
        let groups = cluster(&palette, 10.0);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members().len(), 2);
        assert_eq!(groups[0].color(), Rgb::new(5, 0, 0));
        assert_eq!(groups[1].seed(), Rgb::new(20, 0, 0));
    }

    #[test]
    fn test_palette_order_breaks_ties() {
        let middle = (Rgb::new(50, 0, 0), 1);
        let left = (Rgb::new(40, 0, 0), 1);
        let right = (Rgb::new(60, 0, 0), 1);

        let groups = cluster(&Palette::from_entries(vec![left, right, middle]), 10.0);
        assert_eq!(groups[0].members(), &[left, middle]);

        let groups = cluster(&Palette::from_entries(vec![right, left, middle]), 10.0);
        assert_eq!(groups[0].members(), &[right, middle]);
    }

    #[test]
    fn test_zero_threshold_keeps_every_color() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut out = data;

        assert!(merge_in_place(&mut out, 3, 0.0, 2000));
        assert_eq!(out, data);
    }

    #[test]
    fn test_ceiling_skips_clustering() {
        let data: Vec<u8> = (0..30).collect();
        let mut out = data.clone();

        assert!(!merge_in_place(&mut out, 3, 500.0, 5));
        assert_eq!(out, data);
    }

    #[test]
    fn test_merge_remaps_pixels_and_keeps_alpha() {
        let mut data = [10, 10, 10, 255, 12, 12, 12, 7, 200, 200, 200, 255];

        assert!(merge_in_place(&mut data, 4, 5.0, 2000));
        assert_eq!(data, [11, 11, 11, 255, 11, 11, 11, 7, 200, 200, 200, 255]);
    }
}
