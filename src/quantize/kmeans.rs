//! K-means color quantization.
//!
//! Centers are trained on a downsampled copy of the image, then every full-resolution pixel is
//! assigned to its nearest center in fixed-size chunks.

use crate::error::{Error, Result};
use crate::pixel::Rgb;
use crate::resize::downsample_rgb;
use crate::settings::KMeansOptions;

use num_traits::clamp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

type Point = [f32; 3];

#[inline]
fn distance_squared(a: &Point, b: &Point) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];

    dr * dr + dg * dg + db * db
}

#[inline]
fn dot(a: &Point, b: &Point) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn to_point(px: &[u8]) -> Point {
    [f32::from(px[0]), f32::from(px[1]), f32::from(px[2])]
}

fn to_color(center: &Point) -> Rgb {
    let channel = |v: f32| clamp(v.round(), 0.0, 255.0) as u8;

    Rgb::new(channel(center[0]), channel(center[1]), channel(center[2]))
}

/// Picks up to `k` initial centers with k-means++: the first uniformly, each next one with
/// probability proportional to its squared distance from the closest center picked so far.
///
/// Fewer than `k` centers are returned when the samples have fewer than `k` distinct colors.
fn seed_centers(samples: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let mut centers = Vec::with_capacity(k);
    centers.push(samples[rng.gen_range(0..samples.len())]);

    let mut nearest: Vec<f64> = samples
        .iter()
        .map(|s| f64::from(distance_squared(s, &centers[0])))
        .collect();

    while centers.len() < k {
        let total: f64 = nearest.iter().sum();
        if total <= 0.0 {
            break;
        }

        let target = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        let chosen = nearest
            .iter()
            .position(|d| {
                cumulative += d;
                cumulative > target && *d > 0.0
            })
            .or_else(|| nearest.iter().rposition(|d| *d > 0.0))
            .unwrap_or(0);

        let center = samples[chosen];
        for (d, s) in nearest.iter_mut().zip(samples) {
            *d = d.min(f64::from(distance_squared(s, &center)));
        }
        centers.push(center);
    }

    centers
}

fn nearest_center(point: &Point, centers: &[Point]) -> usize {
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (i, center) in centers.iter().enumerate() {
        let d = distance_squared(point, center);
        if d < best_distance {
            best = i;
            best_distance = d;
        }
    }

    best
}

/// Runs Lloyd's algorithm over the training samples and returns the trained centers.
///
/// Iteration stops after `options.max_iterations` rounds, or earlier once no center moves by
/// more than `options.epsilon`. Clusters that lose all of their samples keep their previous
/// center.
///
/// # Errors
/// * There are no samples.
/// * A center became non-finite.
pub fn train(samples: &[Point], k: usize, options: &KMeansOptions) -> Result<Vec<Point>> {
    if samples.is_empty() {
        return Err(Error::KMeansFailure("empty training set"));
    }
    if k == 0 {
        return Err(Error::KMeansFailure("zero clusters requested"));
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut centers = seed_centers(samples, k, &mut rng);
    let mut sums = vec![([0f64; 3], 0u64); centers.len()];

    for iteration in 0..options.max_iterations {
        sums.iter_mut().for_each(|s| *s = ([0.0; 3], 0));
        for sample in samples {
            let (sum, count) = &mut sums[nearest_center(sample, &centers)];
            for (acc, v) in sum.iter_mut().zip(sample) {
                *acc += f64::from(*v);
            }
            *count += 1;
        }

        let mut shift = 0f32;
        for (center, (sum, count)) in centers.iter_mut().zip(&sums) {
            if *count == 0 {
                continue;
            }

            let n = *count as f64;
            let moved = [
                (sum[0] / n) as f32,
                (sum[1] / n) as f32,
                (sum[2] / n) as f32,
            ];
            if !moved.iter().all(|v| v.is_finite()) {
                return Err(Error::KMeansFailure("non-finite center"));
            }

            shift = shift.max(distance_squared(center, &moved).sqrt());
            *center = moved;
        }

        tracing::trace!(iteration, shift, "k-means iteration");
        if shift <= options.epsilon {
            break;
        }
    }

    Ok(centers)
}

/// Replaces the RGB channels of every pixel with its nearest center, in place.
///
/// Pixels are processed `chunk_size` at a time. Distances use `‖a−c‖² = ‖a‖² + ‖c‖² − 2·a·c`:
/// `‖a‖²` is the same for every center of a pixel, `‖c‖²` is computed once up front, so only the
/// dot products are evaluated per chunk, into a buffer of `chunk_size × k` scores.
pub fn assign_in_place(data: &mut [u8], channels: usize, centers: &[Point], chunk_size: usize) {
    if centers.is_empty() {
        return;
    }

    let k = centers.len();
    let norms: Vec<f32> = centers.iter().map(|c| dot(c, c)).collect();
    let colors: Vec<[u8; 3]> = centers.iter().map(|c| to_color(c).as_array()).collect();
    let mut scores = vec![0f32; chunk_size.max(1) * k];

    for chunk in data.chunks_mut(chunk_size.max(1) * channels) {
        let pixels = chunk.len() / channels;

        for (px, row) in chunk.chunks_exact(channels).zip(scores.chunks_exact_mut(k)) {
            let point = to_point(px);
            for (score, center) in row.iter_mut().zip(centers) {
                *score = dot(&point, center);
            }
        }

        for (px, row) in chunk
            .chunks_exact_mut(channels)
            .zip(scores[..pixels * k].chunks_exact(k))
        {
            let mut best = 0;
            let mut best_score = f32::INFINITY;
            for (j, (score, norm)) in row.iter().zip(&norms).enumerate() {
                let d = norm - 2.0 * score;
                if d < best_score {
                    best = j;
                    best_score = d;
                }
            }
            px[..3].copy_from_slice(&colors[best]);
        }
    }
}

/// Quantizes the RGB channels of a packed buffer to at most `k` colors, in place.
///
/// Returns the number of centers that were trained.
///
/// # Errors
/// * The training thumbnail could not be built.
/// * The solver failed, see [`train`].
pub fn quantize_in_place(
    data: &mut [u8],
    width: u32,
    height: u32,
    channels: usize,
    k: usize,
    options: &KMeansOptions,
) -> Result<usize> {
    let rgb: Vec<u8> = data
        .chunks_exact(channels)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let (thumbnail, tw, th) =
        downsample_rgb(&rgb, width, height, options.training_max_side, options.filter)?;
    drop(rgb);

    let samples: Vec<Point> = thumbnail.chunks_exact(3).map(to_point).collect();
    let centers = train(&samples, k, options)?;
    tracing::debug!(
        k,
        trained = centers.len(),
        training_width = tw,
        training_height = th,
        "trained k-means centers"
    );

    assign_in_place(data, channels, &centers, options.chunk_size);

    Ok(centers.len())
}
