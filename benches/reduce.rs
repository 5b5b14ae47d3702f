use std::time::Duration;

use chromacut::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};

const SAMPLES: [u32; 3] = [500, 1000, 2000];

fn gradient(size: u32) -> Image {
    let pixels: Vec<Rgb> = (0..size * size)
        .map(|i| {
            let (x, y) = (i % size, i / size);
            Rgb::new(
                (x * 255 / size) as u8,
                (y * 255 / size) as u8,
                ((x ^ y) % 256) as u8,
            )
        })
        .collect();

    Image::from_pixels(size, size, &pixels).unwrap()
}

pub fn bench_reduce(c: &mut Criterion) {
    let mut c = c.benchmark_group("reduce");
    c.sample_size(10)
        .warm_up_time(Duration::from_millis(1500))
        .measurement_time(Duration::from_secs(5));

    for size in SAMPLES {
        let image = gradient(size);

        c.bench_function(format!("sensitivity 0.5 {0}x{0} RGB", size).as_str(), |b| {
            b.iter(|| reduce_colors(&image, Reduction::Sensitivity(0.5)).unwrap())
        });

        for bins in [BinCount::B16, BinCount::B256] {
            c.bench_function(
                format!("kmeans k={} {1}x{1} RGB", bins.get(), size).as_str(),
                |b| b.iter(|| reduce_colors(&image, Reduction::Bins(bins)).unwrap()),
            );
        }

        c.bench_function(format!("count distinct {0}x{0} RGB", size).as_str(), |b| {
            b.iter(|| count_distinct_colors(&image))
        });
    }

    c.finish();
}

criterion_group!(benches, bench_reduce);
criterion_main!(benches);
