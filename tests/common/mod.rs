#![allow(dead_code)]

use chromacut::prelude::*;

pub const COLORS: [Rgb; 4] = [
    Rgb::new(255, 0, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 255, 0),
];

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A `size`x`size` RGB gradient in which every pixel has a distinct color.
pub fn gradient(size: u32, scale: u32) -> Image {
    let pixels: Vec<Rgb> = (0..size * size)
        .map(|i| {
            let (x, y) = (i % size, i / size);
            Rgb::new(
                (y * scale).min(255) as u8,
                (x * scale).min(255) as u8,
                ((x + y) * scale / 2).min(255) as u8,
            )
        })
        .collect();

    Image::from_pixels(size, size, &pixels).unwrap()
}

/// A 4x4 image split into four solid quadrants, one per entry of [`COLORS`].
pub fn quadrants() -> Image {
    let pixels: Vec<Rgb> = (0..16)
        .map(|i| {
            let (x, y) = (i % 4, i / 4);
            COLORS[(y / 2 * 2 + x / 2) as usize]
        })
        .collect();

    Image::from_pixels(4, 4, &pixels).unwrap()
}

/// A 4x4 RGBA image whose top half is fully transparent with noisy colors underneath and whose
/// bottom half is opaque red.
pub fn half_transparent() -> Image {
    let pixels: Vec<Rgba> = (0..16u8)
        .map(|i| {
            if i < 8 {
                Rgba::new(i * 31, 255 - i * 7, i * 3, 0)
            } else {
                Rgba::new(255, 0, 0, 255)
            }
        })
        .collect();

    Image::from_pixels(4, 4, &pixels).unwrap()
}
