#![allow(dead_code)]

use pbp_edges::image::ImageF32;

/// Vertical step: columns `< split_x` are `lo`, the rest `hi`.
pub fn step_image(width: usize, height: usize, split_x: usize, lo: f32, hi: f32) -> ImageF32 {
    ImageF32::from_fn(width, height, |x, _| if x < split_x { lo } else { hi })
}

/// Constant-intensity image.
pub fn uniform_image(width: usize, height: usize, value: f32) -> ImageF32 {
    ImageF32::from_fn(width, height, |_, _| value)
}

/// High-contrast checkerboard with square cells.
pub fn checkerboard(width: usize, height: usize, cell: usize) -> ImageF32 {
    assert!(cell > 0, "cell size must be positive");
    ImageF32::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            0.125
        } else {
            0.875
        }
    })
}

/// Filled disc of radius `r` centred in the image.
pub fn disc(width: usize, height: usize, r: f32) -> ImageF32 {
    let cx = (width as f32 - 1.0) * 0.5;
    let cy = (height as f32 - 1.0) * 0.5;
    ImageF32::from_fn(width, height, |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        if dx * dx + dy * dy <= r * r {
            0.9
        } else {
            0.1
        }
    })
}

/// Deterministic pseudo-random texture in `[0, 1)` (xorshift).
pub fn noise_image(width: usize, height: usize, seed: u32) -> ImageF32 {
    let mut state = seed.max(1);
    ImageF32::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state % 1000) as f32 / 1000.0
    })
}
