//! Non‑maximum suppression along the locally dominant direction.
//!
//! Each pixel is compared against its two neighbours one step before and
//! after it along the direction that dominated its magnitude:
//!
//! - horizontal → left / right
//! - vertical → up / down
//! - diag-main → (−1, −1) / (+1, +1)
//! - diag-anti → (+1, −1) / (−1, +1)
//!
//! A pixel is suppressed (set to 0) when the neighbour before it is strictly
//! larger or the neighbour after it is at least as large. The asymmetric
//! comparison leaves exactly one pixel of an equal-valued plateau: the last
//! one along the step. Neighbours outside the image count as 0.
use crate::aggregate::EdgeMagnitudeMap;
use crate::image::ImageF32;
use crate::parallel::fill_rows;

/// Thin the magnitude map to locally maximal responses.
pub fn suppress_non_maxima(map: &EdgeMagnitudeMap) -> ImageF32 {
    let w = map.width();
    let h = map.height();
    let mut out = ImageF32::new(w, h);
    fill_rows(&mut out.data, w, |y, row| {
        for (x, dst) in row.iter_mut().enumerate() {
            let mag = map.get(x, y);
            let Some(direction) = map.dominant(x, y) else {
                *dst = mag;
                continue;
            };
            let (dx, dy) = direction.step();
            let before = neighbor(map, x, y, -dx, -dy);
            let after = neighbor(map, x, y, dx, dy);
            *dst = if mag < before || mag <= after { 0.0 } else { mag };
        }
    });
    out
}

#[inline]
fn neighbor(map: &EdgeMagnitudeMap, x: usize, y: usize, dx: i32, dy: i32) -> f32 {
    let nx = x as i64 + dx as i64;
    let ny = y as i64 + dy as i64;
    if nx < 0 || ny < 0 || nx >= map.width() as i64 || ny >= map.height() as i64 {
        return 0.0;
    }
    map.get(nx as usize, ny as usize)
}
