#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure tile rasterization for host paint callbacks.
//!
//! The host invokes [`render_tile`] whenever a canvas needs pixels, passing
//! the decoded image and the offset selected for that canvas. The function
//! is stateless and needs no caching: the (image, offset) pair bound to a
//! canvas is chosen once and stays stable for the canvas's lifetime.

use image::RgbaImage;
use mural_core::TILE_EDGE_PIXELS;

/// Cuts one tile-sized window out of `source`.
///
/// Destination pixel `(px, py)` samples source pixel
/// `(offset_x + px, offset_y + py)`. Where the window runs past the edge of
/// the source image the tile stays fully transparent, which is how edge
/// tiles of a grid show the remainder of a partially covered image.
#[must_use]
pub fn render_tile(source: &RgbaImage, offset_x: u32, offset_y: u32) -> RgbaImage {
    let mut tile = RgbaImage::new(TILE_EDGE_PIXELS, TILE_EDGE_PIXELS);

    let columns = source.width().saturating_sub(offset_x).min(TILE_EDGE_PIXELS);
    let rows = source.height().saturating_sub(offset_y).min(TILE_EDGE_PIXELS);
    for py in 0..rows {
        for px in 0..columns {
            tile.put_pixel(px, py, *source.get_pixel(offset_x + px, offset_y + py));
        }
    }

    tile
}
