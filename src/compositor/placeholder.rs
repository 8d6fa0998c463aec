use image::{Rgba, RgbaImage};
use kurbo::Circle;

use super::mask::DiscGeometry;
use super::surface::{Color, Surface};
use crate::error::Result;

pub const BACKGROUND_COLOR: Color = Rgba([240, 240, 240, 255]);
pub const DISC_COLOR: Color = Rgba([140, 140, 150, 255]);
pub const HOLE_COLOR: Color = BACKGROUND_COLOR;
pub const MARK_COLOR: Color = Rgba([105, 105, 115, 255]);

const MARK_RADIUS_RATIO: f64 = 0.01;

/// Procedural stand-in used when the disc base asset cannot be loaded.
pub fn synthesize_disc(size: u32) -> Result<RgbaImage> {
    let mut surface = Surface::new(size)?;
    let geometry = DiscGeometry::for_size(size);

    surface.fill(BACKGROUND_COLOR);
    surface.fill_shape(&geometry.outer_circle(), DISC_COLOR);
    surface.fill_shape(&geometry.inner_circle(), HOLE_COLOR);

    let mark_radius = (size as f64 * MARK_RADIUS_RATIO).max(1.0);
    for center in geometry.mark_centers() {
        surface.fill_shape(&Circle::new(center, mark_radius), MARK_COLOR);
    }

    Ok(surface.into_image())
}
