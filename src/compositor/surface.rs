use std::ops::{Deref, DerefMut};

use image::{imageops::FilterType, Rgba, RgbaImage};
use kurbo::Shape;

use super::mask::{pixel_center, ClipRegion};
use crate::error::{DreamLayerError, Result};

pub const MAX_SURFACE_SIDE: u32 = 4096;

pub type Color = Rgba<u8>;

/// Square RGBA drawing target with a clip stack.
///
/// Clips are only pushed through [`Surface::clip`], which hands back a guard
/// that pops the clip again when dropped.
pub struct Surface {
    pixels: RgbaImage,
    clips: Vec<ClipRegion>,
}

impl Surface {
    pub fn new(size: u32) -> Result<Self> {
        if size == 0 || size > MAX_SURFACE_SIDE {
            return Err(DreamLayerError::DrawingSurfaceUnavailable(format!(
                "cannot allocate a {0}x{0} surface (allowed 1..={1})",
                size, MAX_SURFACE_SIDE
            )));
        }
        Ok(Self {
            pixels: RgbaImage::new(size, size),
            clips: Vec::new(),
        })
    }

    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    pub fn clip_depth(&self) -> usize {
        self.clips.len()
    }

    pub fn clip(&mut self, region: ClipRegion) -> ClipGuard<'_> {
        let depth = self.clips.len();
        self.clips.push(region);
        ClipGuard {
            surface: self,
            depth,
        }
    }

    fn visible(&self, x: u32, y: u32) -> bool {
        self.clips.iter().all(|clip| clip.covers_pixel(x, y))
    }

    fn blend_pixel(&mut self, x: u32, y: u32, src: Color) {
        if !self.visible(x, y) {
            return;
        }
        let dst = *self.pixels.get_pixel(x, y);
        self.pixels.put_pixel(x, y, source_over(dst, src));
    }

    pub fn fill(&mut self, color: Color) {
        let size = self.size();
        for y in 0..size {
            for x in 0..size {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Fills `shape` under the non-zero rule.
    pub fn fill_shape(&mut self, shape: &impl Shape, color: Color) {
        let size = self.size();
        let bounds = shape.bounding_box();
        let x0 = bounds.x0.floor().max(0.0) as u32;
        let y0 = bounds.y0.floor().max(0.0) as u32;
        let x1 = (bounds.x1.ceil().max(0.0) as u32).min(size);
        let y1 = (bounds.y1.ceil().max(0.0) as u32).min(size);

        for y in y0..y1 {
            for x in x0..x1 {
                if shape.contains(pixel_center(x, y)) {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Draws `image` stretched over the whole surface.
    pub fn draw_image(&mut self, image: &RgbaImage) {
        let size = self.size();
        if image.dimensions() == (size, size) {
            self.draw_pixels(image);
        } else {
            let scaled = image::imageops::resize(image, size, size, FilterType::Triangle);
            self.draw_pixels(&scaled);
        }
    }

    pub fn draw_surface(&mut self, other: &Surface) {
        self.draw_image(&other.pixels);
    }

    fn draw_pixels(&mut self, image: &RgbaImage) {
        for (x, y, px) in image.enumerate_pixels() {
            self.blend_pixel(x, y, *px);
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

/// Scoped clip; derefs to the surface and restores the previous clip depth on drop.
pub struct ClipGuard<'a> {
    surface: &'a mut Surface,
    depth: usize,
}

impl Deref for ClipGuard<'_> {
    type Target = Surface;

    fn deref(&self) -> &Surface {
        self.surface
    }
}

impl DerefMut for ClipGuard<'_> {
    fn deref_mut(&mut self) -> &mut Surface {
        self.surface
    }
}

impl Drop for ClipGuard<'_> {
    fn drop(&mut self) {
        self.surface.clips.truncate(self.depth);
    }
}

/// Straight-alpha source-over.
pub fn source_over(dst: Color, src: Color) -> Color {
    let sa = src[3] as u32;
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }
    let da = dst[3] as u32;
    let inv = 255 - sa;
    let out_a = sa * 255 + da * inv;
    if out_a == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = src[i] as u32 * sa * 255 + dst[i] as u32 * da * inv;
        out[i] = ((c + out_a / 2) / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    Rgba(out)
}
