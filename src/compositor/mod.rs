//! Disc cover compositing.
//!
//! A generated square image is drawn through a ring-shaped clip (outer disc
//! edge minus the center hole) on top of a disc background. When the disc
//! background asset is missing, a placeholder disc is synthesized instead.

pub mod mask;
pub mod output;
pub mod placeholder;
pub mod source;
pub mod surface;

use std::sync::Arc;

use image::{DynamicImage, RgbaImage};

use crate::config::DreamLayerConfig;
use crate::error::Result;
use crate::logger;

pub use mask::{ClipRegion, DiscGeometry, FillRule};
pub use output::{decode_data_url, png_data_url, save_data_url, DEFAULT_DOWNLOAD_NAME};
pub use source::{DefaultImageSource, ImageSource};
pub use surface::Surface;

#[derive(Debug, Clone, Default)]
pub struct CompositorOptions {
    pub disc_base: Option<DynamicImage>,
    pub generated: Option<DynamicImage>,
    pub size: Option<u32>,
}

impl CompositorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disc_base(mut self, image: DynamicImage) -> Self {
        self.disc_base = Some(image);
        self
    }

    pub fn with_generated(mut self, image: DynamicImage) -> Self {
        self.generated = Some(image);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

#[derive(Clone)]
pub struct DiscCompositor {
    source: Arc<dyn ImageSource>,
    disc_base_path: String,
    default_size: u32,
}

impl DiscCompositor {
    pub fn new(config: &DreamLayerConfig) -> Self {
        Self::with_source(Arc::new(DefaultImageSource::default()), config)
    }

    pub fn with_source(source: Arc<dyn ImageSource>, config: &DreamLayerConfig) -> Self {
        Self {
            source,
            disc_base_path: config.disc_base_path.clone(),
            default_size: config.output_size,
        }
    }

    pub fn disc_base_path(&self) -> &str {
        &self.disc_base_path
    }

    /// Composites the image at `generated_location` onto the disc and returns
    /// a PNG data URL. A pre-loaded image in `options` takes precedence over
    /// the location.
    pub async fn composite(
        &self,
        generated_location: &str,
        options: CompositorOptions,
    ) -> Result<String> {
        let image = self.render(generated_location, options).await?;
        output::png_data_url(&image)
    }

    pub async fn render(
        &self,
        generated_location: &str,
        options: CompositorOptions,
    ) -> Result<RgbaImage> {
        let _timer = logger::timer("disc composite");
        let size = options.size.unwrap_or(self.default_size);
        let mut surface = Surface::new(size)?;

        let generated = match options.generated {
            Some(image) => image,
            None => self.source.load(generated_location).await?,
        };

        let disc_base = match options.disc_base {
            Some(image) => image.to_rgba8(),
            None => self.load_disc_base(size).await?,
        };

        surface.draw_image(&disc_base);

        let mut scratch = Surface::new(size)?;
        scratch.draw_image(&generated.to_rgba8());

        {
            let mut clipped = surface.clip(DiscGeometry::for_size(size).annulus());
            clipped.draw_surface(&scratch);
        }

        log::debug!("Composited {}x{} disc cover", size, size);
        Ok(surface.into_image())
    }

    async fn load_disc_base(&self, size: u32) -> Result<RgbaImage> {
        match self.source.load(&self.disc_base_path).await {
            Ok(image) => Ok(image.to_rgba8()),
            Err(e) => {
                log::warn!("⚠️  Disc base unavailable ({}), synthesizing placeholder", e);
                placeholder::synthesize_disc(size)
            }
        }
    }
}
