//! Upload cropping state.

use image::DynamicImage;

/// Zoom level the crop view opens at, in percent.
pub const DEFAULT_ZOOM_PERCENT: u16 = 100;

/// Pixel rectangle selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    /// Left edge.
    pub x: u32,

    /// Top edge.
    pub y: u32,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl CropRegion {
    /// Create a region.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clip the region to an image of the given size.
    ///
    /// Returns `None` when nothing of the region lies inside the image.
    pub fn clamp_to(self, image_width: u32, image_height: u32) -> Option<Self> {
        if self.x >= image_width || self.y >= image_height {
            return None;
        }

        let width = self.width.min(image_width - self.x);
        let height = self.height.min(image_height - self.y);

        (width > 0 && height > 0).then_some(Self {
            width,
            height,
            ..self
        })
    }
}

/// Pan offset of the crop view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CropOffset {
    /// Horizontal pan.
    pub x: i32,

    /// Vertical pan.
    pub y: i32,
}

/// Everything the crop modal holds between opening and closing.
#[derive(Debug, Clone)]
pub(crate) struct CropSession {
    pub(crate) image: Option<DynamicImage>,
    pub(crate) offset: CropOffset,
    pub(crate) zoom_percent: u16,
    pub(crate) region: Option<CropRegion>,
}

impl Default for CropSession {
    fn default() -> Self {
        Self {
            image: None,
            offset: CropOffset::default(),
            zoom_percent: DEFAULT_ZOOM_PERCENT,
            region: None,
        }
    }
}

impl CropSession {
    pub(crate) fn with_image(image: DynamicImage) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    /// Take the image, cropped to the selected region if there is one.
    ///
    /// The session is left empty.
    pub(crate) fn take_cropped(&mut self) -> Option<DynamicImage> {
        let session = std::mem::take(self);
        let image = session.image?;

        let region = session
            .region
            .and_then(|region| region.clamp_to(image.width(), image.height()));

        match region {
            Some(region) => Some(image.crop_imm(region.x, region.y, region.width, region.height)),
            None => Some(image),
        }
    }
}
