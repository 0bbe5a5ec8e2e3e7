//! Devices available to a terminal host.
//!
//! A terminal has no camera, so the camera reports itself unavailable and the
//! pipeline turns that into its usual error state. Uploaded images are read
//! with [`rqrr`].

use async_trait::async_trait;
use couponbook::{
    errors::{CameraError, DecodeError},
    ports::{Camera, CameraStream, QrDecoder},
};
use image::{DynamicImage, Luma};
use tracing::debug;

/// Camera for hosts without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCamera;

#[async_trait]
impl Camera for NoCamera {
    async fn open(&self) -> Result<Box<dyn CameraStream>, CameraError> {
        Err(CameraError::Unavailable("no camera on this host".to_owned()))
    }
}

/// QR decoder backed by `rqrr`.
///
/// The first grid that decodes wins. Grids that are found but cannot be read
/// are logged and skipped, so a blurry frame reads as "no code yet".
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl QrDecoder for RqrrDecoder {
    fn decode(&self, image: &DynamicImage) -> Result<Option<String>, DecodeError> {
        let luma = image.to_luma8();

        let width = usize::try_from(luma.width())
            .map_err(|error| DecodeError::Decoder(error.to_string()))?;
        let height = usize::try_from(luma.height())
            .map_err(|error| DecodeError::Decoder(error.to_string()))?;

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| {
            let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
                return u8::MAX;
            };

            luma.get_pixel_checked(x, y)
                .map_or(u8::MAX, |&Luma([value])| value)
        });

        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_, content)) => return Ok(Some(content)),
                Err(error) => debug!(error = %error, "skipping unreadable QR grid"),
            }
        }

        Ok(None)
    }
}
