//! Collaborator contracts
//!
//! Everything the redemption pipeline talks to outside this crate: the coupon
//! API, the link decoder, the QR decoder, the camera and the auth store.

use async_trait::async_trait;
use image::DynamicImage;
use mockall::automock;

use crate::{
    coupon::CouponRecord,
    errors::{CameraError, DecodeError, LookupError},
    payload::DecodedPayload,
};

/// Remote coupon lookup by code.
#[automock]
#[async_trait]
pub trait CouponLookup: Send + Sync {
    /// Fetch coupon detail. `Ok(None)` means no coupon has this code.
    async fn find_coupon(&self, code: &str) -> Result<Option<CouponRecord>, LookupError>;
}

/// Decoder for the encrypted `enc` link parameter.
#[automock]
#[async_trait]
pub trait ParamDecoder: Send + Sync {
    /// Decode an opaque parameter. `Ok(None)` means nothing usable was inside.
    async fn decode(&self, encoded: &str) -> Result<Option<DecodedPayload>, DecodeError>;
}

/// QR detection over a single image or frame.
#[automock]
pub trait QrDecoder: Send + Sync {
    /// Return the QR text, or `Ok(None)` when the image holds no code.
    ///
    /// Called once per camera frame, so implementations must not hold on to
    /// frames between calls.
    fn decode(&self, image: &DynamicImage) -> Result<Option<String>, DecodeError>;
}

/// An open camera stream.
#[automock]
pub trait CameraStream: Send {
    /// Grab the current frame.
    fn capture_frame(&mut self) -> Result<DynamicImage, CameraError>;

    /// Stop capture and release the device.
    fn stop(&mut self);
}

/// Permission-gated camera access.
#[automock]
#[async_trait]
pub trait Camera: Send + Sync {
    /// Ask for access and open a stream.
    async fn open(&self) -> Result<Box<dyn CameraStream>, CameraError>;
}

/// The signed-in user, as far as this crate cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// User identifier.
    pub id: String,

    /// Contact email.
    pub email: Option<String>,

    /// Whether the user holds a premium subscription.
    pub premium: bool,
}

/// Read-only view of the authentication state.
#[automock]
pub trait AuthStore: Send + Sync {
    /// Whether an access token is present.
    fn has_access_token(&self) -> bool;

    /// The signed-in user, if known.
    fn current_user(&self) -> Option<CurrentUser>;
}
