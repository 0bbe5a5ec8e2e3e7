//! Errors raised at the collaborator boundaries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message shown when a failure carries no usable text.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

/// A structured error entry from a GraphQL response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlError {
    /// Human-readable message.
    pub message: String,

    /// Response path the error refers to, when the server provides one.
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
}

/// Failure while looking a coupon up on the remote API.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The server answered with a GraphQL error array.
    #[error("api returned {} error(s)", .0.len())]
    GraphQl(Vec<GraphQlError>),

    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response had neither data nor errors.
    #[error("empty response from api")]
    EmptyResponse,
}

impl LookupError {
    /// Text suitable for a user-facing notification.
    ///
    /// Prefers the first structured error, then the transport message, then
    /// [`FALLBACK_MESSAGE`].
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::GraphQl(errors) => errors.first().map(|error| error.message.trim()),
            Self::Transport(message) => Some(message.trim()),
            Self::EmptyResponse => None,
        };

        message
            .filter(|message| !message.is_empty())
            .unwrap_or(FALLBACK_MESSAGE)
            .to_owned()
    }
}

/// Failure acquiring or releasing the camera.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    /// The user or platform refused camera access.
    #[error("camera permission denied")]
    PermissionDenied,

    /// No camera could be opened.
    #[error("camera unavailable: {0}")]
    Unavailable(String),

    /// The stream stopped delivering frames.
    #[error("camera stream closed")]
    StreamClosed,
}

/// Failure turning a link parameter, image or frame into a coupon code.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The encrypted link parameter could not be decoded.
    #[error("coupon link could not be decoded")]
    MalformedParameter,

    /// The decoded text looked like JSON but did not parse.
    #[error("coupon payload is not valid JSON")]
    Json(#[source] serde_json::Error),

    /// The decoded payload carried no code.
    #[error("coupon payload has no code")]
    MissingCode,

    /// The uploaded file is not a readable image.
    #[error("image could not be read")]
    Image(#[source] image::ImageError),

    /// The image was read but holds no QR code.
    #[error("no QR code found")]
    NoCode,

    /// Camera access failed.
    #[error(transparent)]
    Camera(#[from] CameraError),

    /// The external decoder reported a failure.
    #[error("decoder failure: {0}")]
    Decoder(String),
}

impl DecodeError {
    /// Text suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedParameter => "This coupon link is invalid or has expired.".to_owned(),
            Self::Json(_) | Self::MissingCode => "This QR code is not a coupon.".to_owned(),
            Self::Image(_) => "The selected file could not be opened as an image.".to_owned(),
            Self::NoCode => "No QR code was found. Try again.".to_owned(),
            Self::Camera(CameraError::PermissionDenied) => {
                "Camera access was denied. Allow camera access to scan coupons.".to_owned()
            }
            Self::Camera(_) => "The camera could not be started.".to_owned(),
            Self::Decoder(message) if !message.trim().is_empty() => message.trim().to_owned(),
            Self::Decoder(_) => FALLBACK_MESSAGE.to_owned(),
        }
    }
}
