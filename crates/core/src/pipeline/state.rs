//! Pipeline states and outcomes.

use crate::{coupon::Coupon, payload::DecodedPayload};

/// What the detail view is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// A coupon fetched from the API.
    Coupon(Coupon),

    /// A decoded payload shown from its embedded preview.
    Preview(DecodedPayload),
}

impl Detail {
    /// Code of the coupon being shown.
    pub fn code(&self) -> &str {
        match self {
            Self::Coupon(coupon) => &coupon.code,
            Self::Preview(payload) => &payload.code,
        }
    }
}

/// Where the redemption flow currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// Nothing in progress.
    #[default]
    Idle,

    /// The user is typing a code.
    EnteringCode,

    /// The camera is open and frames are being sampled.
    ScanningCamera,

    /// An uploaded image is waiting for the user to crop it.
    CroppingUpload,

    /// A lookup is in flight.
    Submitting,

    /// A coupon is on screen.
    DetailShown(Detail),

    /// A decode failure the user has to dismiss.
    Error(String),
}

impl PipelineState {
    /// Short label used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::EnteringCode => "entering_code",
            Self::ScanningCamera => "scanning_camera",
            Self::CroppingUpload => "cropping_upload",
            Self::Submitting => "submitting",
            Self::DetailShown(_) => "detail_shown",
            Self::Error(_) => "error",
        }
    }
}

/// Result of a lookup submission that was allowed to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The coupon was found and is now shown.
    Shown(Coupon),

    /// No coupon has this code.
    NotFound,

    /// The lookup finished after the pipeline moved on; its result was dropped.
    Discarded,
}

/// Result of turning decoded text into a coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The payload carried preview data and is shown as is.
    Preview(DecodedPayload),

    /// Only a code was present, so it was looked up.
    Submitted(SubmitOutcome),
}

/// How a camera scan ended without an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A code was read from a frame.
    Decoded(AcquireOutcome),

    /// The scanner was closed before a code was found.
    Cancelled,
}
