//! Decoded coupon payloads
//!
//! Short-lived values produced by QR or link decoding. They carry a code and,
//! sometimes, enough preview data to show a coupon without asking the API.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{coupon::DiscountKind, errors::DecodeError};

/// Optional preview fields embedded next to the code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponPreview {
    /// Discount headline.
    #[serde(default)]
    pub discount_title: Option<String>,

    /// Discount mechanics.
    #[serde(default)]
    pub discount_type: Option<DiscountKind>,

    /// Percentage or amount.
    #[serde(default)]
    pub discount_value: Option<Decimal>,

    /// Store display name.
    #[serde(default)]
    pub store_name: Option<String>,

    /// Coupon expiry.
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

impl CouponPreview {
    /// Whether no preview field is present.
    pub const fn is_empty(&self) -> bool {
        self.discount_title.is_none()
            && self.discount_type.is_none()
            && self.discount_value.is_none()
            && self.store_name.is_none()
            && self.expires_at.is_none()
    }
}

/// A coupon code recovered from a link parameter or image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPayload {
    /// Coupon code.
    pub code: String,

    /// Preview fields, possibly all empty.
    #[serde(flatten)]
    pub preview: CouponPreview,
}

impl DecodedPayload {
    /// A payload holding just a code.
    pub fn from_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            preview: CouponPreview::default(),
        }
    }

    /// Parse decoded text.
    ///
    /// Text that starts with `{` is read as a JSON object with a `code`
    /// field; anything else is taken as a bare code.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Json`] for unreadable JSON and
    /// [`DecodeError::MissingCode`] when no code is left after trimming.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let text = text.trim();

        let mut payload = if text.starts_with('{') {
            serde_json::from_str::<Self>(text).map_err(DecodeError::Json)?
        } else {
            Self::from_code(text)
        };

        payload.code = payload.code.trim().to_owned();

        if payload.code.is_empty() {
            return Err(DecodeError::MissingCode);
        }

        Ok(payload)
    }

    /// Whether the payload can be shown without a lookup.
    pub const fn has_preview(&self) -> bool {
        !self.preview.is_empty()
    }
}
