//! Coupons
//!
//! An issued redemption instance for a discount at a store. Coupons are
//! owned by the remote API; the client only maps and displays them.

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Discount mechanics as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// Percentage off the purchase.
    Percentage,

    /// Fixed amount off the purchase.
    FixedAmount,

    /// Buy one, get one free.
    BuyOneGetOne,

    /// A free item with purchase.
    FreeItem,

    /// A kind this client does not know about.
    #[serde(other)]
    Other,
}

/// Store fields denormalized onto a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSummary {
    /// Store identifier.
    pub id: String,

    /// Store display name.
    pub name: String,

    /// Optional logo URL.
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Discount fields denormalized onto a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountSummary {
    /// Discount identifier.
    pub id: String,

    /// Headline shown to the customer.
    pub title: String,

    /// Discount mechanics.
    #[serde(rename = "type")]
    pub kind: DiscountKind,

    /// Percentage or amount, depending on `kind`.
    #[serde(default)]
    pub value: Option<Decimal>,

    /// Fine print.
    #[serde(default)]
    pub restrictions: Option<String>,

    /// Only shown to premium members.
    #[serde(default)]
    pub premium: bool,
}

impl DiscountSummary {
    /// Short description of what the discount gives.
    pub fn headline(&self) -> String {
        match (self.kind, self.value) {
            (DiscountKind::Percentage, Some(value)) => format!("{}% off", value.normalize()),
            (DiscountKind::FixedAmount, Some(value)) => format!("{} off", value.normalize()),
            (DiscountKind::BuyOneGetOne, _) => "Buy one, get one free".to_owned(),
            (DiscountKind::FreeItem, _) => "Free item".to_owned(),
            _ => self.title.clone(),
        }
    }
}

/// Coupon detail exactly as the API returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRecord {
    /// Opaque coupon code.
    #[serde(default)]
    pub code: Option<String>,

    /// Expiry instant.
    pub expires_at: Timestamp,

    /// Whether the coupon has been redeemed.
    #[serde(default)]
    pub used: bool,

    /// When the coupon was redeemed.
    #[serde(default)]
    pub used_at: Option<Timestamp>,

    /// Issuing store.
    pub store: StoreSummary,

    /// Underlying discount.
    pub discount: DiscountSummary,
}

/// A coupon record could not be mapped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponMappingError {
    /// The record carried no code.
    #[error("coupon record has no code")]
    MissingCode,
}

/// Display status of a coupon. Exactly one holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CouponStatus {
    /// Not used and not expired.
    Active,

    /// Used.
    Redeemed,

    /// Past its expiry without being used.
    Expired,
}

impl CouponStatus {
    /// Lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Redeemed => "redeemed",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coupon in the client's internal shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    /// Opaque code, as issued.
    pub code: String,

    /// Expiry instant.
    pub expires_at: Timestamp,

    /// Whether the coupon has been redeemed.
    pub used: bool,

    /// When the coupon was redeemed.
    pub used_at: Option<Timestamp>,

    /// Issuing store.
    pub store: StoreSummary,

    /// Underlying discount.
    pub discount: DiscountSummary,
}

impl Coupon {
    /// Code as shown to the customer.
    pub fn display_code(&self) -> String {
        self.code.to_uppercase()
    }

    /// Whether the coupon has been redeemed.
    pub const fn is_used(&self) -> bool {
        self.used || self.used_at.is_some()
    }

    /// Derive the status at `now`.
    ///
    /// Redemption takes precedence over expiry.
    pub fn status_at(&self, now: Timestamp) -> CouponStatus {
        if self.is_used() {
            CouponStatus::Redeemed
        } else if now > self.expires_at {
            CouponStatus::Expired
        } else {
            CouponStatus::Active
        }
    }
}

impl TryFrom<CouponRecord> for Coupon {
    type Error = CouponMappingError;

    fn try_from(record: CouponRecord) -> Result<Self, Self::Error> {
        let code = record
            .code
            .map(|code| code.trim().to_owned())
            .filter(|code| !code.is_empty())
            .ok_or(CouponMappingError::MissingCode)?;

        Ok(Self {
            code,
            expires_at: record.expires_at,
            used: record.used,
            used_at: record.used_at,
            store: record.store,
            discount: record.discount,
        })
    }
}
