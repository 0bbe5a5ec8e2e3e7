//! Operations sent to the coupon API.

use couponbook::{coupon::CouponRecord, payload::DecodedPayload};
use serde::{Deserialize, Serialize};

pub(crate) const COUPON_BY_CODE: &str = r"
query CouponByCode($code: String!) {
  couponByCode(code: $code) {
    code
    expiresAt
    used
    usedAt
    store { id name logoUrl }
    discount { id title type value restrictions premium }
  }
}
";

pub(crate) const DECODE_COUPON_LINK: &str = r"
query DecodeCouponLink($enc: String!) {
  decodeCouponLink(enc: $enc) {
    code
    discountTitle
    discountType
    discountValue
    storeName
    expiresAt
  }
}
";

#[derive(Debug, Serialize)]
pub(crate) struct CouponByCodeVariables<'a> {
    pub(crate) code: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponByCodeData {
    #[serde(default)]
    pub(crate) coupon_by_code: Option<CouponRecord>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DecodeCouponLinkVariables<'a> {
    pub(crate) enc: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DecodeCouponLinkData {
    #[serde(default)]
    pub(crate) decode_coupon_link: Option<DecodedPayload>,
}
