//! Couponbook
//!
//! Client-side coupon redemption: discount availability rules, countdowns to
//! the next redeemable moment, and the pipeline that turns typed codes, links
//! and QR codes into coupons fetched from the API.

pub mod availability;
pub mod clock;
pub mod coupon;
pub mod errors;
pub mod notifications;
pub mod payload;
pub mod pipeline;
pub mod ports;
pub mod prelude;
pub mod schedule;

#[cfg(test)]
mod test_support;
