//! Plain-text output for coupons and previews.

use couponbook::{
    coupon::{Coupon, CouponStatus},
    payload::DecodedPayload,
    pipeline::{AcquireOutcome, RedemptionPipeline, SubmitOutcome},
};
use jiff::Timestamp;

pub(super) fn coupon_lines(coupon: &Coupon, now: Timestamp, show_premium: bool) -> Vec<String> {
    let mut lines = vec![
        format!("code:      {}", coupon.display_code()),
        format!("status:    {}", coupon.status_at(now)),
        format!("store:     {}", coupon.store.name),
    ];

    if coupon.discount.premium && !show_premium {
        lines.push("discount:  premium members only".to_owned());
    } else {
        lines.push(format!(
            "discount:  {} ({})",
            coupon.discount.headline(),
            coupon.discount.title
        ));

        if let Some(restrictions) = &coupon.discount.restrictions {
            lines.push(format!("terms:     {restrictions}"));
        }
    }

    match (coupon.status_at(now), coupon.used_at) {
        (CouponStatus::Redeemed, Some(used_at)) => lines.push(format!("used at:   {used_at}")),
        _ => lines.push(format!("expires:   {}", coupon.expires_at)),
    }

    lines
}

pub(super) fn preview_lines(payload: &DecodedPayload) -> Vec<String> {
    let preview = &payload.preview;
    let mut lines = vec![format!("code:      {}", payload.code.to_uppercase())];

    if let Some(store) = &preview.store_name {
        lines.push(format!("store:     {store}"));
    }

    if let Some(title) = &preview.discount_title {
        lines.push(format!("discount:  {title}"));
    }

    if let Some(expires_at) = preview.expires_at {
        lines.push(format!("expires:   {expires_at}"));
    }

    lines
}

pub(super) fn submit_outcome(pipeline: &RedemptionPipeline, outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Shown(coupon) => {
            let show_premium = pipeline.can_view_premium(&coupon.discount);

            for line in coupon_lines(coupon, Timestamp::now(), show_premium) {
                println!("{line}");
            }
        }
        SubmitOutcome::NotFound => println!("no coupon matches {}", pipeline.code()),
        SubmitOutcome::Discarded => {}
    }
}

pub(super) fn acquire_outcome(pipeline: &RedemptionPipeline, outcome: &AcquireOutcome) {
    match outcome {
        AcquireOutcome::Preview(payload) => {
            for line in preview_lines(payload) {
                println!("{line}");
            }
        }
        AcquireOutcome::Submitted(outcome) => submit_outcome(pipeline, outcome),
    }
}
