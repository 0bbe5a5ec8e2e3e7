//! Couponbook prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    availability::{
        AVAILABLE_NOW, Countdown, DayIndex, DayWindow, Discount, SEARCH_HORIZON_DAYS, TimeRange,
        format_countdown, is_valid, next_available_instant,
    },
    clock::{Clock, FixedClock, SystemClock},
    coupon::{Coupon, CouponRecord, CouponStatus, DiscountKind, DiscountSummary, StoreSummary},
    errors::{CameraError, DecodeError, GraphQlError, LookupError},
    notifications::{Notification, NotificationKind, NotificationSink},
    payload::{CouponPreview, DecodedPayload},
    pipeline::{
        AcquireOutcome, CropOffset, CropRegion, CropView, Detail, PipelineContext, PipelineError,
        PipelineState, RedemptionPipeline, ScanOutcome, SubmitOutcome,
    },
    ports::{
        AuthStore, Camera, CameraStream, CouponLookup, CurrentUser, ParamDecoder, QrDecoder,
    },
    schedule::{CountdownTicker, TaskSlot},
};
