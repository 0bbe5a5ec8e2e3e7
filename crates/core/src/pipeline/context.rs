//! Pipeline collaborators.

use std::{fmt, sync::Arc};

use crate::{
    notifications::NotificationSink,
    ports::{AuthStore, Camera, CouponLookup, ParamDecoder, QrDecoder},
};

/// Everything a [`RedemptionPipeline`](super::RedemptionPipeline) depends on,
/// passed in explicitly rather than read from globals.
#[derive(Clone)]
pub struct PipelineContext {
    /// Remote coupon lookup.
    pub lookup: Arc<dyn CouponLookup>,

    /// Decoder for the `enc` link parameter.
    pub param_decoder: Arc<dyn ParamDecoder>,

    /// QR detection.
    pub qr_decoder: Arc<dyn QrDecoder>,

    /// Camera access.
    pub camera: Arc<dyn Camera>,

    /// Read-only authentication state.
    pub auth: Arc<dyn AuthStore>,

    /// Where notifications go.
    pub notifications: Arc<dyn NotificationSink>,
}

impl fmt::Debug for PipelineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineContext").finish_non_exhaustive()
    }
}
