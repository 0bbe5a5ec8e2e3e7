//! Test doubles shared by module tests.

use std::{
    collections::VecDeque,
    io::Cursor,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use jiff::Zoned;
use rust_decimal::Decimal;
use tokio::sync::Notify;

use crate::{
    clock::Clock,
    coupon::{CouponRecord, DiscountKind, DiscountSummary, StoreSummary},
    errors::{CameraError, DecodeError, LookupError},
    notifications::{Notification, NotificationKind, NotificationSink},
    payload::DecodedPayload,
    pipeline::{PipelineContext, RedemptionPipeline},
    ports::{
        AuthStore, Camera, CameraStream, CouponLookup, MockAuthStore, MockCamera,
        MockCouponLookup, MockParamDecoder, MockQrDecoder, ParamDecoder, QrDecoder,
    },
};

/// A clock tests can move by hand.
#[derive(Debug)]
pub(crate) struct ManualClock(Mutex<Zoned>);

impl ManualClock {
    pub(crate) fn new(now: Zoned) -> Self {
        Self(Mutex::new(now))
    }

    pub(crate) fn set(&self, now: Zoned) {
        if let Ok(mut current) = self.0.lock() {
            *current = now;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Zoned {
        self.0
            .lock()
            .map_or_else(|poisoned| poisoned.into_inner().clone(), |now| now.clone())
    }
}

/// Keeps every notification it receives.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink(Mutex<Vec<Notification>>);

impl RecordingSink {
    pub(crate) fn all(&self) -> Vec<Notification> {
        self.0.lock().map(|list| list.clone()).unwrap_or_default()
    }

    pub(crate) fn errors(&self) -> Vec<Notification> {
        self.all()
            .into_iter()
            .filter(|notification| notification.kind == NotificationKind::Error)
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        if let Ok(mut list) = self.0.lock() {
            list.push(notification);
        }
    }
}

/// Lookup that blocks until released and counts its calls.
#[derive(Debug, Default)]
pub(crate) struct GatedLookup {
    calls: AtomicUsize,
    gate: Notify,
    record: Option<CouponRecord>,
}

impl GatedLookup {
    pub(crate) fn returning(record: Option<CouponRecord>) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl CouponLookup for GatedLookup {
    async fn find_coupon(&self, _code: &str) -> Result<Option<CouponRecord>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;

        Ok(self.record.clone())
    }
}

/// Link decoder that blocks until released and counts its calls.
#[derive(Debug, Default)]
pub(crate) struct GatedParamDecoder {
    calls: AtomicUsize,
    gate: Notify,
    code: String,
}

impl GatedParamDecoder {
    pub(crate) fn yielding(code: &str) -> Self {
        Self {
            code: code.to_owned(),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl ParamDecoder for GatedParamDecoder {
    async fn decode(&self, _encoded: &str) -> Result<Option<DecodedPayload>, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;

        Ok(Some(DecodedPayload::from_code(self.code.clone())))
    }
}

/// Camera stream serving queued frames, then blank ones.
#[derive(Debug, Default)]
pub(crate) struct FakeStream {
    frames: VecDeque<Result<DynamicImage, CameraError>>,
    stops: Arc<AtomicUsize>,
}

impl FakeStream {
    pub(crate) fn new(stops: &Arc<AtomicUsize>) -> Self {
        Self {
            frames: VecDeque::new(),
            stops: Arc::clone(stops),
        }
    }

    pub(crate) fn then(mut self, frame: Result<DynamicImage, CameraError>) -> Self {
        self.frames.push_back(frame);
        self
    }
}

impl CameraStream for FakeStream {
    fn capture_frame(&mut self) -> Result<DynamicImage, CameraError> {
        self.frames
            .pop_front()
            .unwrap_or_else(|| Ok(blank_frame()))
    }

    fn stop(&mut self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

pub(crate) fn blank_frame() -> DynamicImage {
    DynamicImage::new_luma8(4, 4)
}

pub(crate) fn png_bytes(width: u32, height: u32) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();

    DynamicImage::new_luma8(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(bytes)
}

pub(crate) fn coupon_record(code: &str, expires_at: &str) -> Result<CouponRecord, jiff::Error> {
    Ok(CouponRecord {
        code: Some(code.to_owned()),
        expires_at: expires_at.parse()?,
        used: false,
        used_at: None,
        store: StoreSummary {
            id: "store-1".to_owned(),
            name: "Corner Cafe".to_owned(),
            logo_url: None,
        },
        discount: DiscountSummary {
            id: "discount-1".to_owned(),
            title: "Coffee deal".to_owned(),
            kind: DiscountKind::Percentage,
            value: Some(Decimal::from(10)),
            restrictions: None,
            premium: false,
        },
    })
}

/// Builder for a pipeline wired to test doubles.
///
/// Collaborators that are not replaced are bare mocks, so any unexpected
/// call fails the test.
pub(crate) struct Harness {
    pub(crate) lookup: Arc<dyn CouponLookup>,
    pub(crate) param_decoder: Arc<dyn ParamDecoder>,
    pub(crate) qr_decoder: Arc<dyn QrDecoder>,
    pub(crate) camera: Arc<dyn Camera>,
    pub(crate) auth: Arc<dyn AuthStore>,
    pub(crate) sink: Arc<RecordingSink>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self {
            lookup: Arc::new(MockCouponLookup::new()),
            param_decoder: Arc::new(MockParamDecoder::new()),
            qr_decoder: Arc::new(MockQrDecoder::new()),
            camera: Arc::new(MockCamera::new()),
            auth: Arc::new(MockAuthStore::new()),
            sink: Arc::new(RecordingSink::default()),
        }
    }

    pub(crate) fn lookup(mut self, lookup: impl CouponLookup + 'static) -> Self {
        self.lookup = Arc::new(lookup);
        self
    }

    pub(crate) fn param_decoder(mut self, decoder: impl ParamDecoder + 'static) -> Self {
        self.param_decoder = Arc::new(decoder);
        self
    }

    pub(crate) fn qr_decoder(mut self, decoder: impl QrDecoder + 'static) -> Self {
        self.qr_decoder = Arc::new(decoder);
        self
    }

    pub(crate) fn camera(mut self, camera: impl Camera + 'static) -> Self {
        self.camera = Arc::new(camera);
        self
    }

    pub(crate) fn auth(mut self, auth: impl AuthStore + 'static) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    pub(crate) fn build(&self) -> RedemptionPipeline {
        RedemptionPipeline::new(PipelineContext {
            lookup: Arc::clone(&self.lookup),
            param_decoder: Arc::clone(&self.param_decoder),
            qr_decoder: Arc::clone(&self.qr_decoder),
            camera: Arc::clone(&self.camera),
            auth: Arc::clone(&self.auth),
            notifications: self.sink.clone(),
        })
    }
}
