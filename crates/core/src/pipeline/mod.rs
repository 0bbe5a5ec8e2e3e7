//! Coupon redemption pipeline
//!
//! Acquires a coupon code from manual entry, an encrypted link parameter, or
//! a QR code (camera or uploaded image), then exchanges it with the API.
//!
//! Every failure is turned into pipeline state plus a notification before it
//! is returned, so callers may drop the returned error without losing
//! anything the user needs to see.

use std::{
    fmt,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use thiserror::Error;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{Span, debug, info, warn};

use crate::{
    coupon::{Coupon, CouponMappingError, DiscountSummary},
    errors::{DecodeError, FALLBACK_MESSAGE, LookupError},
    notifications::Notification,
    payload::DecodedPayload,
    ports::CameraStream,
};

mod context;
mod crop;
mod state;

pub use context::PipelineContext;
pub use crop::{CropOffset, CropRegion, DEFAULT_ZOOM_PERCENT};
pub use state::{AcquireOutcome, Detail, PipelineState, ScanOutcome, SubmitOutcome};

use crop::CropSession;

/// Link parameter carrying the encrypted coupon payload. Matched ignoring case.
pub const ENC_PARAM: &str = "enc";

/// Errors returned by pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The code was blank after trimming.
    #[error("no coupon code entered")]
    EmptyCode,

    /// A lookup or link decode is already running.
    #[error("a lookup is already in progress")]
    LookupInFlight,

    /// The operation does not apply to the current state.
    #[error("operation not available while {0}")]
    InvalidState(&'static str),

    /// There is no uploaded image to crop.
    #[error("no image to crop")]
    NoImage,

    /// A link, image or frame could not be decoded.
    #[error("decode failed")]
    Decode(#[source] DecodeError),

    /// The API lookup failed.
    #[error("lookup failed")]
    Lookup(#[source] LookupError),

    /// The API returned a coupon this client cannot read.
    #[error("unreadable coupon")]
    Mapping(#[source] CouponMappingError),
}

/// Crop modal contents, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropView {
    /// Pan offset.
    pub offset: CropOffset,

    /// Zoom level in percent.
    pub zoom_percent: u16,

    /// Selected region.
    pub region: Option<CropRegion>,

    /// Whether an image is loaded.
    pub has_image: bool,
}

/// State machine for one redemption screen.
///
/// All methods take `&self`; share the pipeline behind an `Arc` to drive it
/// from several event handlers.
pub struct RedemptionPipeline {
    ctx: PipelineContext,
    state: Mutex<PipelineState>,
    code: Mutex<String>,
    loading: AtomicBool,
    params_handled: AtomicBool,
    camera: Mutex<Option<Box<dyn CameraStream>>>,
    crop: Mutex<CropSession>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the loading flag and clears it when dropped.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(Self(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RedemptionPipeline {
    /// A pipeline in the idle state.
    pub fn new(ctx: PipelineContext) -> Self {
        Self {
            ctx,
            state: Mutex::new(PipelineState::Idle),
            code: Mutex::new(String::new()),
            loading: AtomicBool::new(false),
            params_handled: AtomicBool::new(false),
            camera: Mutex::new(None),
            crop: Mutex::new(CropSession::default()),
        }
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        lock(&self.state).clone()
    }

    /// Contents of the code field.
    pub fn code(&self) -> String {
        lock(&self.code).clone()
    }

    /// Whether a lookup or link decode is running.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Whether a camera stream is held.
    pub fn is_camera_active(&self) -> bool {
        lock(&self.camera).is_some()
    }

    /// Crop modal contents.
    pub fn crop_view(&self) -> CropView {
        let crop = lock(&self.crop);

        CropView {
            offset: crop.offset,
            zoom_percent: crop.zoom_percent,
            region: crop.region,
            has_image: crop.image.is_some(),
        }
    }

    /// Whether the signed-in user may see `discount`.
    pub fn can_view_premium(&self, discount: &DiscountSummary) -> bool {
        if !discount.premium {
            return true;
        }

        self.ctx.auth.has_access_token()
            && self
                .ctx
                .auth
                .current_user()
                .is_some_and(|user| user.premium)
    }

    /// Open manual entry.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::LookupInFlight`] while a lookup is running.
    pub fn begin_entry(&self) -> Result<(), PipelineError> {
        self.ensure_idle_loader()?;
        self.leave_channel();
        self.set_state(PipelineState::EnteringCode);

        Ok(())
    }

    /// Replace the code field. Never triggers a lookup.
    pub fn set_code(&self, code: impl Into<String>) {
        *lock(&self.code) = code.into();

        let mut state = lock(&self.state);

        if *state == PipelineState::Idle {
            *state = PipelineState::EnteringCode;
        }
    }

    /// Look up the code currently in the code field.
    ///
    /// Starting a lookup closes the scanner and the crop modal.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::EmptyCode`] when the trimmed code is empty; no
    ///   request is made.
    /// - [`PipelineError::LookupInFlight`] when a lookup is already running.
    /// - [`PipelineError::Lookup`] or [`PipelineError::Mapping`] when the
    ///   request fails or returns an unreadable coupon.
    #[tracing::instrument(
        name = "pipeline.submit",
        skip(self),
        fields(code = tracing::field::Empty),
        err(level = "debug")
    )]
    pub async fn submit(&self) -> Result<SubmitOutcome, PipelineError> {
        let code = lock(&self.code).trim().to_owned();

        if code.is_empty() {
            self.notify(Notification::error("Enter a coupon code"));

            return Err(PipelineError::EmptyCode);
        }

        Span::current().record("code", tracing::field::display(&code));

        let Some(guard) = LoadingGuard::acquire(&self.loading) else {
            debug!("lookup already in flight");

            return Err(PipelineError::LookupInFlight);
        };

        self.lookup(&code, guard).await
    }

    /// Handle the page's query parameters once.
    ///
    /// When an `enc` parameter is present it is decoded and, if it yields a
    /// code, the code is filled in and looked up. Manual submits are held off
    /// until the decode has finished. Once the link has been taken up, or when
    /// there is no `enc` parameter, later calls do nothing. A call rejected
    /// with [`PipelineError::LookupInFlight`] can be retried.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::LookupInFlight`] when a lookup is already running.
    /// - [`PipelineError::Decode`] when the parameter cannot be decoded.
    /// - Any error from [`submit`](Self::submit) for the resulting lookup.
    #[tracing::instrument(name = "pipeline.load_from_params", skip_all, err(level = "debug"))]
    pub async fn load_from_params<I, K, V>(
        &self,
        params: I,
    ) -> Result<Option<SubmitOutcome>, PipelineError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if self.params_handled.load(Ordering::Acquire) {
            return Ok(None);
        }

        let Some(encoded) = params
            .into_iter()
            .find(|(key, _)| key.as_ref().eq_ignore_ascii_case(ENC_PARAM))
            .map(|(_, value)| value.as_ref().to_owned())
        else {
            self.params_handled.store(true, Ordering::Release);

            return Ok(None);
        };

        // Only mark the link handled once it owns the loading flag.
        let Some(guard) = LoadingGuard::acquire(&self.loading) else {
            return Err(PipelineError::LookupInFlight);
        };

        if self.params_handled.swap(true, Ordering::AcqRel) {
            return Ok(None);
        }

        let payload = match self.ctx.param_decoder.decode(&encoded).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return Err(self.fail_decode(DecodeError::MalformedParameter)),
            Err(error) => return Err(self.fail_decode(error)),
        };

        let code = payload.code.trim().to_owned();

        if code.is_empty() {
            return Err(self.fail_decode(DecodeError::MissingCode));
        }

        info!(code = %code, "coupon code decoded from link");

        lock(&self.code).clone_from(&code);
        self.set_state(PipelineState::EnteringCode);

        self.lookup(&code, guard).await.map(Some)
    }

    /// Ask for camera access and open the scanner.
    ///
    /// If the scanner is closed while permission is pending, the stream is
    /// stopped as soon as it arrives.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::LookupInFlight`] while a lookup is running.
    /// - [`PipelineError::Decode`] when the camera cannot be opened.
    #[tracing::instrument(name = "pipeline.open_scanner", skip(self), err(level = "debug"))]
    pub async fn open_scanner(&self) -> Result<(), PipelineError> {
        self.ensure_idle_loader()?;
        self.leave_channel();
        self.set_state(PipelineState::ScanningCamera);

        let mut stream = match self.ctx.camera.open().await {
            Ok(stream) => stream,
            Err(error) => return Err(self.fail_decode(error.into())),
        };

        if *lock(&self.state) != PipelineState::ScanningCamera {
            debug!("scanner closed before camera opened");
            stream.stop();

            return Ok(());
        }

        if let Some(mut previous) = lock(&self.camera).replace(stream) {
            previous.stop();
        }

        info!("camera opened");

        Ok(())
    }

    /// Sample camera frames every `cadence` until a code is read.
    ///
    /// The camera is released whenever sampling ends.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Decode`] when a frame cannot be captured or decoded,
    ///   or the code read is not a coupon.
    /// - Any error from [`submit`](Self::submit) when a bare code is read.
    #[tracing::instrument(name = "pipeline.scan_camera", skip(self), err(level = "debug"))]
    pub async fn scan_camera(&self, cadence: Duration) -> Result<ScanOutcome, PipelineError> {
        let mut ticker = interval(cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if *lock(&self.state) != PipelineState::ScanningCamera {
                self.release_camera();

                return Ok(ScanOutcome::Cancelled);
            }

            let frame = {
                let mut camera = lock(&self.camera);

                match camera.as_mut() {
                    Some(stream) => stream.capture_frame(),
                    None => return Ok(ScanOutcome::Cancelled),
                }
            };

            let decoded = match frame {
                Ok(frame) => self.ctx.qr_decoder.decode(&frame),
                Err(error) => Err(error.into()),
            };

            match decoded {
                Ok(None) => {}
                Ok(Some(text)) => {
                    self.release_camera();

                    return self.accept_decoded(&text).await.map(ScanOutcome::Decoded);
                }
                Err(error) => {
                    self.release_camera();

                    return Err(self.fail_decode(error));
                }
            }
        }
    }

    /// Close the scanner and release the camera.
    pub fn close_scanner(&self) {
        self.release_camera();

        let mut state = lock(&self.state);

        if *state == PipelineState::ScanningCamera {
            *state = PipelineState::Idle;
        }
    }

    /// Load an uploaded image into the crop modal.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::LookupInFlight`] while a lookup is running.
    /// - [`PipelineError::Decode`] when the bytes are not a readable image.
    pub fn open_upload(&self, bytes: &[u8]) -> Result<(), PipelineError> {
        self.ensure_idle_loader()?;
        self.leave_channel();

        let image = image::load_from_memory(bytes)
            .map_err(|error| self.fail_decode(DecodeError::Image(error)))?;

        debug!(
            width = image.width(),
            height = image.height(),
            "upload loaded"
        );

        *lock(&self.crop) = CropSession::with_image(image);
        self.set_state(PipelineState::CroppingUpload);

        Ok(())
    }

    /// Record the user's crop selection.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidState`] outside the crop modal.
    pub fn adjust_crop(
        &self,
        offset: CropOffset,
        zoom_percent: u16,
        region: Option<CropRegion>,
    ) -> Result<(), PipelineError> {
        self.ensure_state(&PipelineState::CroppingUpload)?;

        let mut crop = lock(&self.crop);

        crop.offset = offset;
        crop.zoom_percent = zoom_percent.max(1);
        crop.region = region;

        Ok(())
    }

    /// Crop the uploaded image and decode it.
    ///
    /// The crop modal is cleared whatever the result.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidState`] outside the crop modal.
    /// - [`PipelineError::NoImage`] when no image is loaded.
    /// - [`PipelineError::Decode`] when no coupon can be read from the image.
    /// - Any error from [`submit`](Self::submit) when a bare code is read.
    #[tracing::instrument(name = "pipeline.confirm_crop", skip(self), err(level = "debug"))]
    pub async fn confirm_crop(&self) -> Result<AcquireOutcome, PipelineError> {
        self.ensure_state(&PipelineState::CroppingUpload)?;

        let image = lock(&self.crop)
            .take_cropped()
            .ok_or(PipelineError::NoImage)?;

        match self.ctx.qr_decoder.decode(&image) {
            Ok(Some(text)) => self.accept_decoded(&text).await,
            Ok(None) => Err(self.fail_decode(DecodeError::NoCode)),
            Err(error) => Err(self.fail_decode(error)),
        }
    }

    /// Dismiss the crop modal, discarding the image and crop settings.
    pub fn cancel_crop(&self) {
        self.reset_crop();

        let mut state = lock(&self.state);

        if *state == PipelineState::CroppingUpload {
            *state = PipelineState::Idle;
        }
    }

    /// Close the coupon detail and clear the code.
    pub fn close_detail(&self) {
        let mut state = lock(&self.state);

        if matches!(*state, PipelineState::DetailShown(_)) {
            *state = PipelineState::Idle;
            lock(&self.code).clear();
        }
    }

    /// Dismiss a decode error.
    pub fn dismiss_error(&self) {
        let mut state = lock(&self.state);

        if matches!(*state, PipelineState::Error(_)) {
            *state = PipelineState::Idle;
        }
    }

    /// Tear down the screen: release the camera, clear the crop modal and go
    /// idle. An in-flight lookup still completes but its result is dropped.
    pub fn reset(&self) {
        self.leave_channel();
        self.set_state(PipelineState::Idle);
    }

    async fn lookup(
        &self,
        code: &str,
        guard: LoadingGuard<'_>,
    ) -> Result<SubmitOutcome, PipelineError> {
        self.leave_channel();
        self.set_state(PipelineState::Submitting);

        let result = self.ctx.lookup.find_coupon(code).await;

        drop(guard);

        {
            let state = lock(&self.state);

            if *state != PipelineState::Submitting {
                debug!(state = state.name(), "discarding stale lookup result");

                return Ok(SubmitOutcome::Discarded);
            }
        }

        let record = match result {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!(code, "coupon not found");
                self.set_state(PipelineState::EnteringCode);
                self.notify(
                    Notification::error("Coupon not found").with_description(code.to_uppercase()),
                );

                return Ok(SubmitOutcome::NotFound);
            }
            Err(error) => {
                warn!(code, error = %error, "coupon lookup failed");
                self.set_state(PipelineState::EnteringCode);
                self.notify(
                    Notification::error("Could not look up coupon")
                        .with_description(error.user_message()),
                );

                return Err(PipelineError::Lookup(error));
            }
        };

        match Coupon::try_from(record) {
            Ok(coupon) => {
                info!(code = %coupon.code, "coupon found");
                self.set_state(PipelineState::DetailShown(Detail::Coupon(coupon.clone())));
                self.notify(
                    Notification::success("Coupon found").with_description(coupon.display_code()),
                );

                Ok(SubmitOutcome::Shown(coupon))
            }
            Err(error) => {
                warn!(code, error = %error, "coupon record rejected");
                self.set_state(PipelineState::EnteringCode);
                self.notify(
                    Notification::error("Could not look up coupon")
                        .with_description(FALLBACK_MESSAGE),
                );

                Err(PipelineError::Mapping(error))
            }
        }
    }

    async fn accept_decoded(&self, text: &str) -> Result<AcquireOutcome, PipelineError> {
        let payload = DecodedPayload::parse(text).map_err(|error| self.fail_decode(error))?;

        lock(&self.code).clone_from(&payload.code);

        if payload.has_preview() {
            info!(code = %payload.code, "showing decoded coupon preview");
            self.set_state(PipelineState::DetailShown(Detail::Preview(payload.clone())));

            return Ok(AcquireOutcome::Preview(payload));
        }

        self.set_state(PipelineState::EnteringCode);

        self.submit().await.map(AcquireOutcome::Submitted)
    }

    fn fail_decode(&self, error: DecodeError) -> PipelineError {
        warn!(error = %error, "coupon decode failed");

        let message = error.user_message();

        self.set_state(PipelineState::Error(message.clone()));
        self.notify(Notification::error("Could not read coupon").with_description(message));

        PipelineError::Decode(error)
    }

    fn ensure_idle_loader(&self) -> Result<(), PipelineError> {
        if self.is_loading() {
            Err(PipelineError::LookupInFlight)
        } else {
            Ok(())
        }
    }

    fn ensure_state(&self, expected: &PipelineState) -> Result<(), PipelineError> {
        let state = lock(&self.state);

        if *state == *expected {
            Ok(())
        } else {
            Err(PipelineError::InvalidState(state.name()))
        }
    }

    fn set_state(&self, next: PipelineState) {
        let mut state = lock(&self.state);

        debug!(from = state.name(), to = next.name(), "pipeline transition");

        *state = next;
    }

    fn notify(&self, notification: Notification) {
        self.ctx.notifications.notify(notification);
    }

    fn leave_channel(&self) {
        self.release_camera();
        self.reset_crop();
    }

    fn release_camera(&self) {
        let stream = lock(&self.camera).take();

        if let Some(mut stream) = stream {
            stream.stop();
            debug!("camera released");
        }
    }

    fn reset_crop(&self) {
        *lock(&self.crop) = CropSession::default();
    }
}

impl Drop for RedemptionPipeline {
    fn drop(&mut self) {
        let camera = self.camera.get_mut().unwrap_or_else(PoisonError::into_inner);

        if let Some(mut stream) = camera.take() {
            stream.stop();
        }
    }
}

impl fmt::Debug for RedemptionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedemptionPipeline")
            .field("state", &self.state())
            .field("loading", &self.is_loading())
            .field("camera_active", &self.is_camera_active())
            .finish_non_exhaustive()
    }
}
