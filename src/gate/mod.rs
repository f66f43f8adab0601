//! Email-gated resume delivery.
//!
//! `ResumeGate` owns the request session and walks it through
//! `Idle -> AwaitingCode -> Verifying -> Revealed`. Gateway calls run with
//! the session lock released; while one is pending every submission is
//! refused with `GateError::Busy`. Closing the gate bumps an epoch so the
//! result of any call started before the close is discarded.
//!
//! A download link is only requested after the passcode has been verified
//! for the session's email, and the provider session is ended exactly once
//! after every successful verification, whether or not the link could be
//! issued and opened.

pub mod opener;

pub use self::opener::{CommandOpener, ConsoleOpener, LinkOpener, RecordingOpener};

use crate::{
    error::{GateError, GatewayError},
    gateway::{AuthSession, Email, IdentityGateway, Passcode},
};
use async_trait::async_trait;
use chrono::Utc;
use std::{
    fmt,
    future::Future,
    sync::{Arc, Mutex as StdMutex, PoisonError},
    time::Duration,
};
use tokio::{sync::Mutex, task::JoinSet, time::timeout};
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_RESUME_OBJECT: &str = "Resume-JonathanPham.pdf";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Idle,
    AwaitingCode,
    Verifying,
    Revealed,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::AwaitingCode => "awaiting a code",
            Self::Verifying => "verifying",
            Self::Revealed => "revealed",
        };
        f.write_str(label)
    }
}

/// UI-facing state of one resume request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GateSession {
    email: String,
    state: GateState,
    last_error: Option<GateError>,
    visible: bool,
    pending: bool,
}

impl GateSession {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&GateError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// True while a gateway call is in flight; submit controls stay disabled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Text for the status line under the form.
    #[must_use]
    pub fn status_message(&self) -> Option<String> {
        if let Some(err) = &self.last_error {
            return Some(err.to_string());
        }

        match (self.state, self.pending) {
            (GateState::Idle, true) => Some("Sending code...".to_string()),
            (GateState::Verifying, _) => Some("Verifying...".to_string()),
            (GateState::AwaitingCode, _) => {
                Some(format!("We sent a 6-digit code to {}.", self.email))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GateConfig {
    object_id: String,
    link_ttl_seconds: u64,
    request_timeout: Duration,
}

impl GateConfig {
    /// Defaults: the resume object, a 60s link TTL and a 10s request timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            object_id: DEFAULT_RESUME_OBJECT.to_string(),
            link_ttl_seconds: 60,
            request_timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_object_id(mut self, object_id: impl Into<String>) -> Self {
        self.object_id = object_id.into();
        self
    }

    #[must_use]
    pub fn with_link_ttl_seconds(mut self, seconds: u64) -> Self {
        self.link_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    #[must_use]
    pub fn normalize(self) -> Self {
        let request_timeout = if self.request_timeout.is_zero() {
            Duration::from_secs(1)
        } else {
            self.request_timeout
        };
        Self {
            object_id: self.object_id,
            link_ttl_seconds: self.link_ttl_seconds.max(1),
            request_timeout,
        }
    }

    #[must_use]
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    #[must_use]
    pub fn link_ttl_seconds(&self) -> u64 {
        self.link_ttl_seconds
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort notification that a resume was revealed. Runs in the
/// background; see `ResumeGate::flush_tracking`.
#[async_trait]
pub trait ResumeTracker: Send + Sync {
    async fn resume_viewed(&self, email: &Email) -> anyhow::Result<()>;
}

struct Inner {
    session: GateSession,
    epoch: u64,
}

pub struct ResumeGate {
    gateway: Arc<dyn IdentityGateway>,
    opener: Arc<dyn LinkOpener>,
    tracker: Option<Arc<dyn ResumeTracker>>,
    config: GateConfig,
    inner: Mutex<Inner>,
    tracking: StdMutex<JoinSet<()>>,
}

impl ResumeGate {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn IdentityGateway>,
        opener: Arc<dyn LinkOpener>,
        config: GateConfig,
    ) -> Self {
        Self {
            gateway,
            opener,
            tracker: None,
            config: config.normalize(),
            inner: Mutex::new(Inner {
                session: GateSession::default(),
                epoch: 0,
            }),
            tracking: StdMutex::new(JoinSet::new()),
        }
    }

    #[must_use]
    pub fn with_tracker(mut self, tracker: Arc<dyn ResumeTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Snapshot of the current session.
    pub async fn session(&self) -> GateSession {
        self.inner.lock().await.session.clone()
    }

    /// Shows the request form. Does not touch any other session state.
    pub async fn open(&self) {
        self.inner.lock().await.session.visible = true;
    }

    /// Hides the form and resets the session; pending results are dropped.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        inner.session = GateSession::default();
        inner.epoch = inner.epoch.wrapping_add(1);
    }

    /// Requests a passcode for `input`.
    ///
    /// # Errors
    /// Validation errors never reach the gateway. Gateway failures leave the
    /// session idle with the provider message as `last_error`.
    #[instrument(skip_all)]
    pub async fn submit_email(&self, input: &str) -> Result<GateState, GateError> {
        let (email, epoch) = {
            let mut guard = self.inner.lock().await;
            let Inner { session, epoch } = &mut *guard;

            if session.pending {
                return Err(GateError::Busy);
            }
            if session.state != GateState::Idle {
                return Err(GateError::OutOfOrder(session.state));
            }

            let email = match Email::parse(input) {
                Ok(email) => email,
                Err(err) => {
                    session.last_error = Some(err.into());
                    return Err(err.into());
                }
            };

            session.email = email.to_string();
            session.last_error = None;
            session.pending = true;

            (email, *epoch)
        };

        let result = self.timed(self.gateway.request_passcode(&email)).await;

        let mut guard = self.inner.lock().await;
        let Inner {
            session,
            epoch: current,
        } = &mut *guard;
        if *current != epoch {
            debug!("discarding passcode response for a closed gate");
            return Err(GateError::Abandoned);
        }

        session.pending = false;
        match result {
            Ok(()) => {
                info!("passcode requested");
                session.state = GateState::AwaitingCode;
                Ok(GateState::AwaitingCode)
            }
            Err(err) => {
                warn!("passcode request failed: {err}");
                session.email.clear();
                session.last_error = Some(err.clone().into());
                Err(err.into())
            }
        }
    }

    /// Verifies `input` and, on success, opens the resume link.
    ///
    /// Returns `GateState::Revealed` once the link has been opened; the
    /// session is reset to its initial state at that point.
    ///
    /// # Errors
    /// Malformed codes never reach the gateway. A rejected code keeps the
    /// email so the user can try again. Link failures after a successful
    /// verification also land back in `AwaitingCode`.
    #[instrument(skip_all)]
    pub async fn submit_code(&self, input: &str) -> Result<GateState, GateError> {
        let (email, code, epoch) = {
            let mut guard = self.inner.lock().await;
            let Inner { session, epoch } = &mut *guard;

            if session.pending {
                return Err(GateError::Busy);
            }
            if session.state != GateState::AwaitingCode {
                return Err(GateError::OutOfOrder(session.state));
            }

            let code = match Passcode::parse(input) {
                Ok(code) => code,
                Err(err) => {
                    session.last_error = Some(err.into());
                    return Err(err.into());
                }
            };
            let email = Email::parse(&session.email)?;

            session.state = GateState::Verifying;
            session.last_error = None;
            session.pending = true;

            (email, code, *epoch)
        };

        let auth = match self.timed(self.gateway.verify_passcode(&email, &code)).await {
            Ok(auth) => auth,
            Err(err) => {
                warn!("passcode verification failed: {err}");
                return self.back_to_code_entry(epoch, err.into()).await;
            }
        };

        if self.is_abandoned(epoch).await {
            debug!("gate closed during verification");
            self.end_session(auth).await;
            return Err(GateError::Abandoned);
        }

        let issued = self
            .timed(self.gateway.issue_download_link(
                &auth,
                &self.config.object_id,
                self.config.link_ttl_seconds,
            ))
            .await;

        let opened = match issued {
            Ok(link) if link.is_expired(Utc::now()) => Err(GateError::LinkExpired),
            Ok(link) => {
                if self.is_abandoned(epoch).await {
                    debug!("gate closed before the link was opened");
                    self.end_session(auth).await;
                    return Err(GateError::Abandoned);
                }
                self.opener
                    .open(link)
                    .await
                    .map_err(|e| GateError::OpenFailed(e.to_string()))
            }
            Err(err) => Err(GateError::LinkUnavailable(err)),
        };

        self.end_session(auth).await;

        match opened {
            Ok(()) => {
                info!("resume revealed");
                self.track(email);

                let mut guard = self.inner.lock().await;
                if guard.epoch == epoch {
                    guard.session = GateSession::default();
                }
                Ok(GateState::Revealed)
            }
            Err(err) => {
                warn!("{err}");
                self.back_to_code_entry(epoch, err).await
            }
        }
    }

    async fn back_to_code_entry(&self, epoch: u64, err: GateError) -> Result<GateState, GateError> {
        let mut guard = self.inner.lock().await;
        if guard.epoch != epoch {
            return Err(GateError::Abandoned);
        }

        let session = &mut guard.session;
        session.state = GateState::AwaitingCode;
        session.pending = false;
        session.last_error = Some(err.clone());

        Err(err)
    }

    async fn is_abandoned(&self, epoch: u64) -> bool {
        self.inner.lock().await.epoch != epoch
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        timeout(self.config.request_timeout, call)
            .await
            .unwrap_or(Err(GatewayError::Timeout))
    }

    async fn end_session(&self, auth: AuthSession) {
        if let Err(err) = self.timed(self.gateway.end_session(auth)).await {
            warn!("failed to end provider session: {err}");
        }
    }

    fn track(&self, email: Email) {
        let Some(tracker) = self.tracker.clone() else {
            return;
        };

        self.tracking
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .spawn(async move {
                if let Err(err) = tracker.resume_viewed(&email).await {
                    warn!("Resume tracking failed: {err}");
                }
            });
    }

    /// Waits up to `grace` for background tracking to finish; whatever is
    /// still running afterwards is aborted. Call before the runtime shuts
    /// down so reveals are not silently dropped.
    pub async fn flush_tracking(&self, grace: Duration) {
        let mut pending = std::mem::take(
            &mut *self
                .tracking
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if pending.is_empty() {
            return;
        }

        let drained = timeout(grace, async {
            while pending.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            warn!(
                "abandoning {} resume tracking task(s) after {grace:?}",
                pending.len()
            );
        }
    }
}
