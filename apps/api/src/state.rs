use std::sync::Arc;

use crate::auth::{AuthAdmin, SessionSigner};
use crate::config::Config;
use crate::llm_client::CompletionProvider;
use crate::messaging::SmsSender;
use crate::otp::twilio::PhoneVerifier;
use crate::otp::OtpService;
use crate::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every external collaborator sits behind a trait object so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub auth: Arc<dyn AuthAdmin>,
    pub sms: Arc<dyn SmsSender>,
    /// Twilio Verify. `None` when the TWILIO_* variables are absent.
    pub verifier: Option<Arc<dyn PhoneVerifier>>,
    pub llm: Arc<dyn CompletionProvider>,
    pub otp: OtpService,
    pub sessions: SessionSigner,
    pub config: Config,
}
