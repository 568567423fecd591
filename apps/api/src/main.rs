mod auth;
mod config;
mod db;
mod errors;
mod generation;
mod keywords;
mod llm_client;
mod messaging;
mod models;
mod otp;
mod request;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::{SessionSigner, SupabaseAuthAdmin};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::messaging::SolapiClient;
use crate::otp::twilio::{PhoneVerifier, TwilioVerifyClient};
use crate::otp::{InMemoryOtpStore, OtpService, SystemClock};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgProfileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing required env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting jobmatch API v{} ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgProfileStore::new(db));

    // Initialize auth admin client
    let auth = Arc::new(SupabaseAuthAdmin::new(
        &config.supabase_url,
        config.supabase_service_role_key.clone(),
    )?);
    info!("Auth admin client initialized");

    // Initialize SMS client
    let sms = Arc::new(SolapiClient::new(
        config.solapi_api_key.clone(),
        config.solapi_api_secret.clone(),
    )?);
    info!("SMS client initialized (sender: {})", config.sender_phone);

    // Twilio Verify is optional
    let verifier: Option<Arc<dyn PhoneVerifier>> = match &config.twilio {
        Some(twilio) => {
            info!("Twilio Verify client initialized");
            Some(Arc::new(TwilioVerifyClient::new(twilio)?))
        }
        None => {
            warn!("TWILIO_* variables not set; /send-verification and /verify-code will fail");
            None
        }
    };

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(config.openai_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    if !config.environment.is_production() {
        warn!(
            "OTP bypass enabled for test numbers {:?}",
            otp::TEST_PHONE_NUMBERS
        );
    }

    // Build app state
    let state = AppState {
        store,
        auth,
        sms,
        verifier,
        llm,
        otp: OtpService::new(Arc::new(InMemoryOtpStore::default()), Arc::new(SystemClock)),
        sessions: SessionSigner::new(&config.jwt_secret),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
