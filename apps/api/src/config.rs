use anyhow::{Context, Result};

const DEFAULT_SENDER_PHONE: &str = "01036602129";

/// Deployment mode. Anything other than `production` keeps the OTP test bypass open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("production") || value.eq_ignore_ascii_case("prod") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Credentials for the Twilio Verify variant of phone verification.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub verify_service_sid: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    pub solapi_api_key: String,
    pub solapi_api_secret: String,
    pub sender_phone: String,
    pub twilio: Option<TwilioConfig>,
    pub openai_api_key: String,
    pub jwt_secret: String,
    pub environment: Environment,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            supabase_url: require_env("SUPABASE_URL")?,
            supabase_service_role_key: require_env("SUPABASE_SERVICE_ROLE_KEY")?,
            solapi_api_key: require_env("SOLAPI_API_KEY")?,
            solapi_api_secret: require_env("SOLAPI_API_SECRET")?,
            sender_phone: std::env::var("SENDER_PHONE")
                .unwrap_or_else(|_| DEFAULT_SENDER_PHONE.to_string()),
            twilio: twilio_from_env(),
            openai_api_key: require_env("OPENAI_API_KEY")?,
            jwt_secret: require_env("JWT_SECRET")?,
            environment: Environment::parse(
                &std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5004".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

#[cfg(test)]
impl Config {
    /// Development config with dummy credentials.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/jobmatch_test".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_service_role_key: "service-role".to_string(),
            solapi_api_key: "solapi-key".to_string(),
            solapi_api_secret: "solapi-secret".to_string(),
            sender_phone: DEFAULT_SENDER_PHONE.to_string(),
            twilio: None,
            openai_api_key: "sk-test".to_string(),
            jwt_secret: "test-secret".to_string(),
            environment: Environment::Development,
            port: 5004,
            rust_log: "info".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Twilio is optional: all three variables must be present for the variant to be enabled.
fn twilio_from_env() -> Option<TwilioConfig> {
    Some(TwilioConfig {
        account_sid: std::env::var("TWILIO_ACCOUNT_SID").ok()?,
        auth_token: std::env::var("TWILIO_AUTH_TOKEN").ok()?,
        verify_service_sid: std::env::var("TWILIO_VERIFY_SERVICE_SID").ok()?,
    })
}
