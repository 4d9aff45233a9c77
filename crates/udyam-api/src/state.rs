//! # Application State
//!
//! Shared state passed to all Axum route handlers via the `State`
//! extractor. Everything behind it is either immutable after startup or
//! internally synchronized, so `AppState` is cheap to clone per request.

use std::sync::Arc;

use axum::http::HeaderValue;
use udyam_core::{FormValidator, Otp, SchemaError, StepProcessor, ValidationError};
use udyam_postal_client::LocationResolver;

use crate::middleware::metrics::ApiMetrics;
use crate::step_order::StepOrderRegistry;

/// Deployment environment. Selects the default CORS origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse an environment name. Anything other than `production` is
    /// development.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    /// The browser origin allowed by default in this environment.
    pub fn default_origin(&self) -> &'static str {
        match self {
            Self::Development => "http://localhost:3000",
            Self::Production => "https://udyam-registration-portal.vercel.app",
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Deployment environment.
    pub environment: Environment,
    /// The single origin CORS allows.
    pub allowed_origin: HeaderValue,
    /// OTP that step 1 accepts. Must be six digits.
    pub demo_otp: String,
    /// Require step 1 before step 2, keyed by submission id.
    pub enforce_step_order: bool,
    /// Mount `/metrics` and record request metrics.
    pub metrics_enabled: bool,
    /// Emit JSON logs.
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let environment = Environment::Development;
        Self {
            port: 5000,
            environment,
            allowed_origin: HeaderValue::from_static(environment.default_origin()),
            demo_otp: DEFAULT_DEMO_OTP.to_string(),
            enforce_step_order: false,
            metrics_enabled: true,
            log_json: false,
        }
    }
}

/// OTP accepted by step 1 unless `UDYAM_DEMO_OTP` says otherwise.
pub const DEFAULT_DEMO_OTP: &str = "123456";

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 5000)
    /// - `UDYAM_ENV`, falling back to `NODE_ENV` (default: development)
    /// - `UDYAM_ALLOWED_ORIGIN` (default: per environment)
    /// - `UDYAM_DEMO_OTP` (default: 123456)
    /// - `UDYAM_ENFORCE_STEP_ORDER` (default: false)
    /// - `UDYAM_METRICS_ENABLED` (default: true)
    /// - `UDYAM_LOG_FORMAT` (`json` or text, default: text)
    pub fn from_env() -> Result<Self, ConfigError> {
        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 5000,
        };

        let environment = std::env::var("UDYAM_ENV")
            .or_else(|_| std::env::var("NODE_ENV"))
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Development);

        let origin = std::env::var("UDYAM_ALLOWED_ORIGIN")
            .unwrap_or_else(|_| environment.default_origin().to_string());
        let allowed_origin =
            HeaderValue::from_str(&origin).map_err(|_| ConfigError::InvalidOrigin(origin))?;

        let demo_otp =
            std::env::var("UDYAM_DEMO_OTP").unwrap_or_else(|_| DEFAULT_DEMO_OTP.to_string());
        Otp::new(demo_otp.as_str())?;

        Ok(Self {
            port,
            environment,
            allowed_origin,
            demo_otp,
            enforce_step_order: env_flag("UDYAM_ENFORCE_STEP_ORDER", false),
            metrics_enabled: env_flag("UDYAM_METRICS_ENABLED", true),
            log_json: std::env::var("UDYAM_LOG_FORMAT")
                .map(|v| v.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}

/// Read a boolean flag. `true`/`1`/`yes` and `false`/`0`/`no` are
/// recognized; anything else keeps the default.
fn env_flag(var: &str, default: bool) -> bool {
    match std::env::var(var).map(|v| v.trim().to_ascii_lowercase()) {
        Ok(v) if matches!(v.as_str(), "true" | "1" | "yes") => true,
        Ok(v) if matches!(v.as_str(), "false" | "0" | "no") => false,
        _ => default,
    }
}

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),
    #[error("UDYAM_ALLOWED_ORIGIN is not a valid header value: {0:?}")]
    InvalidOrigin(String),
    #[error("UDYAM_DEMO_OTP: {0}")]
    InvalidDemoOtp(#[from] ValidationError),
}

/// Errors building [`AppState`].
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("form schema is unusable: {0}")]
    Schema(#[from] SchemaError),
    #[error("metrics registry: {0}")]
    Metrics(#[from] prometheus::Error),
    #[error("demo OTP: {0}")]
    DemoOtp(#[from] ValidationError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub processor: Arc<StepProcessor>,
    pub resolver: Arc<dyn LocationResolver>,
    /// Present only when step-order enforcement is on.
    pub step_order: Option<Arc<StepOrderRegistry>>,
    pub metrics: ApiMetrics,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("resolver", &self.resolver.resolver_name())
            .field("step_order", &self.step_order.is_some())
            .finish()
    }
}

impl AppState {
    /// Build state from configuration and a location resolver.
    ///
    /// # Errors
    ///
    /// Fails if the demo OTP is malformed, the built-in schema does not
    /// compile, or the metrics registry rejects a metric.
    pub fn new(config: AppConfig, resolver: Arc<dyn LocationResolver>) -> Result<Self, StateError> {
        let demo_otp = Otp::new(config.demo_otp.as_str())?;
        let processor = StepProcessor::new(FormValidator::udyam()?, demo_otp);
        let step_order = config
            .enforce_step_order
            .then(|| Arc::new(StepOrderRegistry::default()));

        Ok(Self {
            config: Arc::new(config),
            processor: Arc::new(processor),
            resolver,
            step_order,
            metrics: ApiMetrics::new()?,
        })
    }
}
