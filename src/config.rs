/*
 * Responsibility
 * - 環境変数や設定の読み込み (CORS 許可、IdP 設定、下流サービスの URL など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderName;
use url::Url;

use crate::middleware::http::REQUEST_TIMEOUT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Signature algorithm of the identity provider's ID tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtAlgorithm {
    Rs256,
    Es256,
    EdDsa,
}

impl FromStr for JwtAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RS256" => Ok(Self::Rs256),
            "ES256" => Ok(Self::Es256),
            "EDDSA" => Ok(Self::EdDsa),
            _ => Err(ConfigError::Invalid("IDP_JWT_ALGORITHM")),
        }
    }
}

/// How bearer tokens are checked.
///
/// - `Jwt`: local signature + iss/aud/exp verification against a published key
/// - `Remote`: ask a verification endpoint (`{valid, claims}` contract)
#[derive(Debug, Clone)]
pub enum IdentityProviderConfig {
    Jwt {
        public_key_pem: String,
        algorithm: JwtAlgorithm,
        issuer: String,
        audience: String,
        leeway_seconds: u64,
    },
    Remote {
        verify_url: Url,
        timeout: Duration,
    },
}

/// Which request headers carry the caller's credential.
///
/// Behind an API gateway the original token usually arrives in
/// `X-Forwarded-Authorization`; direct callers use `Authorization`.
#[derive(Debug, Clone)]
pub struct CredentialHeaders {
    pub primary: HeaderName,
    pub fallback: Option<HeaderName>,
}

impl Default for CredentialHeaders {
    fn default() -> Self {
        Self {
            primary: axum::http::header::AUTHORIZATION,
            fallback: None,
        }
    }
}

pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub identity_provider: IdentityProviderConfig,
    pub credential_headers: CredentialHeaders,

    pub itinerary_service_url: Url,
    pub itinerary_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let identity_provider = identity_provider_from_env()?;
        let credential_headers = credential_headers_from_env()?;

        let itinerary_service_url = std::env::var("ITINERARY_SERVICE_URL")
            .map_err(|_| ConfigError::Missing("ITINERARY_SERVICE_URL"))
            .and_then(|v| Url::parse(&v).map_err(|_| ConfigError::Invalid("ITINERARY_SERVICE_URL")))?;

        let itinerary_timeout = outbound_timeout(
            "ITINERARY_TIMEOUT_SECONDS",
            std::env::var("ITINERARY_TIMEOUT_SECONDS").ok(),
            10,
        )?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            identity_provider,
            credential_headers,
            itinerary_service_url,
            itinerary_timeout,
        })
    }
}

fn identity_provider_from_env() -> Result<IdentityProviderConfig, ConfigError> {
    let mode = std::env::var("IDP_MODE").unwrap_or_else(|_| "jwt".to_string());

    match mode.to_ascii_lowercase().as_str() {
        "jwt" => {
            let public_key_pem = std::env::var("IDP_JWT_PUBLIC_KEY_PEM")
                .map_err(|_| ConfigError::Missing("IDP_JWT_PUBLIC_KEY_PEM"))?
                .replace("\\n", "\n");

            let algorithm = std::env::var("IDP_JWT_ALGORITHM")
                .unwrap_or_else(|_| "RS256".to_string())
                .parse::<JwtAlgorithm>()?;

            let issuer =
                std::env::var("IDP_ISSUER").map_err(|_| ConfigError::Missing("IDP_ISSUER"))?;

            let audience =
                std::env::var("IDP_AUDIENCE").map_err(|_| ConfigError::Missing("IDP_AUDIENCE"))?;

            let leeway_seconds = std::env::var("IDP_LEEWAY_SECONDS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);

            Ok(IdentityProviderConfig::Jwt {
                public_key_pem,
                algorithm,
                issuer,
                audience,
                leeway_seconds,
            })
        }
        "remote" => {
            let verify_url = std::env::var("IDP_VERIFY_URL")
                .map_err(|_| ConfigError::Missing("IDP_VERIFY_URL"))
                .and_then(|v| Url::parse(&v).map_err(|_| ConfigError::Invalid("IDP_VERIFY_URL")))?;

            let timeout = outbound_timeout(
                "IDP_TIMEOUT_SECONDS",
                std::env::var("IDP_TIMEOUT_SECONDS").ok(),
                5,
            )?;

            Ok(IdentityProviderConfig::Remote {
                verify_url,
                timeout,
            })
        }
        _ => Err(ConfigError::Invalid("IDP_MODE")),
    }
}

/// Timeout (seconds) for a call made while serving a request.
///
/// Must stay below the global request timeout, otherwise a hanging
/// downstream surfaces as 408 instead of the caller-facing error.
fn outbound_timeout(
    key: &'static str,
    raw: Option<String>,
    default_secs: u64,
) -> Result<Duration, ConfigError> {
    let timeout = match raw.as_deref().map(str::trim) {
        None | Some("") => Duration::from_secs(default_secs),
        Some(v) => Duration::from_secs(v.parse::<u64>().map_err(|_| ConfigError::Invalid(key))?),
    };

    if timeout.is_zero() || timeout >= REQUEST_TIMEOUT {
        return Err(ConfigError::Invalid(key));
    }

    Ok(timeout)
}

fn credential_headers_from_env() -> Result<CredentialHeaders, ConfigError> {
    let primary = match std::env::var("AUTH_PRIMARY_HEADER") {
        Ok(v) if !v.trim().is_empty() => HeaderName::from_str(v.trim())
            .map_err(|_| ConfigError::Invalid("AUTH_PRIMARY_HEADER"))?,
        _ => axum::http::header::AUTHORIZATION,
    };

    let fallback = match std::env::var("AUTH_FALLBACK_HEADER") {
        Ok(v) if !v.trim().is_empty() => Some(
            HeaderName::from_str(v.trim())
                .map_err(|_| ConfigError::Invalid("AUTH_FALLBACK_HEADER"))?,
        ),
        _ => None,
    };

    Ok(CredentialHeaders { primary, fallback })
}
