/// Factory: build the `IdentityProvider` from application `Config`.
use std::sync::Arc;

use crate::config::{Config, IdentityProviderConfig};
use crate::error::AppError;
use crate::services::auth::{IdentityProvider, JwtIdentityProvider, RemoteIdentityProvider};

pub fn build_identity_provider(config: &Config) -> Result<Arc<dyn IdentityProvider>, AppError> {
    let provider: Arc<dyn IdentityProvider> = match &config.identity_provider {
        IdentityProviderConfig::Jwt {
            public_key_pem,
            algorithm,
            issuer,
            audience,
            leeway_seconds,
        } => {
            let jwt = JwtIdentityProvider::new(
                public_key_pem,
                *algorithm,
                issuer,
                audience,
                *leeway_seconds,
            )
            .map_err(|err| {
                tracing::error!(error = %err, "invalid identity provider public key");
                AppError::Internal
            })?;
            Arc::new(jwt)
        }
        IdentityProviderConfig::Remote {
            verify_url,
            timeout,
        } => {
            let remote = RemoteIdentityProvider::new(verify_url.clone(), *timeout).map_err(|err| {
                tracing::error!(error = %err, "failed to build identity provider client");
                AppError::Internal
            })?;
            Arc::new(remote)
        }
    };

    tracing::info!(provider = provider.name(), "identity provider configured");
    Ok(provider)
}
