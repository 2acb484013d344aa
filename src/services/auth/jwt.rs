use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::config::JwtAlgorithm;
use crate::services::auth::identity::{
    IdentityError, IdentityProvider, VerifiedIdentity, identity_from_claims,
};

/// Local ID-token verifier.
///
/// Checks signature, `exp`/`nbf` (with leeway), `iss`, `aud` and a non-empty
/// subject. Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtIdentityProvider")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtIdentityProvider {
    pub fn new(
        public_key_pem: &str,
        algorithm: JwtAlgorithm,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let pem = public_key_pem.as_bytes();
        let (decoding_key, alg) = match algorithm {
            JwtAlgorithm::Rs256 => (DecodingKey::from_rsa_pem(pem)?, Algorithm::RS256),
            JwtAlgorithm::Es256 => (DecodingKey::from_ec_pem(pem)?, Algorithm::ES256),
            JwtAlgorithm::EdDsa => (DecodingKey::from_ed_pem(pem)?, Algorithm::EdDSA),
        };

        let mut validation = Validation::new(alg);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    fn name(&self) -> &'static str {
        "jwt"
    }

    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let data = jsonwebtoken::decode::<serde_json::Value>(
            token,
            &self.decoding_key,
            &self.validation,
        )
        .map_err(|e| IdentityError::Rejected(e.to_string()))?;

        identity_from_claims(data.claims)
            .ok_or_else(|| IdentityError::Rejected("empty 'sub' claim".to_string()))
    }
}
