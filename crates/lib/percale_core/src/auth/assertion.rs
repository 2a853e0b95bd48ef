//! Identity assertion verification for social login.
//!
//! A social login request carries a signed assertion from the identity
//! provider. The server never trusts a bare email: the assertion must
//! verify (signature, issuer, audience, expiry) before an account is
//! created or a session issued.

use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;

/// Claims extracted from a verified provider assertion.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

/// Verifies provider assertions. `None` means the assertion is not to be
/// trusted, for whatever reason.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, assertion: &str) -> Option<IdentityClaims>;
}

/// Static provider configuration for [`JwtIdentityVerifier`].
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

impl ProviderConfig {
    /// Read the provider config from the environment, if fully present.
    ///
    /// Reads `SOCIAL_PROVIDER_SECRET`, `SOCIAL_PROVIDER_ISSUER` and
    /// `SOCIAL_PROVIDER_AUDIENCE`; returns `None` unless all three are set
    /// and non-empty.
    pub fn from_env() -> Option<Self> {
        let secret = non_empty_env("SOCIAL_PROVIDER_SECRET")?;
        let issuer = non_empty_env("SOCIAL_PROVIDER_ISSUER")?;
        let audience = non_empty_env("SOCIAL_PROVIDER_AUDIENCE")?;
        Some(Self {
            secret,
            issuer,
            audience,
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Verifier for HS256-signed provider assertions with pinned issuer and
/// audience.
pub struct JwtIdentityVerifier {
    config: ProviderConfig,
}

impl JwtIdentityVerifier {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, assertion: &str) -> Option<IdentityClaims> {
        let key = DecodingKey::from_secret(self.config.secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        decode::<IdentityClaims>(assertion, &key, &validation)
            .ok()
            .map(|data| data.claims)
    }
}

/// Verifier used when no provider is configured: rejects everything.
pub struct DisabledVerifier;

#[async_trait]
impl IdentityVerifier for DisabledVerifier {
    async fn verify(&self, _assertion: &str) -> Option<IdentityClaims> {
        None
    }
}
