//! API server configuration.

use percale_core::auth::token::resolve_session_secret;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3100").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Session token signing secret.
    pub session_secret: String,
    /// Whether session cookies carry the `Secure` attribute. Disable for
    /// plain-HTTP local development only.
    pub cookie_secure: bool,
    /// Public origin of the storefront, used to build links in outbound
    /// mail (e.g. "https://percale.example").
    pub public_base_url: String,
    /// Session gate path rules.
    pub gate: GateConfig,
}

/// Path prefixes enforced by the session gate.
///
/// A prefix matches whole path segments: `/admin` covers `/admin` and
/// `/admin/orders` but not `/administrator`.
#[derive(Clone, Debug)]
pub struct GateConfig {
    /// Prefixes that require a valid session.
    pub protected_prefixes: Vec<String>,
    /// Prefixes that additionally require the ADMIN role.
    pub admin_prefixes: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec!["/admin".into(), "/profile".into(), "/orders".into()],
            admin_prefixes: vec!["/admin".into()],
        }
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable           | Default                                     |
    /// |--------------------|---------------------------------------------|
    /// | `BIND_ADDR`        | `127.0.0.1:3100`                            |
    /// | `DATABASE_URL`     | `postgres://localhost:5432/percale`         |
    /// | `SESSION_SECRET` / `AUTH_SECRET` | generated & persisted to file |
    /// | `COOKIE_SECURE`    | `true` (`false`/`0` to disable)             |
    /// | `PUBLIC_BASE_URL`  | `http://localhost:3000`                     |
    pub fn from_env() -> Self {
        let cookie_secure = !matches!(
            std::env::var("COOKIE_SECURE").as_deref(),
            Ok("false") | Ok("0")
        );
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3100".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/percale".into()),
            session_secret: resolve_session_secret(),
            cookie_secure,
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            gate: GateConfig::default(),
        }
    }
}
