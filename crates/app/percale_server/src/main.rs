//! Percale API server binary.
//!
//! Connects to Postgres, runs migrations, wires the production store,
//! mailer and identity verifier, and serves the account API.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use percale_core::auth::assertion::{
    DisabledVerifier, IdentityVerifier, JwtIdentityVerifier, ProviderConfig,
};
use percale_core::mail::{ConsoleMailer, Mailer, SmtpConfig, SmtpMailer};
use percale_core::store::postgres::PgUserStore;

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "percale_server", about = "Percale API server")]
struct Args {
    /// Address to bind the HTTP listener.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3100")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/percale"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,percale_api=debug,percale_core=debug".parse().unwrap()
            }),
        )
        .init();

    let args = Args::parse();
    info!(bind_addr = %args.bind_addr, "starting percale_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    percale_api::migrate(&pool).await?;

    let config = percale_api::config::ApiConfig {
        bind_addr: args.bind_addr,
        database_url: args.database_url,
        ..percale_api::config::ApiConfig::from_env()
    };

    let mailer: Arc<dyn Mailer> = match SmtpConfig::from_env() {
        Some(smtp) => Arc::new(SmtpMailer::new(smtp)?),
        None => {
            info!("SMTP not configured, printing reset mails to the console");
            Arc::new(ConsoleMailer::new())
        }
    };

    let verifier: Arc<dyn IdentityVerifier> = match ProviderConfig::from_env() {
        Some(provider) => Arc::new(JwtIdentityVerifier::new(provider)),
        None => {
            warn!("no identity provider configured, social login is disabled");
            Arc::new(DisabledVerifier)
        }
    };

    let state = percale_api::AppState {
        store: Arc::new(PgUserStore::new(pool)),
        mailer,
        verifier,
        config: config.clone(),
    };

    let app = percale_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
