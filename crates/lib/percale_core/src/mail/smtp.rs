//! SMTP mailer for production.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::{MailError, MailResult, Mailer};

/// SMTP connection settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    /// Typically 465 for TLS, 587 for STARTTLS.
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: Option<String>,
}

impl SmtpConfig {
    /// Read the SMTP settings from the environment.
    ///
    /// Requires `SMTP_HOST`, `SMTP_USERNAME`, `SMTP_PASSWORD` and
    /// `SMTP_FROM_EMAIL`; `SMTP_PORT` (default 465) and `SMTP_FROM_NAME`
    /// are optional. Returns `None` when any required variable is unset,
    /// in which case the server falls back to the console mailer.
    pub fn from_env() -> Option<Self> {
        fn get_env(key: &str) -> Option<String> {
            std::env::var(key).ok().filter(|s| !s.is_empty())
        }

        let host = get_env("SMTP_HOST")?;
        let username = get_env("SMTP_USERNAME")?;
        let password = get_env("SMTP_PASSWORD")?;
        let from_email = get_env("SMTP_FROM_EMAIL")?;

        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(465);
        let from_name = get_env("SMTP_FROM_NAME");

        Some(Self {
            host,
            port,
            username,
            password,
            from_email,
            from_name,
        })
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    from_name: Option<String>,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> MailResult<Self> {
        let creds = Credentials::new(config.username, config.password);
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(creds)
            .build();
        info!(host = %config.host, port = config.port, "smtp mailer configured");
        Ok(Self {
            transport,
            from_email: config.from_email,
            from_name: config.from_name,
        })
    }

    fn from_address(&self) -> String {
        match &self.from_name {
            Some(name) => format!("{} <{}>", name, self.from_email),
            None => self.from_email.clone(),
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> MailResult<()> {
        let from = self
            .from_address()
            .parse()
            .map_err(|e| MailError::Address(format!("from address: {e}")))?;
        let to_addr = to
            .parse()
            .map_err(|e| MailError::Address(format!("to address: {e}")))?;

        let body = format!(
            "We received a request to reset the password for your Percale account.\n\n\
             Reset your password:\n{reset_url}\n\n\
             This link expires in 1 hour. If you didn't request it, you can safely \
             ignore this email."
        );
        let message = Message::builder()
            .from(from)
            .to(to_addr)
            .subject("Reset your Percale password")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        info!(email = %to, "password reset email sent");
        Ok(())
    }
}
