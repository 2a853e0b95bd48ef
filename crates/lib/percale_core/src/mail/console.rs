//! Console mailer for development: prints the reset link instead of
//! delivering it.

use async_trait::async_trait;
use tracing::info;

use super::{MailResult, Mailer};

#[derive(Default)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> MailResult<()> {
        println!();
        println!("========================================");
        println!("  PASSWORD RESET FOR: {to}");
        println!("  {reset_url}");
        println!("========================================");
        println!();
        info!(email = %to, "password reset link printed to console");
        Ok(())
    }
}
