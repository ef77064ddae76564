//! Outbound mail collaborator
//!
//! Templating and delivery live outside this service. The realtime layer only
//! hands over a subject and body addressed to an identity, fire-and-forget.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct OutboundMail {
    /// Identity the mail is for; address lookup is the mailer's job
    pub to_identity: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutboundMail) -> anyhow::Result<()>;
}

/// Records outgoing mail in the log instead of delivering it
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutboundMail) -> anyhow::Result<()> {
        info!("[Mail] to={} subject={:?}", mail.to_identity, mail.subject);
        Ok(())
    }
}

/// Hand the mail to `mailer` on a background task. Failures are logged only.
pub fn dispatch(mailer: &Arc<dyn Mailer>, mail: OutboundMail) {
    let mailer = mailer.clone();
    tokio::spawn(async move {
        let to = mail.to_identity.clone();
        if let Err(e) = mailer.send(mail).await {
            warn!("[Mail] Delivery to {} failed: {}", to, e);
        }
    });
}
