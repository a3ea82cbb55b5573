use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use reelhub_config::MailSettings;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Message build error: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings, host: &str) -> Result<Self, MailError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(settings.port);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: settings.from.parse()?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = build_message(&self.from, &mail)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Used when no SMTP host is configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        info!(to = %mail.to, subject = %mail.subject, body = %mail.text, "Mail not sent (no SMTP host)");
        Ok(())
    }
}

pub fn from_settings(settings: &MailSettings) -> Result<Arc<dyn Mailer>, MailError> {
    match settings.host.as_deref().filter(|h| !h.is_empty()) {
        Some(host) => {
            info!(host, port = settings.port, "Using SMTP mailer");
            Ok(Arc::new(SmtpMailer::new(settings, host)?))
        }
        None => Ok(Arc::new(LogMailer)),
    }
}

/// Sends on a background task. Failures are logged and never reach the caller.
pub fn dispatch(mailer: Arc<dyn Mailer>, mail: OutgoingMail) {
    tokio::spawn(async move {
        let to = mail.to.clone();
        if let Err(e) = mailer.send(mail).await {
            warn!(%to, error = %e, "Failed to send mail");
        }
    });
}

fn build_message(from: &Mailbox, mail: &OutgoingMail) -> Result<Message, MailError> {
    let builder = Message::builder()
        .from(from.clone())
        .to(mail.to.parse()?)
        .subject(mail.subject.clone());

    let message = match &mail.html {
        Some(html) => {
            builder.multipart(MultiPart::alternative_plain_html(mail.text.clone(), html.clone()))?
        }
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(mail.text.clone())?,
    };
    Ok(message)
}
