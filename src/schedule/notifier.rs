//! Notification delivery.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::info;

use crate::config::EmailSettings;
use crate::error_handling::NotifyError;

/// Delivers a notification with a subject and an HTML body.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, html_body: &str) -> Result<(), NotifyError>;
}

/// SMTP email notifier.
///
/// When email is disabled in the settings, [`send`](Notifier::send) only
/// logs that it is skipping.
pub struct EmailNotifier {
    settings: EmailSettings,
}

impl EmailNotifier {
    pub fn new(settings: &EmailSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotifyError> {
        let settings = &self.settings;
        // `secure` selects implicit TLS (usually port 465); otherwise STARTTLS
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let mut builder = builder.port(settings.port);
        if let Some(user) = &settings.user {
            builder = builder.credentials(Credentials::new(
                user.clone(),
                settings.password.clone().unwrap_or_default(),
            ));
        }
        Ok(builder.build())
    }

    /// Builds the message without sending it.
    ///
    /// # Errors
    ///
    /// Returns an error for an unparsable address or when no recipient is
    /// configured.
    pub fn build_message(&self, subject: &str, html_body: &str) -> Result<Message, NotifyError> {
        if self.settings.to.is_empty() {
            return Err(NotifyError::NoRecipients);
        }
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.settings.from)?)
            .subject(subject)
            .header(ContentType::TEXT_HTML);
        for recipient in &self.settings.to {
            builder = builder.to(parse_mailbox(recipient)?);
        }
        builder
            .body(html_body.to_string())
            .map_err(|e| NotifyError::Message(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|e: lettre::address::AddressError| NotifyError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, subject: &str, html_body: &str) -> Result<(), NotifyError> {
        if !self.settings.enabled {
            info!("Email notifications disabled, skipping \"{subject}\"");
            return Ok(());
        }
        let message = self.build_message(subject, html_body)?;
        self.transport()?
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        info!("Notification sent: {subject}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EmailSettings {
        EmailSettings {
            enabled: true,
            from: "Link Checker <checker@example.com>".into(),
            to: vec!["ops@example.com".into()],
            ..EmailSettings::default()
        }
    }

    #[tokio::test]
    async fn test_disabled_notifier_skips() {
        let notifier = EmailNotifier::new(&EmailSettings::default());
        assert!(notifier.send("subject", "<p>body</p>").await.is_ok());
    }

    #[test]
    fn test_build_message() {
        let notifier = EmailNotifier::new(&settings());
        let message = notifier.build_message("Broken links", "<p>3</p>").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Broken links"));
        assert!(raw.contains("ops@example.com"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_bad_address_and_missing_recipients() {
        let mut bad = settings();
        bad.to = vec!["not an address".into()];
        let err = EmailNotifier::new(&bad).build_message("s", "b").unwrap_err();
        assert!(matches!(err, NotifyError::Address { .. }));

        let mut empty = settings();
        empty.to.clear();
        let err = EmailNotifier::new(&empty).build_message("s", "b").unwrap_err();
        assert!(matches!(err, NotifyError::NoRecipients));
    }
}
