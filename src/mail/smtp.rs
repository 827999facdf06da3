//! Authenticated SMTP delivery via lettre.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{Email, MailError, Mailer};
use crate::config::{MailCredentials, Settings};

/// SMTP mailer using STARTTLS submission (Gmail by default)
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    host: String,
    port: u16,
    credentials: MailCredentials,
}

impl SmtpMailer {
    pub fn new(settings: &Settings, credentials: MailCredentials) -> Self {
        Self {
            host: settings.smtp_host.clone(),
            port: settings.smtp_port,
            credentials,
        }
    }

    /// Build a multipart/alternative message addressed to every recipient
    pub fn build_message(&self, email: &Email) -> Result<Message, MailError> {
        let from = parse_mailbox(&self.credentials.address)?;

        let mut builder = Message::builder().from(from).subject(email.subject.as_str());
        for recipient in &self.credentials.recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| MailError::Build(e.to_string()))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let creds = Credentials::new(
            self.credentials.address.clone(),
            self.credentials.password.clone(),
        );

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
                .map_err(|e| MailError::Connect(e.to_string()))?
                .port(self.port)
                .credentials(creds)
                .build(),
        )
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::Address {
        address: address.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let message = self.build_message(email)?;
        let transport = self.transport()?;

        // Connect and authenticate in a separate session first. This logs in
        // twice per run, but a refused or unauthenticated session surfaces
        // as MailError::Connect rather than a send failure.
        match transport.test_connection().await {
            Ok(true) => {}
            Ok(false) => {
                return Err(MailError::Connect(format!(
                    "{}:{} did not accept the session",
                    self.host, self.port
                )))
            }
            Err(e) => return Err(MailError::Connect(e.to_string())),
        }
        tracing::debug!(host = %self.host, port = self.port, "SMTP session established");

        transport
            .send(message)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        tracing::info!(
            to = %self.credentials.recipients.join(", "),
            subject = %email.subject,
            "Email sent successfully"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer(recipients: &[&str]) -> SmtpMailer {
        SmtpMailer::new(
            &Settings::default(),
            MailCredentials {
                address: "bot@example.com".to_string(),
                password: "pw".to_string(),
                recipients: recipients.iter().map(|r| r.to_string()).collect(),
            },
        )
    }

    fn email() -> Email {
        Email {
            subject: "2024-05-10 – arXiv Digest".to_string(),
            text_body: "plain body".to_string(),
            html_body: "<p>html body</p>".to_string(),
        }
    }

    #[test]
    fn test_build_message_all_recipients() {
        let message = mailer(&["a@example.com", "b@example.com"])
            .build_message(&email())
            .unwrap();

        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 2);
        assert_eq!(
            envelope.from().map(|a| a.to_string()).as_deref(),
            Some("bot@example.com")
        );

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("plain body"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connect_error() {
        let settings = Settings {
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: 1,
            ..Settings::default()
        };
        let mailer = SmtpMailer::new(
            &settings,
            MailCredentials {
                address: "bot@example.com".to_string(),
                password: "pw".to_string(),
                recipients: vec!["a@example.com".to_string()],
            },
        );

        let err = mailer.send(&email()).await.unwrap_err();
        assert!(matches!(err, MailError::Connect(_)), "got {:?}", err);
    }

    #[test]
    fn test_build_message_bad_recipient() {
        let err = mailer(&["not-an-address"])
            .build_message(&email())
            .unwrap_err();
        assert!(matches!(err, MailError::Address { ref address, .. } if address == "not-an-address"));
    }
}
