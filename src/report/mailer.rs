//! Dispatches report emails.
//!
//! Route handlers talk to a [Mailer] trait object, so tests can capture
//! outgoing mail instead of needing a real SMTP server.

use lettre::{
    Message, SmtpTransport, Transport,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::Error;

/// A file attached to a report email.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportAttachment {
    /// The file name shown to the recipient.
    pub filename: String,
    /// The raw bytes of the sheet.
    pub content: Vec<u8>,
}

/// An outgoing report email.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEmail {
    /// The recipient address.
    pub to: String,
    /// The subject line.
    pub subject: String,
    /// The HTML body.
    pub html_body: String,
    /// The report sheets, one per account.
    pub attachments: Vec<ReportAttachment>,
}

/// Sends report emails.
pub trait Mailer: Send + Sync {
    /// Send `email` to its recipient.
    ///
    /// # Errors
    ///
    /// Returns [Error::Delivery] if the email could not be handed off to the
    /// mail server.
    fn send(&self, email: ReportEmail) -> Result<(), Error>;
}

/// A [Mailer] that sends email through an SMTP relay.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a mailer that authenticates against `relay` and sends mail
    /// from the `from` address.
    ///
    /// # Errors
    ///
    /// Returns [Error::Delivery] if `relay` or `from` could not be parsed.
    pub fn new(
        relay: &str,
        username: String,
        password: String,
        from: &str,
    ) -> Result<Self, Error> {
        let transport = SmtpTransport::relay(relay)
            .map_err(|error| Error::Delivery(error.to_string()))?
            .credentials(Credentials::new(username, password))
            .build();

        let from = from
            .parse()
            .map_err(|_| Error::Delivery(format!("invalid sender address \"{from}\"")))?;

        Ok(Self { transport, from })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, email: ReportEmail) -> Result<(), Error> {
        let to = email
            .to
            .parse()
            .map_err(|_| Error::Delivery(format!("invalid recipient address \"{}\"", email.to)))?;

        let csv_content_type =
            ContentType::parse("text/csv").map_err(|error| Error::Delivery(error.to_string()))?;

        let mut parts = MultiPart::mixed().singlepart(SinglePart::html(email.html_body));

        for attachment in email.attachments {
            parts = parts.singlepart(
                Attachment::new(attachment.filename)
                    .body(attachment.content, csv_content_type.clone()),
            );
        }

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .multipart(parts)
            .map_err(|error| Error::Delivery(error.to_string()))?;

        self.transport
            .send(&message)
            .map_err(|error| Error::Delivery(error.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod smtp_mailer_tests {
    use crate::Error;

    use super::SmtpMailer;

    #[test]
    fn new_rejects_invalid_sender_address() {
        let result = SmtpMailer::new(
            "smtp.example.com",
            "user".to_owned(),
            "password".to_owned(),
            "not an address",
        );

        assert!(matches!(result, Err(Error::Delivery(_))));
    }

    #[test]
    fn new_accepts_valid_sender_address() {
        let result = SmtpMailer::new(
            "smtp.example.com",
            "user".to_owned(),
            "password".to_owned(),
            "reports@example.com",
        );

        assert!(result.is_ok());
    }
}
