use crate::configuration::{MailSettings, TransportSecurity};
use crate::errors::ConfigurationError;
use crate::mail::{Email, MailError, MailSender};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct SmtpMailer {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(from: Mailbox, transport: AsyncSmtpTransport<Tokio1Executor>) -> Self {
        Self { from, transport }
    }
}

impl TryFrom<&MailSettings> for SmtpMailer {
    type Error = ConfigurationError;

    fn try_from(settings: &MailSettings) -> Result<Self, Self::Error> {
        let security = settings.security()?;
        let builder = match security {
            TransportSecurity::Tls => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.server)?
            }
            TransportSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)?
            }
            TransportSecurity::Plain => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.server)
            }
        };
        let builder = builder.port(settings.port);
        let builder = match (&settings.username, &settings.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.to_owned(), password.to_owned()))
            }
            _ => builder,
        };
        info!(
            server = %settings.server,
            port = settings.port,
            %security,
            "configured smtp transport"
        );
        Ok(Self::new(settings.sender()?, builder.build()))
    }
}

impl MailSender for SmtpMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        if email.recipients.is_empty() {
            return Err(MailError::NoRecipients);
        }
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN);
        for recipient in email.recipients {
            builder = builder.to(recipient);
        }
        if let Some(reply_to) = email.reply_to {
            builder = builder.reply_to(reply_to.parse::<Mailbox>()?);
        }
        let message = builder.body(email.body)?;

        let response = self.transport.send(message).await?;
        if !response.is_positive() {
            return Err(MailError::Rejected(response.code().to_string()));
        }
        debug!(code = %response.code(), "smtp server accepted message");
        Ok(())
    }
}
