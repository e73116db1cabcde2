use lettre::message::Mailbox;
use std::future::Future;

mod errors;
mod smtp;

pub use errors::MailError;
pub use smtp::SmtpMailer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipients: Vec<Mailbox>,
    pub subject: String,
    pub body: String,
    /// Raw address of the person who filled the form. Parsed by the sender.
    pub reply_to: Option<String>,
}

/// Outbound mail capability handed to the notification dispatcher.
pub trait MailSender: Send + Sync + 'static {
    fn send(&self, email: Email) -> impl Future<Output = Result<(), MailError>> + Send;
}
