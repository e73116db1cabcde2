use crate::data_models::{Category, Submission};
use crate::mail::{Email, MailSender};
use lettre::message::Mailbox;
use thiserror::Error;
use tracing::{error, info};

/// Generic outcome reported when a submission could not be forwarded. The
/// transport error itself only goes to the logs.
#[derive(Error, Debug, Clone, Copy, Eq, PartialEq)]
#[error("failed to forward the submission")]
pub struct SendFailure;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn compose(category: Category, submission: &Submission) -> Self {
        let subject = format!(
            "{} Purchase - {} (from {})",
            category.title(),
            submission.duration,
            submission.form_source
        );
        let body = format!(
            "New contact form submission:\n\
             \n\
             Form Source: {}\n\
             Duration: {}\n\
             Email: {}\n\
             Phone: {}\n\
             \n\
             Description:\n\
             {}\n\
             \n\
             ---\n\
             This message was sent via the contact form on your website.",
            submission.form_source,
            submission.duration,
            submission.email,
            submission.phone,
            submission.description,
        );
        Self { subject, body }
    }
}

#[derive(Debug)]
pub struct Dispatcher<M> {
    mailer: M,
    recipients: Vec<Mailbox>,
}

impl<M: MailSender> Dispatcher<M> {
    pub fn new(mailer: M, recipients: Vec<Mailbox>) -> Self {
        Self { mailer, recipients }
    }

    pub async fn notify(
        &self,
        category: Category,
        submission: &Submission,
    ) -> Result<(), SendFailure> {
        let message = NotificationMessage::compose(category, submission);
        let email = Email {
            recipients: self.recipients.clone(),
            subject: message.subject,
            body: message.body,
            reply_to: Some(submission.email.clone()),
        };

        match self.mailer.send(email).await {
            Ok(()) => {
                info!(
                    %category,
                    from = %submission.email,
                    "contact form email sent successfully"
                );
                Ok(())
            }
            Err(err) => {
                error!(%category, error = %err, "error sending contact form email");
                Err(SendFailure)
            }
        }
    }
}
