use crate::configuration::{Environment, Settings};
use crate::errors::ConfigurationError;
use crate::mail::MailSender;
use crate::notification::Dispatcher;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use lettre::message::Mailbox;
use std::sync::Arc;

pub struct AppState<M> {
    pub dispatcher: Arc<Dispatcher<M>>,
    key: Key,
}

impl<M> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            key: self.key.clone(),
        }
    }
}

impl<M: MailSender> AppState<M> {
    pub fn new(mailer: M, recipients: Vec<Mailbox>, key: Key) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(mailer, recipients)),
            key,
        }
    }

    pub fn try_init(
        settings: &Settings,
        environment: &Environment,
        mailer: M,
    ) -> Result<Self, ConfigurationError> {
        let recipients = settings.mail.recipients()?;
        let key = settings.session.key(environment)?;
        Ok(Self::new(mailer, recipients, key))
    }
}

impl<M> FromRef<AppState<M>> for Key {
    fn from_ref(state: &AppState<M>) -> Self {
        state.key.clone()
    }
}
