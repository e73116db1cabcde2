use crate::errors::ConfigurationError;
use axum_extra::extract::cookie::Key;
use config::{Config, FileFormat};
use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};
use serde_with::formats::CommaSeparator;
use serde_with::{serde_as, StringWithSeparator};
use std::env::var;
use std::fmt::{Display, Formatter};
use tracing::warn;

/// Minimum number of bytes accepted for `SESSION_SECRET`.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Environment variables that override file based settings.
const ENV_OVERRIDES: [(&str, &str); 9] = [
    ("mail.server", "MAIL_SERVER"),
    ("mail.port", "MAIL_PORT"),
    ("mail.use_tls", "MAIL_USE_TLS"),
    ("mail.use_ssl", "MAIL_USE_SSL"),
    ("mail.username", "MAIL_USERNAME"),
    ("mail.password", "MAIL_PASSWORD"),
    ("mail.default_sender", "MAIL_DEFAULT_SENDER"),
    ("mail.recipients", "CONTACT_RECIPIENTS"),
    ("session.secret", "SESSION_SECRET"),
];

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: Application,
    pub mail: MailSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Application {
    pub host: String,
    pub port: u16,
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MailSettings {
    pub server: String,
    pub port: u16,
    pub use_tls: bool,
    pub use_ssl: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub default_sender: Option<String>,
    #[serde_as(as = "Option<StringWithSeparator::<CommaSeparator, String>>")]
    pub recipients: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SessionSettings {
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TransportSecurity {
    /// Implicit TLS from the first byte.
    Tls,
    StartTls,
    Plain,
}

impl Display for TransportSecurity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportSecurity::Tls => write!(f, "tls"),
            TransportSecurity::StartTls => write!(f, "starttls"),
            TransportSecurity::Plain => write!(f, "plain"),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl MailSettings {
    pub fn security(&self) -> Result<TransportSecurity, ConfigurationError> {
        match (self.use_ssl, self.use_tls) {
            (true, true) => Err(ConfigurationError::ConflictingTransportSecurity),
            (true, false) => Ok(TransportSecurity::Tls),
            (false, true) => Ok(TransportSecurity::StartTls),
            (false, false) => Ok(TransportSecurity::Plain),
        }
    }

    /// The `From` address, falling back to the authentication username.
    pub fn sender(&self) -> Result<Mailbox, ConfigurationError> {
        let sender = non_empty(&self.default_sender)
            .or_else(|| non_empty(&self.username))
            .ok_or(ConfigurationError::MissingSender)?;
        parse_mailbox(sender)
    }

    /// Contact form recipients. An unset or empty list falls back to the
    /// authentication username.
    pub fn recipients(&self) -> Result<Vec<Mailbox>, ConfigurationError> {
        let configured = self
            .recipients
            .iter()
            .flatten()
            .map(|recipient| recipient.trim())
            .filter(|recipient| !recipient.is_empty())
            .collect::<Vec<_>>();
        if configured.is_empty() {
            let username = non_empty(&self.username).ok_or(ConfigurationError::MissingRecipients)?;
            return Ok(vec![parse_mailbox(username)?]);
        }
        configured.into_iter().map(parse_mailbox).collect()
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, ConfigurationError> {
    address
        .parse()
        .map_err(|_| ConfigurationError::InvalidAddress(address.to_string()))
}

impl SessionSettings {
    /// Key used to sign the flash cookie. Only `dev` may run without a
    /// configured secret, and then gets a random key per process.
    pub fn key(&self, environment: &Environment) -> Result<Key, ConfigurationError> {
        match (non_empty(&self.secret), environment) {
            (Some(secret), _) if secret.len() < MIN_SECRET_LENGTH => {
                Err(ConfigurationError::WeakSessionSecret(MIN_SECRET_LENGTH))
            }
            (Some(secret), _) => Ok(Key::derive_from(secret.as_bytes())),
            (None, Environment::Dev) => {
                warn!("SESSION_SECRET is not set, using a random key for this process");
                Ok(Key::generate())
            }
            (None, Environment::Prod) => Err(ConfigurationError::MissingSessionSecret),
        }
    }
}

/// The possible runtime environment for our application.
#[derive(Debug, Eq, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(format!(
                "{other} is not a supported environment. Use either `dev` or `prod`."
            )),
        }
    }
}

pub fn get_env() -> Result<Environment, ConfigurationError> {
    var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "dev".into())
        .try_into()
        .map_err(ConfigurationError::UnknownEnvironment)
}

pub fn get_configuration(environment: &Environment) -> Result<Settings, config::ConfigError> {
    let second_source = format!("configuration/{}", environment.as_str());
    let mut builder = Config::builder()
        .add_source(config::File::new("configuration/base", FileFormat::Yaml))
        .add_source(config::File::new(&second_source, FileFormat::Yaml));
    for (key, name) in ENV_OVERRIDES {
        builder = builder.set_override_option(key, var(name).ok())?;
    }
    builder.build()?.try_deserialize::<Settings>()
}
