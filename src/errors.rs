use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read configuration: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("socket address parsing error: {0}")]
    SocketAddressParsingError(#[from] std::net::AddrParseError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("{0}")]
    UnknownEnvironment(String),
    #[error("no sender address, set MAIL_DEFAULT_SENDER or MAIL_USERNAME")]
    MissingSender,
    #[error("no contact recipients, set CONTACT_RECIPIENTS or MAIL_USERNAME")]
    MissingRecipients,
    #[error("not a valid mail address: {0}")]
    InvalidAddress(String),
    #[error("MAIL_USE_TLS and MAIL_USE_SSL can't both be enabled")]
    ConflictingTransportSecurity,
    #[error("failed to set up smtp transport: {0}")]
    SmtpTransport(#[from] lettre::transport::smtp::Error),
    #[error("SESSION_SECRET must be set in production")]
    MissingSessionSecret,
    #[error("SESSION_SECRET must be at least {0} bytes long")]
    WeakSessionSecret(usize),
}
