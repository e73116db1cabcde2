use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("no recipients to deliver to")]
    NoRecipients,
    #[error("smtp server rejected the message with code {0}")]
    Rejected(String),
}
