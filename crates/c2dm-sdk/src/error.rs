use thiserror::Error;

use crate::message::MessageKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The message variant cannot travel over C2DM. Raised before any request is made.
    #[error("message type '{0}' not supported by C2DM")]
    UnsupportedMessage(MessageKind),

    #[error("c2dm request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    pub fn is_unsupported_message(&self) -> bool {
        matches!(self, Error::UnsupportedMessage(_))
    }
}
