use thiserror::Error;

const SUCCESS_PREFIX: &str = "id=";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryResponseError {
    /// `Error=<code>` style rejection, e.g. `InvalidRegistration`.
    #[error("c2dm rejected message: {0}")]
    Rejected(String),
    #[error("unrecognized c2dm response: {0}")]
    Unrecognized(String),
    #[error("empty c2dm response")]
    Empty,
}

impl DeliveryResponseError {
    /// The part of the body worth logging.
    pub fn detail(&self) -> &str {
        match self {
            DeliveryResponseError::Rejected(detail) => detail,
            DeliveryResponseError::Unrecognized(detail) => detail,
            DeliveryResponseError::Empty => "empty response body",
        }
    }
}

/// Parses the body of a C2DM send response, returning the message id on success.
pub fn parse_delivery_response(body: &str) -> Result<String, DeliveryResponseError> {
    let line = body.lines().next().map(str::trim_end).unwrap_or_default();

    if line.is_empty() {
        return Err(DeliveryResponseError::Empty);
    }

    if let Some(id) = line.strip_prefix(SUCCESS_PREFIX) {
        return Ok(id.to_string());
    }

    match line.split_once('=') {
        Some((_, value)) => Err(DeliveryResponseError::Rejected(value.trim().to_string())),
        None => Err(DeliveryResponseError::Unrecognized(line.to_string())),
    }
}
