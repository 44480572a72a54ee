use async_trait::async_trait;

use crate::error::Result;
use crate::message::Message;

/// A push channel for one platform.
///
/// `Ok(false)` means the remote service refused the message; the reason is logged.
/// Messages the channel cannot carry at all fail with [`crate::Error::UnsupportedMessage`].
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send(&self, message: &Message) -> Result<bool>;
}
