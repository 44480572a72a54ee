pub mod auth;
pub mod error;
pub mod message;
pub mod response;
pub mod sender;
pub mod service;

pub use auth::{AuthToken, Credentials};
pub use error::{Error, Result};
pub use message::{AndroidMessage, IosMessage, Message, MessageKind};
pub use sender::C2dmSender;
pub use service::NotificationService;
