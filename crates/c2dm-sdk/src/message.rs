use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// C2DM rejects requests without a collapse key.
pub const DEFAULT_COLLAPSE_KEY: &str = "1";

const MESSAGE_FIELD: &str = "message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Android,
    Ios,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Android => f.write_str("android"),
            MessageKind::Ios => f.write_str("ios"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum Message {
    Android(AndroidMessage),
    Ios(IosMessage),
}

impl Message {
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Android(_) => MessageKind::Android,
            Message::Ios(_) => MessageKind::Ios,
        }
    }

    #[must_use]
    pub fn as_android(&self) -> Option<&AndroidMessage> {
        match self {
            Message::Android(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<AndroidMessage> for Message {
    fn from(msg: AndroidMessage) -> Self {
        Message::Android(msg)
    }
}

impl From<IosMessage> for Message {
    fn from(msg: IosMessage) -> Self {
        Message::Ios(msg)
    }
}

/// A message addressed to one Android device registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AndroidMessage {
    pub registration_id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub collapse_key: Option<String>,
    #[serde(default)]
    pub delay_while_idle: bool,
}

impl AndroidMessage {
    #[must_use]
    pub fn new(registration_id: impl Into<String>) -> Self {
        Self {
            registration_id: registration_id.into(),
            message: None,
            data: BTreeMap::new(),
            collapse_key: None,
            delay_while_idle: false,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: BTreeMap<String, String>) -> Self {
        self.data = data;
        self
    }

    pub fn insert_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with_collapse_key(mut self, key: impl Into<String>) -> Self {
        self.collapse_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_delay_while_idle(mut self, delay: bool) -> Self {
        self.delay_while_idle = delay;
        self
    }

    /// Form fields posted to the C2DM send endpoint.
    ///
    /// Custom data goes out as `data.<key>`. When `message` is set it is sent
    /// as `data.message` and takes precedence over a data entry of that name.
    #[must_use]
    pub fn message_body(&self) -> Vec<(String, String)> {
        let mut body = Vec::with_capacity(self.data.len() + 4);

        body.push(("registration_id".to_string(), self.registration_id.clone()));
        body.push((
            "collapse_key".to_string(),
            self.collapse_key
                .clone()
                .unwrap_or_else(|| DEFAULT_COLLAPSE_KEY.to_string()),
        ));

        if let Some(ref message) = self.message {
            body.push((format!("data.{MESSAGE_FIELD}"), message.clone()));
        }

        for (key, value) in &self.data {
            if self.message.is_some() && key == MESSAGE_FIELD {
                continue;
            }
            body.push((format!("data.{key}"), value.clone()));
        }

        if self.delay_while_idle {
            body.push(("delay_while_idle".to_string(), "1".to_string()));
        }

        body
    }
}

/// An APNs-bound message. C2DM cannot deliver it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IosMessage {
    pub device_token: String,
    #[serde(default)]
    pub alert: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl IosMessage {
    #[must_use]
    pub fn new(device_token: impl Into<String>) -> Self {
        Self {
            device_token: device_token.into(),
            alert: None,
            data: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_alert(mut self, alert: impl Into<String>) -> Self {
        self.alert = Some(alert.into());
        self
    }
}
