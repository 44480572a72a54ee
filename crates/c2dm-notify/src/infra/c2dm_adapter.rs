use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use c2dm_sdk::{AndroidMessage, C2dmSender, Credentials, Message};

use crate::infra::Config;

pub fn build_sender(config: &Config) -> Result<C2dmSender> {
    let credentials = Credentials::new(
        config.require("C2DM_USERNAME")?,
        config.require("C2DM_PASSWORD")?,
        config.require("C2DM_SOURCE")?,
    );

    let mut sender = C2dmSender::new(credentials);

    if let Some(url) = config.optional("C2DM_LOGIN_URL") {
        sender = sender.with_login_url(url)?;
    }

    if let Some(url) = config.optional("C2DM_SEND_URL") {
        sender = sender.with_send_url(url)?;
    }

    if let Some(raw) = config.optional("C2DM_TIMEOUT_SECS") {
        let secs: u64 = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid C2DM_TIMEOUT_SECS '{raw}'"))?;
        sender = sender.with_timeout(Duration::from_secs(secs));
    }

    if config.flag("C2DM_INSECURE_TLS")? {
        sender = sender.danger_accept_invalid_certs()?;
    }

    Ok(sender)
}

pub fn build_message(config: &Config) -> Result<Message> {
    let mut message = AndroidMessage::new(config.require("C2DM_REGISTRATION_ID")?)
        .with_delay_while_idle(config.flag("C2DM_DELAY_WHILE_IDLE")?);

    if let Some(text) = config.optional("C2DM_MESSAGE") {
        message = message.with_message(text);
    }

    if let Some(raw) = config.optional("C2DM_DATA") {
        let data: BTreeMap<String, String> =
            serde_json::from_str(raw).context("C2DM_DATA must be a JSON object of strings")?;
        message = message.with_data(data);
    }

    if let Some(key) = config.optional("C2DM_COLLAPSE_KEY") {
        message = message.with_collapse_key(key);
    }

    Ok(message.into())
}
