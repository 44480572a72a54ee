use std::collections::HashMap;

const PREFIX: &str = "C2DM_";

/// `C2DM_`-prefixed environment variables, snapshotted at construction.
#[non_exhaustive]
pub struct Config {
    kv: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let kv = std::env::vars()
            .filter(|(k, _)| k.starts_with(PREFIX))
            .collect();

        Self { kv }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_map(kv: HashMap<String, String>) -> Self {
        Self { kv }
    }

    pub fn optional(&self, key: &str) -> Option<&str> {
        self.kv.get(key).map(|v| v.as_str())
    }

    pub fn require(&self, key: &str) -> anyhow::Result<&str> {
        self.optional(key)
            .ok_or_else(|| anyhow::anyhow!("required config key '{key}'"))
    }

    /// Boolean switch. Missing or empty means `false`.
    pub fn flag(&self, key: &str) -> anyhow::Result<bool> {
        match self.optional(key).map(str::trim) {
            None | Some("") => Ok(false),
            Some(v) if matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes") => Ok(true),
            Some(v) if matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no") => Ok(false),
            Some(v) => anyhow::bail!("config key '{key}' expects a boolean, got '{v}'"),
        }
    }
}
