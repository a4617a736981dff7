/*
[INPUT]:  YAML configuration file and HAPI_* environment variables
[OUTPUT]: Parsed CLI configuration and a ready-to-use hAPI client
[POS]:    Configuration layer - endpoint and credential setup
[UPDATE]: When adding new configuration options
*/

use anyhow::{bail, Context, Result};
use hapi_client::{Client, ClientConfig, Credentials};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Top-level configuration for the reporting tools
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// hAPI endpoint; library default when absent
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request gzip/deflate responses
    #[serde(default = "default_compression")]
    pub compression: bool,
    /// API key (used together with `secret`)
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    /// Account login, exchanged for a key/secret when those are missing
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            compression: default_compression(),
            key: None,
            secret: None,
            username: None,
            password: None,
        }
    }
}

fn default_compression() -> bool {
    true
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content).context("parse config yaml")?;
        Ok(config)
    }

    /// Fill fields from `HAPI_ENDPOINT`, `HAPI_KEY`, `HAPI_SECRET`,
    /// `HAPI_USERNAME` and `HAPI_PASSWORD`; variables win over the file
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let slots = [
            ("HAPI_ENDPOINT", &mut self.endpoint),
            ("HAPI_KEY", &mut self.key),
            ("HAPI_SECRET", &mut self.secret),
            ("HAPI_USERNAME", &mut self.username),
            ("HAPI_PASSWORD", &mut self.password),
        ];
        for (name, slot) in slots {
            if let Some(value) = lookup(name).filter(|value| !value.is_empty()) {
                *slot = Some(value);
            }
        }
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            endpoint: self.endpoint.clone().unwrap_or(defaults.endpoint),
            compression: self.compression,
            ..ClientConfig::default()
        }
    }

    /// Build a client, performing the credential exchange when only a login is configured
    pub async fn connect(&self) -> Result<Client> {
        let client_config = self.client_config();

        if let (Some(key), Some(secret)) = (&self.key, &self.secret) {
            return Client::with_credentials(client_config, Credentials::new(key, secret))
                .context("create hAPI client");
        }

        let (Some(username), Some(password)) = (&self.username, &self.password) else {
            bail!("no credentials configured: set key/secret or username/password");
        };

        let mut client = Client::with_config(client_config).context("create hAPI client")?;
        client
            .authenticate(username, password)
            .await
            .context("exchange login for hAPI keys")?;
        info!(user = %username, "authenticated with login");
        Ok(client)
    }
}
