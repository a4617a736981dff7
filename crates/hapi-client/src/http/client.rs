/*
[INPUT]:  Client configuration (endpoints, compression, output mode, credentials)
[OUTPUT]: Configured reqwest client issuing hAPI GET requests
[POS]:    HTTP layer - core client implementation and transport
[UPDATE]: When adding connection options or changing client behavior
*/

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use reqwest::header::{ACCEPT_ENCODING, AUTHORIZATION, HeaderMap, USER_AGENT};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::auth::secure_endpoint;
use crate::http::decode::inflate;
use crate::http::{MethodCall, Result};

/// Default hAPI endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.voxel.net/version/1.0";

/// Default client identifier sent as User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("hapi-client/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL for signed calls
    pub endpoint: String,
    /// Credential-exchange endpoint; defaults to the https form of `endpoint`
    pub auth_endpoint: Option<String>,
    /// Ask the server for gzip/deflate bodies
    pub compression: bool,
    /// Return raw response bodies instead of decoded trees
    pub raw_output: bool,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            auth_endpoint: None,
            compression: true,
            raw_output: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// API key and shared secret for signed requests
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Main HTTP client for hAPI
///
/// Calls are built per invocation through [`Client::method`], so a shared
/// `&Client` never mixes up method names between callers.
#[derive(Debug)]
pub struct Client {
    http_client: reqwest::Client,
    config: ClientConfig,
    endpoint: Url,
    credentials: Option<Credentials>,
    last_headers: RwLock<Option<HeaderMap>>,
}

impl Client {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder().build()?;
        let endpoint = Url::parse(&config.endpoint)?;

        Ok(Self {
            http_client,
            config,
            endpoint,
            credentials: None,
            last_headers: RwLock::new(None),
        })
    }

    /// Create a client that can sign calls right away
    pub fn with_credentials(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.set_credentials(credentials);
        Ok(client)
    }

    /// Set credentials for signed requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Get credentials if set
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Headers of the most recent response
    pub fn last_headers(&self) -> Option<HeaderMap> {
        self.last_headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Start a call for a dotted method name such as `voxel.devices.list`
    pub fn method(&self, path: &str) -> MethodCall<'_> {
        MethodCall::new(self, path)
    }

    /// Start a call with no method path; pass `method` as a parameter instead
    pub fn call(&self) -> MethodCall<'_> {
        MethodCall::new(self, "")
    }

    pub(crate) fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Endpoint used for the credential exchange
    pub(crate) fn auth_endpoint(&self) -> Result<Url> {
        let raw = match &self.config.auth_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => secure_endpoint(&self.config.endpoint)?,
        };
        Ok(Url::parse(&raw)?)
    }

    /// Issue a GET with url-encoded parameters and return the inflated body
    pub(crate) async fn send_query(
        &self,
        base: &Url,
        params: &BTreeMap<String, String>,
        compression: bool,
        authorization: Option<&str>,
    ) -> Result<String> {
        let mut url = base.clone();
        url.query_pairs_mut().extend_pairs(params.iter());

        let mut builder = self
            .http_client
            .get(url)
            .header(USER_AGENT, &self.config.user_agent);
        if compression {
            builder = builder.header(ACCEPT_ENCODING, "gzip,deflate");
        }
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }

        let response = builder.send().await?.error_for_status()?;
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let text = inflate(&headers, &body)?;
        *self
            .last_headers
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(headers);
        Ok(text)
    }
}
