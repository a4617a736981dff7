/*
[INPUT]:  Method path segments, keyword parameters, client credentials
[OUTPUT]: Signed hAPI query, dispatched and decoded into a Reply
[POS]:    HTTP layer - per-call request builder (method dispatch)
[UPDATE]: When changing method naming, parameter merging or dispatch flow
*/

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::debug;

use crate::http::decode::{decode_response, Reply};
use crate::http::signature::{format_timestamp, RequestSigner};
use crate::http::{Client, Credentials, HapiError, Result};
use crate::types::Tree;

/// Parameter carrying the dotted method name
const METHOD_PARAM: &str = "method";

/// One pending hAPI invocation.
///
/// Built fresh from [`Client::method`] or [`Client::call`] and consumed by
/// sending, so its method path is used exactly once.
#[derive(Debug)]
#[must_use = "a MethodCall does nothing until it is sent"]
pub struct MethodCall<'a> {
    client: &'a Client,
    segments: Vec<String>,
    params: BTreeMap<String, String>,
}

impl<'a> MethodCall<'a> {
    pub(crate) fn new(client: &'a Client, path: &str) -> Self {
        Self {
            client,
            segments: path
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
            params: BTreeMap::new(),
        }
    }

    /// Append one segment to the method path
    pub fn segment(mut self, name: impl Into<String>) -> Self {
        self.segments.push(name.into());
        self
    }

    /// Add a keyword parameter
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Add several keyword parameters
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        for (key, value) in params {
            self.params.insert(key.into(), value.to_string());
        }
        self
    }

    /// Method path joined with `.`
    pub fn path(&self) -> String {
        self.segments.join(".")
    }

    /// Effective `method` parameter after merging path and explicit parameter
    pub fn method_name(&self) -> Option<String> {
        let path = self.path();
        match self.params.get(METHOD_PARAM) {
            Some(explicit) if !path.is_empty() => Some(format!("{path}.{explicit}")),
            Some(explicit) => Some(explicit.clone()),
            None if !path.is_empty() => Some(path),
            None => None,
        }
    }

    /// Full parameter set as sent on the wire, `api_sig` included
    pub fn signed_params(
        &self,
        credentials: &Credentials,
        timestamp: &str,
    ) -> BTreeMap<String, String> {
        let mut params = self.params.clone();
        if let Some(method) = self.method_name() {
            params.insert(METHOD_PARAM.to_string(), method);
        }
        params.insert("key".to_string(), credentials.key.clone());
        params.insert("timestamp".to_string(), timestamp.to_string());

        let signature = RequestSigner::new(credentials.secret.as_str()).sign(&params);
        params.insert("api_sig".to_string(), signature);
        params
    }

    /// Sign, send and decode; honours the client's raw-output mode
    pub async fn send(self) -> Result<Reply> {
        let client = self.client;
        let body = self.dispatch().await?;
        if client.config().raw_output {
            return Ok(Reply::Raw(body));
        }
        decode_response(&body).map(Reply::Tree)
    }

    /// Sign, send and always decode into a tree
    pub async fn send_tree(self) -> Result<Tree> {
        let body = self.dispatch().await?;
        decode_response(&body)
    }

    async fn dispatch(self) -> Result<String> {
        let client = self.client;
        let credentials = client
            .credentials()
            .ok_or(HapiError::MissingCredentials)?;
        let params = self.signed_params(credentials, &format_timestamp(Utc::now()));

        debug!(
            method = params.get(METHOD_PARAM).map(String::as_str).unwrap_or_default(),
            endpoint = %client.endpoint(),
            param_count = params.len(),
            "dispatching hAPI call"
        );

        client
            .send_query(client.endpoint(), &params, client.config().compression, None)
            .await
    }
}
