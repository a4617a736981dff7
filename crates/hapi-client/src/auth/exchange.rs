/*
[INPUT]:  Username/password (or username/email) and the client endpoint
[OUTPUT]: API key/secret stored on the client, password reset replies
[POS]:    Auth layer - one-time credential exchange over the secure endpoint
[UPDATE]: When auth endpoints, methods or the Basic header format change
*/

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::{debug, info};

use crate::http::{decode_response, Client, Credentials, HapiError, Result};
use crate::types::Tree;

const AUTHKEYS_METHOD: &str = "voxel.hapi.authkeys.read";
const RESET_PASSWORD_METHOD: &str = "voxel.hapi.users.reset_password";

/// https form of an endpoint, whatever scheme it was given with
pub fn secure_endpoint(endpoint: &str) -> Result<String> {
    if endpoint.len() < 7 {
        return Err(HapiError::Config(format!(
            "endpoint too short, should be something like https://api.voxel.net: {endpoint:?}"
        )));
    }
    let host_and_path = endpoint
        .strip_prefix("http://")
        .or_else(|| endpoint.strip_prefix("https://"))
        .unwrap_or(endpoint);
    Ok(format!("https://{host_and_path}"))
}

/// `Authorization` header value for HTTP Basic auth
pub fn basic_authorization(user: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{user}:{password}")))
}

fn unsigned_params(method: &str, extra: &[(&str, &str)]) -> BTreeMap<String, String> {
    let mut params = BTreeMap::from([
        ("method".to_string(), method.to_string()),
        ("format".to_string(), "xml".to_string()),
    ]);
    for (key, value) in extra {
        params.insert(key.to_string(), value.to_string());
    }
    params
}

impl Client {
    /// Exchange a username and password for an API key/secret
    ///
    /// GET {auth_endpoint}?method=voxel.hapi.authkeys.read&format=xml
    /// Requires: HTTP Basic authorization; sent unsigned and uncompressed.
    /// On success the returned key/secret sign every later call.
    pub async fn authenticate(&mut self, user: &str, password: &str) -> Result<Tree> {
        let endpoint = self.auth_endpoint()?;
        let params = unsigned_params(AUTHKEYS_METHOD, &[]);
        let authorization = basic_authorization(user, password);

        debug!(%endpoint, user, "requesting hAPI auth keys");
        let body = self
            .send_query(&endpoint, &params, false, Some(&authorization))
            .await?;
        let result = decode_response(&body)?;

        let authkey = &result["authkey"];
        let (key, secret) = (authkey["key"].text(), authkey["secret"].text());
        if key.is_empty() || secret.is_empty() {
            return Err(HapiError::protocol(body));
        }

        self.set_credentials(Credentials::new(key, secret));
        info!(user, "hAPI credentials obtained");
        Ok(result)
    }

    /// Ask the remote side to reset a user's password
    ///
    /// GET {auth_endpoint}?method=voxel.hapi.users.reset_password&format=xml&username=..&email=..
    pub async fn reset_password(&self, user: &str, email: &str) -> Result<Tree> {
        let endpoint = self.auth_endpoint()?;
        let params = unsigned_params(RESET_PASSWORD_METHOD, &[("username", user), ("email", email)]);

        debug!(%endpoint, user, "requesting hAPI password reset");
        let body = self.send_query(&endpoint, &params, false, None).await?;
        decode_response(&body)
    }
}
