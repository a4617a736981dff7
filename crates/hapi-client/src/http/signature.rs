/*
[INPUT]:  Request parameters and shared API secret
[OUTPUT]: api_sig digest and hAPI-formatted timestamps
[POS]:    HTTP layer - request signing for every keyed call
[UPDATE]: When changing signing algorithm or timestamp format
*/

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};

/// Signs query parameters with the account's shared secret
#[derive(Clone)]
pub struct RequestSigner {
    secret: String,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner").finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Create a new request signer for the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign a parameter set according to the hAPI scheme
    ///
    /// Digest: md5(secret ++ k1 ++ v1 ++ k2 ++ v2 ...) over keys in
    /// lexicographic order, skipping empty values. Returns lowercase hex.
    pub fn sign(&self, params: &BTreeMap<String, String>) -> String {
        let mut hasher = Md5::new();
        hasher.update(self.secret.as_bytes());
        for (key, value) in params.iter().filter(|(_, v)| !v.is_empty()) {
            hasher.update(key.as_bytes());
            hasher.update(value.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Format a UTC instant the way hAPI expects: ISO-8601 with microseconds and `+0000`
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.6f+0000").to_string()
}
