/*
[INPUT]:  Response headers and raw (possibly compressed) bodies
[OUTPUT]: Inflated body text and status-checked response trees
[POS]:    HTTP layer - response decoding shared by signed and auth calls
[UPDATE]: When the stat/err envelope or supported encodings change
*/

use std::io::Read;

use flate2::read::{GzDecoder, ZlibDecoder};
use reqwest::header::{CONTENT_ENCODING, HeaderMap};
use tracing::{debug, warn};

use crate::http::{HapiError, Result};
use crate::types::{parse_document, Tree};

/// Outcome of a call: decoded tree, or the untouched body in raw-output mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Tree(Tree),
    Raw(String),
}

impl Reply {
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Reply::Tree(tree) => Some(tree),
            Reply::Raw(_) => None,
        }
    }

    pub fn into_tree(self) -> Option<Tree> {
        match self {
            Reply::Tree(tree) => Some(tree),
            Reply::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        match self {
            Reply::Raw(body) => Some(body),
            Reply::Tree(_) => None,
        }
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Tree(tree) => std::fmt::Display::fmt(tree, f),
            Reply::Raw(body) => f.write_str(body),
        }
    }
}

/// Undo `Content-Encoding: gzip` or `deflate`; other bodies pass through
pub(crate) fn inflate(headers: &HeaderMap, body: &[u8]) -> Result<String> {
    let encoding = headers
        .get(CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .map(str::trim);

    let mut inflated = Vec::new();
    match encoding {
        Some("gzip") => {
            GzDecoder::new(body).read_to_end(&mut inflated)?;
        }
        Some("deflate") => {
            ZlibDecoder::new(body).read_to_end(&mut inflated)?;
        }
        _ => return Ok(String::from_utf8_lossy(body).into_owned()),
    }

    debug!(
        compressed = body.len(),
        inflated = inflated.len(),
        "inflated response body"
    );
    Ok(String::from_utf8_lossy(&inflated).into_owned())
}

/// Parse an XML body and check its `stat` envelope
///
/// `stat="ok"` yields the decoded tree, `stat="fail"` the remote code and
/// message from the `err` element, anything else a protocol error.
pub fn decode_response(body: &str) -> Result<Tree> {
    let root = parse_document(body)?;

    match root.attribute("stat") {
        Some("ok") => Ok(Tree::from_xml(&root)),
        Some("fail") => {
            let err = root.find("err").ok_or_else(|| HapiError::protocol(body))?;
            let code = err.attribute("code").unwrap_or_default().to_string();
            let message = err.attribute("msg").unwrap_or_default().to_string();
            warn!(%code, %message, "hAPI reported failure");
            Err(HapiError::Remote { code, message })
        }
        _ => Err(HapiError::protocol(body)),
    }
}
