/*
[INPUT]:  HTTP client configuration, method paths and parameters
[OUTPUT]: Signed hAPI requests and decoded replies
[POS]:    HTTP layer - hAPI request/response plumbing
[UPDATE]: When adding new call helpers or changing client behavior
*/

pub mod call;
pub mod client;
pub mod decode;
pub mod devices;
pub mod error;
pub mod signature;

pub use error::{HapiError, Result};
pub use signature::RequestSigner;

pub use call::MethodCall;
pub use client::{Client, ClientConfig, Credentials, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
pub use decode::{decode_response, Reply};
pub use devices::{find_device_id, label_matches};
