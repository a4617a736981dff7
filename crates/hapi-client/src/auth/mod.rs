/*
[INPUT]:  Account username/password and the configured endpoint
[OUTPUT]: API key/secret for signed calls
[POS]:    Auth layer - handles hAPI credential bootstrapping
[UPDATE]: When auth flow or endpoint rules change
*/

pub mod exchange;

pub use exchange::{basic_authorization, secure_endpoint};
