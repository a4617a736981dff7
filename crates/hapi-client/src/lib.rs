/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public hAPI client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

//! Client for the hAPI infrastructure-management API.
//!
//! ```no_run
//! use hapi_client::{Client, ClientConfig, Credentials};
//!
//! # async fn run() -> hapi_client::Result<()> {
//! let client = Client::with_credentials(ClientConfig::default(), Credentials::new("KEY", "SECRET"))?;
//! let result = client.method("voxel.voxcloud.status").param("device_id", 12542).send_tree().await?;
//! println!("{}", result["devices"]["device"]["status"]);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{basic_authorization, secure_endpoint};

// Re-export commonly used types from http
pub use http::{
    Client,
    ClientConfig,
    Credentials,
    HapiError,
    MethodCall,
    Reply,
    RequestSigner,
    Result,
};

// Re-export all types
pub use types::*;
