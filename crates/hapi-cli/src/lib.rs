/*
[INPUT]:  Public API exports for hapi-cli crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod commands;
pub mod config;
pub mod report;

// Re-export main types for convenience
pub use commands::{device_status, list_devices, ListOptions};
pub use config::CliConfig;
pub use report::DeviceFilter;
