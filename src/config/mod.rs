//! Configuration module - typed settings and file/environment loading

pub mod loader;
pub mod types;

pub use types::RelayConfig;
