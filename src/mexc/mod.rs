//! MEXC module - adapter for the MEXC contract API

pub mod auth;
pub mod rest;

pub use rest::MexcClient;
