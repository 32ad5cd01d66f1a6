//! Bybit module - adapter for the Bybit v5 API

pub mod auth;
pub mod rest;

pub use rest::BybitClient;
