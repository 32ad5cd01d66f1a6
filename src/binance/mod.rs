//! Binance module - adapter for the Binance USD-M futures API

pub mod auth;
pub mod rest;

pub use rest::BinanceClient;
