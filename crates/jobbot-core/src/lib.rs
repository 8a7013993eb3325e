//! Core domain + application logic for the job-post auto-reply bot.
//!
//! This crate is framework-agnostic. The Telegram user client and the Gemini
//! API live behind ports (traits) implemented in adapter crates.

pub mod bot;
pub mod classifier;
pub mod config;
pub mod cooldown;
pub mod dedup;
pub mod delivery;
pub mod domain;
pub mod errors;
pub mod generator;
pub mod logging;
pub mod ports;
pub mod processor;
pub mod proxy;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{Error, Result};
