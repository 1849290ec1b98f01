//! Core types and trait definitions for the IMEI bot.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends and the verification-service client implement the traits
//! defined here; the bot and the HTTP surface only talk to [`lookup::Lookup`].

pub mod checker;
pub mod error;
pub mod imei;
pub mod lookup;
pub mod record;
pub mod store;
pub mod user;

pub use error::{Error, Result};
pub use imei::Imei;
