//! Telegram side of the IMEI bot, on top of [`teloxide`].
//!
//! Incoming [`Update`]s arrive through the server's webhook and go to the
//! [`Dispatcher`]; replies leave through a [`Messenger`], which is
//! implemented for [`teloxide::Bot`].

pub mod api;
pub mod dispatcher;
pub mod error;
pub mod format;

pub use api::Messenger;
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use teloxide::{Bot, types::Update};
