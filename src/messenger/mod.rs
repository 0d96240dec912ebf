//! Delivery of overdue summaries.
//!
//! The directory only knows the [`Messenger`] trait. Which backend runs is
//! picked from [`crate::config::MessengerConfig`] by [`from_config`].

pub mod log;
pub mod whatsapp;

pub use log::LogMessenger;
pub use whatsapp::WhatsAppMessenger;

use crate::config::{MessengerConfig, MessengerKind};
use crate::reminder::ReminderMessage;
use async_trait::async_trait;
use std::sync::Arc;

/// Messenger contract. New delivery backends only need to implement this trait.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Stable backend identifier (e.g. `log`, `whatsapp`).
    fn id(&self) -> &'static str;

    /// Deliver `message` to the technician it names.
    async fn deliver(&self, message: &ReminderMessage) -> anyhow::Result<()>;
}

/// Build the messenger selected by `config`.
#[must_use]
pub fn from_config(config: &MessengerConfig) -> Arc<dyn Messenger> {
    match config.kind {
        MessengerKind::Log => Arc::new(LogMessenger),
        MessengerKind::Whatsapp => Arc::new(WhatsAppMessenger::new(&config.whatsapp)),
    }
}
