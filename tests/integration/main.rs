//! Integration test binary -- all integration tests consolidated into a single
//! binary to keep link time down.

// Allow unwrap/expect in test code
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod helpers;

mod cli_config;
mod directory_flow;
mod reminder_ledger;
mod sqlite_store;
mod transfer_recovery;
mod whatsapp_delivery;
