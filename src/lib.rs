//! fieldvisit: contract visit scheduling and status engine for field-service teams.
//!
//! Given a contract's visits-per-year tier and last service date, the engine
//! computes the next due visit, classifies the contract, sends each
//! technician at most one overdue summary per day, and applies validated
//! edits to the backing store.
//!
//! # Architecture
//!
//! - **Schedule**: short date handling, the tier interval table, next-visit
//!   and status derivation (pure, no I/O)
//! - **Store**: the `ContractStore` abstraction with in-memory and SQLite backends
//! - **Reminder**: overdue summaries, once-per-day dedup and its persisted state
//! - **Messenger**: delivery of summaries (log or WhatsApp Cloud API)
//! - **Mutation**: mark-done, reschedule, field edits, create, delete, ownership transfer
//! - **Directory**: scope loading, sorting, counts, search and reminder dispatch

pub mod config;
pub mod contract;
pub mod directory;
pub mod error;
pub mod messenger;
pub mod mutation;
pub mod paths;
pub mod reminder;
pub mod schedule;
pub mod store;

pub use config::FieldVisitConfig;
pub use contract::{Contract, ContractDraft, ContractEdit, ContractId, TechnicianId};
pub use directory::{ContractDirectory, DirectoryView, Scope, SearchField};
pub use error::{FieldVisitError, Result};
pub use mutation::ContractMutationService;
pub use schedule::{NextVisit, ScheduledContract, Status};
