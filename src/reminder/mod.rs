//! Daily overdue reminders.
//!
//! A technician with `Behind` contracts gets at most one summary per
//! calendar day. The summary is built from the classified contracts, gated
//! by the last-sent day held in a [`ReminderStatePersistence`], and handed
//! to a messenger for delivery.

pub mod dedup;
pub mod ledger;
pub mod summary;

pub use dedup::ReminderDeduplicator;
pub use ledger::{FileReminderLedger, InMemoryReminderState, ReminderStatePersistence};
pub use summary::{ReminderMessage, build_overdue_summary};
