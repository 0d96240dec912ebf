//! Overdue summary messages.

use crate::contract::{Contract, TechnicianId};
use crate::schedule::{ScheduledContract, Status};
use chrono::NaiveDate;
use serde::Serialize;

/// A summary ready for delivery by a [`crate::messenger::Messenger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderMessage {
    /// Technician the summary is about and addressed to.
    pub technician_id: TechnicianId,
    /// Plain-text body.
    pub body: String,
    /// Number of overdue contracts listed in `body`.
    pub overdue_count: usize,
}

/// Build the overdue summary for `technician` from `contracts`.
///
/// Only contracts classified [`Status::Behind`] as of `today` are listed,
/// in the order given. Returns `None` when nothing is overdue.
#[must_use]
pub fn build_overdue_summary(
    technician: &TechnicianId,
    contracts: &[Contract],
    today: NaiveDate,
) -> Option<ReminderMessage> {
    let overdue: Vec<ScheduledContract> = contracts
        .iter()
        .cloned()
        .map(|c| ScheduledContract::evaluate(c, today))
        .filter(|s| s.status == Status::Behind)
        .collect();

    if overdue.is_empty() {
        return None;
    }

    let entries: Vec<String> = overdue
        .iter()
        .map(|s| {
            format!(
                "- {}\n  Address: {}\n  Next visit: {}",
                s.contract.name, s.contract.address, s.next_visit
            )
        })
        .collect();

    Some(ReminderMessage {
        technician_id: technician.clone(),
        body: format!(
            "Overdue contracts for {technician}:\n\n{}",
            entries.join("\n\n")
        ),
        overdue_count: overdue.len(),
    })
}
