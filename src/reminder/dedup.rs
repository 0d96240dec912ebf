//! Once-per-day gate for overdue summaries.

use super::ledger::ReminderStatePersistence;
use crate::contract::TechnicianId;
use crate::error::Result;
use chrono::NaiveDate;
use tracing::debug;

/// Decides whether a technician's overdue summary may go out today.
///
/// The decision looks only at the recorded last-sent day; whether the
/// overdue list changed since then is irrelevant.
pub struct ReminderDeduplicator {
    state: Box<dyn ReminderStatePersistence>,
}

impl ReminderDeduplicator {
    pub fn new(state: Box<dyn ReminderStatePersistence>) -> Self {
        Self { state }
    }

    /// `true` unless a summary was already recorded for `technician` on `today`.
    pub fn should_send_overdue_summary(
        &self,
        technician: &TechnicianId,
        today: NaiveDate,
    ) -> Result<bool> {
        let last_sent = self.state.get(&technician.key())?;
        let send = last_sent != Some(today);
        debug!(
            technician = %technician,
            last_sent = ?last_sent,
            send,
            "overdue summary dedup check"
        );
        Ok(send)
    }

    /// Record that a summary for `technician` went out on `today`.
    pub fn record_sent(&self, technician: &TechnicianId, today: NaiveDate) -> Result<()> {
        self.state.set(&technician.key(), today)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::reminder::ledger::InMemoryReminderState;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn dedup() -> ReminderDeduplicator {
        ReminderDeduplicator::new(Box::new(InMemoryReminderState::new()))
    }

    #[test]
    fn first_check_of_the_day_allows_send() {
        let d = dedup();
        assert!(d.should_send_overdue_summary(&TechnicianId::new("alice"), day(10)).unwrap());
    }

    #[test]
    fn at_most_once_per_day_after_recording() {
        let d = dedup();
        let alice = TechnicianId::new("alice");
        assert!(d.should_send_overdue_summary(&alice, day(10)).unwrap());
        d.record_sent(&alice, day(10)).unwrap();
        for _ in 0..3 {
            assert!(!d.should_send_overdue_summary(&alice, day(10)).unwrap());
        }
    }

    #[test]
    fn unrecorded_check_does_not_consume_the_day() {
        let d = dedup();
        let alice = TechnicianId::new("alice");
        assert!(d.should_send_overdue_summary(&alice, day(10)).unwrap());
        assert!(d.should_send_overdue_summary(&alice, day(10)).unwrap());
    }

    #[test]
    fn next_day_allows_send_again() {
        let d = dedup();
        let alice = TechnicianId::new("alice");
        d.record_sent(&alice, day(10)).unwrap();
        assert!(d.should_send_overdue_summary(&alice, day(11)).unwrap());
    }

    #[test]
    fn keyed_case_insensitively_per_technician() {
        let d = dedup();
        d.record_sent(&TechnicianId::new("Alice"), day(10)).unwrap();
        assert!(!d.should_send_overdue_summary(&TechnicianId::new("ALICE"), day(10)).unwrap());
        assert!(d.should_send_overdue_summary(&TechnicianId::new("bob"), day(10)).unwrap());
    }
}
