//! File-backed reminder state shared between processes.

use crate::helpers::day;
use fieldvisit::contract::TechnicianId;
use fieldvisit::reminder::{FileReminderLedger, ReminderDeduplicator, ReminderStatePersistence};

#[test]
fn two_ledgers_on_one_file_share_sends() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state").join("reminders.json");
    let first = ReminderDeduplicator::new(Box::new(FileReminderLedger::new(path.clone())));
    let second = ReminderDeduplicator::new(Box::new(FileReminderLedger::new(path.clone())));
    let rory = TechnicianId::new("Rory");

    assert!(first.should_send_overdue_summary(&rory, day(2024, 2, 10)).expect("check"));
    first.record_sent(&rory, day(2024, 2, 10)).expect("record");
    assert!(!second
        .should_send_overdue_summary(&TechnicianId::new("RORY"), day(2024, 2, 10))
        .expect("check"));
    assert!(second
        .should_send_overdue_summary(&rory, day(2024, 2, 11))
        .expect("check"));

    let raw = std::fs::read_to_string(&path).expect("ledger written");
    assert!(raw.contains("\"rory\""));
    assert!(raw.contains("2024-02-10"));
}

#[test]
fn corrupt_ledger_is_a_reminder_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("reminders.json");
    std::fs::write(&path, "{ nope").expect("write");
    let ledger = FileReminderLedger::new(path);
    assert!(matches!(
        ledger.get("rory"),
        Err(fieldvisit::FieldVisitError::Reminder(_))
    ));
}
