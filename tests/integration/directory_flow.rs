//! Load, classify, remind, mutate, reload.

use crate::helpers::{CapturingMessenger, contract, day};
use fieldvisit::contract::{ContractEdit, TechnicianId};
use fieldvisit::directory::{ContractDirectory, ReminderDispatch, Scope, SearchField};
use fieldvisit::mutation::ContractMutationService;
use fieldvisit::reminder::{FileReminderLedger, ReminderDeduplicator};
use fieldvisit::schedule::{NextVisit, Status};
use fieldvisit::store::{ContractStore, InMemoryContractStore};
use std::sync::Arc;

fn seeded_store() -> Arc<InMemoryContractStore> {
    let store = Arc::new(InMemoryContractStore::new());
    for c in [
        contract("r1", "Rory", "Quayside Hotel", Some("01/01/2024"), 8),
        contract("r2", "Rory", "bridge street chipper", None, 12),
        contract("r3", "Rory", "Abbey Mills", Some("31/12/2023"), 4),
        contract("s1", "Siobhan", "Garda Station", Some("not a date"), 6),
        contract("s2", "Siobhan", "Library", Some("05/02/2024"), 99),
    ] {
        store.seed(c).expect("seed");
    }
    store
}

#[tokio::test]
async fn admin_load_then_mark_done_clears_overdue() {
    let store = seeded_store();
    let ledger_dir = tempfile::tempdir().expect("tempdir");
    let ledger = FileReminderLedger::new(ledger_dir.path().join("reminders.json"));
    let messenger = Arc::new(CapturingMessenger::default());
    let mut directory = ContractDirectory::new(store.clone())
        .with_reminders(ReminderDeduplicator::new(Box::new(ledger)), messenger.clone());
    let today = day(2024, 2, 10);

    let view = directory.load(Scope::All, today).await.expect("load");
    let names: Vec<&str> = view.entries.iter().map(|e| e.contract.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Abbey Mills",
            "bridge street chipper",
            "Garda Station",
            "Library",
            "Quayside Hotel"
        ]
    );
    // Abbey Mills: 31/12/2023 + 12 weeks = 24/03/2024, up to date.
    // Chipper: never serviced. Garda: malformed date. Library: unknown tier.
    assert_eq!(view.counts.behind, 3);
    assert_eq!(view.counts.due, 1);
    assert_eq!(view.counts.up_to_date, 1);

    let quayside = view
        .entries
        .iter()
        .find(|e| e.contract.id.as_str() == "r1")
        .expect("quayside");
    assert_eq!(quayside.next_visit.to_string(), "12/02/24");
    assert_eq!(quayside.status, Status::Due);

    let library = view
        .entries
        .iter()
        .find(|e| e.contract.id.as_str() == "s2")
        .expect("library");
    assert_eq!(library.next_visit, NextVisit::Unknown);

    assert_eq!(messenger.technicians(), vec!["Rory", "Siobhan"]);
    assert!(view
        .reminders
        .iter()
        .all(|r| matches!(r.dispatch, ReminderDispatch::Sent { .. })));

    // Service the chipper and give the library a real tier.
    let service = ContractMutationService::new(store.clone());
    let chipper = store
        .get(&TechnicianId::new("rory"), &fieldvisit::ContractId::new("r2"))
        .await
        .expect("get")
        .expect("present");
    service.mark_visit_done(&chipper, today).await.expect("mark done");
    let library = store
        .get(&TechnicianId::new("siobhan"), &fieldvisit::ContractId::new("s2"))
        .await
        .expect("get")
        .expect("present");
    service
        .edit_fields(
            &library,
            ContractEdit {
                visits: Some("8".to_owned()),
                ..ContractEdit::default()
            },
            today,
        )
        .await
        .expect("edit");

    let view = directory.load(Scope::All, today).await.expect("reload");
    assert_eq!(view.counts.behind, 1);
    assert_eq!(view.counts.due, 1);
    assert_eq!(view.counts.up_to_date, 3);
    // Same day: Siobhan is still behind (Garda) but already nudged.
    assert_eq!(messenger.technicians().len(), 2);

    let rory_only = directory
        .filter("ROR", SearchField::Owner)
        .expect("view loaded");
    assert_eq!(rory_only.counts.total, 3);
    assert_eq!(rory_only.counts.behind, 0);
}

#[tokio::test]
async fn ledger_survives_a_new_directory_instance() {
    let store = seeded_store();
    let ledger_dir = tempfile::tempdir().expect("tempdir");
    let ledger_path = ledger_dir.path().join("reminders.json");
    let messenger = Arc::new(CapturingMessenger::default());
    let today = day(2024, 2, 10);
    let rory = Scope::Technician(TechnicianId::new("Rory"));

    for _ in 0..2 {
        let ledger = FileReminderLedger::new(ledger_path.clone());
        let mut directory = ContractDirectory::new(store.clone())
            .with_reminders(ReminderDeduplicator::new(Box::new(ledger)), messenger.clone());
        directory.load(rory.clone(), today).await.expect("load");
    }
    assert_eq!(messenger.technicians(), vec!["Rory"]);

    let ledger = FileReminderLedger::new(ledger_path);
    let mut directory = ContractDirectory::new(store)
        .with_reminders(ReminderDeduplicator::new(Box::new(ledger)), messenger.clone());
    directory
        .load(rory, day(2024, 2, 11))
        .await
        .expect("next day");
    assert_eq!(messenger.technicians(), vec!["Rory", "Rory"]);
}
