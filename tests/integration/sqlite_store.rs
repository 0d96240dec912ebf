//! SQLite store end to end through the mutation service and directory.

use crate::helpers::day;
use fieldvisit::contract::{ContractDraft, TechnicianId};
use fieldvisit::directory::{ContractDirectory, Scope};
use fieldvisit::mutation::ContractMutationService;
use fieldvisit::schedule::Status;
use fieldvisit::store::SqliteContractStore;
use std::sync::Arc;

#[tokio::test]
async fn create_reschedule_transfer_and_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let today = day(2024, 2, 10);
    let rory = TechnicianId::new("Rory");
    let siobhan = TechnicianId::new("Siobhan");

    let id = {
        let store = Arc::new(SqliteContractStore::open(dir.path()).expect("open"));
        let service = ContractMutationService::new(store.clone());
        let created = service
            .create_contract(
                &rory,
                ContractDraft {
                    name: "Fish Market".to_owned(),
                    address: "The Docks".to_owned(),
                    email: "  ".to_owned(),
                    contact: "Pat".to_owned(),
                    visits: "12".to_owned(),
                },
                today,
            )
            .await
            .expect("create");
        assert_eq!(created.status, Status::Behind);

        let rescheduled = service
            .set_last_visit(&created.contract, "20/01/2024", today)
            .await
            .expect("reschedule");
        assert_eq!(rescheduled.next_visit.to_string(), "17/02/24");
        assert_eq!(rescheduled.status, Status::UpToDate);

        let moved = service
            .transfer_ownership(&rescheduled.contract, &rory, &siobhan, today)
            .await
            .expect("transfer");
        assert_eq!(moved.contract.id, created.contract.id);
        moved.contract.id
    };

    let store = Arc::new(SqliteContractStore::open(dir.path()).expect("reopen"));
    let mut directory = ContractDirectory::new(store);
    let view = directory
        .load(Scope::Technician(siobhan.clone()), today)
        .await
        .expect("load");
    assert_eq!(view.entries.len(), 1);
    let entry = &view.entries[0];
    assert_eq!(entry.contract.id, id);
    assert_eq!(entry.contract.email, "N/A");
    assert_eq!(entry.contract.last_visit.as_deref(), Some("20/01/2024"));
    assert_eq!(entry.contract.owner, siobhan);

    let view = directory
        .load(Scope::Technician(rory), today)
        .await
        .expect("load");
    assert!(view.entries.is_empty());
}
