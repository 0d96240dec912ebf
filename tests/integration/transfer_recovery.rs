//! Partial ownership transfer and manual recovery.

use crate::helpers::{contract, day};
use fieldvisit::contract::{ContractDraft, NewContract, TechnicianId};
use fieldvisit::directory::{ContractDirectory, Scope};
use fieldvisit::error::{FieldVisitError, TransferPhase};
use fieldvisit::mutation::ContractMutationService;
use fieldvisit::store::{ContractStore, InMemoryContractStore, StoreOp};
use std::sync::Arc;

#[tokio::test]
async fn partial_transfer_can_be_recovered_by_reinserting() {
    let store = Arc::new(InMemoryContractStore::new());
    let original = contract("t1", "Rory", "Cold Store", Some("01/01/2024"), 8);
    store.seed(original.clone()).expect("seed");
    store.fail_on(StoreOp::Insert).expect("inject");

    let service = ContractMutationService::new(store.clone());
    let rory = TechnicianId::new("Rory");
    let siobhan = TechnicianId::new("Siobhan");
    let err = service
        .transfer_ownership(&original, &rory, &siobhan, day(2024, 2, 10))
        .await
        .expect_err("insert fails");

    let FieldVisitError::Transfer(transfer) = err else {
        panic!("expected a transfer error");
    };
    assert_eq!(transfer.phase, TransferPhase::InsertAfterDelete);
    assert!(transfer.is_partial());
    assert_eq!(transfer.from, rory);
    assert_eq!(transfer.to, siobhan);

    store.heal().expect("heal");
    let mut directory = ContractDirectory::new(store.clone());
    let view = directory.load(Scope::All, day(2024, 2, 10)).await.expect("load");
    assert_eq!(view.counts.total, 0, "contract is in neither collection");

    // Operator recovery: put the snapshot back where it came from.
    store
        .insert(&transfer.from, NewContract::from(&transfer.contract))
        .await
        .expect("reinsert");
    let view = directory.load(Scope::All, day(2024, 2, 10)).await.expect("reload");
    assert_eq!(view.counts.total, 1);
    let restored = &view.entries[0].contract;
    assert_eq!(restored.owner, rory);
    assert_eq!(restored.name, original.name);
    assert_eq!(restored.last_visit, original.last_visit);
}

#[tokio::test]
async fn failed_delete_leaves_source_untouched() {
    let store = Arc::new(InMemoryContractStore::new());
    let service = ContractMutationService::new(store.clone());
    let rory = TechnicianId::new("Rory");
    let created = service
        .create_contract(
            &rory,
            ContractDraft {
                name: "Grain Silo".to_owned(),
                address: "Mill Road".to_owned(),
                visits: "4".to_owned(),
                ..ContractDraft::default()
            },
            day(2024, 2, 10),
        )
        .await
        .expect("create");

    store.fail_on(StoreOp::Delete).expect("inject");
    let err = service
        .transfer_ownership(
            &created.contract,
            &rory,
            &TechnicianId::new("Siobhan"),
            day(2024, 2, 10),
        )
        .await
        .expect_err("delete fails");
    assert!(matches!(
        err,
        FieldVisitError::Transfer(ref t) if t.phase == TransferPhase::Delete && !t.is_partial()
    ));

    store.heal().expect("heal");
    let owned = store.list_by_owner(&rory).await.expect("list");
    assert_eq!(owned, vec![created.contract]);
}
