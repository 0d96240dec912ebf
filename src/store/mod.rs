//! Contract storage abstraction.
//!
//! The engine only ever talks to a [`ContractStore`]. Backends:
//! - `memory`: per-owner collections held in process, with fault injection.
//! - `sqlite`: one `contracts` table keyed by id with an `owner` column.

pub mod memory;
pub(crate) mod schema;
pub mod sqlite;

use crate::contract::{Contract, ContractId, ContractPatch, NewContract, TechnicianId};
use crate::error::StoreError;
use async_trait::async_trait;

pub use memory::{InMemoryContractStore, StoreOp};
pub use sqlite::SqliteContractStore;

/// Outcome of [`ContractStore::reassign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reassign {
    /// The backend moved the contract in a single write.
    Moved(ContractId),
    /// The backend has no single-write move; callers fall back to
    /// delete-then-insert.
    Unsupported,
}

/// Abstraction over a contract store backend.
///
/// Calls are independent round-trips: no transaction spans two of them and
/// concurrent writers resolve last-writer-wins inside the backend.
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// Contracts in one owner's collection, each tagged with that owner.
    async fn list_by_owner(&self, owner: &TechnicianId) -> Result<Vec<Contract>, StoreError>;

    /// Contracts across every owner, each tagged with its owner.
    async fn list_all(&self) -> Result<Vec<Contract>, StoreError>;

    /// Fetch one contract. `None` if it is not in `owner`'s collection.
    async fn get(
        &self,
        owner: &TechnicianId,
        id: &ContractId,
    ) -> Result<Option<Contract>, StoreError>;

    /// Apply field updates to an existing contract.
    async fn update(
        &self,
        owner: &TechnicianId,
        id: &ContractId,
        patch: &ContractPatch,
    ) -> Result<(), StoreError>;

    /// Insert into `owner`'s collection and return the assigned id.
    async fn insert(&self, owner: &TechnicianId, contract: NewContract)
    -> Result<ContractId, StoreError>;

    /// Remove from `owner`'s collection.
    async fn delete(&self, owner: &TechnicianId, id: &ContractId) -> Result<(), StoreError>;

    /// Move a contract between owners in one write, when the backend can.
    async fn reassign(
        &self,
        _id: &ContractId,
        _from: &TechnicianId,
        _to: &TechnicianId,
    ) -> Result<Reassign, StoreError> {
        Ok(Reassign::Unsupported)
    }
}
