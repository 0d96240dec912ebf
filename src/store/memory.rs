//! In-process contract store with one collection per owner.
//!
//! Mirrors the per-owner collection layout of the hosted document store,
//! so ownership transfer has no single-write move here. Individual
//! operations can be made to fail to exercise partial failures.

use super::{ContractStore, Reassign};
use crate::contract::{Contract, ContractId, ContractPatch, NewContract, TechnicianId};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// Store operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListByOwner,
    ListAll,
    Get,
    Update,
    Insert,
    Delete,
}

#[derive(Default)]
struct Inner {
    /// Owner key -> (display owner, contracts by id).
    collections: HashMap<String, (TechnicianId, BTreeMap<ContractId, Contract>)>,
    failing: HashSet<StoreOp>,
}

/// Per-owner in-memory contract collections.
#[derive(Default)]
pub struct InMemoryContractStore {
    inner: Mutex<Inner>,
}

impl InMemoryContractStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a fully formed contract into its owner's collection.
    pub fn seed(&self, contract: Contract) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let owner = contract.owner.clone();
        inner
            .collections
            .entry(owner.key())
            .or_insert_with(|| (owner, BTreeMap::new()))
            .1
            .insert(contract.id.clone(), contract);
        Ok(())
    }

    /// Make every subsequent call of `op` fail until [`Self::heal`] is called.
    pub fn fail_on(&self, op: StoreOp) -> Result<(), StoreError> {
        self.lock()?.failing.insert(op);
        Ok(())
    }

    /// Clear all injected failures.
    pub fn heal(&self) -> Result<(), StoreError> {
        self.lock()?.failing.clear();
        Ok(())
    }

    /// Total number of stored contracts across owners.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self
            .lock()?
            .collections
            .values()
            .map(|(_, contracts)| contracts.len())
            .sum())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn checked(&self, op: StoreOp) -> Result<MutexGuard<'_, Inner>, StoreError> {
        let inner = self.lock()?;
        if inner.failing.contains(&op) {
            return Err(StoreError::Backend(format!("injected {op:?} failure")));
        }
        Ok(inner)
    }
}

fn not_found(owner: &TechnicianId, id: &ContractId) -> StoreError {
    StoreError::NotFound {
        owner: owner.clone(),
        id: id.clone(),
    }
}

#[async_trait]
impl ContractStore for InMemoryContractStore {
    async fn list_by_owner(&self, owner: &TechnicianId) -> Result<Vec<Contract>, StoreError> {
        let inner = self.checked(StoreOp::ListByOwner)?;
        Ok(inner
            .collections
            .get(&owner.key())
            .map(|(_, contracts)| contracts.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_all(&self) -> Result<Vec<Contract>, StoreError> {
        let inner = self.checked(StoreOp::ListAll)?;
        Ok(inner
            .collections
            .values()
            .flat_map(|(_, contracts)| contracts.values().cloned())
            .collect())
    }

    async fn get(
        &self,
        owner: &TechnicianId,
        id: &ContractId,
    ) -> Result<Option<Contract>, StoreError> {
        let inner = self.checked(StoreOp::Get)?;
        Ok(inner
            .collections
            .get(&owner.key())
            .and_then(|(_, contracts)| contracts.get(id).cloned()))
    }

    async fn update(
        &self,
        owner: &TechnicianId,
        id: &ContractId,
        patch: &ContractPatch,
    ) -> Result<(), StoreError> {
        let mut inner = self.checked(StoreOp::Update)?;
        let contract = inner
            .collections
            .get_mut(&owner.key())
            .and_then(|(_, contracts)| contracts.get_mut(id))
            .ok_or_else(|| not_found(owner, id))?;
        patch.apply_to(contract);
        Ok(())
    }

    async fn insert(
        &self,
        owner: &TechnicianId,
        contract: NewContract,
    ) -> Result<ContractId, StoreError> {
        let mut inner = self.checked(StoreOp::Insert)?;
        let (display_owner, contracts) = inner
            .collections
            .entry(owner.key())
            .or_insert_with(|| (owner.clone(), BTreeMap::new()));
        let id = ContractId::generate();
        let stored = contract.into_contract(id.clone(), display_owner.clone());
        contracts.insert(id.clone(), stored);
        Ok(id)
    }

    async fn delete(&self, owner: &TechnicianId, id: &ContractId) -> Result<(), StoreError> {
        let mut inner = self.checked(StoreOp::Delete)?;
        inner
            .collections
            .get_mut(&owner.key())
            .and_then(|(_, contracts)| contracts.remove(id))
            .map(|_| ())
            .ok_or_else(|| not_found(owner, id))
    }

    async fn reassign(
        &self,
        _id: &ContractId,
        _from: &TechnicianId,
        _to: &TechnicianId,
    ) -> Result<Reassign, StoreError> {
        Ok(Reassign::Unsupported)
    }
}
