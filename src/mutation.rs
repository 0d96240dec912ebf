//! Validated contract state transitions.
//!
//! Every operation validates its input before touching the store, makes at
//! most the store calls it needs, and returns the contract re-classified as
//! of the caller's `today`. There is no transaction across operations.

use crate::contract::{
    Contract, ContractDraft, ContractEdit, ContractId, ContractPatch, NOT_AVAILABLE, NewContract,
    TechnicianId,
};
use crate::error::{Result, StoreError, TransferError, TransferPhase, ValidationError};
use crate::schedule::{ScheduledContract, ShortDateFormat, format_short_date, parse_short_date};
use crate::store::{ContractStore, Reassign};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Inclusive bounds for visits per year.
pub const MIN_VISITS_PER_YEAR: i64 = 1;
pub const MAX_VISITS_PER_YEAR: i64 = 99;

/// Applies user-initiated edits to contracts in a [`ContractStore`].
#[derive(Clone)]
pub struct ContractMutationService {
    store: Arc<dyn ContractStore>,
}

impl ContractMutationService {
    pub fn new(store: Arc<dyn ContractStore>) -> Self {
        Self { store }
    }

    /// Record a visit on `today`. Marking the same day twice is harmless.
    pub async fn mark_visit_done(
        &self,
        contract: &Contract,
        today: NaiveDate,
    ) -> Result<ScheduledContract> {
        let patch = ContractPatch {
            last_visit: Some(format_short_date(today, ShortDateFormat::FourDigitYear)),
            ..ContractPatch::default()
        };
        let updated = self.persist(contract, patch, today).await?;
        info!(contract_id = %contract.id, technician = %contract.owner, "visit marked done");
        Ok(updated)
    }

    /// Whether marking done would change anything: `false` once the stored
    /// last visit is already `today`.
    #[must_use]
    pub fn can_mark_done(contract: &Contract, today: NaiveDate) -> bool {
        let last = contract
            .last_visit
            .as_deref()
            .and_then(|raw| parse_short_date(raw, ShortDateFormat::FourDigitYear).ok());
        last != Some(today)
    }

    /// Replace the last visit with a manually entered `dd/MM/yyyy` date.
    pub async fn set_last_visit(
        &self,
        contract: &Contract,
        input: &str,
        today: NaiveDate,
    ) -> Result<ScheduledContract> {
        let date = parse_short_date(input, ShortDateFormat::FourDigitYear)
            .map_err(ValidationError::from)?;
        let patch = ContractPatch {
            last_visit: Some(format_short_date(date, ShortDateFormat::FourDigitYear)),
            ..ContractPatch::default()
        };
        let updated = self.persist(contract, patch, today).await?;
        info!(contract_id = %contract.id, technician = %contract.owner, last_visit = %date, "last visit set");
        Ok(updated)
    }

    /// Edit descriptive fields and the visit tier.
    ///
    /// `name` and `address` may not be blanked, `visits` must be an integer
    /// in `[1, 99]`, and blank `email`/`contact` are stored as `N/A`.
    pub async fn edit_fields(
        &self,
        contract: &Contract,
        edit: ContractEdit,
        today: NaiveDate,
    ) -> Result<ScheduledContract> {
        let patch = ContractPatch {
            name: edit.name.map(|v| required("name", &v)).transpose()?,
            address: edit.address.map(|v| required("address", &v)).transpose()?,
            email: edit.email.map(|v| or_not_available(&v)),
            contact: edit.contact.map(|v| or_not_available(&v)),
            visits_per_year: edit.visits.map(|v| parse_visits(&v)).transpose()?,
            last_visit: None,
        };
        if patch.is_empty() {
            return Ok(ScheduledContract::evaluate(contract.clone(), today));
        }
        let updated = self.persist(contract, patch, today).await?;
        info!(contract_id = %contract.id, technician = %contract.owner, "contract fields edited");
        Ok(updated)
    }

    /// Move a contract from `from` to `to`.
    ///
    /// Uses the store's single-write reassignment when it has one. Otherwise
    /// the move is a delete followed by an insert, and a failed insert leaves
    /// the contract in neither collection; that case is reported as a
    /// [`TransferError`] with [`TransferPhase::InsertAfterDelete`] carrying
    /// the contract for manual recovery.
    pub async fn transfer_ownership(
        &self,
        contract: &Contract,
        from: &TechnicianId,
        to: &TechnicianId,
        today: NaiveDate,
    ) -> Result<ScheduledContract> {
        if to.is_empty() {
            return Err(ValidationError::EmptyField("new owner").into());
        }
        if from == to {
            return Err(ValidationError::SameOwner(to.clone()).into());
        }
        let fail = |phase: TransferPhase, source: StoreError| TransferError {
            phase,
            contract: contract.clone(),
            from: from.clone(),
            to: to.clone(),
            source,
        };

        match self.store.reassign(&contract.id, from, to).await {
            Ok(Reassign::Moved(id)) => {
                info!(contract_id = %id, from = %from, to = %to, "contract reassigned");
                return Ok(moved(contract, id, to, today));
            }
            Ok(Reassign::Unsupported) => {}
            Err(e) => {
                warn!(contract_id = %contract.id, phase = %TransferPhase::Reassign, error = %e, "transfer failed");
                return Err(fail(TransferPhase::Reassign, e).into());
            }
        }

        if let Err(e) = self.store.delete(from, &contract.id).await {
            warn!(contract_id = %contract.id, phase = %TransferPhase::Delete, error = %e, "transfer failed");
            return Err(fail(TransferPhase::Delete, e).into());
        }
        match self.store.insert(to, NewContract::from(contract)).await {
            Ok(id) => {
                info!(old_id = %contract.id, contract_id = %id, from = %from, to = %to, "contract moved");
                Ok(moved(contract, id, to, today))
            }
            Err(e) => {
                error!(
                    contract_id = %contract.id,
                    phase = %TransferPhase::InsertAfterDelete,
                    from = %from,
                    to = %to,
                    error = %e,
                    "transfer left contract in neither collection"
                );
                Err(fail(TransferPhase::InsertAfterDelete, e).into())
            }
        }
    }

    /// Validate a draft and insert it into `owner`'s collection.
    pub async fn create_contract(
        &self,
        owner: &TechnicianId,
        draft: ContractDraft,
        today: NaiveDate,
    ) -> Result<ScheduledContract> {
        if owner.is_empty() {
            return Err(ValidationError::EmptyField("owner").into());
        }
        let visits_per_year = if draft.visits.trim().is_empty() {
            0
        } else {
            parse_visits(&draft.visits)?
        };
        let new = NewContract {
            name: required("name", &draft.name)?,
            address: required("address", &draft.address)?,
            email: or_not_available(&draft.email),
            contact: or_not_available(&draft.contact),
            visits_per_year,
            last_visit: None,
        };
        let id = self.store.insert(owner, new.clone()).await?;
        info!(contract_id = %id, technician = %owner, "contract created");
        Ok(ScheduledContract::evaluate(
            new.into_contract(id, owner.clone()),
            today,
        ))
    }

    /// Remove a contract from `owner`'s collection.
    pub async fn delete_contract(&self, owner: &TechnicianId, id: &ContractId) -> Result<()> {
        self.store.delete(owner, id).await?;
        info!(contract_id = %id, technician = %owner, "contract deleted");
        Ok(())
    }

    async fn persist(
        &self,
        contract: &Contract,
        patch: ContractPatch,
        today: NaiveDate,
    ) -> Result<ScheduledContract> {
        self.store
            .update(&contract.owner, &contract.id, &patch)
            .await?;
        let mut updated = contract.clone();
        patch.apply_to(&mut updated);
        Ok(ScheduledContract::evaluate(updated, today))
    }
}

fn moved(contract: &Contract, id: ContractId, to: &TechnicianId, today: NaiveDate) -> ScheduledContract {
    let moved = NewContract::from(contract).into_contract(id, to.clone());
    ScheduledContract::evaluate(moved, today)
}

/// Parse visits per year as typed.
pub fn parse_visits(raw: &str) -> std::result::Result<u32, ValidationError> {
    let trimmed = raw.trim();
    let n: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::VisitsNotANumber(trimmed.to_owned()))?;
    if !(MIN_VISITS_PER_YEAR..=MAX_VISITS_PER_YEAR).contains(&n) {
        return Err(ValidationError::VisitsOutOfRange(n));
    }
    u32::try_from(n).map_err(|_| ValidationError::VisitsOutOfRange(n))
}

fn required(field: &'static str, value: &str) -> std::result::Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_owned())
}

fn or_not_available(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_owned()
    } else {
        trimmed.to_owned()
    }
}
