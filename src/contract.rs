//! Contract records as held by the backing store.

use serde::{Deserialize, Serialize};

/// Placeholder stored for optional text fields left blank.
pub const NOT_AVAILABLE: &str = "N/A";

/// Opaque contract identifier, unique within its owner's collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(String);

impl ContractId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for a newly inserted contract.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the technician (or pool) owning a collection of contracts.
///
/// Display keeps the original casing; [`TechnicianId::key`] is the
/// case-folded form used for lookups, equality and reminder dedup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechnicianId(String);

impl TechnicianId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive key.
    #[must_use]
    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for TechnicianId {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TechnicianId {}

impl std::hash::Hash for TechnicianId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl std::fmt::Display for TechnicianId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recurring service agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    /// Collection the contract currently lives in.
    pub owner: TechnicianId,
    pub name: String,
    pub address: String,
    pub email: String,
    pub contact: String,
    /// Contracted visits per year. `0` means no tier was recorded.
    pub visits_per_year: u32,
    /// Last service date as stored (`dd/MM/yyyy`), if ever serviced.
    ///
    /// Kept verbatim so that a malformed value can be reported and folded
    /// into `Behind` at read time rather than rejected by the store.
    pub last_visit: Option<String>,
}

/// Contract fields supplied on insert. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContract {
    pub name: String,
    pub address: String,
    pub email: String,
    pub contact: String,
    pub visits_per_year: u32,
    pub last_visit: Option<String>,
}

impl NewContract {
    /// Materialise as a stored contract under `owner`.
    #[must_use]
    pub fn into_contract(self, id: ContractId, owner: TechnicianId) -> Contract {
        Contract {
            id,
            owner,
            name: self.name,
            address: self.address,
            email: self.email,
            contact: self.contact,
            visits_per_year: self.visits_per_year,
            last_visit: self.last_visit,
        }
    }
}

impl From<&Contract> for NewContract {
    fn from(c: &Contract) -> Self {
        Self {
            name: c.name.clone(),
            address: c.address.clone(),
            email: c.email.clone(),
            contact: c.contact.clone(),
            visits_per_year: c.visits_per_year,
            last_visit: c.last_visit.clone(),
        }
    }
}

/// Already-validated field updates for [`crate::store::ContractStore::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub visits_per_year: Option<u32>,
    pub last_visit: Option<String>,
}

impl ContractPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to an in-memory copy.
    pub fn apply_to(&self, contract: &mut Contract) {
        if let Some(v) = &self.name {
            contract.name = v.clone();
        }
        if let Some(v) = &self.address {
            contract.address = v.clone();
        }
        if let Some(v) = &self.email {
            contract.email = v.clone();
        }
        if let Some(v) = &self.contact {
            contract.contact = v.clone();
        }
        if let Some(v) = self.visits_per_year {
            contract.visits_per_year = v;
        }
        if let Some(v) = &self.last_visit {
            contract.last_visit = Some(v.clone());
        }
    }
}

/// Raw user input for creating a contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractDraft {
    pub name: String,
    pub address: String,
    pub email: String,
    pub contact: String,
    /// Visits per year as typed; blank means no tier.
    pub visits: String,
}

/// Raw user input for editing a contract. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractEdit {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    /// Visits per year as typed.
    pub visits: Option<String>,
}
