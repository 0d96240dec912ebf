//! SQLite-backed contract store.
//!
//! All contracts live in one table with an `owner` column, so moving a
//! contract between technicians is a single `UPDATE` and can never leave
//! it in neither collection.

use super::schema::{apply_schema, read_schema_version};
use super::{ContractStore, Reassign};
use crate::contract::{Contract, ContractId, ContractPatch, NewContract, TechnicianId};
use crate::error::StoreError;
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Database filename within the store root directory.
const DB_FILENAME: &str = "contracts.db";

const SELECT_COLUMNS: &str = "SELECT id, owner, name, address, email, contact, visits_per_year, \
     last_visit FROM contracts";

/// SQLite contract store. Thread-safe via an internal `Mutex<Connection>`.
pub struct SqliteContractStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteContractStore {
    /// Open (or create) the database at `{root_dir}/contracts.db`.
    pub fn open(root_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(root_dir).map_err(|e| {
            StoreError::Backend(format!(
                "cannot create store dir {}: {e}",
                root_dir.display()
            ))
        })?;
        let db_path = root_dir.join(DB_FILENAME);
        let conn = Connection::open(&db_path)?;
        apply_schema(&conn)?;
        debug!("opened contract store at {}", db_path.display());
        Ok(Self {
            path: Some(db_path),
            conn: Mutex::new(conn),
        })
    }

    /// Private in-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
        })
    }

    /// Database file path, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn schema_version(&self) -> Result<Option<u32>, StoreError> {
        let conn = self.lock()?;
        Ok(read_schema_version(&conn)?)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn query(&self, sql: &str, owner_key: Option<&str>) -> Result<Vec<Contract>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = match owner_key {
            Some(key) => stmt.query_map(params![key], row_to_contract)?,
            None => stmt.query_map([], row_to_contract)?,
        };
        let mut contracts = Vec::new();
        for r in rows {
            contracts.push(r?);
        }
        Ok(contracts)
    }
}

#[async_trait]
impl ContractStore for SqliteContractStore {
    async fn list_by_owner(&self, owner: &TechnicianId) -> Result<Vec<Contract>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE owner_key = ?1 ORDER BY name COLLATE NOCASE");
        let key = owner.key();
        self.query(&sql, Some(key.as_str()))
    }

    async fn list_all(&self) -> Result<Vec<Contract>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY name COLLATE NOCASE");
        self.query(&sql, None)
    }

    async fn get(
        &self,
        owner: &TechnicianId,
        id: &ContractId,
    ) -> Result<Option<Contract>, StoreError> {
        let conn = self.lock()?;
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1 AND owner_key = ?2");
        let contract = conn
            .query_row(&sql, params![id.as_str(), owner.key()], row_to_contract)
            .optional()?;
        Ok(contract)
    }

    async fn update(
        &self,
        owner: &TechnicianId,
        id: &ContractId,
        patch: &ContractPatch,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE contracts SET \
                name = COALESCE(?3, name), \
                address = COALESCE(?4, address), \
                email = COALESCE(?5, email), \
                contact = COALESCE(?6, contact), \
                visits_per_year = COALESCE(?7, visits_per_year), \
                last_visit = COALESCE(?8, last_visit), \
                updated_at = ?9 \
             WHERE id = ?1 AND owner_key = ?2",
            params![
                id.as_str(),
                owner.key(),
                patch.name,
                patch.address,
                patch.email,
                patch.contact,
                patch.visits_per_year,
                patch.last_visit,
                now_epoch_secs(),
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                owner: owner.clone(),
                id: id.clone(),
            });
        }
        Ok(())
    }

    async fn insert(
        &self,
        owner: &TechnicianId,
        contract: NewContract,
    ) -> Result<ContractId, StoreError> {
        let conn = self.lock()?;
        let id = ContractId::generate();
        let now = now_epoch_secs();
        conn.execute(
            "INSERT INTO contracts (id, owner, owner_key, name, address, email, contact, \
             visits_per_year, last_visit, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                id.as_str(),
                owner.as_str(),
                owner.key(),
                contract.name,
                contract.address,
                contract.email,
                contract.contact,
                contract.visits_per_year,
                contract.last_visit,
                now,
            ],
        )?;
        Ok(id)
    }

    async fn delete(&self, owner: &TechnicianId, id: &ContractId) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "DELETE FROM contracts WHERE id = ?1 AND owner_key = ?2",
            params![id.as_str(), owner.key()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                owner: owner.clone(),
                id: id.clone(),
            });
        }
        Ok(())
    }

    async fn reassign(
        &self,
        id: &ContractId,
        from: &TechnicianId,
        to: &TechnicianId,
    ) -> Result<Reassign, StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE contracts SET owner = ?3, owner_key = ?4, updated_at = ?5 \
             WHERE id = ?1 AND owner_key = ?2",
            params![id.as_str(), from.key(), to.as_str(), to.key(), now_epoch_secs()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                owner: from.clone(),
                id: id.clone(),
            });
        }
        Ok(Reassign::Moved(id.clone()))
    }
}

fn row_to_contract(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contract> {
    let id: String = row.get(0)?;
    let owner: String = row.get(1)?;
    Ok(Contract {
        id: ContractId::new(id),
        owner: TechnicianId::new(owner),
        name: row.get(2)?,
        address: row.get(3)?,
        email: row.get(4)?,
        contact: row.get(5)?,
        visits_per_year: row.get(6)?,
        last_visit: row.get(7)?,
    })
}

fn now_epoch_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
