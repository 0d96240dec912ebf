//! Persistence for the last day an overdue summary went to each technician.

use crate::error::{FieldVisitError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key-value persistence of last-sent days, keyed by case-folded
/// technician id.
pub trait ReminderStatePersistence: Send + Sync {
    /// Last day a summary was recorded for `technician_key`.
    fn get(&self, technician_key: &str) -> Result<Option<NaiveDate>>;

    /// Record `day` as the last-sent day for `technician_key`.
    fn set(&self, technician_key: &str, day: NaiveDate) -> Result<()>;
}

/// Process-local reminder state.
#[derive(Default)]
pub struct InMemoryReminderState {
    days: Mutex<BTreeMap<String, NaiveDate>>,
}

impl InMemoryReminderState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReminderStatePersistence for InMemoryReminderState {
    fn get(&self, technician_key: &str) -> Result<Option<NaiveDate>> {
        let days = self
            .days
            .lock()
            .map_err(|e| FieldVisitError::Reminder(format!("lock poisoned: {e}")))?;
        Ok(days.get(technician_key).copied())
    }

    fn set(&self, technician_key: &str, day: NaiveDate) -> Result<()> {
        let mut days = self
            .days
            .lock()
            .map_err(|e| FieldVisitError::Reminder(format!("lock poisoned: {e}")))?;
        days.insert(technician_key.to_owned(), day);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default = "default_ledger_version")]
    version: u8,
    #[serde(default)]
    last_sent: BTreeMap<String, NaiveDate>,
}

fn default_ledger_version() -> u8 {
    1
}

/// JSON file ledger of last-sent days.
///
/// Every read goes to disk so that several processes sharing the file see
/// each other's sends. Writes replace the file atomically.
pub struct FileReminderLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileReminderLedger {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<LedgerFile> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LedgerFile {
                    version: default_ledger_version(),
                    last_sent: BTreeMap::new(),
                });
            }
            Err(e) => {
                return Err(FieldVisitError::Reminder(format!(
                    "cannot read reminder ledger {}: {e}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            FieldVisitError::Reminder(format!(
                "cannot parse reminder ledger {}: {e}",
                self.path.display()
            ))
        })
    }

    fn write(&self, ledger: &LedgerFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                FieldVisitError::Reminder(format!("cannot create reminder ledger dir: {e}"))
            })?;
        }

        let tmp_path = self.path.with_extension("tmp");
        let json = serde_json::to_vec_pretty(ledger)
            .map_err(|e| FieldVisitError::Reminder(format!("cannot serialize ledger: {e}")))?;
        std::fs::write(&tmp_path, json)
            .map_err(|e| FieldVisitError::Reminder(format!("cannot write ledger temp file: {e}")))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| FieldVisitError::Reminder(format!("cannot finalize ledger file: {e}")))?;
        Ok(())
    }
}

impl ReminderStatePersistence for FileReminderLedger {
    fn get(&self, technician_key: &str) -> Result<Option<NaiveDate>> {
        Ok(self.read()?.last_sent.get(technician_key).copied())
    }

    fn set(&self, technician_key: &str, day: NaiveDate) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| FieldVisitError::Reminder(format!("lock poisoned: {e}")))?;
        let mut ledger = self.read()?;
        ledger.version = default_ledger_version();
        ledger.last_sent.insert(technician_key.to_owned(), day);
        self.write(&ledger)
    }
}
