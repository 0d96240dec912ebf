//! Contract directory: load, classify, count, sort, search and remind.
//!
//! A load pulls raw contracts for a scope, classifies each one as of the
//! caller's day, and then offers each technician in the result at most one
//! overdue summary. A failed load leaves the previous view in place.

use crate::config::DirectoryConfig;
use crate::contract::{Contract, TechnicianId};
use crate::error::Result;
use crate::messenger::Messenger;
use crate::reminder::{ReminderDeduplicator, build_overdue_summary};
use crate::schedule::{ScheduledContract, Status};
use crate::store::ContractStore;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Which contracts a load covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "technician", rename_all = "snake_case")]
pub enum Scope {
    /// One technician's collection.
    Technician(TechnicianId),
    /// Every collection (administrative view).
    All,
}

impl Scope {
    /// Resolve the scope a signed-in user sees. Configured admin names see everything.
    #[must_use]
    pub fn for_user(user: &str, config: &DirectoryConfig) -> Self {
        if config.is_admin(user) {
            Self::All
        } else {
            Self::Technician(TechnicianId::new(user))
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Technician(id) => write!(f, "{id}"),
            Self::All => f.write_str("all"),
        }
    }
}

/// Field matched by [`DirectoryView::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    /// Contract name.
    #[default]
    Name,
    /// Owning technician.
    Owner,
}

/// Per-status totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub behind: usize,
    pub due: usize,
    pub up_to_date: usize,
    pub total: usize,
}

impl StatusCounts {
    fn tally(entries: &[ScheduledContract]) -> Self {
        entries.iter().fold(Self::default(), |mut counts, entry| {
            match entry.status {
                Status::Behind => counts.behind += 1,
                Status::Due => counts.due += 1,
                Status::UpToDate => counts.up_to_date += 1,
            }
            counts.total += 1;
            counts
        })
    }
}

/// What happened to one technician's overdue summary during a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReminderDispatch {
    /// Recorded for today and handed to the messenger.
    Sent { overdue_count: usize },
    /// A summary was already recorded today.
    AlreadySentToday,
    /// No `Behind` contracts; nothing to send.
    NothingOverdue,
    /// Reminder state could not be read or written, so nothing was sent.
    StateUnavailable { reason: String },
    /// Recorded as sent, but the messenger reported a failure.
    DeliveryFailed { reason: String },
}

/// Reminder outcome for one technician.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicianReminder {
    pub technician: TechnicianId,
    pub dispatch: ReminderDispatch,
}

/// Classified, sorted contracts for one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryView {
    pub scope: Scope,
    /// Day the entries were classified against.
    pub today: NaiveDate,
    /// Sorted case-insensitively by name.
    pub entries: Vec<ScheduledContract>,
    pub counts: StatusCounts,
    /// One outcome per technician in the result; empty when reminders are off.
    pub reminders: Vec<TechnicianReminder>,
}

impl DirectoryView {
    fn build(scope: Scope, contracts: Vec<Contract>, today: NaiveDate) -> Self {
        let mut entries: Vec<ScheduledContract> = contracts
            .into_iter()
            .map(|c| ScheduledContract::evaluate(c, today))
            .collect();
        entries.sort_by(|a, b| {
            a.contract
                .name
                .to_lowercase()
                .cmp(&b.contract.name.to_lowercase())
                .then_with(|| a.contract.id.cmp(&b.contract.id))
        });
        let counts = StatusCounts::tally(&entries);
        Self {
            scope,
            today,
            entries,
            counts,
            reminders: Vec::new(),
        }
    }

    /// Entries whose `field` contains `query`, case-insensitively.
    ///
    /// A blank query returns the whole view. Counts cover the matching
    /// entries only; reminder outcomes are carried over unchanged.
    #[must_use]
    pub fn filter(&self, query: &str, field: SearchField) -> Self {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }
        let entries: Vec<ScheduledContract> = self
            .entries
            .iter()
            .filter(|entry| {
                let haystack = match field {
                    SearchField::Name => entry.contract.name.as_str(),
                    SearchField::Owner => entry.contract.owner.as_str(),
                };
                haystack.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        Self {
            scope: self.scope.clone(),
            today: self.today,
            counts: StatusCounts::tally(&entries),
            entries,
            reminders: self.reminders.clone(),
        }
    }

    /// Technicians present in this view, each with their contracts in view order.
    fn by_technician(&self) -> Vec<(TechnicianId, Vec<Contract>)> {
        let mut groups: BTreeMap<String, (TechnicianId, Vec<Contract>)> = BTreeMap::new();
        if let Scope::Technician(id) = &self.scope {
            groups.insert(id.key(), (id.clone(), Vec::new()));
        }
        for entry in &self.entries {
            let owner = &entry.contract.owner;
            groups
                .entry(owner.key())
                .or_insert_with(|| (owner.clone(), Vec::new()))
                .1
                .push(entry.contract.clone());
        }
        groups.into_values().collect()
    }
}

struct Reminders {
    dedup: ReminderDeduplicator,
    messenger: Arc<dyn Messenger>,
}

/// Loads contract views and drives overdue reminders.
pub struct ContractDirectory {
    store: Arc<dyn ContractStore>,
    reminders: Option<Reminders>,
    view: Option<DirectoryView>,
}

impl ContractDirectory {
    /// A directory that never sends reminders.
    pub fn new(store: Arc<dyn ContractStore>) -> Self {
        Self {
            store,
            reminders: None,
            view: None,
        }
    }

    /// Offer overdue summaries through `messenger` on every load, gated by `dedup`.
    #[must_use]
    pub fn with_reminders(
        mut self,
        dedup: ReminderDeduplicator,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        self.reminders = Some(Reminders { dedup, messenger });
        self
    }

    /// Most recent successfully loaded view.
    pub fn view(&self) -> Option<&DirectoryView> {
        self.view.as_ref()
    }

    /// Load and classify contracts for `scope` as of `today`.
    ///
    /// On a store failure the error is returned and the previous view is kept.
    pub async fn load(&mut self, scope: Scope, today: NaiveDate) -> Result<&DirectoryView> {
        let contracts = match &scope {
            Scope::Technician(id) => self.store.list_by_owner(id).await,
            Scope::All => self.store.list_all().await,
        };
        let contracts = contracts.inspect_err(|e| {
            warn!(scope = %scope, error = %e, "directory load failed, keeping previous view");
        })?;

        let mut view = DirectoryView::build(scope, contracts, today);
        info!(
            scope = %view.scope,
            total = view.counts.total,
            behind = view.counts.behind,
            due = view.counts.due,
            up_to_date = view.counts.up_to_date,
            "directory loaded"
        );

        if let Some(reminders) = &self.reminders {
            for (technician, contracts) in view.by_technician() {
                let dispatch = reminders.dispatch(&technician, &contracts, today).await;
                view.reminders.push(TechnicianReminder {
                    technician,
                    dispatch,
                });
            }
        }

        let view: &DirectoryView = self.view.insert(view);
        Ok(view)
    }

    /// Filter the current view. `None` until a load has succeeded.
    pub fn filter(&self, query: &str, field: SearchField) -> Option<DirectoryView> {
        self.view.as_ref().map(|v| v.filter(query, field))
    }
}

impl Reminders {
    /// Summary first, then the daily gate, then record, then deliver.
    ///
    /// Recording precedes delivery so a technician gets at most one summary
    /// per day even when the transport fails.
    async fn dispatch(
        &self,
        technician: &TechnicianId,
        contracts: &[Contract],
        today: NaiveDate,
    ) -> ReminderDispatch {
        let Some(message) = build_overdue_summary(technician, contracts, today) else {
            return ReminderDispatch::NothingOverdue;
        };

        match self.dedup.should_send_overdue_summary(technician, today) {
            Ok(true) => {}
            Ok(false) => return ReminderDispatch::AlreadySentToday,
            Err(e) => {
                warn!(technician = %technician, error = %e, "reminder state unreadable, not sending");
                return ReminderDispatch::StateUnavailable {
                    reason: e.to_string(),
                };
            }
        }
        if let Err(e) = self.dedup.record_sent(technician, today) {
            warn!(technician = %technician, error = %e, "reminder state not saved, not sending");
            return ReminderDispatch::StateUnavailable {
                reason: e.to_string(),
            };
        }

        match self.messenger.deliver(&message).await {
            Ok(()) => {
                info!(
                    technician = %technician,
                    overdue = message.overdue_count,
                    messenger = self.messenger.id(),
                    "overdue summary sent"
                );
                ReminderDispatch::Sent {
                    overdue_count: message.overdue_count,
                }
            }
            Err(e) => {
                warn!(
                    technician = %technician,
                    messenger = self.messenger.id(),
                    error = %e,
                    "overdue summary delivery failed"
                );
                ReminderDispatch::DeliveryFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
