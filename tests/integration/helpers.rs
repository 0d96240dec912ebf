//! Shared helpers for integration tests.

use chrono::NaiveDate;
use fieldvisit::contract::{Contract, ContractId, TechnicianId};
use fieldvisit::messenger::Messenger;
use fieldvisit::reminder::ReminderMessage;
use std::sync::Mutex;

pub(crate) fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A stored contract with placeholder contact details.
pub(crate) fn contract(
    id: &str,
    owner: &str,
    name: &str,
    last_visit: Option<&str>,
    visits_per_year: u32,
) -> Contract {
    Contract {
        id: ContractId::new(id),
        owner: TechnicianId::new(owner),
        name: name.to_owned(),
        address: format!("{name} premises"),
        email: "N/A".to_owned(),
        contact: "N/A".to_owned(),
        visits_per_year,
        last_visit: last_visit.map(str::to_owned),
    }
}

/// Messenger that keeps every delivered summary.
#[derive(Default)]
pub(crate) struct CapturingMessenger {
    pub(crate) delivered: Mutex<Vec<ReminderMessage>>,
}

impl CapturingMessenger {
    pub(crate) fn technicians(&self) -> Vec<String> {
        self.delivered
            .lock()
            .expect("lock")
            .iter()
            .map(|m| m.technician_id.to_string())
            .collect()
    }
}

#[async_trait::async_trait]
impl Messenger for CapturingMessenger {
    fn id(&self) -> &'static str {
        "capturing"
    }

    async fn deliver(&self, message: &ReminderMessage) -> anyhow::Result<()> {
        self.delivered.lock().expect("lock").push(message.clone());
        Ok(())
    }
}
