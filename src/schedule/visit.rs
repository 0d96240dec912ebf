//! Next-visit computation and urgency classification.

use crate::contract::Contract;
use crate::schedule::dates::{ShortDateFormat, days_between, format_short_date, parse_short_date};
use crate::schedule::interval::interval_weeks;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Days ahead of today within which an upcoming visit counts as due.
pub const DUE_WINDOW_DAYS: i64 = 7;

/// Rendering used when the next visit cannot be computed.
pub const UNKNOWN_NEXT_VISIT: &str = "unknown";

/// Computed next visit for a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "date", rename_all = "snake_case")]
pub enum NextVisit {
    /// Next visit falls on this day.
    On(NaiveDate),
    /// No last visit, or the visit count has no known interval.
    Unknown,
}

impl NextVisit {
    /// The date, if known.
    #[must_use]
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            Self::On(d) => Some(d),
            Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for NextVisit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On(d) => f.write_str(&format_short_date(*d, ShortDateFormat::TwoDigitYear)),
            Self::Unknown => f.write_str(UNKNOWN_NEXT_VISIT),
        }
    }
}

/// Urgency of a contract's next visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Never serviced, unschedulable, or next visit already elapsed.
    Behind,
    /// Next visit within the coming week.
    Due,
    /// Next visit a week or more away.
    UpToDate,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Behind => f.write_str("behind"),
            Self::Due => f.write_str("due"),
            Self::UpToDate => f.write_str("up to date"),
        }
    }
}

/// Next visit from the last one and the contracted tier.
#[must_use]
pub fn next_visit(last_visit: Option<NaiveDate>, visits_per_year: u32) -> NextVisit {
    let (Some(last), Some(weeks)) = (last_visit, interval_weeks(visits_per_year)) else {
        return NextVisit::Unknown;
    };
    match last.checked_add_days(Days::new(u64::from(weeks) * 7)) {
        Some(next) => NextVisit::On(next),
        None => NextVisit::Unknown,
    }
}

/// Classify a contract against `today`.
///
/// Missing data is the worst case: no last visit, or no computable next
/// visit, is always `Behind`. A next visit falling on `today` is still due,
/// not overdue.
#[must_use]
pub fn classify(last_visit: Option<NaiveDate>, next: NextVisit, today: NaiveDate) -> Status {
    let (Some(_), NextVisit::On(next)) = (last_visit, next) else {
        return Status::Behind;
    };
    let days_left = days_between(today, next);
    if days_left < 0 {
        Status::Behind
    } else if days_left < DUE_WINDOW_DAYS {
        Status::Due
    } else {
        Status::UpToDate
    }
}

/// A contract with its derived schedule.
///
/// Built fresh on every read; the derived fields are never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledContract {
    /// The stored contract.
    pub contract: Contract,
    /// Parsed last visit, `None` when absent or malformed.
    pub last_visit: Option<NaiveDate>,
    /// Computed next visit.
    pub next_visit: NextVisit,
    /// Urgency as of the evaluation day.
    pub status: Status,
}

impl ScheduledContract {
    /// Derive next visit and status for `contract` as of `today`.
    ///
    /// A stored last visit that fails to parse is logged and treated as
    /// absent so that one bad record cannot block a whole directory.
    #[must_use]
    pub fn evaluate(contract: Contract, today: NaiveDate) -> Self {
        let last_visit = stored_last_visit(&contract);
        let next_visit = next_visit(last_visit, contract.visits_per_year);
        let status = classify(last_visit, next_visit, today);
        Self {
            contract,
            last_visit,
            next_visit,
            status,
        }
    }
}

fn stored_last_visit(contract: &Contract) -> Option<NaiveDate> {
    let raw = contract.last_visit.as_deref()?;
    match parse_short_date(raw, ShortDateFormat::FourDigitYear) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(
                contract_id = %contract.id,
                owner = %contract.owner,
                "ignoring malformed stored last visit: {e}"
            );
            None
        }
    }
}
