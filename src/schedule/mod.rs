//! Contract visit scheduling.
//!
//! Pure functions: an interval table keyed by visits-per-year tier, short
//! date parsing/formatting, and the next-visit / status derivation used by
//! every other part of the engine.

pub mod dates;
pub mod interval;
pub mod visit;

pub use dates::{ShortDateFormat, days_between, format_short_date, parse_short_date};
pub use interval::interval_weeks;
pub use visit::{NextVisit, ScheduledContract, Status, classify, next_visit};
