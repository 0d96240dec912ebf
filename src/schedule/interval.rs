//! Visit-frequency tiers and their recurrence intervals.

/// Weeks between visits for a contracted number of visits per year.
///
/// Only the commercial tiers (4, 6, 8, 12) have an interval; every other
/// count, including storable values like 1 or 13, returns `None`.
#[must_use]
pub fn interval_weeks(visits_per_year: u32) -> Option<u32> {
    match visits_per_year {
        8 => Some(6),
        12 => Some(4),
        6 => Some(8),
        4 => Some(12),
        _ => None,
    }
}

/// Tiers that map to a known interval, most frequent first.
pub const KNOWN_TIERS: [u32; 4] = [12, 8, 6, 4];
