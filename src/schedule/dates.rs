//! Short day-precision date representations.
//!
//! Stored last-visit values use four digit years (`dd/MM/yyyy`); computed
//! next-visit values use two digit years (`dd/MM/yy`). Callers always say
//! which one they are parsing. `01/02/24` read as four digit years would
//! silently become the year 24, so the shape is checked before chrono
//! sees the input.

use crate::error::DateParseError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One of the two supported short date layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortDateFormat {
    /// `dd/MM/yy`, used for computed next-visit dates.
    TwoDigitYear,
    /// `dd/MM/yyyy`, used for stored and manually entered last-visit dates.
    FourDigitYear,
}

impl ShortDateFormat {
    fn pattern(self) -> &'static str {
        match self {
            Self::TwoDigitYear => "%d/%m/%y",
            Self::FourDigitYear => "%d/%m/%Y",
        }
    }

    fn year_digits(self) -> usize {
        match self {
            Self::TwoDigitYear => 2,
            Self::FourDigitYear => 4,
        }
    }
}

impl std::fmt::Display for ShortDateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TwoDigitYear => f.write_str("dd/MM/yy"),
            Self::FourDigitYear => f.write_str("dd/MM/yyyy"),
        }
    }
}

/// Parse `input` in exactly the given layout.
///
/// Surrounding whitespace is ignored; anything else that deviates from
/// `dd/MM/yy` or `dd/MM/yyyy` (missing zero padding, wrong year width,
/// impossible calendar day) is rejected.
pub fn parse_short_date(input: &str, format: ShortDateFormat) -> Result<NaiveDate, DateParseError> {
    let err = || DateParseError {
        input: input.to_owned(),
        format,
    };

    let trimmed = input.trim();
    if !has_shape(trimmed, format.year_digits()) {
        return Err(err());
    }

    NaiveDate::parse_from_str(trimmed, format.pattern()).map_err(|_| err())
}

/// Render `date` in the given layout.
#[must_use]
pub fn format_short_date(date: NaiveDate, format: ShortDateFormat) -> String {
    date.format(format.pattern()).to_string()
}

/// Signed whole days from `a` to `b` (`b - a`).
#[must_use]
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

fn has_shape(s: &str, year_digits: usize) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 6 + year_digits {
        return false;
    }
    bytes.iter().enumerate().all(|(i, b)| match i {
        2 | 5 => *b == b'/',
        _ => b.is_ascii_digit(),
    })
}
