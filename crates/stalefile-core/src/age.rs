//! Relative age specifications and cutoff resolution.
//!
//! An age spec is a colon-separated list of `<n>y` / `<n>m` tokens, e.g.
//! `1y`, `6m` or `1y:6m`. Resolving it against "now" walks the calendar back
//! by whole years and months, keeping the day of month and the time of day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeDelta, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Default age when none is given.
pub const DEFAULT_AGE_SPEC: &str = "1y";

/// Parsed `Ny:Mm` age specification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgeSpec {
    /// Whole years to go back.
    pub years: u32,
    /// Whole months to go back.
    pub months: u32,
}

impl AgeSpec {
    /// Create an age spec from its components.
    pub fn new(years: u32, months: u32) -> Self {
        Self { years, months }
    }

    /// Parse an age spec such as `1y`, `6m` or `1y:6m`.
    ///
    /// A later token of the same unit overwrites an earlier one, so `1y:2y`
    /// means two years.
    pub fn parse(spec: &str) -> Result<Self, ScanError> {
        let mut parsed = Self::default();

        for token in spec.split(':') {
            let Some(unit) = token.chars().next_back() else {
                return Err(ScanError::malformed(spec, "empty token"));
            };
            let digits = &token[..token.len() - unit.len_utf8()];

            let slot = match unit {
                'y' => &mut parsed.years,
                'm' => &mut parsed.months,
                other => {
                    return Err(ScanError::malformed(
                        spec,
                        format!("token '{token}' has unknown unit '{other}' (expected 'y' or 'm')"),
                    ));
                }
            };

            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ScanError::malformed(
                    spec,
                    format!("token '{token}' needs a non-negative integer before '{unit}'"),
                ));
            }

            *slot = digits
                .parse()
                .map_err(|e| ScanError::malformed(spec, format!("token '{token}': {e}")))?;
        }

        Ok(parsed)
    }

    /// Total number of months this spec goes back.
    pub fn total_months(&self) -> i64 {
        i64::from(self.years) * 12 + i64::from(self.months)
    }

    /// Compute the cutoff instant `now - self`.
    ///
    /// Month underflow borrows from the year. The day of month is kept as-is
    /// and rolls forward into the following month when the target month is
    /// shorter (March 31 minus one month is March 2 or 3). A local time that
    /// falls into a DST gap is shifted forward by one hour.
    ///
    /// Returns `None` when the result is outside chrono's calendar range.
    pub fn cutoff_from<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let local = now.naive_local();

        let target = i64::from(local.year()) * 12 + i64::from(local.month0()) - self.total_months();
        let year = i32::try_from(target.div_euclid(12)).ok()?;
        let month0 = u32::try_from(target.rem_euclid(12)).ok()?;

        let date = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?
            .checked_add_days(Days::new(u64::from(local.day() - 1)))?;
        let naive = date.and_time(local.time());

        let tz = now.timezone();
        tz.from_local_datetime(&naive)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest())
    }
}

impl FromStr for AgeSpec {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AgeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.years, self.months) {
            (y, 0) => write!(f, "{y}y"),
            (0, m) => write!(f, "{m}m"),
            (y, m) => write!(f, "{y}y:{m}m"),
        }
    }
}

/// Parse `spec` and resolve it against `now`.
pub fn resolve<Tz: TimeZone>(spec: &str, now: &DateTime<Tz>) -> Result<DateTime<Tz>, ScanError> {
    AgeSpec::parse(spec)?
        .cutoff_from(now)
        .ok_or_else(|| ScanError::UnrepresentableCutoff {
            spec: spec.to_string(),
        })
}
