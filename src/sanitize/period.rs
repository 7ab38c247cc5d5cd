use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{RawRole, Role};

/// Why a scraped role did not make it into the sanitized output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    MissingStart,
    MissingEnd,
    /// No static roles to corroborate it and the tenure is not active now
    NotCurrent,
    /// Not contained in any tenure window declared in static data
    OutsideStaticTerms,
    /// On a primary body while static data declares this person's roles
    SupersededByStatic,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::MissingStart => "missing_start",
            DropReason::MissingEnd => "missing_end",
            DropReason::NotCurrent => "not_current",
            DropReason::OutsideStaticTerms => "outside_static_terms",
            DropReason::SupersededByStatic => "superseded_by_static",
        }
    }
}

/// Validate the tenure window of `role` and return it.
///
/// With no static roles only tenures active at `now` are trusted. With static
/// roles the window must sit inside one of them, whatever body either is on.
pub fn check_period(
    role: &RawRole,
    static_roles: &[Role],
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), DropReason> {
    let start = role.start_datetime.ok_or(DropReason::MissingStart)?;
    let end = role.end_datetime.ok_or(DropReason::MissingEnd)?;

    if static_roles.is_empty() {
        if start <= now && now <= end {
            return Ok((start, end));
        }
        return Err(DropReason::NotCurrent);
    }

    let contained = static_roles
        .iter()
        .any(|s| s.start_datetime <= start && end <= s.end_datetime);
    if contained {
        Ok((start, end))
    } else {
        Err(DropReason::OutsideStaticTerms)
    }
}

pub fn is_period_ok(role: &RawRole, static_roles: &[Role], now: DateTime<Utc>) -> bool {
    check_period(role, static_roles, now).is_ok()
}
