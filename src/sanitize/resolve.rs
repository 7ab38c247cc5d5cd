use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{Role, RoleTitle};

/// A council tenure being checked for overlap
#[derive(Debug, Clone, Copy)]
struct CouncilMemberTerm {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    index: usize,
}

/// An end date moved back to resolve an overlap
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Truncation {
    /// Position of the truncated role in the sanitized output
    pub index: usize,
    pub original_end: DateTime<Utc>,
    pub truncated_end: DateTime<Utc>,
}

/// End every overlapping council term the day before the next one starts.
///
/// Council terms are the Councilmember and Council President roles, so a
/// presidency cuts short the plain membership it overlaps. Terms are grouped
/// per body, since sitting on the council and on its briefing session at once
/// is normal. Within a body they are stable-sorted by (start, end) and swept
/// once; touching boundaries are left alone.
pub fn resolve_member_overlaps(roles: &mut [Role]) -> Vec<Truncation> {
    let mut terms_by_body: BTreeMap<Option<String>, Vec<CouncilMemberTerm>> = BTreeMap::new();
    for (index, role) in roles.iter().enumerate() {
        if !is_council_term(role) {
            continue;
        }
        terms_by_body
            .entry(role.body_key())
            .or_default()
            .push(CouncilMemberTerm {
                start: role.start_datetime,
                end: role.end_datetime,
                index,
            });
    }

    let mut truncations = Vec::new();
    for terms in terms_by_body.values_mut() {
        terms.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));

        for i in 1..terms.len() {
            let prev = terms[i - 1];
            let this = terms[i];
            if prev.end > this.start {
                let truncated_end = this
                    .start
                    .checked_sub_signed(Duration::days(1))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                roles[prev.index].end_datetime = truncated_end;
                terms[i - 1].end = truncated_end;
                truncations.push(Truncation {
                    index: prev.index,
                    original_end: prev.end,
                    truncated_end,
                });
            }
        }
    }

    truncations.sort_by_key(|t| t.index);
    truncations
}

fn is_council_term(role: &Role) -> bool {
    matches!(role.title, RoleTitle::Councilmember | RoleTitle::CouncilPresident)
}

/// Append the static roles after the surviving scraped ones.
///
/// A scraped role describing exactly the same tenure as a static role is
/// dropped so re-sanitizing merged output does not duplicate it. Returns the
/// merged list and the number of static roles appended.
pub fn merge_static_roles(scraped: Vec<Role>, static_roles: &[Role]) -> (Vec<Role>, usize) {
    let mut merged: Vec<Role> = scraped
        .into_iter()
        .filter(|role| !static_roles.iter().any(|s| s.same_tenure(role)))
        .collect();
    merged.extend(static_roles.iter().cloned());
    (merged, static_roles.len())
}
