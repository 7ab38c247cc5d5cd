//! Role sanitization: period validation, primary-body detection, title
//! classification and tenure conflict resolution for one person at a time.

pub mod period;
pub mod primary;
pub mod resolve;
pub mod title;

pub use period::{check_period, is_period_ok, DropReason};
pub use primary::{is_primary_body, PrimaryBodies};
pub use resolve::{merge_static_roles, resolve_member_overlaps, Truncation};
pub use title::{PatternSet, TitleClassifier};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::constants::{default_chair_patterns, default_council_president_patterns, default_primary_bodies};
use crate::metrics::SanitizerMetrics;
use crate::types::{RawRole, Role, RoleOrigin, StaticData};

/// Pattern lists and fallback body names driving the sanitizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizeOptions {
    pub council_president_patterns: Vec<String>,
    pub chair_patterns: Vec<String>,
    /// Primary bodies used when static data declares none
    pub default_primary_bodies: Vec<String>,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            council_president_patterns: default_council_president_patterns(),
            chair_patterns: default_chair_patterns(),
            default_primary_bodies: default_primary_bodies(),
        }
    }
}

/// A scraped role left out of the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRole {
    /// Position in the input list
    pub index: usize,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanitizeReport {
    pub person_name: String,
    pub roles: Vec<Role>,
    pub dropped: Vec<DroppedRole>,
    pub truncations: Vec<Truncation>,
    pub static_roles_merged: usize,
}

/// Reusable sanitizer holding compiled title patterns
#[derive(Debug, Clone)]
pub struct RoleSanitizer {
    classifier: TitleClassifier,
    default_primary_bodies: Vec<String>,
}

impl RoleSanitizer {
    pub fn new(options: &SanitizeOptions) -> Self {
        Self {
            classifier: TitleClassifier::new(&options.council_president_patterns, &options.chair_patterns),
            default_primary_bodies: options.default_primary_bodies.clone(),
        }
    }

    pub fn sanitize(
        &self,
        person_name: &str,
        roles: &[RawRole],
        static_data: Option<&StaticData>,
        now: DateTime<Utc>,
    ) -> Vec<Role> {
        self.sanitize_with_report(person_name, roles, static_data, now).roles
    }

    /// Sanitize `roles` and report what was dropped or truncated along the way.
    ///
    /// `now` is the moment used to decide whether a tenure is current when
    /// static data declares no roles for the person.
    #[instrument(skip(self, roles, static_data), fields(role_count = roles.len()))]
    pub fn sanitize_with_report(
        &self,
        person_name: &str,
        roles: &[RawRole],
        static_data: Option<&StaticData>,
        now: DateTime<Utc>,
    ) -> SanitizeReport {
        let static_roles = static_data.map(|d| d.person_roles(person_name)).unwrap_or(&[]);
        let have_static_roles = !static_roles.is_empty();
        let primary = PrimaryBodies::resolve(static_data, &self.default_primary_bodies);

        SanitizerMetrics::record_person_sanitized();
        SanitizerMetrics::record_roles_seen(roles.len());

        let mut dropped = Vec::new();
        let mut sanitized = Vec::with_capacity(roles.len());

        for (index, raw) in roles.iter().enumerate() {
            let outcome = check_period(raw, static_roles, now).and_then(|window| {
                let on_primary_body = is_primary_body(raw, &primary);
                if have_static_roles && on_primary_body {
                    Err(DropReason::SupersededByStatic)
                } else {
                    Ok((window, on_primary_body))
                }
            });

            match outcome {
                Ok(((start, end), on_primary_body)) => sanitized.push(Role {
                    title: self.classifier.classify(raw.title.as_deref(), on_primary_body),
                    body: raw.body.clone(),
                    start_datetime: start,
                    end_datetime: end,
                    external_source_id: raw.external_source_id.clone(),
                    origin: RoleOrigin::Scraped,
                }),
                Err(reason) => {
                    debug!(
                        index,
                        reason = reason.as_str(),
                        title = raw.title.as_deref().unwrap_or(""),
                        body = raw.body.as_ref().and_then(|b| b.name.as_deref()).unwrap_or(""),
                        "Dropping role"
                    );
                    SanitizerMetrics::record_role_dropped(reason);
                    dropped.push(DroppedRole { index, reason });
                }
            }
        }

        let (roles_out, truncations, static_roles_merged) = if have_static_roles {
            let (merged, count) = merge_static_roles(sanitized, static_roles);
            (merged, Vec::new(), count)
        } else {
            let truncations = resolve_member_overlaps(&mut sanitized);
            for t in &truncations {
                debug!(
                    index = t.index,
                    original_end = %t.original_end,
                    truncated_end = %t.truncated_end,
                    "Truncated overlapping council term"
                );
            }
            (sanitized, truncations, 0)
        };

        SanitizerMetrics::record_roles_truncated(truncations.len());
        SanitizerMetrics::record_static_roles_merged(static_roles_merged);

        info!(
            kept = roles_out.len() - static_roles_merged,
            dropped = dropped.len(),
            truncated = truncations.len(),
            static_roles = static_roles_merged,
            "Sanitized roles"
        );

        SanitizeReport {
            person_name: person_name.to_string(),
            roles: roles_out,
            dropped,
            truncations,
            static_roles_merged,
        }
    }
}

/// Sanitize one person's scraped roles against the current moment.
pub fn sanitize_roles(
    person_name: &str,
    roles: &[RawRole],
    static_data: Option<&StaticData>,
    options: &SanitizeOptions,
) -> Vec<Role> {
    sanitize_roles_at(person_name, roles, static_data, options, Utc::now())
}

pub fn sanitize_roles_at(
    person_name: &str,
    roles: &[RawRole],
    static_data: Option<&StaticData>,
    options: &SanitizeOptions,
    now: DateTime<Utc>,
) -> Vec<Role> {
    RoleSanitizer::new(options).sanitize(person_name, roles, static_data, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Body, RoleTitle, Seat, StaticPerson};
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn raw(title: Option<&str>, body: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> RawRole {
        RawRole {
            title: title.map(str::to_string),
            body: Some(Body::named(body)),
            start_datetime: Some(start),
            end_datetime: Some(end),
            external_source_id: None,
        }
    }

    fn static_data_for(person: &str, roles: Vec<Role>) -> StaticData {
        let mut data = StaticData::default();
        data.primary_bodies
            .insert("City Council".to_string(), Body::named("City Council"));
        data.persons.insert(
            person.to_string(),
            StaticPerson {
                name: person.to_string(),
                seat: Some(Seat {
                    name: "Position 1".to_string(),
                    roles,
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        data
    }

    #[test]
    fn test_report_lists_dropped_roles_with_reasons() {
        let now = date(2020, 6, 1);
        let roles = vec![
            RawRole {
                start_datetime: None,
                ..raw(Some("Member"), "Parks", now, now)
            },
            raw(Some("Member"), "Parks", date(2010, 1, 1), date(2011, 1, 1)),
            raw(Some("Chair"), "Parks", date(2020, 1, 1), date(2020, 12, 31)),
        ];

        let report = RoleSanitizer::new(&SanitizeOptions::default())
            .sanitize_with_report("Ada", &roles, None, now);

        assert_eq!(report.roles.len(), 1);
        assert_eq!(report.roles[0].title, RoleTitle::Chair);
        assert_eq!(
            report.dropped,
            vec![
                DroppedRole { index: 0, reason: DropReason::MissingStart },
                DroppedRole { index: 1, reason: DropReason::NotCurrent },
            ]
        );
    }

    #[test]
    fn test_static_roles_supersede_primary_body_roles() {
        let static_role = Role {
            title: RoleTitle::Councilmember,
            body: Some(Body::named("City Council")),
            start_datetime: date(2019, 1, 1),
            end_datetime: date(2023, 1, 1),
            external_source_id: None,
            origin: RoleOrigin::Static,
        };
        let data = static_data_for("Ada", vec![static_role.clone()]);
        let roles = vec![
            raw(Some("Council President"), "City Council", date(2019, 6, 1), date(2019, 7, 1)),
            raw(Some("Vice Chair"), "Parks Committee", date(2020, 1, 1), date(2021, 1, 1)),
        ];

        let report = RoleSanitizer::new(&SanitizeOptions::default())
            .sanitize_with_report("Ada", &roles, Some(&data), date(2030, 1, 1));

        assert_eq!(report.static_roles_merged, 1);
        assert_eq!(report.dropped, vec![DroppedRole { index: 0, reason: DropReason::SupersededByStatic }]);
        assert_eq!(report.roles.len(), 2);
        assert_eq!(report.roles[0].title, RoleTitle::ViceChair);
        assert_eq!(report.roles[1], static_role);
    }

    #[test]
    fn test_static_data_for_other_person_uses_current_check() {
        let data = static_data_for("Someone Else", vec![]);
        let roles = vec![raw(None, "City Council", date(2020, 1, 1), date(2021, 1, 1))];

        let out = sanitize_roles_at("Ada", &roles, Some(&data), &SanitizeOptions::default(), date(2020, 6, 1));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, RoleTitle::Councilmember);
        assert_eq!(out[0].origin, RoleOrigin::Scraped);
    }

    #[test]
    fn test_input_roles_are_not_mutated() {
        let roles = vec![
            raw(None, "City Council", date(2018, 1, 1), date(2020, 6, 1)),
            raw(None, "City Council", date(2020, 1, 1), date(2021, 12, 31)),
        ];
        let before = roles.clone();

        let out = sanitize_roles_at("Ada", &roles, None, &SanitizeOptions::default(), date(2020, 3, 1));

        assert_eq!(roles, before);
        assert_eq!(out[0].end_datetime, date(2019, 12, 31));
    }
}
