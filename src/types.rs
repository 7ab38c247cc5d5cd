use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::dates::deserialize_optional_datetime;
use crate::text::simplified_key;

/// Canonical role titles shared with the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleTitle {
    #[serde(rename = "Councilmember")]
    Councilmember,
    #[serde(rename = "Council President")]
    CouncilPresident,
    #[serde(rename = "Chair")]
    Chair,
    #[serde(rename = "Vice Chair")]
    ViceChair,
    #[serde(rename = "Alternate")]
    Alternate,
    #[serde(rename = "Supervisor")]
    Supervisor,
    #[serde(rename = "Member")]
    Member,
}

impl RoleTitle {
    pub const ALL: [RoleTitle; 7] = [
        RoleTitle::Councilmember,
        RoleTitle::CouncilPresident,
        RoleTitle::Chair,
        RoleTitle::ViceChair,
        RoleTitle::Alternate,
        RoleTitle::Supervisor,
        RoleTitle::Member,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleTitle::Councilmember => "Councilmember",
            RoleTitle::CouncilPresident => "Council President",
            RoleTitle::Chair => "Chair",
            RoleTitle::ViceChair => "Vice Chair",
            RoleTitle::Alternate => "Alternate",
            RoleTitle::Supervisor => "Supervisor",
            RoleTitle::Member => "Member",
        }
    }
}

impl fmt::Display for RoleTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRoleTitle(pub String);

impl fmt::Display for UnknownRoleTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a canonical role title", self.0)
    }
}

impl std::error::Error for UnknownRoleTitle {}

impl FromStr for RoleTitle {
    type Err = UnknownRoleTitle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleTitle::ALL
            .iter()
            .copied()
            .find(|title| title.as_str() == s)
            .ok_or_else(|| UnknownRoleTitle(s.to_string()))
    }
}

/// A governing body: the full council, its briefing session, or a committee
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Body {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Simplified, lower-cased name used to compare bodies
    pub fn key(&self) -> Option<String> {
        self.name.as_deref().map(simplified_key)
    }
}

/// A role as scraped, before sanitization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRole {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<Body>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub end_datetime: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_source_id: Option<String>,
}

/// Where a sanitized role came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleOrigin {
    Scraped,
    Static,
}

/// A role with a canonical title and a complete tenure window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub title: RoleTitle,
    pub body: Option<Body>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_source_id: Option<String>,
    pub origin: RoleOrigin,
}

impl Role {
    pub fn body_key(&self) -> Option<String> {
        self.body.as_ref().and_then(Body::key)
    }

    /// Whether `other` describes the same tenure: same title, body and window
    pub fn same_tenure(&self, other: &Role) -> bool {
        self.title == other.title
            && self.body_key() == other.body_key()
            && self.start_datetime == other.start_datetime
            && self.end_datetime == other.end_datetime
    }
}

impl From<Role> for RawRole {
    fn from(role: Role) -> Self {
        RawRole {
            title: Some(role.title.as_str().to_string()),
            body: role.body,
            start_datetime: Some(role.start_datetime),
            end_datetime: Some(role.end_datetime),
            external_source_id: role.external_source_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub electoral_area: Option<String>,
    #[serde(default)]
    pub electoral_type: Option<String>,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// A person as declared in the static override file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticPerson {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub picture_uri: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub seat: Option<Seat>,
}

/// Authoritative, manually curated roster data
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StaticData {
    pub seats: BTreeMap<String, Seat>,
    pub primary_bodies: BTreeMap<String, Body>,
    pub persons: BTreeMap<String, StaticPerson>,
}

impl StaticData {
    /// Roles declared for `person_name`, empty when none are known
    pub fn person_roles(&self, person_name: &str) -> &[Role] {
        self.persons
            .get(person_name)
            .and_then(|person| person.seat.as_ref())
            .map(|seat| seat.roles.as_slice())
            .unwrap_or(&[])
    }

    /// Simplified, lower-cased primary body names
    pub fn primary_body_names(&self) -> Vec<String> {
        self.primary_bodies.keys().map(|name| simplified_key(name)).collect()
    }
}
