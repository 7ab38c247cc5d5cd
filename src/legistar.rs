//! Legistar web API records at the boundary of the sanitizer.
//!
//! Fetching is left to a [`LegistarSource`]. Lookups within one scrape session
//! go through a [`LegistarLookup`] that memoizes bodies and persons in a
//! caller-owned [`LegistarCache`], so hundreds of events sharing a handful of
//! bodies cost one request per body.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::dates::parse_datetime;
use crate::error::{Result, RosterError};
use crate::types::{Body, RawRole};

pub const LEGISTAR_PERSON_EXT_ID: &str = "PersonId";
pub const LEGISTAR_PERSON_NAME: &str = "PersonFullName";
pub const LEGISTAR_PERSON_EMAIL: &str = "PersonEmail";
pub const LEGISTAR_PERSON_ACTIVE: &str = "PersonActiveFlag";
pub const LEGISTAR_PERSON_ROLES: &str = "OfficeRecordInfo";
pub const LEGISTAR_BODY_NAME: &str = "BodyName";
pub const LEGISTAR_BODY_EXT_ID: &str = "BodyId";
pub const LEGISTAR_BODY_ACTIVE: &str = "BodyActiveFlag";
pub const LEGISTAR_ROLE_BODY: &str = "OfficeRecordBodyInfo";
pub const LEGISTAR_ROLE_BODY_ID: &str = "OfficeRecordBodyId";
pub const LEGISTAR_ROLE_BODY_ALT: &str = "OfficeRecordBodyName";
pub const LEGISTAR_ROLE_START: &str = "OfficeRecordStartDate";
pub const LEGISTAR_ROLE_END: &str = "OfficeRecordEndDate";
pub const LEGISTAR_ROLE_EXT_ID: &str = "OfficeRecordId";
pub const LEGISTAR_ROLE_TITLE: &str = "OfficeRecordTitle";
pub const LEGISTAR_ROLE_TITLE_ALT: &str = "OfficeRecordMemberType";

/// Where Legistar JSON records come from. `Ok(None)` means not found.
pub trait LegistarSource {
    fn body(&self, body_id: i64) -> Result<Option<Value>>;
    fn person(&self, person_id: i64) -> Result<Option<Value>>;
    fn office_records(&self, person_id: i64) -> Result<Option<Vec<Value>>>;
}

/// Memoized lookups for one scrape session; misses are remembered too
#[derive(Debug, Default, Clone)]
pub struct LegistarCache {
    bodies: HashMap<i64, Option<Value>>,
    persons: HashMap<i64, Option<Value>>,
}

impl LegistarCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; call when starting a new query
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.persons.clear();
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn person_count(&self) -> usize {
        self.persons.len()
    }
}

pub struct LegistarLookup<'a, S: LegistarSource> {
    source: &'a S,
    cache: &'a mut LegistarCache,
}

impl<'a, S: LegistarSource> LegistarLookup<'a, S> {
    pub fn new(source: &'a S, cache: &'a mut LegistarCache) -> Self {
        Self { source, cache }
    }

    pub fn get_body(&mut self, body_id: i64) -> Result<Option<Value>> {
        if let Some(cached) = self.cache.bodies.get(&body_id) {
            return Ok(cached.clone());
        }
        let body = self.source.body(body_id)?;
        self.cache.bodies.insert(body_id, body.clone());
        Ok(body)
    }

    /// A person with every office record's body attached under
    /// `OfficeRecordBodyInfo` and the records under `OfficeRecordInfo`.
    pub fn get_person(&mut self, person_id: i64) -> Result<Option<Value>> {
        if let Some(cached) = self.cache.persons.get(&person_id) {
            return Ok(cached.clone());
        }

        let Some(mut person) = self.source.person(person_id)? else {
            self.cache.persons.insert(person_id, None);
            return Ok(None);
        };

        let roles = match self.source.office_records(person_id)? {
            Some(mut records) => {
                for record in records.iter_mut() {
                    let body = match record.get(LEGISTAR_ROLE_BODY_ID).and_then(Value::as_i64) {
                        Some(body_id) => self.get_body(body_id)?,
                        None => None,
                    };
                    if let Some(fields) = record.as_object_mut() {
                        fields.insert(LEGISTAR_ROLE_BODY.to_string(), body.unwrap_or(Value::Null));
                    }
                }
                Value::Array(records)
            }
            None => Value::Null,
        };

        match person.as_object_mut() {
            Some(fields) => {
                fields.insert(LEGISTAR_PERSON_ROLES.to_string(), roles);
            }
            None => {
                return Err(RosterError::Legistar {
                    message: format!("person {} is not a JSON object", person_id),
                })
            }
        }

        self.cache.persons.insert(person_id, Some(person.clone()));
        Ok(Some(person))
    }
}

/// An in-memory Legistar export: bodies, persons and office records per person
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LegistarDump {
    #[serde(default)]
    pub bodies: Vec<Value>,
    #[serde(default)]
    pub persons: Vec<Value>,
    #[serde(default)]
    pub office_records: HashMap<String, Vec<Value>>,
}

impl LegistarDump {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn person_ids(&self) -> Vec<i64> {
        self.persons
            .iter()
            .filter_map(|p| p.get(LEGISTAR_PERSON_EXT_ID).and_then(Value::as_i64))
            .collect()
    }
}

impl LegistarSource for LegistarDump {
    fn body(&self, body_id: i64) -> Result<Option<Value>> {
        Ok(find_by_id(&self.bodies, LEGISTAR_BODY_EXT_ID, body_id))
    }

    fn person(&self, person_id: i64) -> Result<Option<Value>> {
        Ok(find_by_id(&self.persons, LEGISTAR_PERSON_EXT_ID, person_id))
    }

    fn office_records(&self, person_id: i64) -> Result<Option<Vec<Value>>> {
        Ok(self.office_records.get(&person_id.to_string()).cloned())
    }
}

fn find_by_id(records: &[Value], id_field: &str, id: i64) -> Option<Value> {
    records
        .iter()
        .find(|r| r.get(id_field).and_then(Value::as_i64) == Some(id))
        .cloned()
}

pub fn person_name(person: &Value) -> Option<String> {
    person
        .get(LEGISTAR_PERSON_NAME)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Convert a person's attached office records into unsanitized roles
pub fn roles_from_person(person: &Value) -> Vec<RawRole> {
    let Some(records) = person.get(LEGISTAR_PERSON_ROLES).and_then(Value::as_array) else {
        debug!(person = ?person_name(person), "No office records");
        return Vec::new();
    };
    records.iter().map(role_from_office_record).collect()
}

pub fn role_from_office_record(record: &Value) -> RawRole {
    let text = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);
    let timestamp = |key: &str| {
        let raw = record.get(key).and_then(Value::as_str)?;
        let parsed = parse_datetime(raw);
        if parsed.is_none() {
            warn!("Unparsable {} '{}' in office record", key, raw);
        }
        parsed
    };

    RawRole {
        title: text(LEGISTAR_ROLE_TITLE).or_else(|| text(LEGISTAR_ROLE_TITLE_ALT)),
        body: body_from_record(record),
        start_datetime: timestamp(LEGISTAR_ROLE_START),
        end_datetime: timestamp(LEGISTAR_ROLE_END),
        external_source_id: record.get(LEGISTAR_ROLE_EXT_ID).and_then(id_text),
    }
}

fn body_from_record(record: &Value) -> Option<Body> {
    if let Some(info) = record.get(LEGISTAR_ROLE_BODY).filter(|v| v.is_object()) {
        return Some(body_from_legistar(info));
    }
    record
        .get(LEGISTAR_ROLE_BODY_ALT)
        .and_then(Value::as_str)
        .map(Body::named)
}

pub fn body_from_legistar(body: &Value) -> Body {
    Body {
        name: body.get(LEGISTAR_BODY_NAME).and_then(Value::as_str).map(str::to_string),
        external_source_id: body.get(LEGISTAR_BODY_EXT_ID).and_then(id_text),
        description: None,
        is_active: body.get(LEGISTAR_BODY_ACTIVE).and_then(active_flag),
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

// Legistar reports active flags as 0/1
fn active_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        _ => None,
    }
}
