//! Loader for the static override file.
//!
//! Expected top-level keys, each optional: `seats`, `primary_bodies` and
//! `persons`. A person's `seat` names a top-level seat and its `roles` refer to
//! a primary body by name or describe a committee body inline. Invalid role
//! entries are logged and skipped so one bad line does not discard the file.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, error};

use crate::dates::parse_datetime;
use crate::error::{Result, RosterError};
use crate::types::{Body, Role, RoleOrigin, RoleTitle, Seat, StaticData, StaticPerson};

impl StaticData {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RosterError::StaticData(format!("Failed to read static data file '{}': {}", path.display(), e))
        })?;
        let data = Self::from_json_str(&content)?;
        let seats: Vec<&String> = data.seats.keys().collect();
        let primary_bodies: Vec<&String> = data.primary_bodies.keys().collect();
        let persons: Vec<&String> = data.persons.keys().collect();
        debug!(
            path = %path.display(),
            ?seats,
            ?primary_bodies,
            ?persons,
            "Static data parsed"
        );
        Ok(data)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(content)?;
        parse_static_data(&json)
    }
}

pub fn parse_static_data(json: &Value) -> Result<StaticData> {
    let top = json
        .as_object()
        .ok_or_else(|| RosterError::StaticData("top level must be a JSON object".to_string()))?;

    let mut seats = BTreeMap::new();
    for (seat_name, seat_json) in section(top, "seats")? {
        let mut seat: Seat = serde_json::from_value(seat_json.clone())?;
        if seat.name.is_empty() {
            seat.name = seat_name.clone();
        }
        // roles are attached per person
        seat.roles.clear();
        seats.insert(seat_name.clone(), seat);
    }

    let mut primary_bodies = BTreeMap::new();
    for (body_name, body_json) in section(top, "primary_bodies")? {
        let mut body: Body = serde_json::from_value(body_json.clone())?;
        if body.name.is_none() {
            body.name = Some(body_name.clone());
        }
        primary_bodies.insert(body_name.clone(), body);
    }

    let mut persons = BTreeMap::new();
    for (person_name, person_json) in section(top, "persons")? {
        let person = parse_static_person(person_name, person_json, &seats, &primary_bodies)?;
        persons.insert(person_name.clone(), person);
    }

    Ok(StaticData {
        seats,
        primary_bodies,
        persons,
    })
}

fn section<'a>(top: &'a Map<String, Value>, key: &str) -> Result<Vec<(&'a String, &'a Value)>> {
    match top.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(entries)) => Ok(entries.iter().collect()),
        Some(_) => Err(RosterError::StaticData(format!("'{}' must be a JSON object", key))),
    }
}

/// Parse one entry of `persons`, validating its seat and roles against the
/// top-level seats and primary bodies.
pub fn parse_static_person(
    person_name: &str,
    person_json: &Value,
    all_seats: &BTreeMap<String, Seat>,
    primary_bodies: &BTreeMap<String, Body>,
) -> Result<StaticPerson> {
    debug!(person = person_name, "Parsing static person");

    let fields = person_json
        .as_object()
        .ok_or_else(|| RosterError::StaticData(format!("person '{}' must be a JSON object", person_name)))?;

    // "seat" and "roles" are references, not serialized Seat/Role values
    let plain: Map<String, Value> = fields
        .iter()
        .filter(|(k, _)| k.as_str() != "seat" && k.as_str() != "roles")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let mut person: StaticPerson = serde_json::from_value(Value::Object(plain))?;
    if person.name.is_empty() {
        person.name = person_name.to_string();
    }

    let Some(seat_name) = fields.get("seat").and_then(Value::as_str) else {
        debug!(person = person_name, "Seat name not given");
        return Ok(person);
    };

    let Some(seat) = all_seats.get(seat_name) else {
        error!(person = person_name, "{} is not defined in top-level 'seats'", seat_name);
        return Ok(person);
    };

    // copy so the top-level seat stays free of this person's roles
    let mut seat = seat.clone();
    match fields.get("roles").and_then(Value::as_array) {
        Some(roles_json) => {
            for role_json in roles_json {
                match parse_static_role(role_json, primary_bodies) {
                    Ok(role) => seat.roles.push(role),
                    Err(reason) => error!(person = person_name, "{} is ignored. {}", role_json, reason),
                }
            }
        }
        None => debug!(person = person_name, "Roles not given"),
    }

    person.seat = Some(seat);
    Ok(person)
}

/// Parse a static role; the error is the reason it must be skipped.
pub fn parse_static_role(
    role_json: &Value,
    primary_bodies: &BTreeMap<String, Body>,
) -> std::result::Result<Role, String> {
    let body = match role_json.get("body") {
        Some(Value::String(name)) => primary_bodies
            .get(name)
            .cloned()
            .ok_or_else(|| format!("{} is not defined in top-level 'primary_bodies'", name))?,
        Some(inline) if inline.is_object() => serde_json::from_value::<Body>(inline.clone())
            .map_err(|e| format!("body is not a valid Body: {}", e))?,
        _ => return Err("body is missing".to_string()),
    };

    let title_text = role_json
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| "title is missing".to_string())?;
    let title: RoleTitle = title_text.parse().map_err(|e| format!("{}", e))?;

    let start_datetime = timestamp_field(role_json, "start_datetime")?;
    let end_datetime = timestamp_field(role_json, "end_datetime")?;

    let external_source_id = role_json.get("external_source_id").and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    Ok(Role {
        title,
        body: Some(body),
        start_datetime,
        end_datetime,
        external_source_id,
        origin: RoleOrigin::Static,
    })
}

fn timestamp_field(role_json: &Value, key: &str) -> std::result::Result<chrono::DateTime<chrono::Utc>, String> {
    let raw = role_json
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("{} is missing", key))?;
    parse_datetime(raw).ok_or_else(|| format!("{} '{}' is not a timestamp", key, raw))
}
