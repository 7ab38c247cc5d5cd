use std::collections::BTreeSet;

use crate::text::simplified_key;
use crate::types::{Body, RawRole, StaticData};

/// Names of the bodies that count as the full council
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryBodies {
    names: BTreeSet<String>,
}

impl PrimaryBodies {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|n| simplified_key(n.as_ref())).collect(),
        }
    }

    /// Primary bodies declared in static data, else `defaults`
    pub fn resolve(static_data: Option<&StaticData>, defaults: &[String]) -> Self {
        match static_data {
            Some(data) if !data.primary_bodies.is_empty() => Self::new(data.primary_body_names()),
            _ => Self::new(defaults),
        }
    }

    /// Whether `body` is present, named, and one of the primary bodies
    pub fn contains(&self, body: Option<&Body>) -> bool {
        body.and_then(Body::key)
            .map(|key| self.names.contains(&key))
            .unwrap_or(false)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

pub fn is_primary_body(role: &RawRole, primary: &PrimaryBodies) -> bool {
    primary.contains(role.body.as_ref())
}
