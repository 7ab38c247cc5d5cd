/// Default patterns and names shared by the sanitizer and its configuration.
/// Patterns are case-insensitive regular expressions searched within a title.

// Titles on a primary body matching any of these become "Council President"
pub const DEFAULT_COUNCIL_PRESIDENT_PATTERNS: &[&str] = &["chair", "pres", "super"];

// Titles on any other body matching any of these become "Chair"
pub const DEFAULT_CHAIR_PATTERNS: &[&str] = &["chair", "pres"];

// Used when static data does not define primary bodies.
// Reasonable for most municipalities: the full council and its briefing session.
pub const DEFAULT_PRIMARY_BODIES: &[&str] = &["city council", "council briefing"];

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable naming an alternate config file
pub const CONFIG_PATH_ENV: &str = "COUNCIL_ROLES_CONFIG";

pub fn default_council_president_patterns() -> Vec<String> {
    DEFAULT_COUNCIL_PRESIDENT_PATTERNS.iter().map(|s| s.to_string()).collect()
}

pub fn default_chair_patterns() -> Vec<String> {
    DEFAULT_CHAIR_PATTERNS.iter().map(|s| s.to_string()).collect()
}

pub fn default_primary_bodies() -> Vec<String> {
    DEFAULT_PRIMARY_BODIES.iter().map(|s| s.to_string()).collect()
}
