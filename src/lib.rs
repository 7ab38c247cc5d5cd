pub mod config;
pub mod constants;
pub mod dates;
pub mod error;
pub mod legistar;
pub mod logging;
pub mod metrics;
pub mod sanitize;
pub mod static_data;
pub mod text;
pub mod types;

pub use error::{Result, RosterError};
pub use sanitize::{sanitize_roles, sanitize_roles_at, RoleSanitizer, SanitizeOptions, SanitizeReport};
pub use types::{Body, RawRole, Role, RoleOrigin, RoleTitle, Seat, StaticData, StaticPerson};
