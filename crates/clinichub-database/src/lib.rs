//! # clinichub-database
//!
//! Store traits for every ClinicHub collection, with a PostgreSQL
//! implementation (`repositories`) and an in-memory one (`memory`).

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{
    AppointmentStore, AuditStore, DocumentStore, NotificationStore, PatientStore, Stores,
    SystemStore, UserStore,
};

/// Build an `ILIKE` pattern matching `needle` as a literal substring.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ann"), "%ann%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
