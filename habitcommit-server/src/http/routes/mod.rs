//! Route handlers organized by resource

pub mod commits;
pub mod habits;
pub mod health;

/// Method and path of every endpoint, for the start-up banner
pub const ROUTE_TABLE: &[(&str, &str)] = &[
    ("GET", "/habits"),
    ("POST", "/habits"),
    ("GET", "/habits/{id}"),
    ("PUT", "/habits/{id}"),
    ("DELETE", "/habits/{id}"),
    ("GET", "/commits"),
    ("POST", "/commits"),
    ("GET", "/commits/habit/{id}"),
    ("GET", "/commits/today/{date}"),
    ("GET", "/health"),
];
