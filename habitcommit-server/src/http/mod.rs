//! HTTP layer
//!
//! Axum router over an injected [`HabitStore`](crate::store::HabitStore):
//! handlers validate the request shape, make one store call and map the
//! result onto a status code.

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{app, build_router, run_server, AppState, ServerConfig, ServerError};
