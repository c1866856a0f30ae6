//! HTTP surface of the records service.
//!
//! The router is composable — `api_router()` returns a `Router` that can
//! be mounted on any axum server instance; `start_server()` runs it with
//! a graceful-shutdown handle.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server, ServerHandle};
pub use types::ApiContext;
