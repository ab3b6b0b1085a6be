//! Observability module - request correlation ids.

mod request_id;

pub use request_id::RequestIdMiddleware;
