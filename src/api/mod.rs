//! API layer - HTTP handlers and middleware
//!
//! - Request handlers per resource
//! - Middleware (authentication, role guards, rate limiting)
//! - Validating JSON extractor
//! - Hypermedia links and route definitions

pub mod extractors;
pub mod handlers;
pub mod links;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
