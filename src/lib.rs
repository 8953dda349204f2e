//! Gift Certificates API
//!
//! REST backend for a gift certificate store: certificates described by
//! tags, users who buy them, and the orders those purchases produce. Access
//! is guarded by JWT bearer tokens carrying ADMIN/USER roles.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities, transfer objects and their mappings
//! - **validators**: Field rules and uniqueness checks
//! - **services**: Use cases over the Unit of Work
//! - **infra**: Database, migrations, repositories and Redis
//! - **api**: HTTP handlers, middleware, links and routes
//! - **types**: Pagination and hypermedia types
//! - **errors** / **messages**: Error type and client message keys
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Bootstrap an administrator
//! cargo run -- create-admin --username root --email root@example.com
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod messages;
pub mod services;
pub mod types;
pub mod validators;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Role, User};
pub use errors::{AppError, AppResult};
pub use infra::{Cache, Database};
