//! Application services layer - Use cases and business logic.
//!
//! Services validate input, orchestrate repositories through the Unit of
//! Work and decide which failures are reported as not-found or conflict.

mod auth_service;
mod certificate_service;
pub mod container;
mod order_service;
mod tag_service;
mod user_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use certificate_service::{CertificateManager, CertificateService};
pub use order_service::{OrderManager, OrderService};
pub use tag_service::{TagManager, TagService};
pub use user_service::{UserManager, UserService};

