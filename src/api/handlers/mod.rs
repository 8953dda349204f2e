//! HTTP request handlers.

pub mod auth_handler;
pub mod certificate_handler;
pub mod order_handler;
pub mod tag_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use certificate_handler::certificate_routes;
pub use order_handler::order_routes;
pub use tag_handler::tag_routes;
pub use user_handler::user_routes;
