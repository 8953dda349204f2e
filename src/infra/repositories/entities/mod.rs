//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod certificate;
pub mod certificate_tag;
pub mod order;
pub mod tag;
pub mod user;
pub mod user_role;
