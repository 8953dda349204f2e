//! Shared types for DRY compliance.

mod links;
mod pagination;

pub use links::{
    CollectionModel, EntityModel, Link, PageLinkBase, REL_FIRST, REL_LAST, REL_NEXT, REL_PREV,
    REL_SELF,
};
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
