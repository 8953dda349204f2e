//! Domain layer: entities, transfer objects and the mappings between them.
//!
//! Nothing here touches persistence; repository models convert into these
//! types with `From`.

pub mod certificate;
pub mod order;
pub mod password;
pub mod role;
pub mod tag;
pub mod user;

pub use certificate::{
    Certificate, CertificateFilter, CertificatePatch, CertificateQuery, CreateCertificate,
    NewCertificate, ReadCertificate, SortField, SortOrder, UpdateCertificate,
};
pub use order::{NewOrder, Order, PurchaseQuery, ReadOrder};
pub use password::Password;
pub use role::Role;
pub use tag::{normalize_tag_name, CreateTag, ReadTag, Tag, UpdateTag};
pub use user::{CreateUser, NewUser, ReadUser, UpdateUser, User, UserPatch};
