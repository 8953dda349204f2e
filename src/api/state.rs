//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{
    AuthService, CertificateService, OrderService, ServiceContainer, Services, TagService,
    UserService,
};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub tag_service: Arc<dyn TagService>,
    pub certificate_service: Arc<dyn CertificateService>,
    pub user_service: Arc<dyn UserService>,
    pub order_service: Arc<dyn OrderService>,
    /// Redis, when configured. Rate limiting is off without it.
    pub cache: Option<Arc<Cache>>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, cache: Option<Arc<Cache>>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_container(&container, cache, database)
    }

    /// Create application state from any service container.
    pub fn from_container(
        container: &dyn ServiceContainer,
        cache: Option<Arc<Cache>>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service: container.auth(),
            tag_service: container.tags(),
            certificate_service: container.certificates(),
            user_service: container.users(),
            order_service: container.orders(),
            cache,
            database,
        }
    }
}
