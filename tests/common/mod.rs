//! Shared fixtures: an in-memory SQLite database with the real migrations.

#![allow(dead_code)]

use rust_decimal::Decimal;
use std::sync::Arc;

use gift_certificates::api::{create_router, AppState};
use gift_certificates::config::Config;
use gift_certificates::domain::{CreateCertificate, CreateUser, User};
use gift_certificates::infra::Database;
use gift_certificates::services::{ServiceContainer, Services};

pub const JWT_SECRET: &str = "test-secret-key-for-testing-only-32chars";

pub fn config() -> Config {
    Config::new("sqlite::memory:", JWT_SECRET).expect("valid test config")
}

/// One pooled connection, so every query sees the same in-memory database
pub async fn database() -> Arc<Database> {
    let db = Database::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database with migrations");
    Arc::new(db)
}

pub async fn services() -> (Arc<Database>, Services) {
    let db = database().await;
    let services = Services::from_connection(db.get_connection(), config());
    (db, services)
}

/// Router and services sharing one database
pub async fn app() -> (axum::Router, Services) {
    let db = database().await;
    let services = Services::from_connection(db.get_connection(), config());
    let router = create_router(AppState::from_config(db, None, config()));
    (router, services)
}

pub fn registration(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password: "correct-horse".to_string(),
    }
}

pub fn certificate(name: &str, price_cents: i64, tags: &[&str]) -> CreateCertificate {
    CreateCertificate {
        name: name.to_string(),
        description: format!("{} for two", name),
        price: Decimal::new(price_cents, 2),
        duration: 30,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub async fn register(services: &Services, username: &str) -> User {
    services
        .users()
        .register(registration(username))
        .await
        .expect("registration succeeds")
}

pub async fn admin(services: &Services, username: &str) -> User {
    services
        .users()
        .create_admin(registration(username))
        .await
        .expect("admin creation succeeds")
}

pub fn token_for(services: &Services, user: &User) -> String {
    services
        .auth()
        .issue_token(user)
        .expect("token issued")
        .access_token
}
