//! Create-admin command - Bootstraps an administrator account.

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::domain::CreateUser;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the create-admin command
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    let services = Services::from_connection(db.get_connection(), config);

    let admin = services
        .users()
        .create_admin(CreateUser {
            username: args.username,
            email: args.email,
            password: args.password,
        })
        .await?;

    println!("Created admin '{}' with id {}", admin.username, admin.id);
    Ok(())
}
