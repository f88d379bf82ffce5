//! Catalog CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! catalog migrate
//!
//! # Create a staff user and give them a token
//! catalog user create -e owner@example.com -n "Owner" --staff
//! catalog token issue -e owner@example.com
//!
//! # Load the sample catalog
//! catalog seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user` - Create, list, activate and deactivate API users
//! - `token` - Issue and revoke API tokens
//! - `seed` - Seed database with sample colors, articles and materials

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about = "Catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage API users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Seed the database with a sample catalog
    Seed {
        /// Email of the user that owns the seeded rows (created if missing)
        #[arg(short, long, default_value = commands::seed::DEFAULT_OWNER)]
        owner: String,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new API user
    Create {
        /// User email address
        #[arg(short, long)]
        email: String,

        /// User display name
        #[arg(short, long)]
        name: String,

        /// Allow variant writes and deletes
        #[arg(long)]
        staff: bool,
    },
    /// List API users
    List,
    /// Allow a user's token again
    Activate {
        #[arg(short, long)]
        email: String,
    },
    /// Reject a user's token without deleting the user
    Deactivate {
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Create or rotate a user's token and print the key
    Issue {
        #[arg(short, long)]
        email: String,
    },
    /// Delete a user's token
    Revoke {
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog=info,catalog_api=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { email, name, staff } => {
                commands::user::create(&email, &name, staff).await?;
            }
            UserAction::List => commands::user::list().await?,
            UserAction::Activate { email } => commands::user::set_active(&email, true).await?,
            UserAction::Deactivate { email } => {
                commands::user::set_active(&email, false).await?;
            }
        },
        Commands::Token { action } => match action {
            TokenAction::Issue { email } => commands::token::issue(&email).await?,
            TokenAction::Revoke { email } => commands::token::revoke(&email).await?,
        },
        Commands::Seed { owner } => commands::seed::run(&owner).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "catalog", "user", "create", "-e", "owner@example.com", "-n", "Owner", "--staff",
        ])
        .map_err(|e| e.to_string());
        assert!(matches!(
            cli,
            Ok(Cli {
                command: Commands::User {
                    action: UserAction::Create { staff: true, .. }
                }
            })
        ));
    }

    #[test]
    fn test_seed_owner_defaults() {
        let cli = Cli::try_parse_from(["catalog", "seed"]).map_err(|e| e.to_string());
        assert!(matches!(
            cli,
            Ok(Cli { command: Commands::Seed { owner } }) if owner == commands::seed::DEFAULT_OWNER
        ));
    }
}
