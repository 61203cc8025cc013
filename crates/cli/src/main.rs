//! Quotebox CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! qb-cli migrate
//!
//! # List a shop's quotes, newest first
//! qb-cli quotes list --shop acme.myshopify.com
//!
//! # Set a shop's notification email
//! qb-cli settings set --shop acme.myshopify.com --email sales@acme.com
//! ```
//!
//! # Environment Variables
//!
//! - `QUOTEBOX_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "qb-cli")]
#[command(author, version, about = "Quotebox CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Inspect quotes
    Quotes {
        #[command(subcommand)]
        action: QuotesAction,
    },
    /// Manage per-shop settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum QuotesAction {
    /// List a shop's quotes, newest first
    List {
        /// Shop domain (e.g. `acme.myshopify.com`)
        #[arg(short, long)]
        shop: String,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Set the notification email for a shop
    Set {
        /// Shop domain (e.g. `acme.myshopify.com`)
        #[arg(short, long)]
        shop: String,

        /// Address that receives new quote notifications
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Quotes { action } => match action {
            QuotesAction::List { shop } => commands::quotes::list(&shop).await,
        },
        Commands::Settings { action } => match action {
            SettingsAction::Set { shop, email } => commands::settings::set(&shop, &email).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_settings_set() {
        let cli = Cli::try_parse_from([
            "qb-cli",
            "settings",
            "set",
            "--shop",
            "acme.myshopify.com",
            "-e",
            "sales@acme.com",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Settings {
                action: SettingsAction::Set { .. }
            })
        ));
    }

    #[test]
    fn test_quotes_list_requires_shop() {
        assert!(Cli::try_parse_from(["qb-cli", "quotes", "list"]).is_err());
    }
}
