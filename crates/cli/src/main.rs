//! Accounts CLI - database migrations and manager accounts.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! accounts-cli migrate
//!
//! # Create a manager (staff) account
//! accounts-cli manager create -l alice -p 's3cret' -n "Alice" -d sales
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `manager create` - Create manager accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "accounts-cli")]
#[command(author, version, about = "Accounts service CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage manager (staff) accounts
    Manager {
        #[command(subcommand)]
        action: ManagerAction,
    },
}

#[derive(Subcommand)]
enum ManagerAction {
    /// Create a new manager
    Create {
        /// Login used for HTTP Basic auth
        #[arg(short, long)]
        login: String,

        /// Password used for HTTP Basic auth
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Department
        #[arg(short, long)]
        department: Option<String>,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Manager { action } => match action {
            ManagerAction::Create {
                login,
                password,
                name,
                department,
            } => {
                let password = SecretString::from(password);
                commands::manager::create(&login, &password, &name, department.as_deref())
                    .await?;
            }
        },
    }
    Ok(())
}
