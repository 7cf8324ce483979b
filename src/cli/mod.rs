// CLI module for serving and administrative operations

pub mod migrate;

use clap::{Parser, Subcommand};

use crate::config::BootstrapSettings;
use crate::services::crypto;

/// Chakra stones backend
#[derive(Parser)]
#[command(name = "chakra-stones")]
#[command(about = "Chakra stones catalog backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Skip applying pending migrations at startup
        #[arg(long)]
        skip_migrations: bool,
    },

    /// Apply pending database migrations and exit
    Migrate,

    /// Print a random value for ADMIN_TOKEN_SECRET
    GenerateSecret,
}

/// Execute a command that does not start the server
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(
    command: Commands,
    settings: &BootstrapSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Migrate => migrate::run_migrations(settings).await?,
        Commands::GenerateSecret => println!("{}", crypto::generate_token_secret()),
        Commands::Serve { .. } => {
            return Err("serve is handled by main".into());
        }
    }

    Ok(())
}
