use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Server};

use chakra_stones::api::build_routes;
use chakra_stones::app_data::AppData;
use chakra_stones::cli::{execute_command, Cli, Commands};
use chakra_stones::config::{init_logging, BootstrapSettings, SecretManager};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = BootstrapSettings::from_env()?;
    tracing::debug!("Loaded settings: {:?}", settings);

    let skip_migrations = match cli.command {
        None => false,
        Some(Commands::Serve { skip_migrations }) => skip_migrations,
        Some(command) => return execute_command(command, &settings).await,
    };

    let secrets = SecretManager::init()?;
    let app_data = Arc::new(AppData::init(&settings, &secrets)?);

    if !skip_migrations {
        if let Some(connections) = &app_data.connections {
            // A database that is down or unconfigured at boot only degrades
            // stone requests to 503; the server still starts.
            if let Err(err) = connections.migrate().await {
                tracing::error!("Startup migrations failed: {}", err);
            }
        }
    }

    let app = build_routes(&app_data);

    let address = settings.server_address();
    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger", address);
    tracing::info!("API endpoints available at http://{}/api", address);

    Server::new(TcpListener::bind(address)).run(app).await?;

    Ok(())
}
