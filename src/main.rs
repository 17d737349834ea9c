use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use kms_key_controller::key_management::{KeyManagementService, StateFile};
use kms_key_controller::{Cli, Commands, Config, KeyResource};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.global)?;

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(config.logging.level.as_str())
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting KMS key controller v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;

    let session = config.create_session()?;
    let service = KeyManagementService::new(
        KeyResource::new(session),
        StateFile::new(&cli.global.state),
        config.timeouts.clone(),
    );

    match cli.command {
        Commands::Create(args) => print_json(&service.create(args.into_spec()).await?),
        Commands::Read => print_json(&service.read().await?),
        Commands::Update(args) => print_json(&service.update(&args).await?),
        Commands::Delete => {
            service.delete().await?;
            Ok(())
        }
        Commands::Exists => {
            let exists = service.exists().await?;
            println!("{exists}");
            Ok(())
        }
        Commands::Import(args) => print_json(&service.import(&args.crn).await?),
        Commands::Refresh => match service.refresh().await? {
            Some(data) => print_json(&data),
            None => {
                warn!("❌ Key no longer exists");
                Ok(())
            }
        },
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
