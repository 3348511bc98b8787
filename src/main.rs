use anyhow::Result;
use clap::Parser;
use log::info;
use std::sync::Arc;

use kistpark_admin::api::{self, AppState};
use kistpark_admin::auth::GoogleTokenVerifier;
use kistpark_admin::cli::Args;
use kistpark_admin::config::Config;
use kistpark_admin::constants::APP_NAME;
use kistpark_admin::logger;
use kistpark_admin::media::create_image_host;
use kistpark_admin::storage::LocalStorage;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.generate_config_path() {
        return Config::generate_default_config(path?);
    }

    let config = args.load_config()?;
    logger::init(&config.logging)?;

    // Check that the OAuth client id is set
    let client_id = match config.auth.google_client_id() {
        Ok(client_id) => client_id,
        Err(_) => {
            eprintln!(
                "❌ Error: {} environment variable not set",
                config.auth.google_client_id_env
            );
            eprintln!("\n💡 To run the admin backend:");
            eprintln!("1. Create an OAuth client id in the Google Cloud console");
            eprintln!(
                "2. Set it as environment variable: export {}=your_client_id",
                config.auth.google_client_id_env
            );
            eprintln!("3. Run {} again", APP_NAME);
            return Ok(());
        }
    };

    let verifier = GoogleTokenVerifier::new(client_id, config.auth.tokeninfo_url.clone())?;
    let image_host = create_image_host(&config.media)?;
    let storage = LocalStorage::new(&config.database).await?;
    info!("📦 Database ready, image host: {}", image_host.provider());

    let state = AppState::new(config, storage, Arc::new(verifier), image_host);
    api::serve(state).await
}
