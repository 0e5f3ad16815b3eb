//! CLI subcommands.

pub mod indexes;
pub mod seed;
pub mod show;

use std::sync::Arc;

use storehouse_api::config::StoreConfig;
use storehouse_api::db::{self, DocumentStore};

/// Open the store selected by the environment.
async fn open_store() -> Result<Arc<dyn DocumentStore>, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = StoreConfig::from_env()?;
    Ok(db::connect(&config).await?)
}
