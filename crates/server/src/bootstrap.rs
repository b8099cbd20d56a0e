use std::sync::Arc;

use quotesearch_core::config::AppConfig;
use quotesearch_core::{DatasetError, Fulfillment, QuoteDataset};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub fulfillment: Fulfillment,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("quote dataset failed to load: {0}")]
    Dataset(#[source] DatasetError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        dataset_path = %config.dataset.path.display(),
        "starting application bootstrap"
    );

    let dataset = QuoteDataset::from_path(&config.dataset.path).map_err(BootstrapError::Dataset)?;
    let stats = dataset.stats();
    info!(
        event_name = "system.bootstrap.dataset_loaded",
        correlation_id = "bootstrap",
        quotes = stats.quotes,
        authors = stats.authors,
        topics = stats.topics,
        bios = stats.bios,
        "quote dataset indexed"
    );

    Ok(Application { config, fulfillment: Fulfillment::new(Arc::new(dataset)) })
}
