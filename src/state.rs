use std::sync::Arc;
use std::time::Duration;

use crate::catalog::store::{CourseStore, JsonFileStore};
use crate::catalog::CatalogService;
use crate::config::Config;
use crate::llm::client::LlmClient;
use crate::llm::embeddings::{Encoder, HttpEncoder};
use crate::llm::summarize::{LlmSummarizer, Summarizer};
use crate::retrieval::Retriever;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<CatalogService>,
    pub retriever: Arc<Retriever>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl AppState {
    /// Production wiring: JSON catalog file plus HTTP embedding and chat models.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;

        let llm = LlmClient::new(http_client, config.llm.clone());
        let store = Arc::new(JsonFileStore::new(config.catalog_path()));
        let encoder = Arc::new(HttpEncoder::new(llm.clone()));
        let summarizer = Arc::new(LlmSummarizer::new(llm));

        Ok(Self::from_parts(config, store, encoder, summarizer))
    }

    /// Assemble state from explicit collaborators.
    pub fn from_parts(
        config: Config,
        store: Arc<dyn CourseStore>,
        encoder: Arc<dyn Encoder>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        let catalog = Arc::new(CatalogService::new(
            store,
            encoder.clone(),
            config.retrieval.embed_timeout(),
        ));
        let retriever = Arc::new(Retriever::new(
            catalog.clone(),
            encoder,
            summarizer.clone(),
            config.retrieval.clone(),
        ));

        Self {
            config,
            catalog,
            retriever,
            summarizer,
        }
    }
}
