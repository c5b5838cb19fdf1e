pub mod analysis_client;
pub mod generation_client;
pub mod traits;

use crate::{
    config::GeminiConfig,
    error::{Result, VariationError},
};
use reqwest::Client;
use std::time::Duration;

pub use analysis_client::AnalysisClient;
pub use generation_client::GenerationClient;
pub use traits::{ImageAnalyzer, ImageGenerator};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Both model endpoints sharing one connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    analysis_client: AnalysisClient,
    generation_client: GenerationClient,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VariationError::ConfigError(format!("HTTP client: {}", e)))?;

        log::debug!(
            "Gemini endpoints at {} (analysis: {}, generation: {})",
            config.base_url(),
            config.analysis_model(),
            config.generation_model()
        );

        Ok(Self {
            analysis_client: AnalysisClient::new(
                client.clone(),
                config.base_url(),
                config.analysis_model(),
            ),
            generation_client: GenerationClient::new(
                client,
                config.base_url(),
                config.generation_model(),
            ),
        })
    }

    pub fn analysis(&self) -> &AnalysisClient {
        &self.analysis_client
    }

    pub fn generation(&self) -> &GenerationClient {
        &self.generation_client
    }

    pub fn into_parts(self) -> (AnalysisClient, GenerationClient) {
        (self.analysis_client, self.generation_client)
    }
}
