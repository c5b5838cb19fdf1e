use crate::{
    codec,
    credentials::Credential,
    error::{Result, VariationError},
    gemini::traits::ImageAnalyzer,
    models::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse, UploadedImage},
};
use async_trait::async_trait;
use reqwest::Client;

const DEFAULT_ANALYSIS_FAILURE: &str = "Failed to analyze image";

#[derive(Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: String,
    model: String,
}

impl AnalysisClient {
    pub fn new(client: Client, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageAnalyzer for AnalysisClient {
    async fn analyze(
        &self,
        credential: &Credential,
        prompt: &str,
        image: &UploadedImage,
    ) -> Result<String> {
        let request = GenerateContentRequest::with_image(
            prompt,
            image.mime_type.as_str(),
            codec::encode_padded(&image.bytes),
        );

        log::info!("Analyzing {} with model: {}", image.filename, self.model);
        log::debug!(
            "Analysis request: {} prompt chars, {} image bytes ({})",
            prompt.len(),
            image.bytes.len(),
            image.mime_type
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", credential.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Analysis request failed: {:?}", e);
                VariationError::AnalysisError(format!("analysis request failed: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VariationError::AnalysisError(e.to_string()))?;

        if !status.is_success() {
            let message = ApiErrorResponse::message_from(&body)
                .unwrap_or_else(|| DEFAULT_ANALYSIS_FAILURE.to_string());
            log::error!("Analysis endpoint returned {}: {}", status, message);
            return Err(VariationError::AnalysisError(message));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            VariationError::AnalysisError(format!("unexpected analysis response: {}", e))
        })?;

        parsed
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| VariationError::AnalysisError("analysis response contained no text".into()))
    }
}
