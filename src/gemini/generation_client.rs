use crate::{
    codec,
    credentials::Credential,
    error::{Result, VariationError},
    gemini::traits::ImageGenerator,
    models::{ApiErrorResponse, PredictRequest, PredictResponse},
};
use async_trait::async_trait;
use reqwest::Client;

#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GenerationClient {
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
        format!("{}/v1beta/models/{}:predict", self.base_url, self.model)
    }
}

#[async_trait]
impl ImageGenerator for GenerationClient {
    async fn generate(&self, credential: &Credential, prompt: &str) -> Result<Vec<u8>> {
        let request = PredictRequest::single_square(prompt);

        log::info!("Generating image with model: {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", credential.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| VariationError::GenerationError(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VariationError::GenerationError(e.to_string()))?;

        if !status.is_success() {
            let message = ApiErrorResponse::message_from(&body)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(VariationError::GenerationError(message));
        }

        let parsed: PredictResponse = serde_json::from_str(&body)
            .map_err(|e| VariationError::GenerationError(format!("unexpected response: {}", e)))?;

        let encoded = parsed
            .first_image()
            .ok_or_else(|| VariationError::GenerationError("No images generated".into()))?;

        let image = codec::decode(encoded)?;
        if image.is_empty() {
            return Err(VariationError::GenerationError("No images generated".into()));
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const PATH: &str = "/v1beta/models/imagen-test:predict";

    fn client(server: &MockServer) -> GenerationClient {
        GenerationClient::new(Client::new(), server.base_url(), "imagen-test")
    }

    #[tokio::test]
    async fn requests_one_square_sample() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(PATH)
                    .header("x-goog-api-key", "secret")
                    .json_body(json!({
                        "instances": [{ "prompt": "a fox, watercolor" }],
                        "parameters": { "sampleCount": 1, "aspectRatio": "1:1" }
                    }));
                then.status(200)
                    .json_body(json!({ "predictions": [{ "bytesBase64Encoded": "QUVJ" }] }));
            })
            .await;

        let bytes = client(&server)
            .generate(&Credential::new("secret"), "a fox, watercolor")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, b"AEI");
    }

    #[tokio::test]
    async fn empty_predictions_fail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200).json_body(json!({}));
            })
            .await;

        let err = client(&server)
            .generate(&Credential::new("k"), "p")
            .await
            .unwrap_err();

        assert!(matches!(err, VariationError::GenerationError(_)));
    }

    #[tokio::test]
    async fn prediction_without_image_data_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200)
                    .json_body(json!({ "predictions": [{ "bytesBase64Encoded": "====" }] }));
            })
            .await;

        let err = client(&server)
            .generate(&Credential::new("k"), "p")
            .await
            .unwrap_err();

        assert_eq!(err.message(), "No images generated");
    }

    #[tokio::test]
    async fn http_failure_reports_endpoint_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(429)
                    .json_body(json!({ "error": { "message": "Resource has been exhausted" } }));
            })
            .await;

        let err = client(&server)
            .generate(&Credential::new("k"), "p")
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Resource has been exhausted");
    }
}
