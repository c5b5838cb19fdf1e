use crate::{credentials::Credential, error::Result, models::UploadedImage};
use async_trait::async_trait;

/// Turns an image plus an instruction into a natural-language description.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        credential: &Credential,
        prompt: &str,
        image: &UploadedImage,
    ) -> Result<String>;
}

/// Produces one image for one prompt.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, credential: &Credential, prompt: &str) -> Result<Vec<u8>>;
}
