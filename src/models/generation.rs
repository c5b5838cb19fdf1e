use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub instances: Vec<PredictInstance>,
    pub parameters: PredictParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    pub sample_count: u32,
    pub aspect_ratio: String,
}

impl PredictRequest {
    /// One square sample for the given prompt.
    pub fn single_square(prompt: impl Into<String>) -> Self {
        Self {
            instances: vec![PredictInstance {
                prompt: prompt.into(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "1:1".to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub predictions: Option<Vec<Prediction>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
}

impl PredictResponse {
    pub fn first_image(&self) -> Option<&str> {
        self.predictions
            .as_ref()?
            .first()?
            .bytes_base64_encoded
            .as_deref()
            .filter(|data| !data.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_to_wire_shape() {
        let value = serde_json::to_value(PredictRequest::single_square("a fox")).unwrap();
        assert_eq!(
            value,
            json!({
                "instances": [{ "prompt": "a fox" }],
                "parameters": { "sampleCount": 1, "aspectRatio": "1:1" }
            })
        );
    }

    #[test]
    fn first_image_requires_payload() {
        let ok: PredictResponse = serde_json::from_value(json!({
            "predictions": [{ "bytesBase64Encoded": "QUU=", "mimeType": "image/png" }]
        }))
        .unwrap();
        assert_eq!(ok.first_image(), Some("QUU="));

        let filtered: PredictResponse = serde_json::from_value(json!({ "predictions": [{}] })).unwrap();
        assert_eq!(filtered.first_image(), None);

        let none: PredictResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(none.first_image(), None);
    }
}
