use crate::error::{Result, VariationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub duration: f64,
    pub frame_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(default = "untitled")]
    pub name: String,
    #[serde(default)]
    pub num_items: u32,
    #[serde(default)]
    pub active_comp: Option<CompositionInfo>,
}

fn untitled() -> String {
    "Untitled".to_string()
}

#[derive(Deserialize)]
struct HostErrorReply {
    error: String,
}

impl ProjectInfo {
    /// Parse the host's JSON reply, turning `{"error": ...}` into an [`VariationError::ImportError`].
    pub fn from_reply(reply: &str) -> Result<Self> {
        if let Ok(HostErrorReply { error }) = serde_json::from_str::<HostErrorReply>(reply) {
            return Err(VariationError::ImportError(error));
        }
        serde_json::from_str(reply).map_err(|e| {
            VariationError::ImportError(format!("unexpected project info from host: {}", e))
        })
    }
}

#[derive(Deserialize)]
struct FrameReply {
    image: Option<String>,
    error: Option<String>,
}

/// Parse the host's reply to a frame export into the still-encoded image.
pub(crate) fn frame_from_reply(reply: &str) -> Result<String> {
    let parsed: FrameReply = serde_json::from_str(reply).map_err(|e| {
        VariationError::ImportError(format!("unexpected frame export reply: {}", e))
    })?;
    match (parsed.image, parsed.error) {
        (_, Some(error)) => Err(VariationError::ImportError(error)),
        (Some(image), None) if !image.is_empty() => Ok(image),
        _ => Err(VariationError::ImportError(
            "host exported an empty frame".into(),
        )),
    }
}
