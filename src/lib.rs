//! Image variations for compositing hosts.
//!
//! An uploaded image is described by a Gemini vision model, four prompts are
//! derived from that description, Imagen renders one image per prompt, and
//! the results can be saved or imported into the host's active project
//! through its scripting bridge.

pub mod codec;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gemini;
pub mod host;
pub mod logger;
pub mod models;
pub mod pipeline;

pub use config::{Config, GeminiConfig};
pub use credentials::{Credential, CredentialStore};
pub use error::{Result, VariationError};
pub use gemini::{AnalysisClient, GeminiClient, GenerationClient, ImageAnalyzer, ImageGenerator};
pub use host::{HostBridge, HostImporter, ProcessBridge, ProjectInfo};
pub use models::{
    AttemptOutcome, AttemptRecord, PipelineStage, ProgressUpdate, RenderDescription,
    UploadedImage, VariationOptions, VariationResult,
};
pub use pipeline::{LogProgress, PipelineOutput, ProgressSink, Session, VariationPipeline};
