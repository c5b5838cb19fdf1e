use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_GENERATION_MODEL: &str = "imagen-3.0-generate-001";

#[derive(Debug, Clone, Default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub analysis_model: Option<String>,
    pub generation_model: Option<String>,
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let base_url = env::var("GEMINI_BASE_URL").ok();
        let analysis_model = env::var("VARGEN_ANALYSIS_MODEL").ok();
        let generation_model = env::var("VARGEN_GENERATION_MODEL").ok();

        GeminiConfig {
            api_key,
            base_url,
            analysis_model,
            generation_model,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_models(
        mut self,
        analysis_model: impl Into<String>,
        generation_model: impl Into<String>,
    ) -> Self {
        self.analysis_model = Some(analysis_model.into());
        self.generation_model = Some(generation_model.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn analysis_model(&self) -> &str {
        self.analysis_model
            .as_deref()
            .unwrap_or(DEFAULT_ANALYSIS_MODEL)
    }

    pub fn generation_model(&self) -> &str {
        self.generation_model
            .as_deref()
            .unwrap_or(DEFAULT_GENERATION_MODEL)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gemini: GeminiConfig,
    /// Command that evaluates host scripts; the script is appended as the last argument.
    pub host_bridge: Option<String>,
    pub credentials_path: Option<PathBuf>,
    pub log_json: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host_bridge = env::var("VARGEN_HOST_BRIDGE")
            .ok()
            .filter(|cmd| !cmd.trim().is_empty());
        let credentials_path = env::var("VARGEN_CREDENTIALS").ok().map(PathBuf::from);
        let log_json = env::var("VARGEN_LOG_JSON")
            .ok()
            .map_or(false, |val| val == "true");

        Config {
            gemini: GeminiConfig::from_env(),
            host_bridge,
            credentials_path,
            log_json,
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_host_bridge(mut self, command: impl Into<String>) -> Self {
        self.host_bridge = Some(command.into());
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_endpoints() {
        let config = GeminiConfig::new();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.analysis_model(), "gemini-2.0-flash-exp");
        assert_eq!(config.generation_model(), "imagen-3.0-generate-001");
    }

    #[test]
    fn builders_override_defaults() {
        let config = GeminiConfig::new()
            .with_base_url("http://127.0.0.1:9999/")
            .with_models("a-model", "g-model")
            .with_api_key("k");
        assert_eq!(config.base_url(), "http://127.0.0.1:9999");
        assert_eq!(config.analysis_model(), "a-model");
        assert_eq!(config.generation_model(), "g-model");
        assert_eq!(config.api_key.as_deref(), Some("k"));

        let config = Config::new()
            .with_gemini(config)
            .with_host_bridge("osascript")
            .with_credentials_path("/tmp/creds.json");
        assert_eq!(config.host_bridge.as_deref(), Some("osascript"));
        assert_eq!(config.gemini.analysis_model(), "a-model");
    }
}
