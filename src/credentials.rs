use crate::config::Config;
use crate::error::{Result, VariationError};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed key the API key is stored under.
pub const CREDENTIAL_KEY: &str = "gemini_api_key";

/// Opaque API key. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(***{} chars)", self.0.len())
    }
}

/// Key-value file holding the credential between runs.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The configured override path, falling back to [`Self::default_location`].
    /// Only commands that read or write the key should resolve a store.
    pub fn for_config(config: &Config) -> Result<Self> {
        match &config.credentials_path {
            Some(path) => Ok(Self::new(path)),
            None => Self::default_location(),
        }
    }

    /// `<config dir>/vargen/credentials.json`
    pub fn default_location() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            VariationError::ConfigError("could not determine the user config directory".into())
        })?;
        Ok(Self::new(base.join("vargen").join("credentials.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Credential>> {
        let entries = self.read_entries()?;
        Ok(entries
            .get(CREDENTIAL_KEY)
            .filter(|key| !key.trim().is_empty())
            .map(|key| Credential::new(key.clone())))
    }

    pub fn save(&self, raw_key: &str) -> Result<Credential> {
        let key = raw_key.trim();
        if key.is_empty() {
            return Err(VariationError::ConfigError(
                "Please enter a valid API key".into(),
            ));
        }

        let mut entries = self.read_entries()?;
        entries.insert(CREDENTIAL_KEY.to_string(), key.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&entries)
            .map_err(|e| VariationError::SerializationError(e.to_string()))?;
        fs::write(&self.path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        log::info!("API key saved to {}", self.path.display());
        Ok(Credential::new(key))
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| {
            VariationError::ConfigError(format!(
                "credential store {} is corrupt: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_store_loads_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(temp.path().join("none.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn configured_path_skips_the_config_dir() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("override.json");
        let config = Config::default().with_credentials_path(&path);

        let store = CredentialStore::for_config(&config).unwrap();
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn save_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(temp.path().join("nested").join("creds.json"));

        let saved = store.save("  AIza-test-key \n").unwrap();
        assert_eq!(saved.as_str(), "AIza-test-key");

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn save_preserves_other_entries() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("creds.json");
        fs::write(&path, r#"{"other":"value"}"#).unwrap();

        CredentialStore::new(&path).save("k1").unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.get("other").map(String::as_str), Some("value"));
        assert_eq!(raw.get(CREDENTIAL_KEY).map(String::as_str), Some("k1"));
    }

    #[test]
    fn rejects_blank_key() {
        let temp = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(temp.path().join("creds.json"));
        let err = store.save("   ").unwrap_err();
        assert!(matches!(err, VariationError::ConfigError(_)));
        assert!(!store.path().exists());
    }

    #[test]
    fn debug_hides_key() {
        let rendered = format!("{:?}", Credential::new("supersecret"));
        assert!(!rendered.contains("supersecret"));
    }
}
