use crate::{
    codec,
    error::{Result, VariationError},
    host::{
        bridge::HostBridge,
        project::{frame_from_reply, ProjectInfo},
        script::HostCall,
    },
    models::UploadedImage,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions the host accepts as still footage.
pub const FOOTAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "psd", "tga", "exr",
];

const MAX_COMP_DIMENSION: u32 = 30_000;

pub struct HostImporter<B> {
    bridge: B,
    add_to_active_comp: bool,
}

impl<B: HostBridge> HostImporter<B> {
    pub fn new(bridge: B) -> Self {
        Self {
            bridge,
            add_to_active_comp: true,
        }
    }

    /// Whether imported footage is also laid into the active composition.
    pub fn with_add_to_active_comp(mut self, enabled: bool) -> Self {
        self.add_to_active_comp = enabled;
        self
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Import `image_bytes` as footage named `filename`. When the host has an
    /// active composition the footage is also added there as a centered layer.
    pub fn import_to_host(&self, image_bytes: &[u8], filename: &str) -> Result<()> {
        let add = self.add_to_active_comp;
        self.with_staged_file(image_bytes, filename, |path| {
            HostCall::import_footage(path, add)
        })?;
        log::info!("Imported {} into the host project", filename);
        Ok(())
    }

    /// Same as [`Self::import_to_host`] for base64 text, decoded leniently.
    pub fn import_encoded(&self, encoded: &str, filename: &str) -> Result<()> {
        let bytes = codec::decode(encoded)?;
        self.import_to_host(&bytes, filename)
    }

    /// Swap the source of the first selected layer in the active composition.
    pub fn replace_layer_source(&self, image_bytes: &[u8], filename: &str) -> Result<()> {
        self.with_staged_file(image_bytes, filename, HostCall::replace_layer_source)?;
        log::info!("Replaced selected layer source with {}", filename);
        Ok(())
    }

    pub fn project_info(&self) -> Result<ProjectInfo> {
        let reply = self.call(&HostCall::project_info())?;
        ProjectInfo::from_reply(&reply)
    }

    pub fn create_composition(
        &self,
        name: &str,
        width: u32,
        height: u32,
        duration: f64,
        frame_rate: f64,
    ) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(VariationError::ConfigError(
                "composition name must not be empty".into(),
            ));
        }
        if !(1..=MAX_COMP_DIMENSION).contains(&width) || !(1..=MAX_COMP_DIMENSION).contains(&height)
        {
            return Err(VariationError::ConfigError(format!(
                "composition size {}x{} is outside 1..={}",
                width, height, MAX_COMP_DIMENSION
            )));
        }
        if !(duration.is_finite() && duration > 0.0) {
            return Err(VariationError::ConfigError(
                "composition duration must be positive".into(),
            ));
        }
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(VariationError::ConfigError(
                "composition frame rate must be positive".into(),
            ));
        }

        let reply = self.call(&HostCall::create_composition(
            name, width, height, duration, frame_rate,
        ))?;
        interpret_reply(&reply)
    }

    /// Grab the active composition's current frame as a PNG upload.
    pub fn export_current_frame(&self) -> Result<UploadedImage> {
        let reply = self.call(&HostCall::export_current_frame())?;
        let bytes = codec::decode(&frame_from_reply(&reply)?)?;
        UploadedImage::new(bytes, "image/png", "current_frame.png")
    }

    fn call(&self, call: &HostCall) -> Result<String> {
        self.bridge
            .eval_script(&call.to_script())
            .map_err(into_import_error)
    }

    /// Write the bytes into a fresh temporary directory, run the host call
    /// against that path, and remove the directory whatever the outcome.
    fn with_staged_file(
        &self,
        bytes: &[u8],
        filename: &str,
        make_call: impl FnOnce(&Path) -> HostCall,
    ) -> Result<()> {
        let name = footage_name(filename)?;
        let staging = tempfile::Builder::new()
            .prefix("vargen-")
            .tempdir()
            .map_err(|e| {
                VariationError::ImportError(format!("Failed to create temporary folder: {}", e))
            })?;
        let path: PathBuf = staging.path().join(name);

        let outcome = fs::write(&path, bytes)
            .map_err(|e| {
                VariationError::ImportError(format!("Failed to write temporary file: {}", e))
            })
            .and_then(|_| self.call(&make_call(&path)))
            .and_then(|reply| interpret_reply(&reply));

        if let Err(e) = staging.close() {
            log::warn!("Could not remove temporary file {}: {}", path.display(), e);
        }
        outcome
    }
}

/// Last path component of `filename`, if the host can import it as footage.
fn footage_name(filename: &str) -> Result<String> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| VariationError::ImportError(format!("invalid filename: {}", filename)))?;

    let importable = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FOOTAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);
    if !importable {
        return Err(VariationError::ImportError(
            "File cannot be imported as footage".into(),
        ));
    }
    Ok(name.to_string())
}

fn interpret_reply(reply: &str) -> Result<()> {
    let reply = reply.trim();
    if reply == "success" {
        return Ok(());
    }
    let message = reply.strip_prefix("Error:").map(str::trim).unwrap_or(reply);
    let message = if message.is_empty() {
        "host returned an empty reply"
    } else {
        message
    };
    Err(VariationError::ImportError(message.to_string()))
}

fn into_import_error(e: VariationError) -> VariationError {
    match e {
        VariationError::ImportError(_) => e,
        other => VariationError::ImportError(other.message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::script::parse_args;
    use std::cell::RefCell;

    /// What the bridge observed about the staged file at call time.
    #[derive(Debug, Clone)]
    struct Seen {
        script: String,
        path: Option<PathBuf>,
        contents: Option<Vec<u8>>,
    }

    struct ScriptedBridge {
        reply: std::result::Result<String, String>,
        seen: RefCell<Vec<Seen>>,
    }

    impl ScriptedBridge {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn broken(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn last(&self) -> Seen {
            self.seen.borrow().last().cloned().unwrap()
        }
    }

    impl HostBridge for ScriptedBridge {
        fn eval_script(&self, script: &str) -> Result<String> {
            let path = parse_args(script)
                .first()
                .and_then(|v| v.as_str())
                .map(PathBuf::from);
            let contents = path.as_ref().and_then(|p| fs::read(p).ok());
            self.seen.borrow_mut().push(Seen {
                script: script.to_string(),
                path,
                contents,
            });
            self.reply
                .clone()
                .map_err(VariationError::RequestError)
        }
    }

    #[test]
    fn successful_import_cleans_up() {
        let importer = HostImporter::new(ScriptedBridge::replying("success"));

        importer.import_to_host(b"PNGDATA", "variation_1.png").unwrap();

        let seen = importer.bridge().last();
        assert!(seen.script.starts_with("importFootage("));
        assert!(seen.script.ends_with(", true)"));
        let path = seen.path.unwrap();
        assert_eq!(path.file_name().unwrap(), "variation_1.png");
        assert_eq!(seen.contents.as_deref(), Some(&b"PNGDATA"[..]));
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn host_error_still_cleans_up() {
        let importer = HostImporter::new(ScriptedBridge::replying("Error: No active project"));

        let err = importer.import_to_host(b"PNGDATA", "variation_2.png").unwrap_err();

        assert!(matches!(err, VariationError::ImportError(ref m) if m == "No active project"));
        let seen = importer.bridge().last();
        assert!(seen.contents.is_some());
        assert!(!seen.path.unwrap().exists());
    }

    #[test]
    fn bridge_failure_still_cleans_up() {
        let importer = HostImporter::new(ScriptedBridge::broken("bridge went away"));

        let err = importer.import_to_host(b"PNGDATA", "variation_3.png").unwrap_err();

        assert!(matches!(err, VariationError::ImportError(ref m) if m == "bridge went away"));
        assert!(!importer.bridge().last().path.unwrap().exists());
    }

    #[test]
    fn unsupported_type_never_reaches_host() {
        let importer = HostImporter::new(ScriptedBridge::replying("success"));

        let err = importer.import_to_host(b"%PDF", "notes.pdf").unwrap_err();

        assert_eq!(err.message(), "File cannot be imported as footage");
        assert!(importer.bridge().seen.borrow().is_empty());
    }

    #[test]
    fn directories_in_filename_are_dropped() {
        let importer = HostImporter::new(ScriptedBridge::replying("success"))
            .with_add_to_active_comp(false);

        importer.import_to_host(b"x", "../../escape/v.PNG").unwrap();

        let seen = importer.bridge().last();
        assert_eq!(seen.path.unwrap().file_name().unwrap(), "v.PNG");
        assert!(seen.script.ends_with(", false)"));
    }

    #[test]
    fn encoded_import_decodes_first() {
        let importer = HostImporter::new(ScriptedBridge::replying("success"));

        importer
            .import_encoded("data:image/png;base64,QUVJ", "variation_4.png")
            .unwrap();

        assert_eq!(importer.bridge().last().contents.as_deref(), Some(&b"AEI"[..]));
    }

    #[test]
    fn replace_layer_source_uses_staged_path() {
        let importer = HostImporter::new(ScriptedBridge::replying("Error: No layer selected"));

        let err = importer.replace_layer_source(b"x", "variation_1.png").unwrap_err();

        assert_eq!(err.message(), "No layer selected");
        let seen = importer.bridge().last();
        assert!(seen.script.starts_with("replaceLayerSource("));
        assert!(!seen.path.unwrap().exists());
    }

    #[test]
    fn project_info_round_trip() {
        let importer = HostImporter::new(ScriptedBridge::replying(
            r#"{"name":"promo.aep","numItems":3,"activeComp":null}"#,
        ));
        let info = importer.project_info().unwrap();
        assert_eq!(info.name, "promo.aep");
        assert_eq!(importer.bridge().last().script, "getProjectInfo()");
    }

    #[test]
    fn composition_arguments_are_validated_locally() {
        let importer = HostImporter::new(ScriptedBridge::replying("success"));

        assert!(importer.create_composition(" ", 1920, 1080, 10.0, 24.0).is_err());
        assert!(importer.create_composition("c", 0, 1080, 10.0, 24.0).is_err());
        assert!(importer.create_composition("c", 1920, 1080, 0.0, 24.0).is_err());
        assert!(importer.create_composition("c", 1920, 1080, 10.0, f64::NAN).is_err());
        assert!(importer.bridge().seen.borrow().is_empty());

        importer.create_composition("Variations", 1024, 1024, 5.0, 30.0).unwrap();
        let args = parse_args(&importer.bridge().last().script);
        assert_eq!(args[0], serde_json::Value::from("Variations"));
        assert_eq!(args[1], serde_json::Value::from(1024));
    }

    #[test]
    fn export_frame_becomes_upload() {
        let importer = HostImporter::new(ScriptedBridge::replying(r#"{"image":"QUVJ"}"#));
        let frame = importer.export_current_frame().unwrap();
        assert_eq!(frame.bytes, b"AEI");
        assert_eq!(frame.mime_type, "image/png");

        let failing = HostImporter::new(ScriptedBridge::replying(
            r#"{"error":"No active composition"}"#,
        ));
        assert_eq!(
            failing.export_current_frame().unwrap_err().message(),
            "No active composition"
        );
    }

    #[test]
    fn reply_interpretation() {
        assert!(interpret_reply(" success\n").is_ok());
        assert_eq!(
            interpret_reply("Error: File cannot be imported as footage")
                .unwrap_err()
                .message(),
            "File cannot be imported as footage"
        );
        assert_eq!(interpret_reply("").unwrap_err().message(), "host returned an empty reply");
    }
}
