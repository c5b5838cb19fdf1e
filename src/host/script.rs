//! Host-side calls, rendered as script source.
//!
//! Arguments are emitted as JSON literals, which are valid script literals,
//! so paths and names never need hand escaping. The host is expected to
//! define these functions:
//!
//! - `importFootage(path, addToActiveComp)` -> `"success"` | `"Error: ..."`
//! - `replaceLayerSource(path)` -> `"success"` | `"Error: ..."`
//! - `getProjectInfo()` -> project JSON | `{"error": ...}`
//! - `createComposition(name, width, height, duration, frameRate)` -> `"success"` | `"Error: ..."`
//! - `exportCurrentFrame()` -> `{"image": base64}` | `{"error": ...}`

use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct HostCall {
    pub function: &'static str,
    pub args: Vec<Value>,
}

impl HostCall {
    pub fn import_footage(path: &Path, add_to_active_comp: bool) -> Self {
        Self {
            function: "importFootage",
            args: vec![path_arg(path), Value::Bool(add_to_active_comp)],
        }
    }

    pub fn replace_layer_source(path: &Path) -> Self {
        Self {
            function: "replaceLayerSource",
            args: vec![path_arg(path)],
        }
    }

    pub fn project_info() -> Self {
        Self {
            function: "getProjectInfo",
            args: Vec::new(),
        }
    }

    pub fn create_composition(
        name: &str,
        width: u32,
        height: u32,
        duration: f64,
        frame_rate: f64,
    ) -> Self {
        Self {
            function: "createComposition",
            args: vec![
                Value::from(name),
                Value::from(width),
                Value::from(height),
                Value::from(duration),
                Value::from(frame_rate),
            ],
        }
    }

    pub fn export_current_frame() -> Self {
        Self {
            function: "exportCurrentFrame",
            args: Vec::new(),
        }
    }

    pub fn to_script(&self) -> String {
        let args: Vec<String> = self.args.iter().map(Value::to_string).collect();
        format!("{}({})", self.function, args.join(", "))
    }
}

fn path_arg(path: &Path) -> Value {
    // Forward slashes are accepted by the host on every platform.
    Value::from(path.to_string_lossy().replace('\\', "/"))
}

/// Inverse of [`HostCall::to_script`] for the argument list.
#[cfg(test)]
pub(crate) fn parse_args(script: &str) -> Vec<Value> {
    let open = script.find('(').unwrap();
    let close = script.rfind(')').unwrap();
    serde_json::from_str(&format!("[{}]", &script[open + 1..close])).unwrap()
}
