pub mod bridge;
pub mod importer;
pub mod project;
pub mod script;

pub use bridge::{HostBridge, ProcessBridge};
pub use importer::{HostImporter, FOOTAGE_EXTENSIONS};
pub use project::{CompositionInfo, ProjectInfo};
pub use script::HostCall;
