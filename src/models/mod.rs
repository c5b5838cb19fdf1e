pub mod analysis;
pub mod common;
pub mod generation;
pub mod image;

pub use analysis::*;
pub use common::*;
pub use generation::*;
pub use image::*;
