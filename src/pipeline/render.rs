use crate::{
    codec,
    error::Result,
    models::{RenderDescription, RenderTile, VariationResult},
};
use std::fs;
use std::path::{Path, PathBuf};

pub fn variation_filename(index: usize) -> String {
    format!("variation_{}.png", index)
}

/// Describe the result grid; tiles are numbered from 1 in result order.
pub fn describe_results(results: &[VariationResult]) -> RenderDescription {
    let tiles = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let index = i + 1;
            RenderTile {
                index,
                label: format!("Variation {}", index),
                source: codec::data_url("image/png", &result.image),
                filename: variation_filename(index),
                prompt: result.prompt.clone(),
            }
        })
        .collect();

    RenderDescription { tiles }
}

/// Write every result into `dir` under its suggested filename.
pub fn save_results(dir: &Path, results: &[VariationResult]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(results.len());
    for (i, result) in results.iter().enumerate() {
        let path = dir.join(variation_filename(i + 1));
        fs::write(&path, &result.image)?;
        log::info!("Saved {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<VariationResult> {
        vec![
            VariationResult {
                image: b"AE".to_vec(),
                prompt: "first".into(),
            },
            VariationResult {
                image: b"AEI".to_vec(),
                prompt: "second".into(),
            },
        ]
    }

    #[test]
    fn tiles_are_labelled_in_order() {
        let render = describe_results(&results());
        assert_eq!(render.tiles.len(), 2);
        assert_eq!(render.tiles[0].label, "Variation 1");
        assert_eq!(render.tiles[0].filename, "variation_1.png");
        assert_eq!(render.tiles[0].source, "data:image/png;base64,QUU=");
        assert_eq!(render.tiles[1].index, 2);
        assert_eq!(render.tiles[1].prompt, "second");
    }

    #[test]
    fn empty_results_render_nothing() {
        assert!(describe_results(&[]).is_empty());
    }

    #[test]
    fn saves_each_result() {
        let temp = tempfile::tempdir().unwrap();
        let paths = save_results(&temp.path().join("out"), &results()).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(fs::read(&paths[1]).unwrap(), b"AEI");
        assert!(paths[0].ends_with("variation_1.png"));
    }
}
