//! JSON configuration of the `pbp_edges` tool.
//!
//! ```json
//! {
//!   "input": "data/images",
//!   "output_dir": "out",
//!   "reference_dir": "data/masks",
//!   "save_intermediate": true,
//!   "parameter_sets": [
//!     { "name": "default" },
//!     { "name": "p90", "params": { "threshold_policy": "percentile", "threshold_value": 90.0 } }
//!   ]
//! }
//! ```
use crate::params::PbpParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

#[derive(Debug, Deserialize)]
pub struct ToolConfig {
    /// An image file or a directory of images.
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Directory with reference masks named after the input images.
    #[serde(default)]
    pub reference_dir: Option<PathBuf>,
    /// Also write per-direction response maps.
    #[serde(default)]
    pub save_intermediate: bool,
    pub parameter_sets: Vec<ParameterSet>,
}

#[derive(Debug, Deserialize)]
pub struct ParameterSet {
    pub name: String,
    #[serde(default)]
    pub params: PbpParams,
}

pub fn load_config(path: &Path) -> Result<ToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: ToolConfig = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    if config.parameter_sets.is_empty() {
        return Err(format!(
            "Config {} lists no parameter_sets",
            path.display()
        ));
    }
    Ok(config)
}

/// The input itself if it is a file, otherwise the image files of the
/// directory (non-recursive) sorted by name.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>, String> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let entries = fs::read_dir(input)
        .map_err(|e| format!("Failed to list {}: {e}", input.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| format!("Failed to list {}: {e}", input.display()))?
            .path();
        if path.is_file() && is_image_path(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reference mask for `input` inside `reference_dir`: same stem, any image extension.
pub fn find_reference(reference_dir: &Path, input: &Path) -> Option<PathBuf> {
    let stem = input.file_stem()?.to_string_lossy();
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| reference_dir.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_sets_default_missing_params() {
        let json = r#"{
            "input": "images",
            "output_dir": "out",
            "parameter_sets": [
                { "name": "default" },
                { "name": "tight", "params": { "threshold_value": 3.0, "nms_enabled": true } }
            ]
        }"#;
        let config: ToolConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.parameter_sets.len(), 2);
        assert_eq!(config.parameter_sets[0].params, PbpParams::default());
        assert!(config.parameter_sets[1].params.nms_enabled);
        assert_eq!(config.parameter_sets[1].params.window_size, 3);
        assert!(config.reference_dir.is_none());
        assert!(!config.save_intermediate);
    }

    #[test]
    fn image_extension_filter() {
        assert!(is_image_path(Path::new("a/b.PNG")));
        assert!(is_image_path(Path::new("c.jpeg")));
        assert!(!is_image_path(Path::new("params.json")));
        assert!(!is_image_path(Path::new("noext")));
    }
}
