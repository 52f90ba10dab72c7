use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Sampling filter applied to every texture the cache uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    /// Crisp pixel art
    #[default]
    Nearest,
    /// Smooth scaling
    Linear,
}

/// Texture cache settings, usually read from a small JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Filter for uploaded textures
    pub filter: TextureFilter,
    /// Directory prepended to texture paths when reading files.
    /// Cache keys stay the path as requested.
    pub root: Option<PathBuf>,
}

impl TextureConfig {
    /// Read settings from a JSON document. Missing fields use defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p).map_err(|source| Error::Io {
            path: p.to_path_buf(),
            source,
        })?;
        Self::from_json(&txt).map_err(|source| Error::Json {
            path: p.to_path_buf(),
            source,
        })
    }

    fn from_json(txt: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(txt)
    }

    /// Where on disk the texture requested as `path` lives.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = TextureConfig::from_json("{}").unwrap();
        assert_eq!(cfg.filter, TextureFilter::Nearest);
        assert!(cfg.root.is_none());
        assert_eq!(cfg.resolve(Path::new("a/b.png")), PathBuf::from("a/b.png"));
    }

    #[test]
    fn root_and_filter_are_read() {
        let cfg = TextureConfig::from_json(r#"{"filter":"linear","root":"assets"}"#).unwrap();
        assert_eq!(cfg.filter, TextureFilter::Linear);
        assert_eq!(
            cfg.resolve(Path::new("tiles.png")),
            PathBuf::from("assets").join("tiles.png")
        );
    }

    #[test]
    fn unknown_filter_is_rejected() {
        assert!(TextureConfig::from_json(r#"{"filter":"bicubic"}"#).is_err());
    }
}
