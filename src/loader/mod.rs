pub mod animation_json;
pub mod tileset_json;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub(crate) fn read_document(p: &Path) -> Result<String> {
    std::fs::read_to_string(p).map_err(|source| Error::Io {
        path: p.to_path_buf(),
        source,
    })
}

/// Directory textures referenced by the document at `p` are relative to.
pub(crate) fn document_dir(p: &Path) -> PathBuf {
    p.parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"))
}

pub(crate) fn json_error(p: &Path) -> impl FnOnce(serde_json::Error) -> Error + '_ {
    move |source| Error::Json {
        path: p.to_path_buf(),
        source,
    }
}
