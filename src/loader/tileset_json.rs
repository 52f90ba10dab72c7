// src/loader/tileset_json.rs
use serde::Deserialize;
use std::collections::HashMap;

/// Tileset definition document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTileset {
    pub name: String,
    pub texture: String,
    pub cell_size: u32,
    /// Per-tile overrides keyed by decimal tile id.
    #[serde(default)]
    pub tile_datas: HashMap<String, JsonTileData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JsonTileData {
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub delay: Option<f32>,
    #[serde(default)]
    pub frames: Option<Vec<u32>>,
}

pub fn parse_tileset(txt: &str) -> Result<JsonTileset, serde_json::Error> {
    serde_json::from_str(txt)
}
