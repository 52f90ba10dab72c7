// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use macroquad::math::Vec2;
use macroquad_tiles::render::{RegionDraw, ShaderHandle, UniformLocation, UniformValue};
use macroquad_tiles::{Canvas, Result, TextureHandle, TextureInfo, TextureProvider};

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("mq_tiles_{tag}_{nanos}"));
    fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Texture provider that never touches the GPU: every path has a fixed size.
pub struct FakeTextures {
    size: (u32, u32),
    pub loaded: HashMap<PathBuf, TextureHandle>,
    pub loads: usize,
}

impl FakeTextures {
    pub fn new(width: u32, height: u32) -> Self {
        FakeTextures {
            size: (width, height),
            loaded: HashMap::new(),
            loads: 0,
        }
    }
}

impl TextureProvider for FakeTextures {
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo> {
        let next = TextureHandle(self.loaded.len() as u32);
        let handle = *self.loaded.entry(path.to_path_buf()).or_insert_with(|| {
            self.loads += 1;
            next
        });
        Ok(TextureInfo {
            handle,
            width: self.size.0,
            height: self.size.1,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Region(TextureHandle, RegionDraw),
    Whole(TextureHandle, Vec2),
    BeginShader(ShaderHandle),
    EndShader,
    Lookup(String),
    Uniform(UniformLocation, UniformValue),
}

/// Canvas that records every call in order.
#[derive(Default)]
pub struct RecordingCanvas {
    pub calls: Vec<Call>,
    /// Uniform names the fake shader knows about
    pub uniforms: Vec<String>,
}

impl RecordingCanvas {
    pub fn regions(&self) -> Vec<RegionDraw> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Region(_, r) => Some(*r),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn draw_texture_region(&mut self, texture: TextureHandle, params: &RegionDraw) {
        self.calls.push(Call::Region(texture, *params));
    }

    fn draw_texture(&mut self, texture: TextureHandle, position: Vec2) {
        self.calls.push(Call::Whole(texture, position));
    }

    fn begin_shader(&mut self, shader: ShaderHandle) {
        self.calls.push(Call::BeginShader(shader));
    }

    fn end_shader(&mut self) {
        self.calls.push(Call::EndShader);
    }

    fn uniform_location(&mut self, _shader: ShaderHandle, name: &str) -> Option<UniformLocation> {
        self.calls.push(Call::Lookup(name.to_owned()));
        self.uniforms
            .iter()
            .position(|n| n == name)
            .map(|i| UniformLocation(i as u32))
    }

    fn set_uniform(&mut self, _shader: ShaderHandle, location: UniformLocation, value: UniformValue) {
        self.calls.push(Call::Uniform(location, value));
    }
}
