//! Macroquad implementations of the texture provider and canvas.
//!
//! Everything here needs a live GL context, i.e. must run inside
//! `#[macroquad::main]`.

use macroquad::file::load_file;
use macroquad::logging::{debug, info};
use macroquad::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{Canvas, RegionDraw, ShaderHandle, UniformLocation, UniformValue};
use crate::assets::{TextureHandle, TextureInfo, TextureProvider};
use crate::config::{TextureConfig, TextureFilter};
use crate::error::{Error, Result};

/// Loads each texture path once and owns the GPU textures.
///
/// [`TextureCache::preload`] reads through macroquad's file layer and works
/// on every platform macroquad supports. The synchronous
/// [`TextureProvider::load_texture`] serves preloaded textures from the
/// cache and otherwise reads the file directly, which needs a native
/// filesystem.
pub struct TextureCache {
    config: TextureConfig,
    by_path: HashMap<PathBuf, TextureHandle>,
    textures: Vec<Option<Texture2D>>,
}

impl TextureCache {
    /// Empty cache.
    pub fn new(config: TextureConfig) -> Self {
        TextureCache {
            config,
            by_path: HashMap::new(),
            textures: Vec::new(),
        }
    }

    /// Texture behind `handle`, unless it was unloaded.
    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture2D> {
        self.textures.get(handle.0 as usize)?.as_ref()
    }

    /// Number of distinct paths loaded.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// True when nothing is loaded.
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Release every texture. Handles given out before stay dangling and
    /// draw nothing.
    pub fn unload_all(&mut self) {
        info!("Unloading {} textures", self.by_path.len());
        for slot in &mut self.textures {
            *slot = None;
        }
        self.by_path.clear();
    }

    /// Load `path` ahead of the definitions that refer to it.
    pub async fn preload(&mut self, path: impl AsRef<Path>) -> Result<TextureInfo> {
        let path = path.as_ref();
        if let Some(info) = self.cached(path) {
            return Ok(info);
        }

        let file = self.config.resolve(path);
        let name = file.to_str().ok_or_else(|| Error::Texture {
            path: file.clone(),
            message: "path is not valid UTF-8".to_owned(),
        })?;
        let bytes = load_file(name).await.map_err(|e| Error::Texture {
            path: file.clone(),
            message: format!("{e:?}"),
        })?;
        self.insert(path, &file, &bytes)
    }

    fn cached(&self, path: &Path) -> Option<TextureInfo> {
        let handle = *self.by_path.get(path)?;
        let tex = self.texture(handle)?;
        Some(TextureInfo {
            handle,
            width: tex.width() as u32,
            height: tex.height() as u32,
        })
    }

    fn insert(&mut self, path: &Path, file: &Path, bytes: &[u8]) -> Result<TextureInfo> {
        let image = Image::from_file_with_format(bytes, None).map_err(|e| Error::Texture {
            path: file.to_path_buf(),
            message: format!("{e:?}"),
        })?;

        let tex = Texture2D::from_image(&image);
        tex.set_filter(self.filter());

        let handle = TextureHandle(self.textures.len() as u32);
        let info = TextureInfo {
            handle,
            width: image.width() as u32,
            height: image.height() as u32,
        };
        self.textures.push(Some(tex));
        self.by_path.insert(path.to_path_buf(), handle);

        debug!("Loaded texture {} ({}x{})", file.display(), info.width, info.height);
        Ok(info)
    }

    fn filter(&self) -> FilterMode {
        match self.config.filter {
            TextureFilter::Nearest => FilterMode::Nearest,
            TextureFilter::Linear => FilterMode::Linear,
        }
    }
}

impl TextureProvider for TextureCache {
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo> {
        if let Some(info) = self.cached(path) {
            return Ok(info);
        }

        let file = self.config.resolve(path);
        let bytes = std::fs::read(&file).map_err(|source| Error::Io {
            path: file.clone(),
            source,
        })?;
        self.insert(path, &file, &bytes)
    }
}

/// Compiled materials with the uniform names they declare.
#[derive(Default)]
pub struct ShaderCache {
    shaders: Vec<(Material, Vec<String>)>,
}

impl ShaderCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a GLSL pair. Uniforms must be declared up front.
    pub fn load(
        &mut self,
        vertex: &str,
        fragment: &str,
        uniforms: &[(&str, UniformType)],
    ) -> Result<ShaderHandle> {
        let material = load_material(
            ShaderSource::Glsl { vertex, fragment },
            MaterialParams {
                uniforms: uniforms
                    .iter()
                    .map(|(name, kind)| UniformDesc::new(name, *kind))
                    .collect(),
                ..Default::default()
            },
        )
        .map_err(|e| Error::Shader(format!("{e:?}")))?;

        let names = uniforms.iter().map(|(n, _)| n.to_string()).collect();
        self.shaders.push((material, names));
        Ok(ShaderHandle(self.shaders.len() as u32 - 1))
    }

    fn get(&self, handle: ShaderHandle) -> Option<&(Material, Vec<String>)> {
        self.shaders.get(handle.0 as usize)
    }
}

/// Texture and shader caches bundled for a game loop.
pub struct MacroquadBackend {
    /// Texture loader, also the [`TextureProvider`] for definitions
    pub textures: TextureCache,
    /// Sprite shaders
    pub shaders: ShaderCache,
}

impl MacroquadBackend {
    /// Backend with empty caches.
    pub fn new(config: TextureConfig) -> Self {
        MacroquadBackend {
            textures: TextureCache::new(config),
            shaders: ShaderCache::new(),
        }
    }

    /// Canvas drawing straight to the current macroquad render target.
    pub fn canvas(&self) -> MacroquadCanvas<'_> {
        MacroquadCanvas {
            textures: &self.textures,
            shaders: &self.shaders,
        }
    }
}

/// [`Canvas`] over macroquad's immediate-mode texture drawing.
pub struct MacroquadCanvas<'a> {
    textures: &'a TextureCache,
    shaders: &'a ShaderCache,
}

impl Canvas for MacroquadCanvas<'_> {
    fn draw_texture_region(&mut self, texture: TextureHandle, params: &RegionDraw) {
        let Some(tex) = self.textures.texture(texture) else {
            return;
        };
        let src = params.source;
        let dest = params.dest;

        draw_texture_ex(
            tex,
            dest.x - params.origin.x,
            dest.y - params.origin.y,
            params.tint,
            DrawTextureParams {
                dest_size: Some(vec2(dest.w, dest.h)),
                source: Some(Rect::new(src.x, src.y, src.w.abs(), src.h.abs())),
                rotation: params.rotation.to_radians(),
                flip_x: src.w < 0.0,
                flip_y: src.h < 0.0,
                pivot: Some(vec2(dest.x, dest.y)),
            },
        );
    }

    fn draw_texture(&mut self, texture: TextureHandle, position: Vec2) {
        if let Some(tex) = self.textures.texture(texture) {
            draw_texture(tex, position.x, position.y, WHITE);
        }
    }

    fn begin_shader(&mut self, shader: ShaderHandle) {
        if let Some((material, _)) = self.shaders.get(shader) {
            gl_use_material(material);
        }
    }

    fn end_shader(&mut self) {
        gl_use_default_material();
    }

    fn uniform_location(&mut self, shader: ShaderHandle, name: &str) -> Option<UniformLocation> {
        let (_, names) = self.shaders.get(shader)?;
        names
            .iter()
            .position(|n| n == name)
            .map(|i| UniformLocation(i as u32))
    }

    fn set_uniform(&mut self, shader: ShaderHandle, location: UniformLocation, value: UniformValue) {
        let Some((material, names)) = self.shaders.get(shader) else {
            return;
        };
        let Some(name) = names.get(location.0 as usize) else {
            return;
        };
        match value {
            UniformValue::Float(v) => material.set_uniform(name, v),
            UniformValue::Vec2([x, y]) => material.set_uniform(name, vec2(x, y)),
            UniformValue::Vec3([x, y, z]) => material.set_uniform(name, vec3(x, y, z)),
            UniformValue::Vec4([x, y, z, w]) => material.set_uniform(name, vec4(x, y, z, w)),
            UniformValue::Int(v) => material.set_uniform(name, v),
        }
    }
}
