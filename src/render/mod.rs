//! Drawing seam between the tile/animation core and a rendering backend.

pub mod backend;
pub mod cull;

use macroquad::color::{Color, WHITE};
use macroquad::math::{Rect, Vec2};

use crate::assets::TextureHandle;

/// 2D camera in pixel space: world point `target` appears at screen point `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    /// World position the camera looks at
    pub target: Vec2,
    /// Screen position of `target`
    pub offset: Vec2,
}

impl Camera {
    /// Camera looking at `target`, pinned to the top-left of the screen.
    pub fn new(target: Vec2) -> Self {
        Camera {
            target,
            offset: Vec2::ZERO,
        }
    }

    /// World position of the top-left screen corner.
    pub fn top_left(&self) -> Vec2 {
        self.target - self.offset
    }
}

/// One textured quad.
///
/// A negative `source.w`/`source.h` mirrors the image on that axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionDraw {
    /// Sub-rectangle of the texture in pixels
    pub source: Rect,
    /// Destination position and size
    pub dest: Rect,
    /// Rotation pivot relative to `dest`'s top-left; `dest` is shifted back by it
    pub origin: Vec2,
    /// Rotation in degrees
    pub rotation: f32,
    /// Color multiplier
    pub tint: Color,
}

impl RegionDraw {
    /// Unscaled, unrotated draw of `source` at `position`.
    pub fn at(source: Rect, position: Vec2) -> Self {
        RegionDraw {
            source,
            dest: Rect::new(position.x, position.y, source.w.abs(), source.h.abs()),
            origin: Vec2::ZERO,
            rotation: 0.0,
            tint: WHITE,
        }
    }
}

/// Opaque shader id owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

/// Backend-resolved uniform slot of a shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Value for a shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `float`
    Float(f32),
    /// `vec2`
    Vec2([f32; 2]),
    /// `vec3`
    Vec3([f32; 3]),
    /// `vec4`
    Vec4([f32; 4]),
    /// `int`
    Int(i32),
}

/// Low-level drawing primitives the core draws through.
///
/// One call per visible tile or sprite frame; no batching is expected.
pub trait Canvas {
    /// Draw a sub-rectangle of `texture`.
    fn draw_texture_region(&mut self, texture: TextureHandle, params: &RegionDraw);

    /// Draw the whole of `texture` unscaled at `position`.
    fn draw_texture(&mut self, texture: TextureHandle, position: Vec2);

    /// Route following draws through `shader`.
    fn begin_shader(&mut self, shader: ShaderHandle);

    /// Return to the default shader.
    fn end_shader(&mut self);

    /// Look up a uniform by name.
    fn uniform_location(&mut self, shader: ShaderHandle, name: &str) -> Option<UniformLocation>;

    /// Set a uniform previously resolved with [`Canvas::uniform_location`].
    fn set_uniform(&mut self, shader: ShaderHandle, location: UniformLocation, value: UniformValue);
}

/// Keeps a shader active for its lifetime and ends it exactly once on drop.
pub struct ShaderScope<'c, C: Canvas + ?Sized> {
    canvas: &'c mut C,
}

impl<'c, C: Canvas + ?Sized> ShaderScope<'c, C> {
    /// Begin `shader` on `canvas`.
    pub fn begin(canvas: &'c mut C, shader: ShaderHandle) -> Self {
        canvas.begin_shader(shader);
        ShaderScope { canvas }
    }

    /// Canvas to draw on while the shader is active.
    pub fn canvas(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for ShaderScope<'_, C> {
    fn drop(&mut self) {
        self.canvas.end_shader();
    }
}
