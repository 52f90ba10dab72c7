use macroquad::math::{vec2, Vec2};
use std::collections::HashMap;

use crate::animation::{AnimationDraw, AnimationPlayer};
use crate::assets::{Handle, Registry};
use crate::error::{Error, Result};
use crate::render::{Canvas, ShaderHandle, ShaderScope, UniformLocation, UniformValue};

#[derive(Debug, Clone)]
struct SpriteShader {
    handle: ShaderHandle,
    locations: HashMap<String, Option<UniformLocation>>,
}

/// A positioned, optionally shaded view of an [`AnimationPlayer`].
#[derive(Debug, Clone)]
pub struct Sprite {
    player: Handle<AnimationPlayer>,
    position: Vec2,
    scale: Vec2,
    origin: Vec2,
    centered: bool,
    flip_x: bool,
    flip_y: bool,
    shader: Option<SpriteShader>,
}

impl Sprite {
    /// Unscaled sprite centered on `position`.
    pub fn new(player: Handle<AnimationPlayer>, position: Vec2) -> Self {
        Self::with_scale(player, position, Vec2::ONE)
    }

    /// Scaled sprite centered on `position`.
    pub fn with_scale(player: Handle<AnimationPlayer>, position: Vec2, scale: Vec2) -> Self {
        Self::with_origin(player, position, scale, Vec2::ZERO, true)
    }

    /// Full control over the origin. With `centered` the origin is an offset
    /// from the middle of the current frame.
    pub fn with_origin(
        player: Handle<AnimationPlayer>,
        position: Vec2,
        scale: Vec2,
        origin: Vec2,
        centered: bool,
    ) -> Self {
        Sprite {
            player,
            position,
            scale,
            origin,
            centered,
            flip_x: false,
            flip_y: false,
            shader: None,
        }
    }

    /// Player driving this sprite.
    pub fn player(&self) -> Handle<AnimationPlayer> {
        self.player
    }

    /// Swap the player.
    pub fn set_player(&mut self, player: Handle<AnimationPlayer>) {
        self.player = player;
    }

    /// Position in world pixels.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position snapped to whole pixels.
    pub fn rounded_position(&self) -> Vec2 {
        self.position.round()
    }

    /// Move the sprite.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Per-axis scale.
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Set per-axis scale.
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    /// Same scale on both axes.
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = vec2(scale, scale);
    }

    /// Origin (or offset from the centre when centered).
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Set the origin.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Whether the origin is relative to the frame centre.
    pub fn centered(&self) -> bool {
        self.centered
    }

    /// Toggle centering.
    pub fn set_centered(&mut self, centered: bool) {
        self.centered = centered;
    }

    /// Horizontal mirroring.
    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    /// Set horizontal mirroring.
    pub fn set_flip_x(&mut self, flip: bool) {
        self.flip_x = flip;
    }

    /// Vertical mirroring.
    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    /// Set vertical mirroring.
    pub fn set_flip_y(&mut self, flip: bool) {
        self.flip_y = flip;
    }

    /// Shader applied while drawing.
    pub fn shader(&self) -> Option<ShaderHandle> {
        self.shader.as_ref().map(|s| s.handle)
    }

    /// Draw through `shader` from now on. Cached uniform locations are dropped.
    pub fn set_shader(&mut self, shader: ShaderHandle) {
        self.shader = Some(SpriteShader {
            handle: shader,
            locations: HashMap::new(),
        });
    }

    /// Go back to the default shader.
    pub fn unset_shader(&mut self) {
        self.shader = None;
    }

    /// Set a uniform on the sprite's shader. Does nothing without a shader
    /// or when the shader has no such uniform.
    pub fn set_shader_parameter(
        &mut self,
        canvas: &mut impl Canvas,
        name: &str,
        value: UniformValue,
    ) {
        let Some(shader) = self.shader.as_mut() else {
            return;
        };
        let handle = shader.handle;
        let location = *shader
            .locations
            .entry(name.to_owned())
            .or_insert_with(|| canvas.uniform_location(handle, name));

        if let Some(location) = location {
            canvas.set_uniform(handle, location, value);
        }
    }

    fn player_in<'a>(&self, players: &'a Registry<AnimationPlayer>) -> Result<&'a AnimationPlayer> {
        players.get(self.player).ok_or(Error::DanglingHandle {
            kind: "animation player",
            index: self.player.index(),
        })
    }

    /// Advance the player by `dt` seconds.
    pub fn update(&self, players: &mut Registry<AnimationPlayer>, dt: f32) -> Result<()> {
        players
            .get_mut(self.player)
            .ok_or(Error::DanglingHandle {
                kind: "animation player",
                index: self.player.index(),
            })?
            .update(dt);
        Ok(())
    }

    /// Draw the player's current frame at the rounded position.
    pub fn draw(&self, players: &Registry<AnimationPlayer>, canvas: &mut impl Canvas) -> Result<()> {
        let player = self.player_in(players)?;

        let origin = if self.centered {
            let src = player.source();
            vec2(src.w / 2.0 + self.origin.x, src.h / 2.0 + self.origin.y)
        } else {
            self.origin
        };
        let params = AnimationDraw {
            position: self.rounded_position(),
            scale: self.scale,
            origin,
            rotation: 0.0,
            flip_x: self.flip_x,
            flip_y: self.flip_y,
        };

        match &self.shader {
            Some(shader) => {
                let mut scope = ShaderScope::begin(canvas, shader.handle);
                player.draw(scope.canvas(), &params);
            }
            None => player.draw(canvas, &params),
        }
        Ok(())
    }
}
