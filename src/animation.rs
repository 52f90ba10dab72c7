use macroquad::color::WHITE;
use macroquad::logging::{debug, info, warn};
use macroquad::math::{Rect, Vec2};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::assets::{TextureInfo, TextureProvider};
use crate::atlas::TextureAtlas;
use crate::error::{Error, Result};
use crate::loader::animation_json::{
    parse_animation_doc, JsonAnimationDoc, JsonGridSheet, JsonTaggedSheet,
};
use crate::loader::{document_dir, json_error, read_document};
use crate::render::{Canvas, RegionDraw};

/// One timed frame of a clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    /// Grid index (grid sheets) or position in the frame list (tagged sheets)
    pub region_index: usize,
    /// Seconds on screen
    pub delay: f32,
    /// Texture pixels shown for this frame
    pub source: Rect,
}

/// A named, immutable sequence of frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    name: String,
    frames: Vec<AnimationFrame>,
}

impl Animation {
    /// Build a clip.
    pub fn new(name: impl Into<String>, frames: Vec<AnimationFrame>) -> Self {
        Animation {
            name: name.into(),
            frames,
        }
    }

    /// Clip name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Frames in playback order.
    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    /// Frame at `index`.
    pub fn frame(&self, index: usize) -> Result<&AnimationFrame> {
        self.frames.get(index).ok_or_else(|| Error::FrameOutOfRange {
            animation: self.name.clone(),
            index,
            count: self.frames.len(),
        })
    }

    /// Number of frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Which sheet layout a player was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    /// Uniform grid with clips listing grid indices
    Grid,
    /// Packed frames with named tag ranges
    Tagged,
}

/// Transform for [`AnimationPlayer::draw`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDraw {
    /// Destination position
    pub position: Vec2,
    /// Per-axis scale of the frame size
    pub scale: Vec2,
    /// Rotation pivot, relative to the scaled frame
    pub origin: Vec2,
    /// Degrees
    pub rotation: f32,
    /// Mirror horizontally
    pub flip_x: bool,
    /// Mirror vertically
    pub flip_y: bool,
}

impl Default for AnimationDraw {
    fn default() -> Self {
        AnimationDraw {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            origin: Vec2::ZERO,
            rotation: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }
}

/// A set of clips over one texture plus a playback cursor.
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    animation_path: Option<PathBuf>,
    texture_path: Option<PathBuf>,
    kind: Option<SheetKind>,
    texture: TextureInfo,
    animations: Vec<Animation>,
    by_name: HashMap<String, usize>,

    current: Option<usize>,
    frame_index: usize,
    timer: f32,
    playing: bool,
    repeat: bool,
}

impl AnimationPlayer {
    /// Player over already-built clips. A later clip replaces an earlier one with the same name.
    pub fn new(texture: TextureInfo, animations: Vec<Animation>) -> Self {
        let mut player = AnimationPlayer {
            animation_path: None,
            texture_path: None,
            kind: None,
            texture,
            animations: Vec::with_capacity(animations.len()),
            by_name: HashMap::new(),
            current: None,
            frame_index: 0,
            timer: 0.0,
            playing: false,
            repeat: true,
        };
        for anim in animations {
            player.insert(anim);
        }
        player
    }

    fn insert(&mut self, anim: Animation) {
        match self.by_name.get(anim.name()) {
            Some(&i) => self.animations[i] = anim,
            None => {
                self.by_name.insert(anim.name.clone(), self.animations.len());
                self.animations.push(anim);
            }
        }
    }

    /// Load either sheet layout. The texture is resolved relative to the
    /// document's directory.
    pub fn from_file(path: impl AsRef<Path>, textures: &mut impl TextureProvider) -> Result<Self> {
        let p = path.as_ref();
        let txt = read_document(p)?;
        let doc = parse_animation_doc(&txt).map_err(json_error(p))?;
        let dir = document_dir(p);

        let (kind, texture_path, texture, animations) = match doc {
            JsonAnimationDoc::Grid(sheet) => {
                let texture_path = dir.join(&sheet.texture);
                let texture = textures.load_texture(&texture_path)?;
                let anims = grid_animations(&sheet, &texture)?;
                (SheetKind::Grid, texture_path, texture, anims)
            }
            JsonAnimationDoc::Tagged(sheet) => {
                let texture_path = dir.join(&sheet.meta.image);
                let texture = textures.load_texture(&texture_path)?;
                let anims = tagged_animations(&sheet);
                (SheetKind::Tagged, texture_path, texture, anims)
            }
        };

        let mut player = AnimationPlayer::new(texture, animations);
        player.animation_path = Some(p.to_path_buf());
        player.texture_path = Some(texture_path);
        player.kind = Some(kind);

        info!(
            "Loaded {} animations ({:?} sheet) from {}",
            player.animations.len(),
            kind,
            p.display()
        );
        Ok(player)
    }

    /// Document the player was loaded from.
    pub fn animation_path(&self) -> Option<&Path> {
        self.animation_path.as_deref()
    }

    /// Texture path resolved from the document.
    pub fn texture_path(&self) -> Option<&Path> {
        self.texture_path.as_deref()
    }

    /// Sheet layout, `None` for players built in code.
    pub fn kind(&self) -> Option<SheetKind> {
        self.kind
    }

    /// Backing texture.
    pub fn texture(&self) -> TextureInfo {
        self.texture
    }

    /// Clip by name.
    pub fn animation(&self, name: &str) -> Result<&Animation> {
        self.by_name
            .get(name)
            .map(|&i| &self.animations[i])
            .ok_or_else(|| Error::UnknownAnimation(name.to_owned()))
    }

    /// Clip names in load order.
    pub fn animation_names(&self) -> impl Iterator<Item = &str> {
        self.animations.iter().map(|a| a.name())
    }

    /// True while frames advance.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The clip being shown, if any.
    pub fn current_animation(&self) -> Option<&Animation> {
        self.current.map(|i| &self.animations[i])
    }

    /// Position of the shown frame within the current clip.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// The frame being shown.
    pub fn current_frame(&self) -> Option<&AnimationFrame> {
        self.current_animation()
            .and_then(|a| a.frames().get(self.frame_index))
    }

    /// Source rectangle being shown; the whole texture when no frame is current.
    pub fn source(&self) -> Rect {
        match self.current_frame() {
            Some(frame) => frame.source,
            None => Rect::new(
                0.0,
                0.0,
                self.texture.width as f32,
                self.texture.height as f32,
            ),
        }
    }

    /// Start `name` from its first frame. Asking for the clip that is already
    /// playing keeps its position and only takes the new `repeat`; unknown
    /// names are ignored.
    ///
    /// With `repeat` the clip loops, otherwise it stops on its last frame.
    pub fn play(&mut self, name: &str, repeat: bool) {
        let Some(&idx) = self.by_name.get(name) else {
            return;
        };
        self.repeat = repeat;
        if self.current == Some(idx) && self.playing {
            return;
        }

        self.current = Some(idx);
        self.frame_index = 0;
        self.timer = 0.0;
        self.playing = true;
    }

    /// Like [`AnimationPlayer::play`] but reports unknown names.
    pub fn try_play(&mut self, name: &str, repeat: bool) -> Result<()> {
        if !self.by_name.contains_key(name) {
            return Err(Error::UnknownAnimation(name.to_owned()));
        }
        self.play(name, repeat);
        Ok(())
    }

    /// Pause on the current frame.
    pub fn stop(&mut self) {
        self.playing = false;
        self.timer = 0.0;
    }

    /// Advance the cursor by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        let Some(current) = self.current else {
            return;
        };
        let frames = self.animations[current].frames();
        let Some(frame) = frames.get(self.frame_index) else {
            return;
        };

        self.timer += dt;
        if self.timer >= frame.delay {
            self.timer = 0.0;

            let next = self.frame_index + 1;
            if next < frames.len() {
                self.frame_index = next;
            } else if self.repeat {
                self.frame_index = 0;
            } else {
                self.playing = false;
            }
        }
    }

    /// Draw the current frame, or the whole texture when there is none.
    pub fn draw(&self, canvas: &mut (impl Canvas + ?Sized), params: &AnimationDraw) {
        let Some(frame) = self.current_frame() else {
            canvas.draw_texture(self.texture.handle, params.position);
            return;
        };

        let mut source = frame.source;
        if params.flip_x {
            source.w = -source.w;
        }
        if params.flip_y {
            source.h = -source.h;
        }

        canvas.draw_texture_region(
            self.texture.handle,
            &RegionDraw {
                source,
                dest: Rect::new(
                    params.position.x,
                    params.position.y,
                    frame.source.w * params.scale.x,
                    frame.source.h * params.scale.y,
                ),
                origin: params.origin,
                rotation: params.rotation,
                tint: WHITE,
            },
        );
    }
}

fn grid_animations(sheet: &JsonGridSheet, texture: &TextureInfo) -> Result<Vec<Animation>> {
    let atlas = TextureAtlas::grid(texture.width, texture.height, sheet.width, sheet.height)?;

    sheet
        .animations
        .iter()
        .map(|(name, entries)| {
            let frames = entries
                .iter()
                .map(|entry| {
                    Ok(AnimationFrame {
                        region_index: entry.index,
                        delay: entry.delay,
                        source: atlas.region(entry.index)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Animation::new(name.clone(), frames))
        })
        .collect()
}

fn tagged_animations(sheet: &JsonTaggedSheet) -> Vec<Animation> {
    let all = &sheet.frames.0;

    sheet
        .meta
        .frame_tags
        .iter()
        .map(|tag| {
            if tag.to >= all.len() {
                warn!(
                    "Animation tag '{}' spans frames {}..={} but only {} frames exist",
                    tag.name,
                    tag.from,
                    tag.to,
                    all.len()
                );
            }

            let frames: Vec<AnimationFrame> = all
                .iter()
                .enumerate()
                .skip(tag.from)
                .take_while(|(i, _)| *i <= tag.to)
                .map(|(i, f)| AnimationFrame {
                    region_index: i,
                    delay: f.duration / 1000.0,
                    source: Rect::new(f.frame.x, f.frame.y, f.frame.w, f.frame.h),
                })
                .collect();

            debug!(
                "Animation '{}': frames {} -> {} ({} loaded)",
                tag.name,
                tag.from,
                tag.to,
                frames.len()
            );
            Animation::new(tag.name.clone(), frames)
        })
        .collect()
}
