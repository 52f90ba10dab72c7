//! Shared resource plumbing: texture handles, the texture provider seam and
//! an append-only registry for tilesets and animation players.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use crate::animation::AnimationPlayer;
use crate::error::Result;
use crate::tileset::Tileset;

/// Opaque handle to a texture owned by a [`TextureProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// A loaded texture as seen by the core: a handle plus pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Handle to pass back to the canvas when drawing
    pub handle: TextureHandle,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Resolves texture paths to loaded textures.
///
/// Implementations own the pixel data and must be idempotent per path:
/// loading the same path twice returns the same handle without reloading.
pub trait TextureProvider {
    /// Load (or fetch the cached) texture at `path`.
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo>;
}

/// Stable, typed index into a [`Registry`].
pub struct Handle<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: usize) -> Self {
        Handle {
            index: index as u32,
            _marker: PhantomData,
        }
    }

    /// Position of the item in its registry.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Append-only owner of shared resources.
///
/// Items are never removed, so a handle stays valid for the registry's lifetime.
pub struct Registry<T> {
    items: Vec<T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Registry { items: Vec::new() }
    }
}

impl<T> Registry<T> {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `item` and return its handle.
    pub fn insert(&mut self, item: T) -> Handle<T> {
        self.items.push(item);
        Handle::new(self.items.len() - 1)
    }

    /// Item behind `handle`, if it belongs to this registry.
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get(handle.index())
    }

    /// Mutable item behind `handle`.
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.items.get_mut(handle.index())
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (Handle::new(i), item))
    }

    /// Mutable items, in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }
}

/// Tilesets and animation players shared by layers and sprites.
#[derive(Default)]
pub struct Assets {
    /// Tilesets referenced by map layers
    pub tilesets: Registry<Tileset>,
    /// Players referenced by sprites
    pub players: Registry<AnimationPlayer>,
}

impl Assets {
    /// No assets yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a tileset definition and keep it.
    pub fn load_tileset(
        &mut self,
        path: impl AsRef<Path>,
        textures: &mut impl TextureProvider,
    ) -> Result<Handle<Tileset>> {
        Ok(self.tilesets.insert(Tileset::from_file(path, textures)?))
    }

    /// Load an animation sheet and keep its player.
    pub fn load_animation(
        &mut self,
        path: impl AsRef<Path>,
        textures: &mut impl TextureProvider,
    ) -> Result<Handle<AnimationPlayer>> {
        Ok(self.players.insert(AnimationPlayer::from_file(path, textures)?))
    }
}
