// src/loader/animation_json.rs
use serde::de::{IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::marker::PhantomData;

/// The two animation sheet layouts, told apart by a top-level `meta` key.
pub enum JsonAnimationDoc {
    Grid(JsonGridSheet),
    Tagged(JsonTaggedSheet),
}

#[derive(Deserialize)]
struct SheetShape {
    #[serde(default)]
    meta: Option<IgnoredAny>,
}

/// Sheet sliced into a uniform grid; clips list grid indices.
#[derive(Debug, Deserialize)]
pub struct JsonGridSheet {
    pub texture: String,
    pub width: u32,
    pub height: u32,
    /// Clips in document order.
    #[serde(deserialize_with = "ordered_entries")]
    pub animations: Vec<(String, Vec<JsonGridFrame>)>,
}

#[derive(Debug, Deserialize)]
pub struct JsonGridFrame {
    pub index: usize,
    pub delay: f32,
}

/// Packed sheet with named frame ranges.
#[derive(Debug, Deserialize)]
pub struct JsonTaggedSheet {
    pub meta: JsonMeta,
    pub frames: JsonFrameList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonMeta {
    pub image: String,
    #[serde(default)]
    pub frame_tags: Vec<JsonFrameTag>,
}

#[derive(Debug, Deserialize)]
pub struct JsonFrameTag {
    pub name: String,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Deserialize)]
pub struct JsonTaggedFrame {
    /// Milliseconds
    pub duration: f32,
    pub frame: JsonRect,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct JsonRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Frames in document order, from either an object keyed by frame name or
/// a plain array.
#[derive(Debug)]
pub struct JsonFrameList(pub Vec<JsonTaggedFrame>);

impl<'de> Deserialize<'de> for JsonFrameList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FramesVisitor;

        impl<'de> Visitor<'de> for FramesVisitor {
            type Value = JsonFrameList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object or array of frames")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut frames = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((_, frame)) = map.next_entry::<IgnoredAny, JsonTaggedFrame>()? {
                    frames.push(frame);
                }
                Ok(JsonFrameList(frames))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut frames = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(frame) = seq.next_element()? {
                    frames.push(frame);
                }
                Ok(JsonFrameList(frames))
            }
        }

        deserializer.deserialize_any(FramesVisitor)
    }
}

// serde_json's own map type sorts keys; walk the object ourselves to keep them in order.
fn ordered_entries<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, V>()? {
                out.push(entry);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

pub fn parse_animation_doc(txt: &str) -> Result<JsonAnimationDoc, serde_json::Error> {
    let shape: SheetShape = serde_json::from_str(txt)?;
    if shape.meta.is_some() {
        serde_json::from_str(txt).map(JsonAnimationDoc::Tagged)
    } else {
        serde_json::from_str(txt).map(JsonAnimationDoc::Grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(txt: &str) -> JsonGridSheet {
        match parse_animation_doc(txt).unwrap() {
            JsonAnimationDoc::Grid(g) => g,
            JsonAnimationDoc::Tagged(_) => panic!("expected grid sheet"),
        }
    }

    fn tagged(txt: &str) -> JsonTaggedSheet {
        match parse_animation_doc(txt).unwrap() {
            JsonAnimationDoc::Tagged(t) => t,
            JsonAnimationDoc::Grid(_) => panic!("expected tagged sheet"),
        }
    }

    #[test]
    fn grid_clips_keep_document_order() {
        let g = grid(
            r#"{
              "texture": "hero.png", "width": 16, "height": 24,
              "animations": {
                "walk": [ {"index": 2, "delay": 0.1} ],
                "attack": [ {"index": 5, "delay": 0.05}, {"index": 6, "delay": 0.05} ],
                "idle": []
              }
            }"#,
        );
        let names: Vec<_> = g.animations.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["walk", "attack", "idle"]);
        assert_eq!(g.animations[1].1[1].index, 6);
    }

    #[test]
    fn meta_key_selects_tagged_layout() {
        let t = tagged(
            r#"{
              "frames": {
                "hero 1.aseprite": { "frame": {"x":0,"y":0,"w":16,"h":16}, "duration": 100 },
                "hero 0.aseprite": { "frame": {"x":16,"y":0,"w":16,"h":16}, "duration": 200 }
              },
              "meta": { "image": "hero.png", "frameTags": [ {"name":"run","from":0,"to":1,"direction":"forward"} ] }
            }"#,
        );
        assert_eq!(t.meta.image, "hero.png");
        assert_eq!(t.meta.frame_tags[0].name, "run");
        // key names do not reorder frames
        assert_eq!(t.frames.0[0].duration, 100.0);
        assert_eq!(t.frames.0[1].frame.x, 16.0);
    }

    #[test]
    fn tagged_frames_may_be_an_array() {
        let t = tagged(
            r#"{
              "frames": [
                { "filename": "a", "frame": {"x":0,"y":0,"w":8,"h":8}, "duration": 50 },
                { "filename": "b", "frame": {"x":8,"y":0,"w":8,"h":8}, "duration": 60 }
              ],
              "meta": { "image": "a.png" }
            }"#,
        );
        assert_eq!(t.frames.0.len(), 2);
        assert!(t.meta.frame_tags.is_empty());
    }

    #[test]
    fn malformed_documents_fail() {
        assert!(parse_animation_doc("{ nope").is_err());
        assert!(parse_animation_doc(r#"{"texture":"a.png","width":8}"#).is_err());
        assert!(parse_animation_doc(r#"{"meta":{"image":"a.png"}}"#).is_err());
    }
}
