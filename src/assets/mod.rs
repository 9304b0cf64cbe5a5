//! Loading boundary: clip data comes from an external [`ClipSource`] and is
//! registered once it arrives. Until then `play` reports `ClipNotFound`.

pub mod loader;
pub mod source;

pub use loader::{AnimationInput, CharacterManifest, load_character_clips};
pub use source::{ClipSource, MemoryClipSource};
