#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod config;
pub mod errors;
pub mod game;

pub use animation::{
    AnimationClip, AnimationController, ClipData, EffectScope, LoopMode, PlaybackStatus,
    SpliceLayout, Transition,
};
pub use assets::{AnimationInput, ClipSource, MemoryClipSource};
pub use config::GameConfig;
pub use errors::{Result, StriderError};
pub use game::{Character, CharacterEvent, FrameTicker, Tickable};
