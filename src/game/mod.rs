//! Game objects driven by the host frame loop.

pub mod character;
pub mod events;
pub mod health;
pub mod locomotion;
pub mod tickable;

pub use character::Character;
pub use events::{CharacterEvent, EventReceiver, EventSender};
pub use health::Health;
pub use locomotion::{Gait, Locomotion, Step};
pub use tickable::{FrameTicker, Tickable};
