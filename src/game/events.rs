/// Typed notifications a character publishes for UI and game logic.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacterEvent {
    Damaged { character: String, hp: f32 },
    Died { character: String },
    Respawned { character: String },
    /// A queued clip took over after an upper-body clip finished.
    TransitionDrained { character: String, clip: String },
    Arrived { character: String },
}

pub type EventSender = flume::Sender<CharacterEvent>;
pub type EventReceiver = flume::Receiver<CharacterEvent>;

/// Creates an unbounded event channel that several characters can share.
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    flume::unbounded()
}
