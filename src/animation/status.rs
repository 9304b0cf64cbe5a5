use serde::Serialize;

use crate::animation::clip::EffectScope;

/// What the character is currently animating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PlaybackStatus {
    /// Nothing has been played yet.
    #[default]
    Null,
    Upper,
    Lower,
    All,
    /// An upper-body clip spliced onto a lower-body clip.
    UpperAndLower,
    /// Terminal until the character is reset.
    Death,
}

impl PlaybackStatus {
    /// Whether a one-shot upper-body clip currently drives transitions.
    #[must_use]
    pub fn is_upper_dominant(self) -> bool {
        matches!(self, PlaybackStatus::Upper | PlaybackStatus::UpperAndLower)
    }

    /// Whether locomotion requests are currently layered under an upper clip.
    #[must_use]
    pub fn is_fused(self) -> bool {
        self == PlaybackStatus::UpperAndLower
    }
}

/// Status a single, non-fused clip of `scope` puts the character in.
#[must_use]
pub const fn status_for(scope: EffectScope) -> PlaybackStatus {
    match scope {
        EffectScope::Upper => PlaybackStatus::Upper,
        EffectScope::Lower => PlaybackStatus::Lower,
        EffectScope::All => PlaybackStatus::All,
        EffectScope::Death => PlaybackStatus::Death,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_for_is_total() {
        assert_eq!(status_for(EffectScope::Upper), PlaybackStatus::Upper);
        assert_eq!(status_for(EffectScope::Lower), PlaybackStatus::Lower);
        assert_eq!(status_for(EffectScope::All), PlaybackStatus::All);
        assert_eq!(status_for(EffectScope::Death), PlaybackStatus::Death);
    }

    #[test]
    fn upper_dominance() {
        assert!(PlaybackStatus::Upper.is_upper_dominant());
        assert!(PlaybackStatus::UpperAndLower.is_upper_dominant());
        assert!(!PlaybackStatus::Lower.is_upper_dominant());
        assert!(!PlaybackStatus::Null.is_upper_dominant());
    }
}
