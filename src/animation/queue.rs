use smallvec::SmallVec;

use crate::animation::clip::ClipRef;

/// Transition deferred until the dominant upper-body clip finishes.
///
/// `stop_set` holds clips that must not keep animating once `next` takes
/// over, e.g. a run cycle left behind when the queue resolves into idle.
/// Clips are unique by name.
#[derive(Debug, Default, Clone)]
pub struct PendingTransition {
    next: Option<ClipRef>,
    stop_set: SmallVec<[ClipRef; 4]>,
}

impl PendingTransition {
    #[must_use]
    pub fn next(&self) -> Option<&ClipRef> {
        self.next.as_ref()
    }

    pub fn set_next(&mut self, clip: ClipRef) {
        self.next = Some(clip);
    }

    pub fn take_next(&mut self) -> Option<ClipRef> {
        self.next.take()
    }

    /// Adds `clip` unless a clip with the same name is already queued for stopping.
    pub fn defer_stop(&mut self, clip: &ClipRef) {
        if !self.stop_set.iter().any(|c| c.name == clip.name) {
            self.stop_set.push(ClipRef::clone(clip));
        }
    }

    #[must_use]
    pub fn stop_set(&self) -> &[ClipRef] {
        &self.stop_set
    }

    #[must_use]
    pub fn will_stop(&self, name: &str) -> bool {
        self.stop_set.iter().any(|c| c.name == name)
    }

    pub fn take_stop_set(&mut self) -> SmallVec<[ClipRef; 4]> {
        std::mem::take(&mut self.stop_set)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.next.is_none() && self.stop_set.is_empty()
    }

    pub fn clear(&mut self) {
        self.next = None;
        self.stop_set.clear();
    }
}
