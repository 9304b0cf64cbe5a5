use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
}

/// A single keyframed property of one joint.
///
/// `times` must be ascending and `values` must have the same length.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        debug_assert_eq!(times.len(), values.len(), "keyframe times/values mismatch");
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// A track holding one value for its whole lifetime.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self::new(vec![0.0], vec![value], InterpolationMode::Step)
    }

    /// Time of the last keyframe, `0.0` for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty() || self.values.is_empty()
    }

    /// Samples the track, clamping outside the keyed range.
    ///
    /// Returns `None` only for an empty track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        let last = self.times.len().min(self.values.len()).checked_sub(1)?;

        // First keyframe strictly after `time`.
        let next = self.times[..=last].partition_point(|&t| t <= time);
        if next == 0 {
            return Some(self.values[0]);
        }
        if next > last {
            return Some(self.values[last]);
        }

        let index = next - 1;
        match self.interpolation {
            InterpolationMode::Step => Some(self.values[index]),
            InterpolationMode::Linear => {
                let t0 = self.times[index];
                let span = self.times[next] - t0;
                let t = if span > 1e-6 {
                    ((time - t0) / span).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                Some(T::interpolate(self.values[index], self.values[next], t))
            }
        }
    }
}
