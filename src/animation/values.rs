use glam::{Quat, Vec3};

/// Values a skeletal channel can carry.
///
/// `interpolate` samples between two keyframes, `accumulate` folds a new
/// contribution into a running weighted blend (`t` is the share of the
/// incoming value, i.e. `weight / (accumulated + weight)`).
pub trait Interpolatable: Copy + Sized {
    fn interpolate(start: Self, end: Self, t: f32) -> Self;

    fn accumulate(current: Self, incoming: Self, t: f32) -> Self {
        Self::interpolate(current, incoming, t)
    }
}

impl Interpolatable for f32 {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    fn interpolate(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }

    fn accumulate(current: Self, incoming: Self, t: f32) -> Self {
        // Keep the blend on the short arc.
        let incoming = if current.dot(incoming) < 0.0 {
            -incoming
        } else {
            incoming
        };
        current.slerp(incoming, t).normalize()
    }
}
