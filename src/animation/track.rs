use super::types::{Interpolation, Keyframe, Pose};
use crate::sn_error::ClipError;
use itertools::Itertools;
use nalgebra_glm as glm;

/// Above this cosine the two rotations are treated as parallel and a
/// normalized lerp is used instead of the slerp formula
const SLERP_THRESHOLD: f32 = 0.9995;

/// Keyframes for one bone, in non-decreasing time order. Immutable once
/// constructed.
#[derive(Clone, Debug)]
pub struct BoneTrack {
    bone_name: String,
    interpolation: Interpolation,
    keyframes: Vec<Keyframe>,
}

impl BoneTrack {
    /// Creates a linearly interpolated track
    ///
    /// # Errors
    /// Returns `ClipError` if there are no keyframes, a time is negative or
    /// not finite, times decrease, or a rotation has zero length.
    pub fn new(
        bone_name: impl Into<String>,
        keyframes: Vec<Keyframe>,
    ) -> Result<Self, ClipError> {
        Self::with_interpolation(bone_name, Interpolation::Linear, keyframes)
    }

    /// Creates a track with the given interpolation mode. Rotations are
    /// normalized.
    ///
    /// # Errors
    /// See `new`.
    pub fn with_interpolation(
        bone_name: impl Into<String>,
        interpolation: Interpolation,
        mut keyframes: Vec<Keyframe>,
    ) -> Result<Self, ClipError> {
        let bone_name = bone_name.into();
        if keyframes.is_empty() {
            return Err(ClipError::EmptyTrack(bone_name));
        }
        if let Some(k) = keyframes
            .iter()
            .find(|k| !k.time.is_finite() || k.time < 0.0)
        {
            return Err(ClipError::BadKeyframeTime(bone_name, k.time));
        }
        if keyframes
            .iter()
            .tuple_windows()
            .any(|(a, b)| b.time < a.time)
        {
            return Err(ClipError::UnorderedKeyframes(bone_name));
        }
        for k in &mut keyframes {
            let len = glm::quat_length(&k.rotation);
            if !(len.is_finite() && len > f32::EPSILON) {
                return Err(ClipError::ZeroRotation(bone_name));
            }
            k.rotation = glm::quat_normalize(&k.rotation);
        }
        Ok(Self {
            bone_name,
            interpolation,
            keyframes,
        })
    }

    #[must_use]
    pub fn bone_name(&self) -> &str {
        &self.bone_name
    }

    #[must_use]
    pub const fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Time of the last keyframe. Past this the last pose is held.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    /// Finds the keyframes either side of `time` and the interpolation factor
    /// between them.
    ///
    /// Before the first keyframe both sides are the first
    /// keyframe, and at or after the last both sides are the last keyframe.
    #[must_use]
    pub fn bracket(&self, time: f32) -> (&Keyframe, &Keyframe, f32) {
        // Construction guarantees at least one keyframe
        let first = &self.keyframes[0];
        let last = &self.keyframes[self.keyframes.len() - 1];
        if time < first.time {
            return (first, first, 0.0);
        }
        if time >= last.time {
            return (last, last, 0.0);
        }
        // Linear scan for the first segment that ends after `time`. Segments
        // of zero length are stepped over because `time` can't be less than
        // their end without also being less than their start.
        self.keyframes
            .iter()
            .tuple_windows()
            .find(|(_, next)| time < next.time)
            .map_or((last, last, 0.0), |(prev, next)| {
                (prev, next, weight(prev.time, next.time, time))
            })
    }

    /// Interpolated pose at `time`
    #[must_use]
    pub fn sample(&self, time: f32) -> Pose {
        let (prev, next, factor) = self.bracket(time);
        if self.interpolation == Interpolation::Step {
            return prev.pose();
        }
        Pose {
            translation: glm::lerp(&prev.position, &next.position, factor),
            rotation: slerp(&prev.rotation, &next.rotation, factor),
            scale: glm::lerp(&prev.scale, &next.scale, factor),
        }
    }

    /// Local transform matrix at `time`
    #[must_use]
    pub fn local_transform(&self, time: f32) -> glm::Mat4 {
        self.sample(time).to_mat4()
    }
}

/// Helper to calculate the parameter used for interpolation. A zero length
/// segment gives 0 rather than dividing by zero.
fn weight(start: f32, end: f32, current: f32) -> f32 {
    let span = end - start;
    if span > 0.0 {
        ((current - start) / span).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Spherical linear interpolation of unit quaternions along the shortest arc.
///
/// The end points are returned exactly so that sampling at a keyframe time
/// reproduces the stored rotation.
#[must_use]
pub fn slerp(a: &glm::Quat, b: &glm::Quat, factor: f32) -> glm::Quat {
    if factor <= 0.0 {
        return *a;
    }
    if factor >= 1.0 {
        return *b;
    }

    // `b` and `-b` are the same rotation. Pick whichever is on the same
    // hemisphere as `a` so the path is never longer than 180 degrees.
    let mut cos_theta = glm::quat_dot(a, b);
    let b = if cos_theta < 0.0 {
        cos_theta = -cos_theta;
        -*b
    } else {
        *b
    };

    if cos_theta > SLERP_THRESHOLD {
        return glm::quat_normalize(&(*a * (1.0 - factor) + b * factor));
    }

    let theta = cos_theta.acos();
    let sin_theta = theta.sin();
    let s0 = ((1.0 - factor) * theta).sin() / sin_theta;
    let s1 = (factor * theta).sin() / sin_theta;
    *a * s0 + b * s1
}
