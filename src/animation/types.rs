use nalgebra_glm as glm;

/// How a track moves between the two keyframes that bracket the query time
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
}

/// The local pose of one bone. The set of components is fixed, so this is a
/// plain struct rather than something extensible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub translation: glm::Vec3,
    pub rotation: glm::Quat,
    pub scale: glm::Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            translation: glm::Vec3::zeros(),
            rotation: glm::Quat::identity(),
            scale: glm::vec3(1.0, 1.0, 1.0),
        }
    }
}

impl Pose {
    /// Composes translation, rotation and scale as `T * R * S`.
    ///
    /// Scale and rotation happen before the translation moves the result into
    /// position in the parent space.
    #[must_use]
    pub fn to_mat4(&self) -> glm::Mat4 {
        glm::translation(&self.translation)
            * glm::quat_to_mat4(&self.rotation)
            * glm::scaling(&self.scale)
    }
}

/// One sampled pose of a bone at an instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe {
    pub time: f32,
    pub position: glm::Vec3,
    pub rotation: glm::Quat,
    pub scale: glm::Vec3,
}

impl Default for Keyframe {
    fn default() -> Self {
        Self::from_pose(0.0, &Pose::default())
    }
}

impl Keyframe {
    #[must_use]
    pub const fn new(
        time: f32,
        position: glm::Vec3,
        rotation: glm::Quat,
        scale: glm::Vec3,
    ) -> Self {
        Self {
            time,
            position,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub const fn from_pose(time: f32, pose: &Pose) -> Self {
        Self::new(time, pose.translation, pose.rotation, pose.scale)
    }

    #[must_use]
    pub const fn pose(&self) -> Pose {
        Pose {
            translation: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}
