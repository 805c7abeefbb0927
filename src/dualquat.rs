use nalgebra_glm as glm;

/// Comparison value for deciding that a matrix column has unit length
const SCALE_EPSILON: f32 = 0.005;

/// Dual quaternion
///
/// GLM has support in the `GLM_GTX_dual_quaternion` extension but this does not
/// seem to be available in the `nalgebra_glm` implementation. So the small
/// amount of functionality needed for exporting skinning transforms is
/// implemented here using `glm::Quat`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DualQuat {
    pub real: glm::Quat,
    pub dual: glm::Quat,
}

impl Default for DualQuat {
    fn default() -> Self {
        Self {
            // Real part contains the rotation
            real: glm::quat(0.0, 0.0, 0.0, 1.0),
            // Dual part contains the translation but is also effected by
            // the rotation
            dual: glm::quat(0.0, 0.0, 0.0, 0.0),
        }
    }
}

impl DualQuat {
    /// Creates a dual quaternion from a unit rotation quaternion and a
    /// translation.
    ///
    /// The dual part is `1/2 * t * r` where `t` is the "pure"
    /// quaternion version of the translation.
    #[must_use]
    pub fn new(rotation: &glm::Quat, translation: &glm::Vec3) -> Self {
        let pure = glm::quat(translation.x, translation.y, translation.z, 0.0);
        Self {
            real: *rotation,
            dual: pure * *rotation * 0.5_f32,
        }
    }
}

/// Conversion to GLSL shader ready mat2x4
impl From<DualQuat> for [[f32; 4]; 2] {
    fn from(dq: DualQuat) -> [[f32; 4]; 2] {
        [
            [
                dq.real.coords.x,
                dq.real.coords.y,
                dq.real.coords.z,
                dq.real.coords.w,
            ],
            [
                dq.dual.coords.x,
                dq.dual.coords.y,
                dq.dual.coords.z,
                dq.dual.coords.w,
            ],
        ]
    }
}

#[must_use]
pub fn mul(q1: &DualQuat, q2: &DualQuat) -> DualQuat {
    DualQuat {
        real: q1.real * q2.real,
        dual: q1.real * q2.dual + q1.dual * q2.real,
    }
}

#[must_use]
pub fn conjugate(q: &DualQuat) -> DualQuat {
    DualQuat {
        real: q.real.conjugate(),
        dual: q.dual.conjugate(),
    }
}

/// Splits a unit dual quaternion into its rotation and translation
#[must_use]
pub fn decompose(dq: &DualQuat) -> (glm::Quat, glm::Vec3) {
    let t = dq.dual * dq.real.conjugate() * 2.0_f32;
    (dq.real, glm::vec3(t.coords.x, t.coords.y, t.coords.z))
}

/// Converts to a rigid transform matrix
#[must_use]
pub fn to_mat4(dq: &DualQuat) -> glm::Mat4 {
    let (rotation, translation) = decompose(dq);
    glm::translate(&glm::Mat4::identity(), &translation)
        * glm::quat_to_mat4(&rotation)
}

/// Returns the lengths of the first three columns, which are the scale
/// factors of an affine transform
fn column_lengths(m: &glm::Mat4) -> [f32; 3] {
    std::array::from_fn(|c| {
        glm::length(&glm::vec3(m[(0, c)], m[(1, c)], m[(2, c)]))
    })
}

/// Returns true if the matrix carries a scale that a dual quaternion can't
/// represent.
///
/// A mirror is a negative scale so it counts too, even though its
/// columns have unit length.
#[must_use]
pub fn has_scale(m: &glm::Mat4) -> bool {
    column_lengths(m)
        .iter()
        .any(|len| (len - 1.0_f32).abs() > SCALE_EPSILON)
        || glm::determinant(&glm::mat4_to_mat3(m)) < 0.0
}

/// Converts an affine transform matrix to a unit dual quaternion.
///
/// Any scale is removed from the rotation part before conversion and is
/// otherwise lost. A mirrored matrix gives a wrong rotation, which `has_scale`
/// detects.
#[must_use]
pub fn from_mat4(m: &glm::Mat4) -> DualQuat {
    let lengths = column_lengths(m);
    let columns: [glm::Vec3; 3] = std::array::from_fn(|c| {
        let len = if lengths[c] > f32::EPSILON { lengths[c] } else { 1.0 };
        glm::vec3(m[(0, c)], m[(1, c)], m[(2, c)]) / len
    });
    let rotation =
        glm::quat_normalize(&glm::mat3_to_quat(&glm::Mat3::from_columns(
            &columns,
        )));
    let translation = glm::vec3(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    DualQuat::new(&rotation, &translation)
}
