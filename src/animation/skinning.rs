use super::skeleton::Skeleton;
use crate::{
    dualquat::{self, DualQuat},
    types::{SkinningSource, MAX_BONES},
};
use log::warn;
use nalgebra_glm as glm;

/// Per-instance working and output buffers for one skeleton.
///
/// Each entry is
/// indexed by bone index. Reused every frame so nothing is allocated once
/// the palette exists.
#[derive(Clone, Debug, Default)]
pub struct SkinningPalette {
    locals: Vec<glm::Mat4>,
    globals: Vec<glm::Mat4>,
    matrices: Vec<glm::Mat4>,
}

impl SkinningPalette {
    /// Creates a palette in the bind pose
    #[must_use]
    pub fn new(bone_count: usize) -> Self {
        let mut palette = Self::default();
        palette.resize(bone_count);
        palette
    }

    /// Changes the number of bones. Everything is reset to identity.
    pub fn resize(&mut self, bone_count: usize) {
        for v in [&mut self.locals, &mut self.globals, &mut self.matrices] {
            v.clear();
            v.resize(bone_count, glm::Mat4::identity());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Local transforms, written by `AnimationClip::sample_into`
    #[must_use]
    pub fn locals(&self) -> &[glm::Mat4] {
        &self.locals
    }

    pub fn locals_mut(&mut self) -> &mut [glm::Mat4] {
        &mut self.locals
    }

    /// Model space transforms from the last `compose_into`
    #[must_use]
    pub fn globals(&self) -> &[glm::Mat4] {
        &self.globals
    }

    /// Final skinning matrices from the last `compose_into`
    #[must_use]
    pub fn matrices(&self) -> &[glm::Mat4] {
        &self.matrices
    }

    /// Sets every skinning matrix to identity so the mesh is drawn exactly as
    /// it was bound
    pub fn reset_to_bind_pose(&mut self) {
        for v in [&mut self.locals, &mut self.globals, &mut self.matrices] {
            v.fill(glm::Mat4::identity());
        }
    }

    /// Returns the name of the first bone whose skinning matrix has a NaN or
    /// infinite element
    #[must_use]
    pub fn first_non_finite<'a>(&self, skeleton: &'a Skeleton) -> Option<&'a str> {
        self.matrices
            .iter()
            .position(|m| m.iter().any(|e| !e.is_finite()))
            .and_then(|index| skeleton.bone(index))
            .map(|bone| bone.name.as_str())
    }

    /// Raw bytes of the skinning matrices, column major, ready for a buffer
    /// upload
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.matrices)
    }

    /// Converts the skinning matrices to dual quaternions for dual quaternion
    /// skinning. Scale and mirroring can't be represented so they are dropped.
    #[must_use]
    pub fn to_dual_quats(&self) -> Vec<DualQuat> {
        if self.matrices.iter().any(dualquat::has_scale) {
            warn!(
                "skinning matrices contain scale or mirroring which dual \
                 quaternions drop"
            );
        }
        self.matrices.iter().map(dualquat::from_mat4).collect()
    }
}

impl SkinningSource for SkinningPalette {
    fn skinning_matrices(&self) -> &[glm::Mat4] {
        &self.matrices
    }
}

/// Conversion to a shader ready fixed size array. Unused slots are identity.
impl From<&SkinningPalette> for [[[f32; 4]; 4]; MAX_BONES] {
    fn from(palette: &SkinningPalette) -> [[[f32; 4]; 4]; MAX_BONES] {
        std::array::from_fn(|i| {
            palette
                .matrices
                .get(i)
                .copied()
                .unwrap_or_else(glm::Mat4::identity)
                .into()
        })
    }
}

/// Walks the skeleton parents first to build the skinning matrices.
///
/// The local transforms in `palette` are accumulated into model space and
/// each is combined with the inverse bind pose of its bone.
///
/// `global = parent_global * local` and `final = global * inverse_bind_pose`.
/// The palette is resized if it doesn't match the skeleton.
pub fn compose_into(skeleton: &Skeleton, palette: &mut SkinningPalette) {
    if palette.len() != skeleton.len() {
        warn!(
            "palette for {} bones used with skeleton {} of {} bones",
            palette.len(),
            skeleton.name(),
            skeleton.len()
        );
        palette.resize(skeleton.len());
    }
    let bones = skeleton.bones();
    for &index in skeleton.evaluation_order() {
        let bone = &bones[index];
        // The evaluation order guarantees the parent's global is already
        // written for this frame
        let global = bone.parent.map_or(palette.locals[index], |parent| {
            palette.globals[parent] * palette.locals[index]
        });
        palette.globals[index] = global;
        palette.matrices[index] = global * bone.inverse_bind_pose;
    }
}
