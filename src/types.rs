use nalgebra_glm as glm;

/// Maximum bones for a skeleton.
///
/// This is also the length of the fixed size
/// array handed to the uniform upload step, so a shader consuming it needs
/// the same value.
pub const MAX_BONES: usize = 100;

/// Trait for something that can provide the per-bone skinning matrices for
/// the current frame, needed for rendering
pub trait SkinningSource {
    fn skinning_matrices(&self) -> &[glm::Mat4];
}
