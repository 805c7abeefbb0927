mod clip;
mod instance;
mod pool;
mod skeleton;
mod skinning;
mod track;
mod types;
mod util;

// Re-exports
pub use {
    clip::{AnimationClip, ClipBinding},
    instance::AnimationInstance,
    pool::{update_all, PalettePool},
    skeleton::{Bone, BoneInfo, Skeleton},
    skinning::{compose_into, SkinningPalette},
    track::{slerp, BoneTrack},
    types::{Interpolation, Keyframe, Pose},
    util::{animate, compose, evaluate},
};
