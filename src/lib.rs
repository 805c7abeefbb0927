//! Skeletal animation evaluation and skinning transforms.
//!
//! Clips are sampled at a playback time to give a local transform per bone,
//! then the skeleton hierarchy is walked parents first to build the per-bone
//! skinning matrices a vertex shader blends with.

pub mod animation;
pub mod dualquat;
pub mod options;
pub mod sn_error;
pub mod types;
