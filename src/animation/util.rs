use super::{
    clip::AnimationClip,
    skeleton::Skeleton,
    skinning::{compose_into, SkinningPalette},
};
use ahash::HashMap;
use log::debug;
use nalgebra_glm as glm;
use std::{collections, hash::BuildHasher};

/// Returns the local transform of every bone in `bone_set` for a clip at an
/// arbitrary playback time.
///
/// The time wraps at the clip duration. Bones the
/// clip has no track for get identity rather than being left out.
///
/// This is the name keyed form. For per-frame use bind the clip once with
/// `AnimationClip::bind` and call `AnimationClip::sample_into`.
pub fn evaluate<'a, I>(
    clip: &AnimationClip,
    time: f32,
    bone_set: I,
) -> HashMap<String, glm::Mat4>
where
    I: IntoIterator<Item = &'a str>,
{
    let t = clip.wrap_time(time);
    bone_set
        .into_iter()
        .map(|name| {
            let local = clip
                .track(name)
                .map_or_else(glm::Mat4::identity, |track| {
                    track.local_transform(t)
                });
            (name.to_string(), local)
        })
        .collect()
}

/// Returns the skinning matrix of every skeleton bone given name keyed local
/// transforms.
///
/// Bones with no local transform are held in the bind pose and
/// names the skeleton doesn't know are ignored.
#[must_use]
pub fn compose<S: BuildHasher>(
    skeleton: &Skeleton,
    locals: &collections::HashMap<String, glm::Mat4, S>,
) -> HashMap<String, glm::Mat4> {
    for name in locals.keys() {
        if skeleton.index_of(name).is_none() {
            debug!("bone {} not in skeleton {}", name, skeleton.name());
        }
    }

    let mut palette = SkinningPalette::new(skeleton.len());
    for (local, bone) in palette.locals_mut().iter_mut().zip(skeleton.bones()) {
        if let Some(m) = locals.get(&bone.name) {
            *local = *m;
        }
    }
    compose_into(skeleton, &mut palette);

    skeleton
        .bone_names()
        .zip(palette.matrices())
        .map(|(name, m)| (name.to_string(), *m))
        .collect()
}

/// Returns the skinning matrices for a clip at an arbitrary playback time
#[must_use]
pub fn animate(
    skeleton: &Skeleton,
    clip: &AnimationClip,
    time: f32,
) -> HashMap<String, glm::Mat4> {
    compose(skeleton, &evaluate(clip, time, skeleton.bone_names()))
}
