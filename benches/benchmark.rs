//! Recommend using with
//! `RUSTFLAGS="-C target-cpu=x86-64-v2" cargo bench`
//! and that end users compile their applications in this way. That enables
//! SSE4.2 support which should be a safe default.
//!
//! The name keyed benchmarks are included mostly to show how much the dense
//! binding saves in the per-frame path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra_glm as glm;
use sinew::{
    animation::{
        self, compose_into, AnimationClip, BoneInfo, BoneTrack, Keyframe,
        Skeleton, SkinningPalette,
    },
    options::AnimOptions,
};

const BONES: usize = 64;
const KEYS: usize = 30;
const DURATION: f32 = 2.0;

/// A single chain of bones, each with its own track
fn use_this_rig() -> (Skeleton, AnimationClip) {
    let mut bones = Vec::with_capacity(BONES);
    let mut tracks = Vec::with_capacity(BONES);
    for i in 0..BONES {
        let name = format!("bone.{i}");
        let ibp = glm::translation(&glm::vec3(0.0, -(i as f32), 0.0));
        let bone = BoneInfo::new(name.clone(), ibp);
        bones.push(if i == 0 {
            bone
        } else {
            bone.with_parent(format!("bone.{}", i - 1))
        });

        let keyframes = (0..KEYS)
            .map(|k| {
                let time = DURATION * (k as f32) / ((KEYS - 1) as f32);
                Keyframe::new(
                    time,
                    glm::vec3(0.0, 1.0, 0.0),
                    glm::quat_angle_axis(
                        time * (i as f32) * 0.01,
                        &glm::vec3(0.0, 0.0, 1.0),
                    ),
                    glm::vec3(1.0, 1.0, 1.0),
                )
            })
            .collect();
        tracks.push(BoneTrack::new(name, keyframes).unwrap());
    }
    (
        Skeleton::new("bench", bones).unwrap(),
        AnimationClip::new("bench", DURATION, 30.0, tracks).unwrap(),
    )
}

fn dense_frame(c: &mut Criterion) {
    let (skeleton, clip) = use_this_rig();
    let binding = clip.bind(&skeleton, &AnimOptions::default());
    let mut palette = SkinningPalette::new(skeleton.len());
    c.bench_function(
        "dense frame", //
        |b| {
            b.iter(|| {
                clip.sample_into(&binding, black_box(1.37), palette.locals_mut());
                compose_into(&skeleton, &mut palette);
            })
        },
    );
}

fn keyed_frame(c: &mut Criterion) {
    let (skeleton, clip) = use_this_rig();
    c.bench_function(
        "name keyed frame", //
        |b| b.iter(|| animation::animate(&skeleton, &clip, black_box(1.37))),
    );
}

fn slerp(c: &mut Criterion) {
    let q1 = glm::quat_angle_axis(0.376_f32, &glm::vec3(0.0, 0.0, 1.0));
    let q2 = glm::quat_angle_axis(0.512_f32, &glm::vec3(0.0, 1.0, 0.0));
    let q1 = black_box(q1);
    let q2 = black_box(q2);
    c.bench_function(
        "slerp", //
        |b| {
            b.iter(|| {
                for i in 0..=100 {
                    let _ = animation::slerp(&q1, &q2, (i as f32) * 0.01);
                }
            })
        },
    );
}

criterion_group!(benches, dense_frame, keyed_frame, slerp);
criterion_main!(benches);
