//! Tests for dualquat module
//!
//! Dual quaternions are only used here as an export format for renderers
//! doing dual quaternion skinning, so the tests concentrate on conversion to
//! and from the rigid matrices the skinning composer produces.
//!
//! With code like:
//! ```
//! let dq = DualQuat {
//!     real: glm::quat(1.0, 2.0, 3.0, 4.0),
//!     dual: glm::quat(5.0, 6.0, 7.0, 8.0),
//! };
//! ```
//! the literals are inferred as f32 because `DualQuat` needs f32, so the
//! suffix is often left off on purpose.

use log::info;
use nalgebra_glm as glm;
use sinew::{
    animation::{compose_into, BoneInfo, Skeleton, SkinningPalette},
    dualquat::{self, DualQuat},
};
use std::sync::Once;

const EPSILON: f32 = 0.0001f32; // Small value for float comparisons
static INIT: Once = Once::new();

/// Initializes logging in a "once per test run" manner. Call at the start of
/// each test that needs logging.
fn init_tests() {
    INIT.call_once(|| {
        env_logger::init();
    });
}

/// Verify a result is unit by multiplying by its conjugate
fn check_unit(dq: &DualQuat) {
    let unit = dualquat::mul(dq, &dualquat::conjugate(dq));
    let c = glm::quat_equal_eps(&unit.real, &glm::Quat::identity(), EPSILON);
    assert!(c.x && c.y && c.z && c.w);
    let c = glm::quat_equal_eps(
        &unit.dual,
        &glm::quat(0.0f32, 0.0f32, 0.0f32, 0.0f32),
        EPSILON,
    );
    assert!(c.x && c.y && c.z && c.w);
}

fn check_mat4(m1: &glm::Mat4, m2: &glm::Mat4) {
    let c = glm::equal_columns_eps(m1, m2, EPSILON);
    assert!(c.x && c.y && c.z && c.w, "{m1:?} != {m2:?}");
}

/// Tests `DualQuat::default`
#[test]
fn default() {
    let dq = DualQuat::default();
    assert_eq!(dq.real, glm::Quat::identity());
    assert_eq!(dq.dual, glm::quat(0.0f32, 0.0f32, 0.0f32, 0.0f32));
    assert_eq!(dualquat::to_mat4(&dq), glm::Mat4::identity());
}

/// Tests `DualQuat::new`
#[test]
fn new() {
    init_tests();

    let rot = glm::quat_angle_axis(
        -1.491f32,
        &glm::vec3(0.620174f32, -0.248069f32, 0.744208f32),
    );
    let trans = glm::vec3(-1.26f32, 12.04f32, 0.004f32);
    let dq = DualQuat::new(&rot, &trans);
    check_unit(&dq);

    // Same transform built as a matrix
    let m1 = glm::translate(&glm::Mat4::identity(), &trans)
        * glm::quat_to_mat4(&rot);
    let m2 = dualquat::to_mat4(&dq);
    info!("new m1={:?}", m1);
    info!("new m2={:?}", m2);
    check_mat4(&m1, &m2);

    // And taken apart again
    let (r, t) = dualquat::decompose(&dq);
    let c = glm::equal_eps(&t, &trans, EPSILON);
    assert!(c.x && c.y && c.z);
    let c = glm::quat_equal_eps(&r, &rot, EPSILON);
    assert!(c.x && c.y && c.z && c.w);
}

/// Tests `From` for converting to a GLSL shader friendly mat2x4
#[test]
fn from_for_glsl() {
    let dq = DualQuat {
        real: glm::quat(1.0, 2.0, 3.0, 4.0),
        dual: glm::quat(5.0, 6.0, 7.0, 8.0),
    };
    let m: [[f32; 4]; 2] = dq.into();

    // Real in one column, dual in the other, w last for each
    assert_eq!(m[0], [1.0, 2.0, 3.0, 4.0]);
    assert_eq!(m[1], [5.0, 6.0, 7.0, 8.0]);
}

/// Tests `dualquat::mul`
#[test]
fn mul() {
    // [r1 * r2] + [r1 * d2 + d1 * r2]ϵ since ϵ squared is 0
    let dq1 = DualQuat {
        real: glm::quat(1.0, 2.0, 3.0, 4.0),
        dual: glm::quat(-1.0, -2.0, -3.0, -4.0),
    };
    let dq2 = DualQuat {
        real: glm::quat(4.0, 3.0, 2.0, 1.0),
        dual: glm::quat(-4.0, -3.0, -2.0, -1.0),
    };
    let res = dualquat::mul(&dq1, &dq2);
    assert!(
        res.real.i == 12.0f32
            && res.real.j == 24.0f32
            && res.real.k == 6.0f32
            && res.real.w == -12.0f32
    );
    assert!(
        res.dual.i == -24.0f32
            && res.dual.j == -48.0f32
            && res.dual.k == -12.0f32
            && res.dual.w == 24.0f32
    );

    // Multiplying rigid transforms matches multiplying their matrices
    let a = DualQuat::new(
        &glm::quat_angle_axis(0.376, &glm::vec3(0.0, 0.0, 1.0)),
        &glm::vec3(3.0, 1.4, 0.0),
    );
    let b = DualQuat::new(
        &glm::quat_angle_axis(0.512, &glm::vec3(0.0, 1.0, 0.0)),
        &glm::vec3(1.2, 0.0, -4.0),
    );
    check_mat4(
        &dualquat::to_mat4(&dualquat::mul(&a, &b)),
        &(dualquat::to_mat4(&a) * dualquat::to_mat4(&b)),
    );
}

/// Tests `dualquat::conjugate`
#[test]
fn conjugate() {
    // Both parts are conjugated independently, which for a unit dual
    // quaternion gives the inverse transform
    let dq = DualQuat {
        real: glm::quat(1.0, 2.0, 3.0, 4.0),
        dual: glm::quat(5.0, 6.0, 7.0, 8.0),
    };
    let conj = dualquat::conjugate(&dq);
    assert!(
        conj.real.w == 4.0f32
            && conj.real.i == -1.0f32
            && conj.real.j == -2.0f32
            && conj.real.k == -3.0f32
    );
    assert!(
        conj.dual.w == 8.0f32
            && conj.dual.i == -5.0f32
            && conj.dual.j == -6.0f32
            && conj.dual.k == -7.0f32
    );
}

/// Tests `dualquat::from_mat4`
#[test]
fn from_mat4() {
    let m1 = glm::translate(
        &glm::Mat4::identity(),
        &glm::vec3(3.1f32, -19.252f32, -0.34f32),
    );
    let m1 = glm::rotate_z(&m1, -0.261f32);

    let dq = dualquat::from_mat4(&m1);
    check_unit(&dq);
    check_mat4(&m1, &dualquat::to_mat4(&dq));
}

/// Scale is removed before conversion, leaving rotation and translation
#[test]
fn from_mat4_scaled() {
    init_tests();

    let rigid = glm::rotate_x(
        &glm::translate(&glm::Mat4::identity(), &glm::vec3(1.0, 2.0, 3.0)),
        0.8,
    );
    let scaled = glm::scale(&rigid, &glm::vec3(2.0, 2.0, 2.0));
    assert!(dualquat::has_scale(&scaled));
    assert!(!dualquat::has_scale(&rigid));

    let dq = dualquat::from_mat4(&scaled);
    info!("from_mat4_scaled dq={:?}", dq);
    check_unit(&dq);
    check_mat4(&rigid, &dualquat::to_mat4(&dq));
}

/// A mirror has unit length columns but still can't be a dual quaternion
#[test]
fn mirrored_is_flagged() {
    let rigid = glm::rotate_z(
        &glm::translate(&glm::Mat4::identity(), &glm::vec3(4.0, 0.0, 1.0)),
        1.1,
    );
    assert!(!dualquat::has_scale(&rigid));
    let mirrored = glm::scale(&rigid, &glm::vec3(1.0, -1.0, 1.0));
    assert!(dualquat::has_scale(&mirrored));
}

/// Tests export of a composed palette
#[test]
fn palette_to_dual_quats() {
    let skeleton = Skeleton::new(
        "test",
        vec![
            BoneInfo::new("root", glm::Mat4::identity()),
            BoneInfo::new(
                "child",
                glm::translation(&glm::vec3(0.0, 0.0, -2.0)),
            )
            .with_parent("root"),
        ],
    )
    .unwrap();
    let mut palette = SkinningPalette::new(skeleton.len());
    palette.locals_mut()[0] = glm::rotation(0.6, &glm::vec3(0.0, 0.0, 1.0));
    palette.locals_mut()[1] = glm::translation(&glm::vec3(0.0, 0.0, 2.0));
    compose_into(&skeleton, &mut palette);

    let dqs = palette.to_dual_quats();
    assert_eq!(dqs.len(), 2);
    for (dq, m) in dqs.iter().zip(palette.matrices()) {
        check_unit(dq);
        check_mat4(m, &dualquat::to_mat4(dq));
    }
}
