use super::{
    clip::{AnimationClip, ClipBinding},
    skeleton::Skeleton,
    skinning::{compose_into, SkinningPalette},
};
use crate::{options::AnimOptions, sn_error::SnError, types::SkinningSource};
use log::error;
use nalgebra_glm as glm;
use std::sync::Arc;

/// One animated copy of a model.
///
/// The skeleton and clip are shared read-only
/// assets. The instance owns its playback time and its output buffers, so
/// instances can be updated on different threads without locking.
pub struct AnimationInstance {
    skeleton: Arc<Skeleton>,
    clip: Arc<AnimationClip>,
    binding: ClipBinding,
    options: AnimOptions,
    time: f32,
    palette: SkinningPalette,
}

impl AnimationInstance {
    #[must_use]
    pub fn new(
        skeleton: Arc<Skeleton>,
        clip: Arc<AnimationClip>,
        options: AnimOptions,
    ) -> Self {
        let palette = SkinningPalette::new(skeleton.len());
        Self::with_palette(skeleton, clip, options, palette)
    }

    /// Creates an instance that writes into an existing palette, for example
    /// one taken from a `PalettePool`
    #[must_use]
    pub fn with_palette(
        skeleton: Arc<Skeleton>,
        clip: Arc<AnimationClip>,
        options: AnimOptions,
        mut palette: SkinningPalette,
    ) -> Self {
        let binding = clip.bind(&skeleton, &options);
        palette.resize(skeleton.len());
        Self {
            time: options.start_time,
            skeleton,
            clip,
            binding,
            options,
            palette,
        }
    }

    #[must_use]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[must_use]
    pub fn clip(&self) -> &AnimationClip {
        &self.clip
    }

    /// Changes the clip and restarts playback at the start time
    pub fn set_clip(&mut self, clip: Arc<AnimationClip>) {
        self.binding = clip.bind(&self.skeleton, &self.options);
        self.clip = clip;
        self.time = self.options.start_time;
    }

    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.options.speed = speed;
    }

    /// Moves playback forward by `dt` seconds scaled by the speed option
    pub fn advance(&mut self, dt: f32) {
        self.time += dt * self.options.speed;
    }

    /// Number of times playback has wrapped past the clip duration. Only
    /// informational, since the wrapped time is recomputed every update.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn loop_count(&self) -> i64 {
        (self.time / self.clip.duration()).floor() as i64
    }

    /// Evaluates the clip at the current time and composes the skinning
    /// matrices
    ///
    /// # Errors
    /// Returns `SnError::CorruptFrame` if a matrix is not finite. The palette
    /// is then put in the bind pose, so the bad frame is never visible.
    pub fn try_update(&mut self) -> Result<&SkinningPalette, SnError> {
        self.clip
            .sample_into(&self.binding, self.time, self.palette.locals_mut());
        compose_into(&self.skeleton, &mut self.palette);
        if let Some(name) = self.palette.first_non_finite(&self.skeleton) {
            let e = SnError::CorruptFrame(name.to_string());
            self.palette.reset_to_bind_pose();
            return Err(e);
        }
        Ok(&self.palette)
    }

    /// Like `try_update` but never fails.
    ///
    /// A bad frame is logged and the bind pose is used so the render loop can
    /// carry on.
    pub fn update(&mut self) -> &SkinningPalette {
        if let Err(e) = self.try_update().map(|_| ()) {
            error!(
                "instance of {} with clip {} at time {}: {}",
                self.skeleton.name(),
                self.clip.name(),
                self.time,
                e
            );
        }
        &self.palette
    }

    /// Result of the last update
    #[must_use]
    pub const fn palette(&self) -> &SkinningPalette {
        &self.palette
    }

    /// Gives up the palette, for example to return it to a `PalettePool`
    #[must_use]
    pub fn into_palette(self) -> SkinningPalette {
        self.palette
    }
}

impl SkinningSource for AnimationInstance {
    fn skinning_matrices(&self) -> &[glm::Mat4] {
        self.palette.matrices()
    }
}
