use super::{skeleton::Skeleton, track::BoneTrack};
use crate::{
    options::AnimOptions,
    sn_error::{ClipError, SnError},
};
use ahash::{HashMap, HashMapExt};
use log::{debug, warn};
use nalgebra_glm as glm;

/// A named set of bone tracks that loops every `duration` seconds.
///
/// Keyframe times, `duration` and the playback time all use the same unit.
/// `ticks_per_second` is kept for callers working in the tick space of the
/// source asset.
#[derive(Clone, Debug)]
pub struct AnimationClip {
    name: String,
    duration: f32,
    ticks_per_second: f32,
    tracks: Vec<BoneTrack>,
    lookup: HashMap<String, usize>,
}

impl AnimationClip {
    /// Validates and builds a clip
    ///
    /// # Errors
    /// Returns `SnError::InvalidClip` if the duration or tick rate is not a
    /// positive finite number or if two tracks are for the same bone.
    pub fn new(
        name: impl Into<String>,
        duration: f32,
        ticks_per_second: f32,
        tracks: Vec<BoneTrack>,
    ) -> Result<Self, SnError> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(ClipError::BadDuration(duration).into());
        }
        if !(ticks_per_second.is_finite() && ticks_per_second > 0.0) {
            return Err(ClipError::BadTickRate(ticks_per_second).into());
        }
        let mut lookup = HashMap::with_capacity(tracks.len());
        for (index, track) in tracks.iter().enumerate() {
            if lookup.insert(track.bone_name().to_string(), index).is_some() {
                return Err(ClipError::DuplicateTrack(
                    track.bone_name().to_string(),
                )
                .into());
            }
            if track.end_time() > duration {
                debug!(
                    "track {} ends at {} after clip duration {}",
                    track.bone_name(),
                    track.end_time(),
                    duration
                );
            }
        }
        Ok(Self {
            name: name.into(),
            duration,
            ticks_per_second,
            tracks,
            lookup,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    #[must_use]
    pub const fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    #[must_use]
    pub fn to_ticks(&self, seconds: f32) -> f32 {
        seconds * self.ticks_per_second
    }

    #[must_use]
    pub fn tracks(&self) -> &[BoneTrack] {
        &self.tracks
    }

    #[must_use]
    pub fn track(&self, bone_name: &str) -> Option<&BoneTrack> {
        self.lookup.get(bone_name).map(|index| &self.tracks[*index])
    }

    /// Wraps a playback time into `[0, duration)`. Negative times wrap from
    /// the end. A time that isn't finite is treated as 0.
    #[must_use]
    pub fn wrap_time(&self, time: f32) -> f32 {
        if !time.is_finite() {
            warn!("clip {} given non-finite time {}", self.name, time);
            return 0.0;
        }
        let t = time.rem_euclid(self.duration);
        // Rounding can land exactly on the duration for tiny negative times
        if t >= self.duration {
            0.0
        } else {
            t
        }
    }

    /// Local transform for a bone at a playback time, or identity if the
    /// clip has no track for it
    #[must_use]
    pub fn local_transform(&self, bone_name: &str, time: f32) -> glm::Mat4 {
        self.track(bone_name).map_or_else(glm::Mat4::identity, |track| {
            track.local_transform(self.wrap_time(time))
        })
    }

    /// Resolves the tracks of this clip against the bones of a skeleton.
    /// Tracks for bones the skeleton doesn't have are skipped.
    #[must_use]
    pub fn bind(&self, skeleton: &Skeleton, options: &AnimOptions) -> ClipBinding {
        let mut tracks = vec![None; skeleton.len()];
        for (track_index, track) in self.tracks.iter().enumerate() {
            if let Some(bone_index) = skeleton.index_of(track.bone_name()) {
                tracks[bone_index] = Some(track_index);
            } else if options.warn_missing_bones {
                warn!(
                    "clip {} track {} has no bone in skeleton {}",
                    self.name,
                    track.bone_name(),
                    skeleton.name()
                );
            } else {
                debug!(
                    "clip {} track {} has no bone in skeleton {}",
                    self.name,
                    track.bone_name(),
                    skeleton.name()
                );
            }
        }
        ClipBinding { tracks }
    }

    /// Writes the local transform of every bound bone at `time` to `locals`.
    ///
    /// `locals` is indexed by bone index. Bones without a track get identity.
    /// Stops at the end of the binding or the end of `locals`.
    pub fn sample_into(
        &self,
        binding: &ClipBinding,
        time: f32,
        locals: &mut [glm::Mat4],
    ) {
        let t = self.wrap_time(time);
        for (local, track_index) in locals.iter_mut().zip(&binding.tracks) {
            *local = track_index
                .and_then(|index| self.tracks.get(index))
                .map_or_else(glm::Mat4::identity, |track| {
                    track.local_transform(t)
                });
        }
    }
}

/// Dense mapping from bone index to track index for one clip and skeleton
/// pair, computed once so per-frame sampling does no name lookups
#[derive(Clone, Debug, Default)]
pub struct ClipBinding {
    tracks: Vec<Option<usize>>,
}

impl ClipBinding {
    /// Number of bones covered
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track index for a bone index
    #[must_use]
    pub fn track_index(&self, bone_index: usize) -> Option<usize> {
        self.tracks.get(bone_index).copied().flatten()
    }

    /// Number of bones driven by a track
    #[must_use]
    pub fn animated_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_some()).count()
    }
}
