use std::{error, fmt};

/// Unified error type
///
/// `InvalidClip` and `InvalidSkeleton` are structural problems found once
/// when assets are constructed. They should abort loading of that asset.
/// Per-frame evaluation works on validated data so the only per-frame error
/// is `CorruptFrame`, which callers normally handle by falling back to the
/// bind pose (see `AnimationInstance::update`).
///
/// `MissingBone` is non-fatal. It is returned by the strict lookup helpers
/// but the evaluation paths log it and carry on with the bind pose.
#[derive(Debug)]
pub enum SnError {
    InvalidClip(ClipError),
    InvalidSkeleton(SkeletonError),
    MissingBone(String),
    CorruptFrame(String),
    StdIoError(std::io::Error),
    SerdeYamlError(Box<serde_yaml::Error>),
}

impl error::Error for SnError {}

impl fmt::Display for SnError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidClip(e) => write!(f, "invalid clip: {e}"),
            Self::InvalidSkeleton(e) => write!(f, "invalid skeleton: {e}"),
            Self::MissingBone(name) => {
                write!(f, "bone \"{name}\" is missing")
            }
            Self::CorruptFrame(name) => {
                write!(f, "non-finite transform produced for bone \"{name}\"")
            }
            Self::StdIoError(e) => write!(f, "std::io::Error: {}", e.kind()),
            Self::SerdeYamlError(e) => {
                write!(f, "serde_yaml::Error: {e}")
            }
        }
    }
}

impl From<ClipError> for SnError {
    fn from(e: ClipError) -> Self {
        Self::InvalidClip(e)
    }
}

impl From<SkeletonError> for SnError {
    fn from(e: SkeletonError) -> Self {
        Self::InvalidSkeleton(e)
    }
}

impl From<serde_yaml::Error> for SnError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::SerdeYamlError(Box::new(e))
    }
}

impl From<std::io::Error> for SnError {
    fn from(e: std::io::Error) -> Self {
        Self::StdIoError(e)
    }
}

/// Problems with an animation clip or one of its tracks. `SnError` has a
/// `From` trait to handle these.
#[derive(Clone, Debug, PartialEq)]
pub enum ClipError {
    BadDuration(f32),
    BadTickRate(f32),
    EmptyTrack(String),
    BadKeyframeTime(String, f32),
    UnorderedKeyframes(String),
    ZeroRotation(String),
    DuplicateTrack(String),
}

impl fmt::Display for ClipError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::BadDuration(d) => {
                write!(f, "duration {d} must be finite and greater than 0")
            }
            Self::BadTickRate(t) => {
                write!(f, "ticks per second {t} must be finite and greater than 0")
            }
            Self::EmptyTrack(a) => write!(f, "track \"{a}\" has no keyframes"),
            Self::BadKeyframeTime(a, t) => {
                write!(f, "track \"{a}\" has invalid keyframe time {t}")
            }
            Self::UnorderedKeyframes(a) => {
                write!(f, "track \"{a}\" keyframes are not in time order")
            }
            Self::ZeroRotation(a) => {
                write!(f, "track \"{a}\" has a zero length rotation")
            }
            Self::DuplicateTrack(a) => {
                write!(f, "more than one track for bone \"{a}\"")
            }
        }
    }
}

/// Problems with a skeleton hierarchy. `SnError` has a `From` trait to
/// handle these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkeletonError {
    DuplicateBone(String),
    MissingParent { bone: String, parent: String },
    Cycle(String),
    TooManyBones(usize),
}

impl fmt::Display for SkeletonError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DuplicateBone(a) => write!(f, "bone \"{a}\" is duplicated"),
            Self::MissingParent { bone, parent } => {
                write!(f, "bone \"{bone}\" has unknown parent \"{parent}\"")
            }
            Self::Cycle(a) => {
                write!(f, "bone \"{a}\" is part of a cycle in the hierarchy")
            }
            Self::TooManyBones(n) => write!(
                f,
                "{n} bones is more than the maximum of {}",
                crate::types::MAX_BONES
            ),
        }
    }
}
