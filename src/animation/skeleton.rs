use crate::{
    sn_error::{SkeletonError, SnError},
    types::MAX_BONES,
};
use ahash::{HashMap, HashMapExt};
use log::debug;
use nalgebra_glm as glm;
use smallvec::SmallVec;
use std::collections::VecDeque;

/// Bone description as supplied by the model loader
#[derive(Clone, Debug)]
pub struct BoneInfo {
    pub name: String,
    pub inverse_bind_pose: glm::Mat4,
    pub parent: Option<String>,
}

impl BoneInfo {
    /// Creates a root bone
    #[must_use]
    pub fn new(name: impl Into<String>, inverse_bind_pose: glm::Mat4) -> Self {
        Self {
            name: name.into(),
            inverse_bind_pose,
            parent: None,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// A bone after the hierarchy has been resolved to indices
#[derive(Clone, Debug)]
pub struct Bone {
    pub name: String,
    pub parent: Option<usize>,
    pub children: SmallVec<[usize; 4]>,
    pub inverse_bind_pose: glm::Mat4,
}

/// Static bone hierarchy with inverse bind poses.
///
/// Bones keep the index they had in the input so the index can be used as
/// a stable slot in the uploaded matrix array. Names are resolved once here
/// and the evaluation order is computed once so per-frame work is a flat
/// walk over indices.
#[derive(Clone, Debug)]
pub struct Skeleton {
    name: String,
    bones: Vec<Bone>,
    order: Vec<usize>,
    lookup: HashMap<String, usize>,
}

impl Skeleton {
    /// Validates the hierarchy and builds the skeleton
    ///
    /// # Errors
    /// Returns `SnError::InvalidSkeleton` for duplicate names, unknown
    /// parents, cycles, or more than `MAX_BONES` bones.
    pub fn new(
        name: impl Into<String>,
        infos: Vec<BoneInfo>,
    ) -> Result<Self, SnError> {
        let name = name.into();
        if infos.len() > MAX_BONES {
            return Err(SkeletonError::TooManyBones(infos.len()).into());
        }

        let mut lookup = HashMap::with_capacity(infos.len());
        for (index, info) in infos.iter().enumerate() {
            if lookup.insert(info.name.clone(), index).is_some() {
                return Err(
                    SkeletonError::DuplicateBone(info.name.clone()).into()
                );
            }
        }

        let mut bones = Vec::with_capacity(infos.len());
        for info in infos {
            let parent = match &info.parent {
                Some(parent) => Some(*lookup.get(parent).ok_or_else(|| {
                    SkeletonError::MissingParent {
                        bone: info.name.clone(),
                        parent: parent.clone(),
                    }
                })?),
                None => None,
            };
            bones.push(Bone {
                name: info.name,
                parent,
                children: SmallVec::new(),
                inverse_bind_pose: info.inverse_bind_pose,
            });
        }
        let links: Vec<(usize, usize)> = bones
            .iter()
            .enumerate()
            .filter_map(|(index, b)| b.parent.map(|parent| (parent, index)))
            .collect();
        for (parent, child) in links {
            bones[parent].children.push(child);
        }

        let order = evaluation_order(&bones)?;
        debug!(
            "skeleton {} has {} bones, order={:?}",
            name,
            bones.len(),
            order
        );
        Ok(Self {
            name,
            bones,
            order,
            lookup,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// Looks up a bone that is required to exist
    ///
    /// # Errors
    /// Returns `SnError::MissingBone` if there is no bone with that name
    pub fn bone_by_name(&self, name: &str) -> Result<&Bone, SnError> {
        self.index_of(name)
            .map(|index| &self.bones[index])
            .ok_or_else(|| SnError::MissingBone(name.to_string()))
    }

    pub fn bone_names(&self) -> impl Iterator<Item = &str> {
        self.bones.iter().map(|b| b.name.as_str())
    }

    /// Indices of bones with no parent
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, b)| b.parent.is_none())
            .map(|(index, _)| index)
    }

    /// Every bone index with each parent before all of its children
    #[must_use]
    pub fn evaluation_order(&self) -> &[usize] {
        &self.order
    }
}

/// Breadth first walk from the roots. A bone that is never reached has no
/// path to a root, which with single parents means it is on a cycle.
fn evaluation_order(bones: &[Bone]) -> Result<Vec<usize>, SkeletonError> {
    let mut order = Vec::with_capacity(bones.len());
    let mut visited = vec![false; bones.len()];
    let mut queue: VecDeque<usize> = bones
        .iter()
        .enumerate()
        .filter(|(_, b)| b.parent.is_none())
        .map(|(index, _)| index)
        .collect();

    while let Some(index) = queue.pop_front() {
        if visited[index] {
            return Err(SkeletonError::Cycle(bones[index].name.clone()));
        }
        visited[index] = true;
        order.push(index);
        queue.extend(bones[index].children.iter().copied());
    }

    if let Some(index) = visited.iter().position(|v| !v) {
        return Err(SkeletonError::Cycle(bones[index].name.clone()));
    }
    Ok(order)
}
