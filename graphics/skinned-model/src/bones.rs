//! Bone registry
//!
//! Bones are discovered mesh by mesh. The first time a name shows up it gets
//! the next dense id and its bind offset is recorded; later meshes that
//! reference the same bone reuse that id.

use std::collections::HashMap;

use glam::Mat4;

/// Dense, zero-based bone identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub u32);

impl BoneId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A registered bone
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub id: BoneId,
    pub name: String,
    /// Transforms a vertex from mesh bind space into bone space
    pub offset: Mat4,
}

/// Name-to-id mapping for the bones of one model
#[derive(Debug, Clone, Default)]
pub struct BoneRegistry {
    bones: Vec<Bone>,
    by_name: HashMap<String, BoneId>,
}

impl BoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a bone, registering it with `offset` if the name is new
    ///
    /// Returns the bone id and whether the bone was added by this call.
    /// The offset of an already registered bone is left untouched.
    pub fn get_or_add(&mut self, name: &str, offset: Mat4) -> (BoneId, bool) {
        if let Some(&id) = self.by_name.get(name) {
            return (id, false);
        }

        let id = BoneId(self.bones.len() as u32);
        self.by_name.insert(name.to_string(), id);
        self.bones.push(Bone {
            id,
            name: name.to_string(),
            offset,
        });
        (id, true)
    }

    /// Id of a registered bone
    pub fn get(&self, name: &str) -> Option<BoneId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.index())
    }

    pub fn offset(&self, id: BoneId) -> Option<&Mat4> {
        self.bone(id).map(|bone| &bone.offset)
    }

    /// All bones in id order
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}
