//! Skeletal animation for imported, skinned models
//!
//! Given a scene graph, the bones referenced by its meshes and keyframe
//! animation clips, this crate produces per-bone skinning matrices for any
//! playback time, ready to be uploaded as a uniform buffer.
//!
//! Asset parsing and all GPU work happen elsewhere; an importer fills the
//! structures in [`import`] and hands them to [`Model::new`].

pub mod animation;
pub mod bones;
pub mod bounds;
mod debug;
pub mod error;
pub mod import;
pub mod mesh;
pub mod model;
pub mod options;
pub mod scene;

// Re-export common types
pub use animation::{AnimationClip, BoneMatrices};
pub use bones::{Bone, BoneId, BoneRegistry};
pub use bounds::Aabb;
pub use error::{ModelError, Result};
pub use mesh::{MAX_BONES_PER_VERTEX, Mesh, VertexBoneData};
pub use model::Model;
pub use options::{MatrixLayout, ModelOptions};
pub use scene::{NodeId, SceneGraph, SceneNode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
