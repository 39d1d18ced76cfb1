//! In-memory scene data handed over by an asset importer
//!
//! File-format parsing happens elsewhere. An importer fills these structures
//! and passes them to [`crate::Model::new`]. Matrices use glam's column-major
//! convention; importers working with row-major matrices must transpose them
//! before handing them over.

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::animation::{QuatKey, VectorKey};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Complete imported scene
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ImportedScene {
    /// Display name, usually the source file stem
    pub name: String,
    /// Root of the node hierarchy
    pub root: Option<ImportedNode>,
    /// All meshes, referenced by index from nodes
    pub meshes: Vec<ImportedMesh>,
    /// Animation clips stored alongside the scene
    pub animations: Vec<ImportedAnimation>,
}

/// A node in the imported hierarchy
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ImportedNode {
    pub name: String,
    /// Transform relative to the parent node
    pub transform: Mat4,
    /// Indices into [`ImportedScene::meshes`]
    pub meshes: Vec<usize>,
    pub children: Vec<ImportedNode>,
}

impl ImportedNode {
    /// Create a node with no meshes and no children
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            transform,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attach a child node
    pub fn with_child(mut self, child: ImportedNode) -> Self {
        self.children.push(child);
        self
    }

    /// Attach a mesh by index
    pub fn with_mesh(mut self, mesh_index: usize) -> Self {
        self.meshes.push(mesh_index);
        self
    }
}

/// Influence of one bone on one vertex
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct VertexWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

/// A bone as referenced by a single mesh
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ImportedBone {
    /// Name of the scene node that drives this bone
    pub name: String,
    /// Transforms from mesh bind space into bone space
    pub offset: Mat4,
    pub weights: Vec<VertexWeight>,
}

/// Raw mesh data
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    /// First texture coordinate set; only the first `uv_components` axes are meaningful
    pub tex_coords: Option<Vec<Vec3>>,
    /// Number of components per texture coordinate, 2 or 3 when usable
    pub uv_components: u32,
    pub tangents: Option<Vec<Vec3>>,
    pub bitangents: Option<Vec<Vec3>>,
    /// First vertex colour set, RGBA
    pub colors: Option<Vec<Vec4>>,
    /// Polygon faces as vertex index lists
    pub faces: Vec<Vec<u32>>,
    pub material_index: usize,
    pub bones: Vec<ImportedBone>,
}

/// Keyframe tracks driving one named node
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ImportedChannel {
    pub node_name: String,
    pub position_keys: Vec<VectorKey>,
    pub rotation_keys: Vec<QuatKey>,
    pub scaling_keys: Vec<VectorKey>,
}

impl ImportedChannel {
    /// Channel holding a single constant pose
    pub fn constant(node_name: impl Into<String>, translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            node_name: node_name.into(),
            position_keys: vec![VectorKey::new(0.0, translation)],
            rotation_keys: vec![QuatKey::new(0.0, rotation)],
            scaling_keys: vec![VectorKey::new(0.0, scale)],
        }
    }
}

/// Raw animation clip data
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct ImportedAnimation {
    pub name: String,
    /// Length of the clip in ticks
    pub duration: f64,
    /// Zero when the source file does not specify a rate
    pub ticks_per_second: f64,
    pub channels: Vec<ImportedChannel>,
}
