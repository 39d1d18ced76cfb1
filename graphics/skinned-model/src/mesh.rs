//! Mesh data prepared for rendering and skinning

use custom_debug::Debug;
use glam::{Vec3, Vec4};

use crate::bones::{BoneId, BoneRegistry};
use crate::bounds::Aabb;
use crate::debug;
use crate::import::ImportedMesh;
use crate::options::ModelOptions;

/// Maximum number of bones that may influence a single vertex
pub const MAX_BONES_PER_VERTEX: usize = 4;

/// Bone influences of one vertex, laid out for a vertex buffer
///
/// Unused slots have id 0 and weight 0.0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VertexBoneData {
    pub ids: [u32; MAX_BONES_PER_VERTEX],
    pub weights: [f32; MAX_BONES_PER_VERTEX],
}

impl VertexBoneData {
    /// Store an influence in the first slot with zero weight
    ///
    /// Returns false when every slot is already taken. A zero weight leaves
    /// its slot free, so the next influence lands in the same slot.
    pub fn add(&mut self, bone: BoneId, weight: f32) -> bool {
        match self.weights.iter().position(|&w| w == 0.0) {
            Some(slot) => {
                self.ids[slot] = bone.0;
                self.weights[slot] = weight;
                true
            }
            None => false,
        }
    }

    pub fn total_weight(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Number of slots in use
    pub fn influence_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }
}

/// A processed mesh
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    #[debug(with = debug::trimmed_collection_fmt)]
    positions: Vec<Vec3>,
    #[debug(with = debug::trimmed_collection_fmt)]
    normals: Vec<Vec3>,
    #[debug(with = debug::trimmed_collection_fmt)]
    tex_coords: Vec<Vec3>,
    uv_components: u32,
    #[debug(with = debug::trimmed_collection_fmt)]
    tangents: Vec<Vec3>,
    #[debug(with = debug::trimmed_collection_fmt)]
    bitangents: Vec<Vec3>,
    #[debug(with = debug::trimmed_collection_fmt)]
    colors: Vec<Vec4>,
    /// Triangle list; empty when the source faces were not triangles
    #[debug(with = debug::trimmed_collection_fmt)]
    indices: Vec<u32>,
    #[debug(with = debug::trimmed_collection_fmt)]
    bone_data: Vec<VertexBoneData>,
    material_index: usize,
    bounds: Aabb,
    centre: Vec3,
    skinned: bool,
}

impl Mesh {
    /// Build a mesh, registering the bones it references
    ///
    /// Data problems are logged as warnings and patched with zeroed data.
    /// `owner` is the display name of the model, used in log messages.
    pub fn build(
        imported: &ImportedMesh,
        registry: &mut BoneRegistry,
        options: &ModelOptions,
        owner: &str,
    ) -> Self {
        let vertex_count = imported.positions.len();

        let bounds = Aabb::from_points(&imported.positions).unwrap_or_else(|| {
            log::warn!("{}: mesh '{}' has no vertices", owner, imported.name);
            Aabb::EMPTY
        });
        let centre = if bounds.is_empty() {
            Vec3::ZERO
        } else {
            bounds.centre()
        };

        let normals = Self::vertex_attribute(imported.normals.as_deref(), "normal", imported, owner);
        let tangents = Self::vertex_attribute(imported.tangents.as_deref(), "tangent", imported, owner);
        let bitangents =
            Self::vertex_attribute(imported.bitangents.as_deref(), "bitangent", imported, owner);
        let colors = Self::vertex_attribute(imported.colors.as_deref(), "color", imported, owner);
        let (tex_coords, uv_components) = Self::texture_coordinates(imported, owner);

        let indices = Self::triangle_indices(imported, owner);

        let mut bone_data = vec![VertexBoneData::default(); vertex_count];
        if imported.bones.is_empty() {
            log::debug!("{}: mesh '{}' has no bones", owner, imported.name);
        } else {
            log::info!(
                "{}: mesh '{}' references {} bones",
                owner,
                imported.name,
                imported.bones.len()
            );
            Self::collect_weights(imported, registry, &mut bone_data, owner);
            if options.validate_weights {
                Self::check_weight_sums(imported, &bone_data, options.weight_tolerance, owner);
            }
        }

        Self {
            name: imported.name.clone(),
            positions: imported.positions.clone(),
            normals,
            tex_coords,
            uv_components,
            tangents,
            bitangents,
            colors,
            indices,
            bone_data,
            material_index: imported.material_index,
            bounds,
            centre,
            skinned: !imported.bones.is_empty(),
        }
    }

    /// Copy one per-vertex attribute, zero-filled when missing or mismatched
    fn vertex_attribute<T: Copy + Default>(
        data: Option<&[T]>,
        kind: &str,
        imported: &ImportedMesh,
        owner: &str,
    ) -> Vec<T> {
        let vertex_count = imported.positions.len();
        match data {
            Some(values) if values.len() == vertex_count => values.to_vec(),
            Some(values) => {
                log::warn!(
                    "{}: mesh '{}' has {} {} values for {} vertices",
                    owner,
                    imported.name,
                    values.len(),
                    kind,
                    vertex_count
                );
                vec![T::default(); vertex_count]
            }
            None => {
                log::warn!("{}: mesh '{}' is missing {} information", owner, imported.name, kind);
                vec![T::default(); vertex_count]
            }
        }
    }

    /// Texture coordinates and their component count
    ///
    /// Only 2 or 3 components are usable; anything else is replaced by
    /// zeroed 2-component coordinates.
    fn texture_coordinates(imported: &ImportedMesh, owner: &str) -> (Vec<Vec3>, u32) {
        let vertex_count = imported.positions.len();
        if imported.tex_coords.is_some() && !matches!(imported.uv_components, 2 | 3) {
            log::warn!(
                "{}: mesh '{}' is missing compatible texture coordinates ({} components)",
                owner,
                imported.name,
                imported.uv_components
            );
            return (vec![Vec3::ZERO; vertex_count], 2);
        }

        let coords = Self::vertex_attribute(
            imported.tex_coords.as_deref(),
            "texture coordinate",
            imported,
            owner,
        );
        let components = if imported.tex_coords.is_some() {
            imported.uv_components
        } else {
            2
        };
        (coords, components)
    }

    fn triangle_indices(imported: &ImportedMesh, owner: &str) -> Vec<u32> {
        if imported.faces.iter().any(|face| face.len() != 3) {
            log::warn!(
                "{}: mesh '{}' is not triangulated, index data skipped",
                owner,
                imported.name
            );
            return Vec::new();
        }

        let vertex_count = imported.positions.len();
        let indices: Vec<u32> = imported.faces.iter().flatten().copied().collect();
        if indices.iter().any(|&i| i as usize >= vertex_count) {
            log::warn!(
                "{}: mesh '{}' has face indices beyond its {} vertices, index data skipped",
                owner,
                imported.name,
                vertex_count
            );
            return Vec::new();
        }
        indices
    }

    fn collect_weights(
        imported: &ImportedMesh,
        registry: &mut BoneRegistry,
        bone_data: &mut [VertexBoneData],
        owner: &str,
    ) {
        let mut out_of_range = 0usize;
        let mut overflow = 0usize;

        for bone in &imported.bones {
            let (id, _) = registry.get_or_add(&bone.name, bone.offset);

            for weight in &bone.weights {
                match bone_data.get_mut(weight.vertex_id as usize) {
                    Some(vertex) => {
                        if !vertex.add(id, weight.weight) {
                            overflow += 1;
                        }
                    }
                    None => out_of_range += 1,
                }
            }
        }

        if out_of_range > 0 {
            log::warn!(
                "{}: mesh '{}' has {} bone weights for vertices that do not exist",
                owner,
                imported.name,
                out_of_range
            );
        }
        if overflow > 0 {
            log::warn!(
                "{}: mesh '{}' exceeds the maximum of {} bones per vertex ({} influences dropped)",
                owner,
                imported.name,
                MAX_BONES_PER_VERTEX,
                overflow
            );
        }
    }

    fn check_weight_sums(
        imported: &ImportedMesh,
        bone_data: &[VertexBoneData],
        tolerance: f32,
        owner: &str,
    ) {
        let bad = bone_data
            .iter()
            .filter(|vertex| (vertex.total_weight() - 1.0).abs() > tolerance)
            .count();
        if bad > 0 {
            log::warn!(
                "{}: mesh '{}' has {} vertices whose bone weights do not sum up to 1.0",
                owner,
                imported.name,
                bad
            );
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Texture coordinates; only the first [`Mesh::uv_components`] axes are used
    pub fn tex_coords(&self) -> &[Vec3] {
        &self.tex_coords
    }

    pub fn uv_components(&self) -> u32 {
        self.uv_components
    }

    pub fn tangents(&self) -> &[Vec3] {
        &self.tangents
    }

    pub fn bitangents(&self) -> &[Vec3] {
        &self.bitangents
    }

    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn bone_data(&self) -> &[VertexBoneData] {
        &self.bone_data
    }

    pub fn material_index(&self) -> usize {
        self.material_index
    }

    /// Local-space bounding box
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Midpoint of the local bounding box
    pub fn centre(&self) -> Vec3 {
        self.centre
    }

    /// Whether any bone influences this mesh
    pub fn is_skinned(&self) -> bool {
        self.skinned
    }
}
