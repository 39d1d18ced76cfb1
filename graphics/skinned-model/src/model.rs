//! Skinned model container
//!
//! A [`Model`] owns the scene graph, the processed meshes, the bone registry
//! and the animation clips of one imported asset. It is mutated while loading
//! (construction and animation loading) and read-only afterwards.

use std::fmt;

use glam::Mat4;

use crate::animation::{AnimationClip, BoneMatrices, PoseEvaluator, fill_identity};
use crate::bones::{BoneId, BoneRegistry};
use crate::bounds::{Aabb, compute_bounds};
use crate::error::{ModelError, Result};
use crate::import::{ImportedAnimation, ImportedScene};
use crate::mesh::Mesh;
use crate::options::ModelOptions;
use crate::scene::{NodeId, SceneGraph};

/// An imported, skinnable model
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    scene: SceneGraph,
    meshes: Vec<Mesh>,
    bones: BoneRegistry,
    clips: Vec<AnimationClip>,
    /// Animation data shipped with the asset, kept for retargeting
    source_animations: Vec<ImportedAnimation>,
    global_inverse: Mat4,
    options: ModelOptions,
}

impl Model {
    /// Build a model from imported scene data
    ///
    /// Meshes are processed in order, registering bones as they are first
    /// referenced. Animations are not bound yet; call
    /// [`Model::load_animations`] once construction succeeded.
    pub fn new(scene: ImportedScene, options: ModelOptions) -> Result<Self> {
        options.validate()?;

        let ImportedScene {
            name,
            root,
            meshes,
            animations,
        } = scene;
        let owner = display_name(&name);

        let root = root.ok_or_else(|| ModelError::MissingRoot(name.clone()))?;
        let graph = SceneGraph::from_imported(&root, meshes.len())?;

        let mut bones = BoneRegistry::new();
        let meshes: Vec<Mesh> = meshes
            .iter()
            .map(|mesh| Mesh::build(mesh, &mut bones, &options, &owner))
            .collect();

        let global_inverse = inverse_root_transform(&root.transform, &owner);

        log::info!(
            "{}: {} nodes, {} meshes, {} bones, {} animations",
            owner,
            graph.len(),
            meshes.len(),
            bones.len(),
            animations.len()
        );

        Ok(Self {
            name,
            scene: graph,
            meshes,
            bones,
            clips: Vec::new(),
            source_animations: animations,
            global_inverse,
            options,
        })
    }

    /// Bind the animations that came with this model
    ///
    /// Returns the number of clips added.
    pub fn load_animations(&mut self) -> usize {
        let animations = std::mem::take(&mut self.source_animations);
        let added = self.load_animations_from(&animations);
        self.source_animations = animations;
        added
    }

    /// Bind the animations of another, compatible model by node name
    pub fn load_animations_from_model(&mut self, source: &Model) -> usize {
        self.load_animations_from(&source.source_animations)
    }

    /// Bind animation data against this model's scene graph
    ///
    /// Clips are appended, so indices of previously loaded clips stay valid.
    /// A model without bones cannot be skinned; its animations are skipped
    /// and it renders statically. Returns the number of clips added.
    pub fn load_animations_from(&mut self, animations: &[ImportedAnimation]) -> usize {
        if animations.is_empty() {
            return 0;
        }

        if self.bones.is_empty() {
            log::warn!(
                "{}: comes with animations but has no bones, skinning is skipped",
                self
            );
            return 0;
        }

        let owner = self.to_string();
        for animation in animations {
            let clip = AnimationClip::from_imported(
                animation,
                &self.scene,
                &self.bones,
                &self.options,
                &owner,
            );
            self.clips.push(clip);
        }

        animations.len()
    }

    /// Skinning matrices for clip `index` at `seconds` since playback start
    ///
    /// The clip loops. Without a clip at `index` every bone gets an identity
    /// matrix; a model without bones yields a single identity matrix.
    pub fn evaluate_pose(&self, index: usize, seconds: f64) -> BoneMatrices {
        let mut data = Vec::new();
        self.evaluate_pose_into(index, seconds, &mut data);
        BoneMatrices::from_raw(data, self.options.matrix_layout)
    }

    /// Like [`Model::evaluate_pose`], reusing the caller's buffer
    pub fn evaluate_pose_into(&self, index: usize, seconds: f64, out: &mut Vec<f32>) {
        fill_identity(out, self.bones.len().max(1));

        if self.bones.is_empty() {
            return;
        }

        let Some(clip) = self.clips.get(index) else {
            return;
        };

        let time = clip.local_time(seconds);
        PoseEvaluator::new(
            &self.scene,
            &self.bones,
            self.global_inverse,
            self.options.matrix_layout,
        )
        .evaluate(clip, time, out);
    }

    /// Bounding box of all meshes in the static pose
    pub fn compute_bounds(&self) -> Aabb {
        compute_bounds(&self.scene, &self.meshes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Number of direct children of the root node
    pub fn root_child_count(&self) -> usize {
        self.scene.root_child_count()
    }

    /// Model-space transform of a node in the static pose
    pub fn node_transform(&self, node: NodeId) -> Mat4 {
        self.scene.world_transform(node)
    }

    /// Inverse of the root node's transform
    pub fn global_inverse_transform(&self) -> Mat4 {
        self.global_inverse
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    pub fn bones(&self) -> &BoneRegistry {
        &self.bones
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Id of a bone by name
    pub fn bone(&self, name: &str) -> Option<BoneId> {
        self.bones.get(name)
    }

    /// Register a bone, see [`BoneRegistry::get_or_add`]
    pub fn get_or_add_bone(&mut self, name: &str, offset: Mat4) -> (BoneId, bool) {
        self.bones.get_or_add(name, offset)
    }

    /// Animation data shipped with the asset
    pub fn source_animations(&self) -> &[ImportedAnimation] {
        &self.source_animations
    }

    pub fn animation_count(&self) -> usize {
        self.clips.len()
    }

    pub fn has_animation(&self, index: usize) -> bool {
        index < self.clips.len()
    }

    pub fn animation(&self, index: usize) -> Option<&AnimationClip> {
        self.clips.get(index)
    }

    pub fn animations(&self) -> &[AnimationClip] {
        &self.clips
    }

    /// Duration of a clip in ticks
    pub fn animation_duration(&self, index: usize) -> Option<f64> {
        self.animation(index).map(AnimationClip::duration)
    }

    pub fn animation_ticks_per_second(&self, index: usize) -> Option<f64> {
        self.animation(index).map(AnimationClip::ticks_per_second)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_name(&self.name))
    }
}

fn display_name(name: &str) -> String {
    if name.is_empty() {
        "Model".to_string()
    } else {
        format!("Model ({})", name)
    }
}

fn inverse_root_transform(root: &Mat4, owner: &str) -> Mat4 {
    let determinant = root.determinant();
    if determinant == 0.0 || !determinant.is_finite() {
        log::warn!(
            "{}: root transform cannot be inverted, using identity",
            owner
        );
        return Mat4::IDENTITY;
    }
    root.inverse()
}
