//! Pose evaluation: from a clip and a time to per-bone skinning matrices

use glam::Mat4;

use crate::bones::{BoneId, BoneRegistry};
use crate::options::MatrixLayout;
use crate::scene::SceneGraph;

use super::clip::AnimationClip;
use super::lookup::NodeLookup;

/// Number of scalars per bone matrix
pub const FLOATS_PER_MATRIX: usize = 16;

/// Walks a scene graph and writes skinning matrices for one clip
///
/// The skinning matrix of a bone is
/// `global_inverse * node_model_transform * bone_offset`, flattened with the
/// configured [`MatrixLayout`].
#[derive(Debug, Clone, Copy)]
pub struct PoseEvaluator<'a> {
    scene: &'a SceneGraph,
    bones: &'a BoneRegistry,
    global_inverse: Mat4,
    layout: MatrixLayout,
}

impl<'a> PoseEvaluator<'a> {
    pub fn new(
        scene: &'a SceneGraph,
        bones: &'a BoneRegistry,
        global_inverse: Mat4,
        layout: MatrixLayout,
    ) -> Self {
        Self {
            scene,
            bones,
            global_inverse,
            layout,
        }
    }

    /// Write the matrices of every bone reached by the walk into `out`
    ///
    /// `time` is in clip ticks and already wrapped to the clip's duration.
    /// `out` holds [`FLOATS_PER_MATRIX`] scalars per bone; slots of bones no
    /// node maps to are left as they are.
    pub fn evaluate(&self, clip: &AnimationClip, time: f64, out: &mut [f32]) {
        self.evaluate_with_lookup(clip, clip.lookup(), time, out);
    }

    /// Like [`PoseEvaluator::evaluate`], resolving nodes through `lookup`
    ///
    /// Lets several clips with the same channel layout share one lookup.
    /// Entries naming a channel the clip does not have leave the node at its
    /// static transform.
    pub fn evaluate_with_lookup(
        &self,
        clip: &AnimationClip,
        lookup: &NodeLookup,
        time: f64,
        out: &mut [f32],
    ) {
        self.scene.traverse(Mat4::IDENTITY, |id, node, parent| {
            let entry = lookup.get(id);

            let local = entry
                .channel
                .and_then(|index| clip.channel(index))
                .map_or(node.transform, |channel| channel.local_transform(time));

            let transform = *parent * local;

            if let Some(bone) = entry.bone {
                self.write_bone(bone, &transform, out);
            }

            transform
        });
    }

    fn write_bone(&self, bone: BoneId, transform: &Mat4, out: &mut [f32]) {
        let Some(offset) = self.bones.offset(bone) else {
            return;
        };

        let start = bone.index() * FLOATS_PER_MATRIX;
        let Some(slot) = out.get_mut(start..start + FLOATS_PER_MATRIX) else {
            log::trace!("Bone {} has no slot in a buffer of {} floats", bone.0, out.len());
            return;
        };

        let skinning = self.global_inverse * *transform * *offset;
        self.layout.write(&skinning, slot);
    }
}

/// Flat array of bone matrices ready for upload as a uniform buffer
#[derive(Debug, Clone, PartialEq)]
pub struct BoneMatrices {
    data: Vec<f32>,
    layout: MatrixLayout,
}

impl BoneMatrices {
    pub(crate) fn from_raw(data: Vec<f32>, layout: MatrixLayout) -> Self {
        Self { data, layout }
    }

    /// `count` identity matrices
    pub fn identity(count: usize, layout: MatrixLayout) -> Self {
        let mut data = Vec::new();
        fill_identity(&mut data, count);
        Self { data, layout }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn layout(&self) -> MatrixLayout {
        self.layout
    }

    /// Number of matrices stored
    pub fn bone_count(&self) -> usize {
        self.data.len() / FLOATS_PER_MATRIX
    }

    /// Matrix of one bone, converted back from the stored layout
    pub fn matrix(&self, bone: BoneId) -> Option<Mat4> {
        let start = bone.index() * FLOATS_PER_MATRIX;
        let slice = self.data.get(start..start + FLOATS_PER_MATRIX)?;
        let m = Mat4::from_cols_slice(slice);
        Some(match self.layout {
            MatrixLayout::ColumnMajor => m,
            MatrixLayout::RowMajor => m.transpose(),
        })
    }
}

/// Replace the contents of `out` with `count` identity matrices
pub(crate) fn fill_identity(out: &mut Vec<f32>, count: usize) {
    let identity = Mat4::IDENTITY.to_cols_array();
    out.clear();
    out.reserve(count * FLOATS_PER_MATRIX);
    for _ in 0..count {
        out.extend_from_slice(&identity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationChannel, QuatKey, VectorKey};
    use crate::import::{ImportedAnimation, ImportedChannel, ImportedNode};
    use crate::options::ModelOptions;
    use glam::{Quat, Vec3};

    fn setup() -> (SceneGraph, BoneRegistry) {
        let root = ImportedNode::new("root", Mat4::IDENTITY).with_child(
            ImportedNode::new("upper", Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)))
                .with_child(ImportedNode::new(
                    "lower",
                    Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
                )),
        );
        let scene = SceneGraph::from_imported(&root, 0).unwrap();
        let mut bones = BoneRegistry::new();
        bones.get_or_add("lower", Mat4::IDENTITY);
        bones.get_or_add("upper", Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)));
        (scene, bones)
    }

    fn clip(scene: &SceneGraph, bones: &BoneRegistry, channels: Vec<ImportedChannel>) -> AnimationClip {
        let animation = ImportedAnimation {
            name: "test".to_string(),
            duration: 10.0,
            ticks_per_second: 1.0,
            channels,
        };
        AnimationClip::from_imported(&animation, scene, bones, &ModelOptions::default(), "test")
    }

    #[test]
    fn test_static_pose_without_channels() {
        let (scene, bones) = setup();
        let clip = clip(&scene, &bones, Vec::new());
        let mut out = Vec::new();
        fill_identity(&mut out, bones.len());

        PoseEvaluator::new(&scene, &bones, Mat4::IDENTITY, MatrixLayout::ColumnMajor)
            .evaluate(&clip, 0.0, &mut out);

        let lower = Mat4::from_cols_slice(&out[0..16]);
        let upper = Mat4::from_cols_slice(&out[16..32]);
        assert!(lower.abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0)), 1e-6));
        assert!(upper.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_animated_parent_moves_child() {
        let (scene, bones) = setup();
        let channel = ImportedChannel {
            node_name: "upper".to_string(),
            position_keys: vec![
                VectorKey::new(0.0, Vec3::ZERO),
                VectorKey::new(4.0, Vec3::new(4.0, 0.0, 0.0)),
            ],
            rotation_keys: vec![QuatKey::new(0.0, Quat::IDENTITY)],
            scaling_keys: vec![VectorKey::new(0.0, Vec3::ONE)],
        };
        let clip = clip(&scene, &bones, vec![channel]);
        let mut out = Vec::new();
        fill_identity(&mut out, bones.len());

        PoseEvaluator::new(&scene, &bones, Mat4::IDENTITY, MatrixLayout::ColumnMajor)
            .evaluate(&clip, 1.0, &mut out);

        let lower = Mat4::from_cols_slice(&out[0..16]);
        let p = lower.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_lookup_with_missing_channel_keeps_static_transform() {
        let (scene, bones) = setup();
        let channel = AnimationChannel {
            node_name: "upper".to_string(),
            position_keys: vec![VectorKey::new(0.0, Vec3::new(9.0, 0.0, 0.0))],
            ..Default::default()
        };
        // Lookup built for a clip that animates "upper", used with one that has no channels
        let lookup = NodeLookup::build(&[channel], &scene, &bones, "test");
        assert_eq!(lookup.animated_count(), 1);
        let still = clip(&scene, &bones, Vec::new());

        let mut out = Vec::new();
        fill_identity(&mut out, bones.len());
        PoseEvaluator::new(&scene, &bones, Mat4::IDENTITY, MatrixLayout::ColumnMajor)
            .evaluate_with_lookup(&still, &lookup, 0.0, &mut out);

        let lower = Mat4::from_cols_slice(&out[0..16]);
        let upper = Mat4::from_cols_slice(&out[16..32]);
        assert!(lower.abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0)), 1e-6));
        assert!(upper.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_short_buffer_is_not_overrun() {
        let (scene, bones) = setup();
        let clip = clip(&scene, &bones, Vec::new());
        let mut out = vec![0.0; FLOATS_PER_MATRIX];

        PoseEvaluator::new(&scene, &bones, Mat4::IDENTITY, MatrixLayout::ColumnMajor)
            .evaluate(&clip, 0.0, &mut out);

        assert_eq!(out.len(), FLOATS_PER_MATRIX);
        assert_eq!(out[13], 3.0);
    }

    #[test]
    fn test_bone_matrices_round_trip_layout() {
        let m = Mat4::from_translation(Vec3::new(5.0, 6.0, 7.0));
        let mut data = vec![0.0; FLOATS_PER_MATRIX];
        MatrixLayout::RowMajor.write(&m, &mut data);

        let matrices = BoneMatrices::from_raw(data, MatrixLayout::RowMajor);
        assert_eq!(matrices.bone_count(), 1);
        assert_eq!(matrices.matrix(BoneId(0)), Some(m));
        assert_eq!(matrices.matrix(BoneId(1)), None);
    }
}
