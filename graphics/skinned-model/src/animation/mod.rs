//! Skeletal animation
//!
//! This module turns keyframe animation data into skinning matrices:
//! - Keyframe interpolation (linear for vectors, spherical for rotations)
//! - Per-clip lookup tables resolving nodes to channels and bones
//! - Hierarchy walk composing node transforms into bone matrices
//!
//! # Example
//!
//! ```rust,ignore
//! use skinned_model::Model;
//!
//! let mut model = Model::new(imported_scene, Default::default())?;
//! model.load_animations();
//!
//! // Once per frame
//! let matrices = model.evaluate_pose(0, elapsed_seconds);
//! renderer.upload_bones(matrices.as_slice());
//! ```

mod clip;
mod interpolation;
mod lookup;
mod pose;
mod types;

pub use clip::AnimationClip;
pub use interpolation::{find_key_index, interpolate, is_sorted};
pub use lookup::{LookupEntry, NodeLookup};
pub use pose::{BoneMatrices, FLOATS_PER_MATRIX, PoseEvaluator};
pub(crate) use pose::fill_identity;
pub use types::{
    AnimationChannel, Interpolate, Keyframe, QuatKey, VectorKey, normalize_rotation,
};
