//! Common test fixtures

#![allow(dead_code)]

use glam::{Mat4, Quat, Vec3};
use skinned_model::import::{
    ImportedAnimation, ImportedBone, ImportedChannel, ImportedMesh, ImportedNode, ImportedScene,
    VertexWeight,
};

/// Route log output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Mesh with the given vertices, one triangle fan and optional full-weight bones
pub fn mesh(name: &str, positions: Vec<Vec3>, bones: &[(&str, Mat4)]) -> ImportedMesh {
    let vertex_count = positions.len() as u32;
    let faces = (1..vertex_count.saturating_sub(1))
        .map(|i| vec![0, i, i + 1])
        .collect();

    // Split every vertex evenly across the listed bones
    let share = if bones.is_empty() {
        0.0
    } else {
        1.0 / bones.len() as f32
    };
    let bones = bones
        .iter()
        .map(|(name, offset)| ImportedBone {
            name: (*name).to_string(),
            offset: *offset,
            weights: (0..vertex_count)
                .map(|vertex_id| VertexWeight {
                    vertex_id,
                    weight: share,
                })
                .collect(),
        })
        .collect();

    ImportedMesh {
        name: name.to_string(),
        normals: Some(vec![Vec3::Y; positions.len()]),
        positions,
        faces,
        material_index: 0,
        bones,
        ..Default::default()
    }
}

/// Channel with translation keys only; rotation and scale stay neutral
pub fn translation_channel(node: &str, keys: &[(f64, Vec3)]) -> ImportedChannel {
    ImportedChannel {
        node_name: node.to_string(),
        position_keys: keys
            .iter()
            .map(|&(time, value)| skinned_model::animation::VectorKey::new(time, value))
            .collect(),
        rotation_keys: vec![skinned_model::animation::QuatKey::new(0.0, Quat::IDENTITY)],
        scaling_keys: vec![skinned_model::animation::VectorKey::new(0.0, Vec3::ONE)],
    }
}

pub fn animation(name: &str, duration: f64, ticks_per_second: f64, channels: Vec<ImportedChannel>) -> ImportedAnimation {
    ImportedAnimation {
        name: name.to_string(),
        duration,
        ticks_per_second,
        channels,
    }
}

/// root -> A -> B, where B is a bone with identity offset skinning one triangle
pub fn chain_scene(root_transform: Mat4, b_transform: Mat4) -> ImportedScene {
    let root = ImportedNode::new("root", root_transform).with_child(
        ImportedNode::new("A", Mat4::IDENTITY)
            .with_child(ImportedNode::new("B", b_transform).with_mesh(0)),
    );

    ImportedScene {
        name: "chain".to_string(),
        root: Some(root),
        meshes: vec![mesh(
            "skin",
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            &[("B", Mat4::IDENTITY)],
        )],
        animations: Vec::new(),
    }
}

/// Flat matrix data compared element-wise with a tolerance
pub fn assert_matrix_eq(actual: &[f32], expected: &Mat4) {
    let expected = expected.to_cols_array();
    assert_eq!(actual.len(), 16);
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!((a - e).abs() < 1e-5, "element {i}: {a} != {e}");
    }
}
