//! Axis-aligned bounding boxes and the scene bounds walker

use glam::{Mat4, Vec3};

use crate::mesh::Mesh;
use crate::scene::SceneGraph;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box that contains nothing; expanding it by any point yields that point
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points, `None` if there are none
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::new(*first, *first);
        for &p in rest {
            bounds.expand_point(p);
        }
        Some(bounds)
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn expand_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn expand(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Midpoint of the box
    pub fn centre(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Box enclosing all eight corners after transformation
    pub fn transformed(&self, m: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let mut out = Self::EMPTY;
        for corner in self.corners() {
            out.expand_point(m.transform_point3(corner));
        }
        out
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Bounds of every mesh in the scene, placed by the static node transforms
///
/// Returns [`Aabb::EMPTY`] when no node carries a mesh.
pub fn compute_bounds(scene: &SceneGraph, meshes: &[Mesh]) -> Aabb {
    let mut bounds = Aabb::EMPTY;

    scene.traverse(Mat4::IDENTITY, |_, node, parent| {
        let transform = *parent * node.transform;
        for mesh in node.meshes.iter().filter_map(|&index| meshes.get(index)) {
            bounds.expand(&mesh.bounds().transformed(&transform));
        }
        transform
    });

    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn test_empty_box() {
        let b = Aabb::EMPTY;
        assert!(b.is_empty());
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_from_points_tracks_each_axis() {
        let b = Aabb::from_points(&[
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 5.0, 3.0),
            Vec3::new(0.5, 0.0, -4.0),
        ])
        .unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(b.max, Vec3::new(1.0, 5.0, 3.0));
        assert_eq!(b.centre(), Vec3::new(0.0, 1.5, -0.5));
    }

    #[test]
    fn test_transform_uses_all_corners() {
        let b = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let rotated = b.transformed(&Mat4::from_quat(Quat::from_rotation_z(
            std::f32::consts::FRAC_PI_4,
        )));
        let half_diagonal = std::f32::consts::SQRT_2;
        assert!((rotated.max.x - half_diagonal).abs() < 0.001);
        assert!((rotated.min.y + half_diagonal).abs() < 0.001);
        assert!((rotated.max.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_expand_ignores_empty() {
        let mut b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        b.expand(&Aabb::EMPTY);
        assert_eq!(b, Aabb::new(Vec3::ZERO, Vec3::ONE));
    }
}
