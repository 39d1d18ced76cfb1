//! Keyframe and channel types

use glam::{Mat4, Quat, Vec3, Vec4};

use super::interpolation::interpolate;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// A timestamped value; times are in animation ticks
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct Keyframe<T> {
    pub time: f64,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub const fn new(time: f64, value: T) -> Self {
        Self { time, value }
    }
}

/// Translation or scale key
pub type VectorKey = Keyframe<Vec3>;

/// Rotation key
pub type QuatKey = Keyframe<Quat>;

/// Values that can be blended between two keyframes
pub trait Interpolate: Copy {
    /// Blend from `self` towards `other` by factor `t` in [0, 1]
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec3 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

impl Interpolate for Quat {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        let start = normalize_rotation(*self);
        let end = normalize_rotation(*other);
        normalize_rotation(start.slerp(end, t))
    }
}

/// Unit-length copy of `q`, or identity when `q` has no usable length
pub fn normalize_rotation(q: Quat) -> Quat {
    let v = Vec4::from(q).normalize_or_zero();
    if v == Vec4::ZERO {
        Quat::IDENTITY
    } else {
        Quat::from_vec4(v)
    }
}

/// Keyframe tracks driving one node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationChannel {
    /// Name of the scene node this channel animates
    pub node_name: String,
    pub position_keys: Vec<VectorKey>,
    pub rotation_keys: Vec<QuatKey>,
    pub scaling_keys: Vec<VectorKey>,
}

impl AnimationChannel {
    /// Interpolated translation, rotation and scale at `time` ticks
    ///
    /// An empty track contributes the neutral value for its component.
    pub fn sample(&self, time: f64) -> (Vec3, Quat, Vec3) {
        let translation = interpolate(&self.position_keys, time).unwrap_or(Vec3::ZERO);
        let rotation = interpolate(&self.rotation_keys, time).unwrap_or(Quat::IDENTITY);
        let scale = interpolate(&self.scaling_keys, time).unwrap_or(Vec3::ONE);
        (translation, rotation, scale)
    }

    /// Local node transform at `time` ticks, composed as `T * R * S`
    pub fn local_transform(&self, time: f64) -> Mat4 {
        let (translation, rotation, scale) = self.sample(time);
        Mat4::from_scale_rotation_translation(scale, rotation, translation)
    }

    /// Whether any track has keys
    pub fn has_keys(&self) -> bool {
        !self.position_keys.is_empty()
            || !self.rotation_keys.is_empty()
            || !self.scaling_keys.is_empty()
    }
}
