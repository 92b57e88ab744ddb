/// Components of the render scene handed to the external renderer

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::Color;

/// Position, rotation and scale in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

/// Unit mesh the renderer should draw, scaled by the transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Flat unit circle facing +Y
    Disc,
    /// Flat annulus; `inner` is the hole radius relative to the outer radius
    Ring { inner: f32 },
    /// Unit sphere
    Sphere,
}

impl Shape {
    pub fn code(&self) -> u32 {
        match self {
            Shape::Disc => 0,
            Shape::Ring { .. } => 1,
            Shape::Sphere => 2,
        }
    }
}

/// Color and transparency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub color: Color,
    pub opacity: f32,
}

/// Where in the timeline a scene entity comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscMember {
    pub disc: usize,
    /// Index into the disc's entities; `None` for the disc mesh and ring
    pub entity: Option<usize>,
}
