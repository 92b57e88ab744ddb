/// Instance data extracted from the render scene for a frame
///
/// Everything is drawn with transparency, so instances are ordered
/// back-to-front from the camera.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::components::{Shape, Tint, Transform};

/// Per-instance data laid out for a GPU instance buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// 0 = disc, 1 = ring, 2 = sphere
    pub shape: u32,
    /// Ring hole ratio, zero otherwise
    pub inner_ratio: f32,
    pub _pad: [f32; 2],
}

/// Render data extracted from the scene for a frame
pub struct RenderBatch {
    pub instances: Vec<InstanceRaw>,
    /// Distance from camera per instance, same order as `instances`
    pub distances: Vec<f32>,
}

impl RenderBatch {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
            distances: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBatch {
    fn default() -> Self {
        Self::new()
    }
}

fn instance(transform: &Transform, shape: &Shape, tint: &Tint) -> InstanceRaw {
    let color = tint.color.to_vec3();
    InstanceRaw {
        model: transform.model_matrix().to_cols_array_2d(),
        color: [color.x, color.y, color.z, tint.opacity],
        shape: shape.code(),
        inner_ratio: match shape {
            Shape::Ring { inner } => *inner,
            _ => 0.0,
        },
        _pad: [0.0; 2],
    }
}

/// Collect every visible object, farthest first
pub fn extract_render_batch(world: &hecs::World, camera_position: Vec3) -> RenderBatch {
    let mut items: Vec<(f32, InstanceRaw)> = world
        .query::<(&Transform, &Shape, &Tint)>()
        .iter()
        .filter(|(_, (_, _, tint))| tint.opacity > 0.0)
        .map(|(_, (transform, shape, tint))| {
            (
                transform.position.distance(camera_position),
                instance(transform, shape, tint),
            )
        })
        .collect();

    items.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let (distances, instances) = items.into_iter().unzip();
    RenderBatch { instances, distances }
}
