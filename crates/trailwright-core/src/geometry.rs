//! Ribbon mesh construction.
//!
//! Each trail point becomes a pair of vertices offset along a per-point side
//! vector; consecutive pairs are stitched with two triangles. Triangles wind
//! counter-clockwise when seen from the side the view-aligned ribbon faces.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::Serialize;

use crate::config::{TextureMode, TrailAlignment, TrailConfig};

/// Vertex layout handed to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize)]
pub struct TrailVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

/// Camera basis used by view-aligned ribbons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub position: Vec3,
    /// Normalized view direction.
    pub forward: Vec3,
}

impl CameraBasis {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.normalize_or_zero(),
        }
    }

    /// Camera at `position` looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, target - position)
    }

    /// Direction from the camera to `point`, or `forward` when the point
    /// sits on the camera.
    pub fn view_dir(&self, point: Vec3) -> Vec3 {
        let dir = (point - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            self.forward
        } else {
            dir
        }
    }
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z)
    }
}

/// Vertex and index buffers for one ribbon. Cleared buffers keep their
/// capacity so steady-state frames do not reallocate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RibbonMesh {
    pub vertices: Vec<TrailVertex>,
    pub indices: Vec<u32>,
}

impl RibbonMesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| Vec3::from_array(v.position))
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn release(&mut self) {
        self.vertices = Vec::new();
        self.indices = Vec::new();
    }
}

/// Per-frame orientation inputs.
#[derive(Debug, Clone, Copy)]
pub struct RibbonFrame {
    pub camera: CameraBasis,
    /// Anchor's world up, used when no velocity axis is configured.
    pub anchor_up: Vec3,
}

/// Rebuilds `mesh` from `points` (oldest first). Fewer than two points leave
/// the mesh empty.
pub fn build_ribbon(
    points: &[Vec3],
    config: &TrailConfig,
    frame: &RibbonFrame,
    mesh: &mut RibbonMesh,
) {
    mesh.clear();
    let n = points.len();
    if n < 2 {
        return;
    }

    let tangents = tangents(points);
    let sides = side_vectors(points, &tangents, config, frame);
    let tile = tile_length(config);
    let last = (n - 1) as f32;

    mesh.vertices.reserve(n * 2);
    mesh.indices.reserve((n - 1) * 6);

    let mut travelled = 0.0f32;
    for (i, &p) in points.iter().enumerate() {
        if i > 0 {
            travelled += p.distance(points[i - 1]);
        }
        let t = i as f32 / last;
        let half = config.width_multiplier * config.width_curve.evaluate(t) * 0.5;
        let offset = sides[i] * half;
        let color = config.color_gradient.evaluate(t).to_array();
        let u = match config.texture_mode {
            TextureMode::Stretch => t,
            TextureMode::Tile => travelled / tile,
        };

        mesh.vertices.push(TrailVertex {
            position: (p + offset).to_array(),
            color,
            uv: [u, 0.0],
        });
        mesh.vertices.push(TrailVertex {
            position: (p - offset).to_array(),
            color,
            uv: [u, 1.0],
        });
    }

    for i in 0..(n as u32 - 1) {
        let a = i * 2;
        mesh.indices.extend_from_slice(&[a, a + 1, a + 2, a + 1, a + 3, a + 2]);
    }
}

fn tile_length(config: &TrailConfig) -> f32 {
    let len = config.tile_length.unwrap_or(config.min_vertex_distance);
    if len > 0.0 {
        len
    } else {
        1.0
    }
}

/// Endpoint tangents follow their single segment; interior tangents average
/// the incoming and outgoing directions. Zero tangents borrow the nearest
/// valid one.
fn tangents(points: &[Vec3]) -> Vec<Vec3> {
    let n = points.len();
    let dirs: Vec<Vec3> = points.windows(2).map(|w| (w[1] - w[0]).normalize_or_zero()).collect();

    let raw = (0..n).map(|i| {
        let incoming = if i > 0 { dirs[i - 1] } else { Vec3::ZERO };
        let outgoing = dirs.get(i).copied().unwrap_or(Vec3::ZERO);
        let central = (incoming + outgoing).normalize_or_zero();
        // hairpin turns cancel out; prefer the outgoing leg
        [central, outgoing, incoming]
            .into_iter()
            .find(|d| *d != Vec3::ZERO)
            .unwrap_or(Vec3::ZERO)
    });
    fill_gaps(raw.collect())
}

fn side_vectors(
    points: &[Vec3],
    tangents: &[Vec3],
    config: &TrailConfig,
    frame: &RibbonFrame,
) -> Vec<Vec3> {
    let raw = points.iter().zip(tangents).map(|(&p, &tangent)| match config.alignment {
        TrailAlignment::View => tangent.cross(frame.camera.view_dir(p)).normalize_or_zero(),
        TrailAlignment::Velocity => {
            let axis = config.velocity_axis.unwrap_or(frame.anchor_up);
            axis.cross(tangent).normalize_or_zero()
        }
    });
    fill_gaps(raw.collect())
}

/// Replaces zero vectors with the previous non-zero entry, and leading zeros
/// with the first non-zero entry. All-zero input stays zero.
fn fill_gaps(mut v: Vec<Vec3>) -> Vec<Vec3> {
    let Some(first) = v.iter().copied().find(|d| *d != Vec3::ZERO) else {
        return v;
    };
    let mut carry = first;
    for d in &mut v {
        if *d == Vec3::ZERO {
            *d = carry;
        } else {
            carry = *d;
        }
    }
    v
}
