//! Host adapter layer so `trailwright-core` stays free of scene and GPU types.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use trailwright_core::{Aabb, CameraBasis, RibbonMesh};

mod renderer;
mod sink;

pub use renderer::{FrameOutput, TrailRenderer};
pub use sink::{RecordingSink, Submission};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// The scene node a trail is attached to, seen from the trail's side.
pub trait TrailHost {
    /// World position of the anchor this frame.
    fn anchor_position(&self) -> Vec3;

    /// World up axis of the anchor, used by velocity-aligned ribbons.
    fn anchor_up(&self) -> Vec3 {
        Vec3::Y
    }

    /// Camera the ribbon is built for this frame.
    fn camera(&self) -> CameraBasis;
}

/// Receives finished ribbon buffers (GPU upload, capture, etc.).
pub trait MeshSink {
    fn submit(&mut self, mesh: &RibbonMesh, bounds: &Aabb) -> Result<()>;
}

/// Plain-data snapshot of a host for tests and tools.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticHost {
    pub position: Vec3,
    pub up: Vec3,
    pub camera_position: Vec3,
    pub camera_forward: Vec3,
}

impl StaticHost {
    pub fn at(position: Vec3) -> Self {
        let camera = CameraBasis::default();
        Self {
            position,
            up: Vec3::Y,
            camera_position: camera.position,
            camera_forward: camera.forward,
        }
    }
}

impl TrailHost for StaticHost {
    fn anchor_position(&self) -> Vec3 {
        self.position
    }

    fn anchor_up(&self) -> Vec3 {
        self.up
    }

    fn camera(&self) -> CameraBasis {
        CameraBasis::new(self.camera_position, self.camera_forward)
    }
}
