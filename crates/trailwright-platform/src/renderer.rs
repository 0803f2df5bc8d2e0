use tracing::{debug, info};
use trailwright_core::{
    Aabb, FrameInput, Frustum, TrailConfig, TrailError, TrailFilter, TrailVertex, UpdateStats,
};

use crate::{MeshSink, TrailHost};

/// Buffers and visibility for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameOutput<'a> {
    pub vertices: &'a [TrailVertex],
    pub indices: &'a [u32],
    pub bounds: Aabb,
    /// Passed the frustum test (always true without a frustum).
    pub visible: bool,
    pub stats: UpdateStats,
}

impl FrameOutput<'_> {
    /// Visible and carrying at least one triangle.
    pub fn should_draw(&self) -> bool {
        self.visible && !self.indices.is_empty()
    }
}

/// Trail component attached to one host node. Owns its filter exclusively.
///
/// Starts inactive; call [`TrailRenderer::activate`] before the first frame.
pub struct TrailRenderer<H: TrailHost> {
    host: H,
    filter: TrailFilter,
    active: bool,
}

impl<H: TrailHost> TrailRenderer<H> {
    pub fn new(host: H, config: TrailConfig) -> trailwright_core::Result<Self> {
        let filter = TrailFilter::new(config, host.anchor_position())?;
        Ok(Self {
            host,
            filter,
            active: false,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn filter(&self) -> &TrailFilter {
        &self.filter
    }

    /// Runtime configuration goes through the filter's validated setters.
    pub fn filter_mut(&mut self) -> &mut TrailFilter {
        &mut self.filter
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Inactive to active resets the trail at the anchor's current position
    /// so it does not jump from where it was last seen.
    pub fn activate(&mut self) -> trailwright_core::Result<()> {
        if self.active {
            return Ok(());
        }
        let anchor = self.host.anchor_position();
        self.filter.reset(anchor)?;
        self.active = true;
        info!(?anchor, "trail activated");
        Ok(())
    }

    pub fn deactivate(&mut self) {
        if self.active {
            self.active = false;
            debug!("trail deactivated");
        }
    }

    /// Updates the trail from the host and tests the result against
    /// `frustum`. Call exactly once per frame.
    ///
    /// Inactive components report themselves invisible and leave their
    /// history untouched. Fails with [`TrailError::Destroyed`] after
    /// [`TrailRenderer::destroy`].
    pub fn per_frame_update(
        &mut self,
        now: f64,
        frustum: Option<&Frustum>,
    ) -> trailwright_core::Result<FrameOutput<'_>> {
        if self.filter.is_destroyed() {
            return Err(TrailError::Destroyed);
        }
        let stats = if self.active {
            let input = FrameInput {
                now,
                anchor_position: self.host.anchor_position(),
                anchor_up: self.host.anchor_up(),
                camera: self.host.camera(),
            };
            self.filter.update(&input)?
        } else {
            UpdateStats {
                live_points: self.filter.points().len(),
                ..UpdateStats::default()
            }
        };

        let bounds = self.filter.bounds();
        let visible = self.active && frustum.map_or(true, |f| f.intersects_aabb(&bounds));
        let mesh = self.filter.mesh();
        Ok(FrameOutput {
            vertices: &mesh.vertices,
            indices: &mesh.indices,
            bounds,
            visible,
            stats,
        })
    }

    /// Hands the current buffers to `sink` if there is anything to draw.
    /// Returns whether a submission happened.
    pub fn submit(&self, sink: &mut impl MeshSink) -> crate::Result<bool> {
        if self.filter.is_destroyed() {
            return Err(Box::new(TrailError::Destroyed));
        }
        if !self.active || !self.filter.is_renderable() {
            return Ok(false);
        }
        sink.submit(self.filter.mesh(), &self.filter.bounds())?;
        Ok(true)
    }

    pub fn clear(&mut self) -> trailwright_core::Result<()> {
        self.filter.clear()
    }

    /// Releases all geometry and curve data. The component is unusable
    /// afterwards.
    pub fn destroy(&mut self) {
        self.active = false;
        self.filter.destroy();
    }

    /// New inactive component on `host` with a deep copy of this one's
    /// configuration. History is not copied.
    pub fn clone_to<H2: TrailHost>(&self, host: H2) -> trailwright_core::Result<TrailRenderer<H2>> {
        if self.filter.is_destroyed() {
            return Err(TrailError::Destroyed);
        }
        TrailRenderer::new(host, self.filter.config().clone())
    }
}
