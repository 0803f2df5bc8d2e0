//! The trail filter: point emission, aging, and per-frame mesh rebuild.

use glam::Vec3;
use tracing::{debug, trace, warn};

use crate::bounds::Aabb;
use crate::config::{self, TextureMode, TrailAlignment, TrailConfig};
use crate::curve::{FloatKeyframe, WidthCurve};
use crate::error::{Result, TrailError};
use crate::geometry::{build_ribbon, CameraBasis, RibbonFrame, RibbonMesh};
use crate::gradient::Gradient;
use crate::history::{PointHistory, TrailPoint};

/// Everything the filter needs from the host for one tick.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Seconds on a monotonic clock.
    pub now: f64,
    pub anchor_position: Vec3,
    pub anchor_up: Vec3,
    pub camera: CameraBasis,
}

impl FrameInput {
    pub fn new(now: f64, anchor_position: Vec3, camera: CameraBasis) -> Self {
        Self {
            now,
            anchor_position,
            anchor_up: Vec3::Y,
            camera,
        }
    }
}

/// What changed during one [`TrailFilter::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateStats {
    pub emitted: bool,
    pub evicted: usize,
    pub live_points: usize,
}

pub struct TrailFilter {
    config: TrailConfig,
    points: PointHistory,
    last_position: Vec3,
    mesh: RibbonMesh,
    bounds: Aabb,
    positions: Vec<Vec3>,
    destroyed: bool,
}

impl TrailFilter {
    pub fn new(config: TrailConfig, anchor_position: Vec3) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            points: PointHistory::new(),
            last_position: anchor_position,
            mesh: RibbonMesh::default(),
            bounds: Aabb::point(anchor_position),
            positions: Vec::new(),
            destroyed: false,
        })
    }

    /// Runs one tick: emit, evict, rebuild. Must be called at most once per
    /// frame; a second call in the same frame can emit twice.
    ///
    /// `input.now` must be finite and later than the newest live point,
    /// otherwise the call fails before anything is emitted.
    pub fn update(&mut self, input: &FrameInput) -> Result<UpdateStats> {
        self.ensure_alive()?;
        self.check_clock(input.now)?;

        let emitted = input.anchor_position.distance(self.last_position)
            >= self.config.min_vertex_distance;
        if emitted {
            self.points.push(TrailPoint {
                position: input.anchor_position,
                created_at: input.now,
            });
            self.last_position = input.anchor_position;
        }

        let evicted = self.points.evict_expired(input.now, self.config.lifetime);
        let live_points = self.points.len();

        if live_points < 2 {
            self.mesh.clear();
            self.bounds = Aabb::point(input.anchor_position);
        } else {
            self.positions.clear();
            self.positions.extend(self.points.iter().map(|p| p.position));
            let frame = RibbonFrame {
                camera: input.camera,
                anchor_up: input.anchor_up,
            };
            build_ribbon(&self.positions, &self.config, &frame, &mut self.mesh);
            self.bounds = Aabb::from_points(self.mesh.positions())
                .unwrap_or_else(|| Aabb::point(input.anchor_position));
        }

        trace!(emitted, evicted, live_points, "trail update");
        Ok(UpdateStats {
            emitted,
            evicted,
            live_points,
        })
    }

    /// Drops history and restarts emission from `anchor_position`, as on
    /// activation.
    pub fn reset(&mut self, anchor_position: Vec3) -> Result<()> {
        self.ensure_alive()?;
        self.points.clear();
        self.mesh.clear();
        self.last_position = anchor_position;
        self.bounds = Aabb::point(anchor_position);
        debug!(?anchor_position, "trail reset");
        Ok(())
    }

    /// Empties history and buffers. Capacity is kept.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_alive()?;
        self.points.clear();
        self.mesh.clear();
        self.bounds = Aabb::point(self.last_position);
        debug!("trail cleared");
        Ok(())
    }

    /// Releases buffers and curve data. Every later mutating call fails with
    /// [`TrailError::Destroyed`]. Destroying twice is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.points.release();
        self.mesh.release();
        self.positions = Vec::new();
        self.config.width_curve.clear();
        self.config.color_gradient.clear();
        self.destroyed = true;
        debug!("trail destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// True when the last update produced geometry.
    pub fn is_renderable(&self) -> bool {
        !self.destroyed && !self.mesh.is_empty()
    }

    pub fn mesh(&self) -> &RibbonMesh {
        &self.mesh
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn points(&self) -> &PointHistory {
        &self.points
    }

    pub fn last_position(&self) -> Vec3 {
        self.last_position
    }

    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    /// Replaces the whole configuration after validating it.
    pub fn set_config(&mut self, config: TrailConfig) -> Result<()> {
        self.ensure_alive()?;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn lifetime(&self) -> f32 {
        self.config.lifetime
    }

    pub fn set_lifetime(&mut self, seconds: f32) -> Result<()> {
        self.ensure_alive()?;
        config::validate_lifetime(seconds)?;
        if seconds <= 0.0 {
            debug!(seconds, "non-positive lifetime, trail will stay empty");
        }
        self.config.lifetime = seconds;
        Ok(())
    }

    pub fn min_vertex_distance(&self) -> f32 {
        self.config.min_vertex_distance
    }

    pub fn set_min_vertex_distance(&mut self, distance: f32) -> Result<()> {
        self.ensure_alive()?;
        config::validate_min_vertex_distance(distance)?;
        self.config.min_vertex_distance = distance;
        Ok(())
    }

    pub fn width_multiplier(&self) -> f32 {
        self.config.width_multiplier
    }

    pub fn set_width_multiplier(&mut self, multiplier: f32) -> Result<()> {
        self.ensure_alive()?;
        config::validate_width_multiplier(multiplier)?;
        self.config.width_multiplier = multiplier;
        Ok(())
    }

    pub fn width_curve(&self) -> &WidthCurve {
        &self.config.width_curve
    }

    /// Fails with [`TrailError::WidthCurveTooLong`] past ten keyframes; the
    /// previous curve is kept on any error.
    pub fn set_width_curve(&mut self, keys: Vec<FloatKeyframe>) -> Result<()> {
        self.ensure_alive()?;
        match WidthCurve::new(keys) {
            Ok(curve) => {
                self.config.width_curve = curve;
                Ok(())
            }
            Err(e) => {
                warn!("rejected width curve: {e}");
                Err(e)
            }
        }
    }

    pub fn color_gradient(&self) -> &Gradient {
        &self.config.color_gradient
    }

    pub fn set_color_gradient(&mut self, gradient: Gradient) -> Result<()> {
        self.ensure_alive()?;
        self.config.color_gradient = gradient;
        Ok(())
    }

    pub fn texture_mode(&self) -> TextureMode {
        self.config.texture_mode
    }

    pub fn set_texture_mode(&mut self, mode: TextureMode) -> Result<()> {
        self.ensure_alive()?;
        self.config.texture_mode = mode;
        Ok(())
    }

    pub fn alignment(&self) -> TrailAlignment {
        self.config.alignment
    }

    pub fn set_alignment(&mut self, alignment: TrailAlignment) -> Result<()> {
        self.ensure_alive()?;
        self.config.alignment = alignment;
        Ok(())
    }

    pub fn set_tile_length(&mut self, length: Option<f32>) -> Result<()> {
        self.ensure_alive()?;
        config::validate_tile_length(length)?;
        self.config.tile_length = length;
        Ok(())
    }

    pub fn set_velocity_axis(&mut self, axis: Option<Vec3>) -> Result<()> {
        self.ensure_alive()?;
        config::validate_velocity_axis(axis)?;
        self.config.velocity_axis = axis;
        Ok(())
    }

    fn check_clock(&self, now: f64) -> Result<()> {
        if !now.is_finite() {
            warn!(now, "rejected non-finite frame time");
            return Err(TrailError::NonFiniteTime(now));
        }
        match self.points.newest() {
            Some(newest) if now <= newest.created_at => {
                warn!(now, newest = newest.created_at, "rejected out-of-order frame time");
                Err(TrailError::TimeNotIncreasing {
                    now,
                    newest: newest.created_at,
                })
            }
            _ => Ok(()),
        }
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            return Err(TrailError::Destroyed);
        }
        Ok(())
    }
}
