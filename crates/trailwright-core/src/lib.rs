//! Trailwright core engine: platform-agnostic trail history and ribbon geometry.
//!
//! A [`TrailFilter`] records where an anchor has been and, once per frame,
//! turns the live history into a camera- or velocity-aligned ribbon mesh with
//! width and color keyed along its length.

pub mod bounds;
pub mod config;
pub mod curve;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod gradient;
pub mod history;

pub use bounds::{Aabb, Frustum};
pub use config::{TextureMode, TrailAlignment, TrailConfig, TrailPreset};
pub use curve::{FloatKeyframe, WidthCurve, MAX_WIDTH_KEYFRAMES};
pub use error::{Result, TrailError};
pub use filter::{FrameInput, TrailFilter, UpdateStats};
pub use geometry::{build_ribbon, CameraBasis, RibbonFrame, RibbonMesh, TrailVertex};
pub use gradient::{AlphaKey, ColorKey, Gradient, GradientMode, MAX_GRADIENT_KEYS};
pub use history::{PointHistory, TrailPoint};
