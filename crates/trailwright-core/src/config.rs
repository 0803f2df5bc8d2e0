//! Trail configuration and presets.

use std::path::Path;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::curve::WidthCurve;
use crate::error::{Result, TrailError};
use crate::gradient::Gradient;

/// How the U texture coordinate runs along the ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureMode {
    /// One texture span over the whole ribbon.
    #[default]
    Stretch,
    /// Repeat at a fixed world-space rate.
    Tile,
}

/// How each point's width vector is oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailAlignment {
    /// Face the camera.
    #[default]
    View,
    /// Lie flat in the plane orthogonal to the reference axis.
    Velocity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Seconds a point stays alive.
    #[serde(rename = "time")]
    pub lifetime: f32,
    pub min_vertex_distance: f32,
    pub width_multiplier: f32,
    pub texture_mode: TextureMode,
    pub alignment: TrailAlignment,
    /// World length of one texture repeat in [`TextureMode::Tile`]. Falls
    /// back to `min_vertex_distance` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile_length: Option<f32>,
    /// Reference axis for [`TrailAlignment::Velocity`]. Falls back to the
    /// anchor's up axis when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_axis: Option<Vec3>,
    // tables last so the TOML form stays valid
    pub width_curve: WidthCurve,
    pub color_gradient: Gradient,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            lifetime: 5.0,
            min_vertex_distance: 0.1,
            width_multiplier: 1.0,
            texture_mode: TextureMode::Stretch,
            alignment: TrailAlignment::View,
            tile_length: None,
            velocity_axis: None,
            width_curve: WidthCurve::default(),
            color_gradient: Gradient::default(),
        }
    }
}

impl TrailConfig {
    /// Checks the scalar fields. Curve and gradient bounds are enforced by
    /// their own constructors.
    pub fn validate(&self) -> Result<()> {
        validate_lifetime(self.lifetime)?;
        validate_min_vertex_distance(self.min_vertex_distance)?;
        validate_width_multiplier(self.width_multiplier)?;
        validate_tile_length(self.tile_length)?;
        validate_velocity_axis(self.velocity_axis)?;
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| TrailError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TrailError::ConfigSerialize(e.to_string()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| TrailError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TrailError::ConfigSerialize(e.to_string()))
    }

    /// Loads a config file, picking the format from the extension (`.json`
    /// is JSON, anything else TOML).
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            _ => Self::from_toml_str(&text)?,
        };
        info!("loaded trail config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => self.to_json_string()?,
            _ => self.to_toml_string()?,
        };
        std::fs::write(path, text)?;
        debug!("wrote trail config to {}", path.display());
        Ok(())
    }
}

pub(crate) fn validate_lifetime(value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(TrailError::invalid("time", format!("{value} is not finite")));
    }
    Ok(())
}

pub(crate) fn validate_min_vertex_distance(value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TrailError::invalid(
            "min_vertex_distance",
            format!("{value} must be finite and >= 0"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_width_multiplier(value: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(TrailError::invalid("width_multiplier", format!("{value} is not finite")));
    }
    Ok(())
}

pub(crate) fn validate_tile_length(value: Option<f32>) -> Result<()> {
    match value {
        Some(len) if !len.is_finite() || len <= 0.0 => Err(TrailError::invalid(
            "tile_length",
            format!("{len} must be finite and > 0"),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn validate_velocity_axis(value: Option<Vec3>) -> Result<()> {
    match value {
        Some(axis) if !axis.is_finite() || axis.length_squared() <= f32::EPSILON => Err(
            TrailError::invalid("velocity_axis", format!("{axis} must be finite and non-zero")),
        ),
        _ => Ok(()),
    }
}

/// Named configuration bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailPreset {
    pub name: String,
    #[serde(flatten)]
    pub config: TrailConfig,
}

impl Default for TrailPreset {
    fn default() -> Self {
        Self {
            name: "default".into(),
            config: TrailConfig::default(),
        }
    }
}

impl TrailPreset {
    /// Short, bright streak that tapers to nothing and fades out.
    pub fn comet() -> Self {
        Self {
            name: "comet".into(),
            config: TrailConfig {
                lifetime: 0.6,
                min_vertex_distance: 0.05,
                width_multiplier: 0.5,
                width_curve: WidthCurve::linear(0.0, 1.0),
                color_gradient: Gradient::two_stop(
                    Vec4::new(1.0, 0.6, 0.2, 0.0),
                    Vec4::new(1.0, 1.0, 1.0, 1.0),
                ),
                ..TrailConfig::default()
            },
        }
    }

    /// Long flat ribbon with a tiled texture.
    pub fn ribbon() -> Self {
        Self {
            name: "ribbon".into(),
            config: TrailConfig {
                lifetime: 3.0,
                min_vertex_distance: 0.25,
                width_multiplier: 0.3,
                texture_mode: TextureMode::Tile,
                alignment: TrailAlignment::Velocity,
                tile_length: Some(1.0),
                ..TrailConfig::default()
            },
        }
    }

    pub fn builtin() -> Vec<Self> {
        vec![Self::default(), Self::comet(), Self::ribbon()]
    }

    pub fn find(name: &str) -> Option<Self> {
        Self::builtin().into_iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        for preset in TrailPreset::builtin() {
            preset.config.validate().unwrap();
        }
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = TrailConfig::from_toml_str(
            r#"
time = 1.5
texture_mode = "tile"
width_curve = [{ time = 0.0, value = 0.0 }, { time = 1.0, value = 2.0 }]
"#,
        )
        .unwrap();
        assert_eq!(config.lifetime, 1.5);
        assert_eq!(config.texture_mode, TextureMode::Tile);
        assert_eq!(config.width_curve.evaluate(1.0), 2.0);
        assert_eq!(config.alignment, TrailAlignment::View);
        assert_eq!(config.min_vertex_distance, 0.1);
    }

    #[test]
    fn toml_with_long_width_curve_is_rejected() {
        let keys: Vec<String> = (0..11)
            .map(|i| format!("{{ time = {}.0, value = 1.0 }}", i))
            .collect();
        let text = format!("width_curve = [{}]", keys.join(", "));
        let err = TrailConfig::from_toml_str(&text).unwrap_err();
        assert!(matches!(err, TrailError::ConfigParse(_)));
    }

    #[test]
    fn negative_min_distance_is_rejected() {
        let err = TrailConfig::from_toml_str("min_vertex_distance = -1.0").unwrap_err();
        assert!(matches!(err, TrailError::InvalidParameter { name: "min_vertex_distance", .. }));
    }

    #[test]
    fn zero_velocity_axis_is_rejected() {
        let config = TrailConfig {
            velocity_axis: Some(Vec3::ZERO),
            ..TrailConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_round_trip() {
        let config = TrailPreset::ribbon().config;
        let text = config.to_toml_string().unwrap();
        let back = TrailConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn load_and_save_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrailPreset::comet().config;

        let json = dir.path().join("trail.json");
        config.save(&json).unwrap();
        assert!(std::fs::read_to_string(&json).unwrap().trim_start().starts_with('{'));
        assert_eq!(TrailConfig::load(&json).unwrap(), config);

        let toml_path = dir.path().join("trail.toml");
        config.save(&toml_path).unwrap();
        assert_eq!(TrailConfig::load(&toml_path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TrailConfig::load(Path::new("/nonexistent/trailwright.toml")).unwrap_err();
        assert!(matches!(err, TrailError::Io(_)));
    }

    #[test]
    fn presets_are_found_by_name() {
        assert_eq!(TrailPreset::find("Comet").unwrap().name, "comet");
        assert!(TrailPreset::find("nope").is_none());
    }
}
