//! Import options (import.toml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User-facing import configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Flip triangle winding and negate normals after assembly
    pub invert_normal: bool,

    /// Uniform scale applied to every vertex position.
    /// Default: 1.0
    pub mesh_scale_ratio: f32,

    /// Ignore source normals and let the mesh builder synthesize them
    pub recompute_normals: bool,

    /// Ignore source tangents and let the mesh builder synthesize them
    pub recompute_tangents: bool,

    /// Ask the mesh builder to use MikkTSpace when it computes tangents.
    /// Default: true
    pub use_mikk_tspace: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            invert_normal: false,
            mesh_scale_ratio: 1.0,
            recompute_normals: false,
            recompute_tangents: false,
            use_mikk_tspace: true,
        }
    }
}

/// Invalid option values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionsError {
    #[error("mesh_scale_ratio must be finite and non-zero, got {0}")]
    InvalidScale(f32),
}

impl ImportOptions {
    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read options: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid options: {}", path.display()))
    }

    /// Parse and validate options from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let options: Self = toml::from_str(content).context("Failed to parse import options")?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.mesh_scale_ratio.is_finite() || self.mesh_scale_ratio == 0.0 {
            return Err(OptionsError::InvalidScale(self.mesh_scale_ratio));
        }
        Ok(())
    }

    /// Initial per-mesh build settings
    pub fn build_settings(&self) -> BuildSettings {
        BuildSettings {
            recompute_normals: self.recompute_normals,
            recompute_tangents: self.recompute_tangents,
            use_mikk_tspace: self.use_mikk_tspace,
        }
    }
}

/// Instructions for the mesh builder, carried with each mesh.
///
/// The recompute flags start from [`ImportOptions`] and only ever turn on
/// while a mesh is assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildSettings {
    pub recompute_normals: bool,
    pub recompute_tangents: bool,
    pub use_mikk_tspace: bool,
}
