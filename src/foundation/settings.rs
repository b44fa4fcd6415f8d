use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{LucentError, LucentResult};

/// Fragment stage used by the composite pipeline unless overridden.
pub const DEFAULT_FRAGMENT_STAGE: &str = "imageBlending";

/// Adapter power preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerPreference {
    /// Prefer an integrated or otherwise power-efficient adapter.
    LowPower,
    /// Prefer a discrete or otherwise fast adapter.
    #[default]
    HighPerformance,
}

impl PowerPreference {
    pub(crate) fn to_wgpu(self) -> wgpu::PowerPreference {
        match self {
            Self::LowPower => wgpu::PowerPreference::LowPower,
            Self::HighPerformance => wgpu::PowerPreference::HighPerformance,
        }
    }
}

/// How an input blur mask reaches the composite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurMode {
    /// Run the variable blur stage on the background and leave slot 3 unbound.
    #[default]
    Prefilter,
    /// Skip the blur stage and bind the mask to slot 3 for in-shader sampling.
    ShaderSampled,
}

/// Options used when acquiring the GPU device.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ContextOptions {
    /// Adapter power preference.
    pub power_preference: PowerPreference,
    /// Request the software fallback adapter.
    pub force_fallback_adapter: bool,
}

/// Per-composite rendering settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Blur mask handling.
    pub blur_mode: BlurMode,
    /// Name of the fragment stage looked up in the shader program.
    pub fragment_stage: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            blur_mode: BlurMode::default(),
            fragment_stage: DEFAULT_FRAGMENT_STAGE.to_string(),
        }
    }
}

/// Complete configuration, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LucentConfig {
    /// Device acquisition.
    pub context: ContextOptions,
    /// Composite behavior.
    pub render: RenderSettings,
}

impl LucentConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(s: &str) -> LucentResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| LucentError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> LucentResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject settings that can never produce a pipeline.
    pub fn validate(&self) -> LucentResult<()> {
        if self.render.fragment_stage.trim().is_empty() {
            return Err(LucentError::validation(
                "render.fragment_stage must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/settings.rs"]
mod tests;
