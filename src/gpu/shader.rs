//! Compiled shader program with stage lookup by name.

use std::borrow::Cow;

use crate::foundation::error::{GpuResource, LucentError, LucentResult};

/// WGSL source of the overlay program.
pub const TRANSPARENCY_WGSL: &str = include_str!("shaders/transparency.wgsl");

/// Vertex stage generating the full-viewport quad.
pub const VERTEX_QUAD_STAGE: &str = "vertexQuad";

/// Kind of pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageKind {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
}

impl StageKind {
    fn to_naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

/// Entry points declared by a WGSL program.
#[derive(Clone, Debug)]
pub struct ShaderCatalog {
    entries: Vec<(String, naga::ShaderStage)>,
}

impl ShaderCatalog {
    /// Parse `source` and record its entry points.
    pub fn parse(source: &str) -> LucentResult<Self> {
        let module = naga::front::wgsl::parse_str(source).map_err(|e| {
            LucentError::resource(
                GpuResource::ShaderModule,
                e.emit_to_string(source),
            )
        })?;
        let entries = module
            .entry_points
            .into_iter()
            .map(|ep| (ep.name, ep.stage))
            .collect();
        Ok(Self { entries })
    }

    /// Find the stage called `name` of the given kind.
    pub fn lookup(&self, name: &str, kind: StageKind) -> LucentResult<&str> {
        self.entries
            .iter()
            .find(|(entry, stage)| entry == name && *stage == kind.to_naga())
            .map(|(entry, _)| entry.as_str())
            .ok_or_else(|| LucentError::ShaderStageNotFound(format!("{kind:?} stage '{name}'")))
    }

    /// Names of all entry points.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

/// Shader module plus its entry-point catalog.
#[derive(Debug)]
pub struct ShaderLibrary {
    catalog: ShaderCatalog,
    module: wgpu::ShaderModule,
}

impl ShaderLibrary {
    /// Compile the overlay program on `device`.
    pub fn new(device: &wgpu::Device) -> LucentResult<Self> {
        let catalog = ShaderCatalog::parse(TRANSPARENCY_WGSL)?;
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lucent_transparency_shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(TRANSPARENCY_WGSL)),
        });
        Ok(Self { catalog, module })
    }

    /// Resolve a stage by name, returning its entry point.
    pub fn stage(&self, name: &str, kind: StageKind) -> LucentResult<&str> {
        self.catalog.lookup(name, kind)
    }

    /// Entry-point catalog.
    pub fn catalog(&self) -> &ShaderCatalog {
        &self.catalog
    }

    /// Compiled module.
    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/shader.rs"]
mod tests;
