use std::fmt;

/// Convenience result type used across Lucent.
pub type LucentResult<T> = Result<T, LucentError>;

/// GPU object whose creation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GpuResource {
    /// Render target or uploaded input texture.
    Texture,
    /// Vertex, uniform or readback buffer.
    Buffer,
    /// Command queue submission.
    CommandQueue,
    /// Per-call command encoder (the command buffer under construction).
    CommandEncoder,
    /// Compiled render pipeline state.
    PipelineState,
    /// Texture sampler state.
    Sampler,
    /// Compiled shader program.
    ShaderModule,
    /// Fragment-stage resource binding.
    BindGroup,
}

impl fmt::Display for GpuResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Texture => "texture",
            Self::Buffer => "buffer",
            Self::CommandQueue => "command queue",
            Self::CommandEncoder => "command encoder",
            Self::PipelineState => "pipeline state",
            Self::Sampler => "sampler",
            Self::ShaderModule => "shader module",
            Self::BindGroup => "bind group",
        };
        f.write_str(name)
    }
}

/// Named step of the format conversion layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionStep {
    /// Encoded image uploaded into a GPU texture.
    ImageToTexture,
    /// GPU texture read back into a filterable image.
    TextureToFilter,
    /// Filterable image rendered into an encoded image.
    FilterToImage,
    /// Encoded image expanded into a filterable image.
    ImageToFilter,
    /// Final render target turned into an encoded image.
    TextureToImage,
}

impl fmt::Display for ConversionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ImageToTexture => "image to texture",
            Self::TextureToFilter => "texture to filter image",
            Self::FilterToImage => "filter image to image",
            Self::ImageToFilter => "image to filter image",
            Self::TextureToImage => "texture to image",
        };
        f.write_str(name)
    }
}

/// Step of the variable blur stage that failed.
///
/// The numeric codes are stable and show up in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurStep {
    /// The background has no filterable representation.
    Background,
    /// The mask has no filterable representation.
    Mask,
    /// The mask could not be rendered to an image for resizing.
    MaskConversion,
    /// The resized mask could not be turned back into a filterable image.
    MaskRestretch,
    /// The blur filter rejected its parameters.
    FilterConstruction,
    /// The blur filter produced no usable output.
    FilterOutput,
}

impl BlurStep {
    /// Stable numeric code of this step.
    pub fn code(self) -> u8 {
        match self {
            Self::Background => 0,
            Self::Mask => 1,
            Self::MaskConversion => 2,
            Self::MaskRestretch => 3,
            Self::FilterConstruction => 4,
            Self::FilterOutput => 5,
        }
    }
}

impl fmt::Display for BlurStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Background => "background",
            Self::Mask => "mask",
            Self::MaskConversion => "mask conversion",
            Self::MaskRestretch => "mask restretch conversion",
            Self::FilterConstruction => "filter construction",
            Self::FilterOutput => "filter output",
        };
        f.write_str(name)
    }
}

/// Top-level error taxonomy used by compositing APIs.
#[derive(thiserror::Error, Debug)]
pub enum LucentError {
    /// No usable GPU adapter or device.
    #[error("gpu device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A GPU object could not be created.
    #[error("resource allocation failed ({resource}): {detail}")]
    ResourceAllocation {
        /// Kind of object that failed.
        resource: GpuResource,
        /// Backend message.
        detail: String,
    },

    /// A named stage is missing from the compiled shader program.
    #[error("shader stage not found: {0}")]
    ShaderStageNotFound(String),

    /// Bit depth, pixel format or color space outside the supported set.
    #[error("unsupported format: {0}")]
    FormatUnsupported(String),

    /// A representation change failed at a specific step.
    #[error("conversion failed ({step}): {detail}")]
    Conversion {
        /// Step that failed.
        step: ConversionStep,
        /// What went wrong.
        detail: String,
    },

    /// The variable blur stage failed.
    #[error("blur stage failed with code {} ({step}): {detail}", step.code())]
    Blur {
        /// Step that failed.
        step: BlurStep,
        /// What went wrong.
        detail: String,
    },

    /// A named asset could not be found.
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// Invalid user-provided settings or inputs.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LucentError {
    /// Build a [`LucentError::ResourceAllocation`] value.
    pub fn resource(resource: GpuResource, detail: impl Into<String>) -> Self {
        Self::ResourceAllocation {
            resource,
            detail: detail.into(),
        }
    }

    /// Build a [`LucentError::Conversion`] value.
    pub fn conversion(step: ConversionStep, detail: impl Into<String>) -> Self {
        Self::Conversion {
            step,
            detail: detail.into(),
        }
    }

    /// Build a [`LucentError::Blur`] value.
    pub fn blur(step: BlurStep, detail: impl Into<String>) -> Self {
        Self::Blur {
            step,
            detail: detail.into(),
        }
    }

    /// Build a [`LucentError::FormatUnsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::FormatUnsupported(msg.into())
    }

    /// Build a [`LucentError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Numeric blur step code, when this is a blur stage error.
    pub fn blur_code(&self) -> Option<u8> {
        match self {
            Self::Blur { step, .. } => Some(step.code()),
            _ => None,
        }
    }
}

/// Log `err` and terminate the process.
///
/// Backs the convenience tier, where failures are treated as programming errors.
pub(crate) fn abort_with(context: &str, err: &LucentError) -> ! {
    tracing::error!(error = %err, "{context} failed");
    eprintln!("lucent: {context} failed: {err}");
    std::process::abort()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
