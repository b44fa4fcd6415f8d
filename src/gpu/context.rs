use crate::{
    color::depth::BitDepth,
    foundation::{
        core::PixelSize,
        error::{GpuResource, LucentError, LucentResult, abort_with},
        settings::{ContextOptions, LucentConfig, RenderSettings},
    },
    gpu::shader::ShaderLibrary,
};

/// Explicitly owned GPU device, queue and compiled shader program.
///
/// Build one per application and pass it by reference into every call. All
/// other GPU objects are created fresh per composite and dropped afterwards.
///
/// The device is not internally serialized: callers compositing from several
/// threads against one context must serialize those calls themselves.
pub struct RenderContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,
    clamp_to_border: bool,
    format_features: [wgpu::TextureFormatFeatures; 2],
    settings: RenderSettings,
    shaders: ShaderLibrary,
}

impl RenderContext {
    /// Acquire an adapter and device.
    ///
    /// Fails with [`LucentError::DeviceUnavailable`] when no adapter matches.
    pub fn new(opts: &ContextOptions) -> LucentResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: opts.power_preference.to_wgpu(),
            compatible_surface: None,
            force_fallback_adapter: opts.force_fallback_adapter,
        }))
        .map_err(|e| match e {
            wgpu::RequestAdapterError::NotFound { .. } => {
                LucentError::DeviceUnavailable("no gpu adapter available".to_string())
            }
            other => LucentError::DeviceUnavailable(format!("request_adapter failed: {other:?}")),
        })?;

        let clamp_to_border = adapter
            .features()
            .contains(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER);
        let required_features = if clamp_to_border {
            wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("lucent_device"),
            required_features,
            required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| LucentError::DeviceUnavailable(format!("request_device failed: {e:?}")))?;

        let format_features =
            BitDepth::ALL.map(|bits| adapter.get_texture_format_features(bits.pixel_format()));

        let adapter_info = adapter.get_info();
        tracing::debug!(
            adapter = %adapter_info.name,
            backend = ?adapter_info.backend,
            clamp_to_border,
            "gpu device ready"
        );

        let shaders = ShaderLibrary::new(&device)?;

        Ok(Self {
            device,
            queue,
            adapter_info,
            clamp_to_border,
            format_features,
            settings: RenderSettings::default(),
            shaders,
        })
    }

    /// Acquire a device per `cfg.context` and adopt `cfg.render`.
    pub fn from_config(cfg: &LucentConfig) -> LucentResult<Self> {
        cfg.validate()?;
        Ok(Self::new(&cfg.context)?.with_settings(cfg.render.clone()))
    }

    /// Default device, aborting the process when there is none.
    pub fn system_default() -> Self {
        match Self::new(&ContextOptions::default()) {
            Ok(ctx) => ctx,
            Err(err) => abort_with("gpu device initialization", &err),
        }
    }

    /// Replace the render settings.
    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The wgpu device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// The wgpu queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Adapter description.
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Active render settings.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Compiled shader program.
    pub fn shaders(&self) -> &ShaderLibrary {
        &self.shaders
    }

    /// Whether samplers can clamp to a transparent border.
    pub fn supports_clamp_to_border(&self) -> bool {
        self.clamp_to_border
    }

    /// Adapter capabilities of the texture format behind `bits`.
    pub(crate) fn format_features(&self, bits: BitDepth) -> &wgpu::TextureFormatFeatures {
        match bits {
            BitDepth::Eight => &self.format_features[0],
            BitDepth::SixteenFloat => &self.format_features[1],
        }
    }

    /// Texture usages the adapter supports for `bits`.
    pub(crate) fn allowed_usages(&self, bits: BitDepth) -> wgpu::TextureUsages {
        self.format_features(bits).allowed_usages
    }

    /// Check that a texture of `size` and `bits` with `usage` can be created.
    pub(crate) fn check_texture(
        &self,
        size: PixelSize,
        bits: BitDepth,
        usage: wgpu::TextureUsages,
    ) -> LucentResult<()> {
        if size.is_empty() {
            return Err(LucentError::resource(
                GpuResource::Texture,
                format!("texture size must be non-zero, got {size}"),
            ));
        }
        let max = self.device.limits().max_texture_dimension_2d;
        if size.width > max || size.height > max {
            return Err(LucentError::resource(
                GpuResource::Texture,
                format!("texture size {size} exceeds device limit {max}"),
            ));
        }
        let allowed = self.allowed_usages(bits);
        if !allowed.contains(usage) {
            return Err(LucentError::resource(
                GpuResource::Texture,
                format!("{bits} textures cannot be used as {usage:?} on this adapter"),
            ));
        }
        Ok(())
    }

    /// Check that a buffer of `size` bytes can be created.
    pub(crate) fn check_buffer(&self, size: u64) -> LucentResult<()> {
        let max = self.device.limits().max_buffer_size;
        if size == 0 || size > max {
            return Err(LucentError::resource(
                GpuResource::Buffer,
                format!("buffer size {size} outside 1..={max}"),
            ));
        }
        Ok(())
    }

    /// Block until all submitted work has finished.
    pub(crate) fn wait_idle(&self) -> LucentResult<()> {
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .map_err(|e| LucentError::resource(GpuResource::CommandQueue, format!("poll: {e:?}")))?;
        Ok(())
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("adapter", &self.adapter_info.name)
            .field("backend", &self.adapter_info.backend)
            .field("clamp_to_border", &self.clamp_to_border)
            .field("settings", &self.settings)
            .finish()
    }
}
