//! Per-call GPU objects of the overlay draw.
//!
//! Nothing here is cached: every composite builds its own render target,
//! pipeline, sampler and buffers and drops them when it returns.

use wgpu::util::DeviceExt;

use crate::{
    color::depth::BitDepth,
    foundation::{
        core::PixelSize,
        error::{GpuResource, LucentError, LucentResult},
    },
    gpu::{
        context::RenderContext,
        shader::{StageKind, VERTEX_QUAD_STAGE},
        texture::GpuTexture,
    },
};

/// Binding slots of the fragment stage.
pub(crate) const SLOT_FOREGROUND: u32 = 0;
pub(crate) const SLOT_BACKGROUND: u32 = 1;
pub(crate) const SLOT_MAP: u32 = 2;
pub(crate) const SLOT_BLUR: u32 = 3;
pub(crate) const SLOT_SAMPLER: u32 = 4;
pub(crate) const SLOT_PARAMS: u32 = 5;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Two triangles covering clip space, no index buffer.
pub(crate) const FULLSCREEN_QUAD: [QuadVertex; 6] = {
    let a = QuadVertex {
        position: [-1.0, -1.0],
        uv: [0.0, 0.0],
    };
    let b = QuadVertex {
        position: [1.0, -1.0],
        uv: [1.0, 0.0],
    };
    let c = QuadVertex {
        position: [-1.0, 1.0],
        uv: [0.0, 1.0],
    };
    let d = QuadVertex {
        position: [1.0, 1.0],
        uv: [1.0, 1.0],
    };
    [a, b, c, b, d, c]
};

/// Uniform block at [`SLOT_PARAMS`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct BlendParams {
    pub has_map: f32,
    pub has_blur: f32,
    pub max_radius: f32,
    pub _pad: f32,
}

impl BlendParams {
    pub(crate) fn new(has_map: bool, has_blur: bool, max_radius: f32) -> Self {
        Self {
            has_map: if has_map { 1.0 } else { 0.0 },
            has_blur: if has_blur { 1.0 } else { 0.0 },
            max_radius,
            _pad: 0.0,
        }
    }
}

/// Render target sized to `size` in the format of `bits`.
///
/// Storage access is only requested where the adapter offers it.
pub(crate) fn render_target(
    ctx: &RenderContext,
    size: PixelSize,
    bits: BitDepth,
) -> LucentResult<GpuTexture> {
    let mut usage = bits.render_target_usage();
    if !ctx.allowed_usages(bits).contains(wgpu::TextureUsages::STORAGE_BINDING) {
        usage.remove(wgpu::TextureUsages::STORAGE_BINDING);
    }
    GpuTexture::allocate(ctx, "lucent_render_target", size, bits, usage)
}

/// 1×1 transparent texture for unbound optional slots.
pub(crate) fn placeholder(ctx: &RenderContext) -> LucentResult<GpuTexture> {
    let bits = BitDepth::Eight;
    GpuTexture::upload(
        ctx,
        "lucent_placeholder",
        PixelSize::new(1, 1),
        bits,
        &vec![0; bits.bytes_per_pixel() as usize],
    )
}

pub(crate) fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("lucent_overlay_bgl"),
        entries: &[
            texture(SLOT_FOREGROUND),
            texture(SLOT_BACKGROUND),
            texture(SLOT_MAP),
            texture(SLOT_BLUR),
            wgpu::BindGroupLayoutEntry {
                binding: SLOT_SAMPLER,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: SLOT_PARAMS,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<BlendParams>() as u64
                    ),
                },
                count: None,
            },
        ],
    })
}

/// Quad vertex stage plus the configured blending stage, alpha-blended into
/// a target of `bits`.
pub(crate) fn build_pipeline(
    ctx: &RenderContext,
    layout: &wgpu::BindGroupLayout,
    bits: BitDepth,
) -> LucentResult<wgpu::RenderPipeline> {
    let shaders = ctx.shaders();
    let vertex_entry = shaders.stage(VERTEX_QUAD_STAGE, StageKind::Vertex)?;
    let fragment_entry = shaders.stage(&ctx.settings().fragment_stage, StageKind::Fragment)?;

    let device = ctx.device();
    let format = bits.pixel_format();
    let features = ctx.format_features(bits);
    if !features
        .flags
        .contains(wgpu::TextureFormatFeatureFlags::BLENDABLE)
    {
        return Err(LucentError::resource(
            GpuResource::PipelineState,
            format!("{format:?} render targets cannot blend on this adapter"),
        ));
    }

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("lucent_overlay_pl"),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });

    Ok(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("lucent_overlay_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: shaders.module(),
            entry_point: Some(vertex_entry),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[QuadVertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shaders.module(),
            entry_point: Some(fragment_entry),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    }))
}

/// Bilinear sampler that reads transparent black outside the texture.
pub(crate) fn build_sampler(ctx: &RenderContext) -> wgpu::Sampler {
    let (address_mode, border_color) = if ctx.supports_clamp_to_border() {
        (
            wgpu::AddressMode::ClampToBorder,
            Some(wgpu::SamplerBorderColor::TransparentBlack),
        )
    } else {
        (wgpu::AddressMode::ClampToEdge, None)
    };
    ctx.device().create_sampler(&wgpu::SamplerDescriptor {
        label: Some("lucent_overlay_sampler"),
        address_mode_u: address_mode,
        address_mode_v: address_mode,
        address_mode_w: address_mode,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        compare: None,
        border_color,
        ..Default::default()
    })
}

pub(crate) fn quad_buffer(ctx: &RenderContext) -> LucentResult<wgpu::Buffer> {
    let contents: &[u8] = bytemuck::cast_slice(&FULLSCREEN_QUAD);
    ctx.check_buffer(contents.len() as u64)?;
    Ok(ctx
        .device()
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lucent_quad_vertices"),
            contents,
            usage: wgpu::BufferUsages::VERTEX,
        }))
}

pub(crate) fn params_buffer(ctx: &RenderContext, params: BlendParams) -> LucentResult<wgpu::Buffer> {
    let contents: &[u8] = bytemuck::bytes_of(&params);
    ctx.check_buffer(contents.len() as u64)?;
    Ok(ctx
        .device()
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lucent_overlay_params"),
            contents,
            usage: wgpu::BufferUsages::UNIFORM,
        }))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
