use std::time::Instant;

use crate::{
    buffer::{input::InputImage, pixel::PixelBuffer},
    effects::blur::{BLUR_MAX_RADIUS, blur_background},
    foundation::{error::LucentResult, settings::BlurMode},
    gpu::{context::RenderContext, texture::GpuTexture},
    render::pipeline::{self, BlendParams},
};

/// Straight-alpha pixel as `[r, g, b, a]`.
pub type Rgba = [f32; 4];

/// Smallest output alpha the blending stage divides by.
pub const ALPHA_EPSILON: f32 = 1e-6;

/// `fg` over `bg` in straight alpha, the per-pixel rule of the blending stage.
///
/// Blending happens on premultiplied values; the result is un-premultiplied,
/// so a fully transparent result has black color.
pub fn over(fg: Rgba, bg: Rgba) -> Rgba {
    let fa = fg[3].clamp(0.0, 1.0);
    let ba = bg[3].clamp(0.0, 1.0);
    let a = fa + ba * (1.0 - fa);
    let mut out = [0.0; 4];
    for i in 0..3 {
        out[i] = (fg[i] * fa + bg[i] * ba * (1.0 - fa)) / a.max(ALPHA_EPSILON);
    }
    out[3] = a;
    out
}

/// Draw `input` over `background` and return the render target.
///
/// With [`BlurMode::Prefilter`] a blur mask is first applied to the background
/// on the CPU and is not bound to the draw; with [`BlurMode::ShaderSampled`] the
/// mask is bound to slot 3 and sampled by the fragment stage instead. The
/// target has the background's size and the input's bit depth.
#[tracing::instrument(skip_all, fields(background = %background.size(), input = %input.size()))]
pub fn composite(
    ctx: &RenderContext,
    input: &mut InputImage,
    background: PixelBuffer,
) -> LucentResult<GpuTexture> {
    let t0 = Instant::now();
    warn_on_mismatch(input);

    let prefilter = ctx.settings().blur_mode == BlurMode::Prefilter;
    let mut background = match input.blur() {
        Some(mask) if prefilter => blur_background(ctx, &background, mask)?,
        _ => background,
    };

    let bits = input.bit_depth();
    let target = pipeline::render_target(ctx, background.size(), bits)?;
    let layout = pipeline::bind_group_layout(ctx.device());
    let render_pipeline = pipeline::build_pipeline(ctx, &layout, bits)?;
    let sampler = pipeline::build_sampler(ctx);
    let vertices = pipeline::quad_buffer(ctx)?;
    let placeholder = pipeline::placeholder(ctx)?;

    let background = background.texture(ctx)?;
    let bound = input.bind_textures(ctx, !prefilter)?;
    let params = pipeline::params_buffer(
        ctx,
        BlendParams::new(bound.map.is_some(), bound.blur.is_some(), BLUR_MAX_RADIUS),
    )?;

    let map = bound.map.unwrap_or(&placeholder);
    let blur = bound.blur.unwrap_or(&placeholder);
    let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("lucent_overlay_bg"),
        layout: &layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: pipeline::SLOT_FOREGROUND,
                resource: wgpu::BindingResource::TextureView(bound.foreground.view()),
            },
            wgpu::BindGroupEntry {
                binding: pipeline::SLOT_BACKGROUND,
                resource: wgpu::BindingResource::TextureView(background.view()),
            },
            wgpu::BindGroupEntry {
                binding: pipeline::SLOT_MAP,
                resource: wgpu::BindingResource::TextureView(map.view()),
            },
            wgpu::BindGroupEntry {
                binding: pipeline::SLOT_BLUR,
                resource: wgpu::BindingResource::TextureView(blur.view()),
            },
            wgpu::BindGroupEntry {
                binding: pipeline::SLOT_SAMPLER,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
            wgpu::BindGroupEntry {
                binding: pipeline::SLOT_PARAMS,
                resource: params.as_entire_binding(),
            },
        ],
    });

    let mut encoder = ctx
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lucent_overlay_encoder"),
        });
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lucent_overlay_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.view(),
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&render_pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.set_vertex_buffer(0, vertices.slice(..));
        pass.draw(0..pipeline::FULLSCREEN_QUAD.len() as u32, 0..1);
    }
    ctx.queue().submit(Some(encoder.finish()));
    ctx.wait_idle()?;

    tracing::debug!(
        elapsed_ms = t0.elapsed().as_millis() as u64,
        size = %target.size(),
        bit_depth = %bits,
        "overlay composited"
    );
    Ok(target)
}

fn warn_on_mismatch(input: &InputImage) {
    let size = input.size();
    let optional = [("map", input.map()), ("blur mask", input.blur())];
    for (role, buf) in optional {
        if let Some(buf) = buf
            && buf.size() != size
        {
            tracing::warn!(
                role,
                foreground = %size,
                actual = %buf.size(),
                "size differs from foreground, sampling will stretch"
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
