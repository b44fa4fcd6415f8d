use crate::{
    color::depth::BitDepth,
    foundation::{
        core::PixelSize,
        error::{GpuResource, LucentError, LucentResult},
    },
    gpu::context::RenderContext,
};

/// Usages of textures uploaded from images or produced by the blur stage.
pub(crate) const INPUT_USAGE: wgpu::TextureUsages = wgpu::TextureUsages::TEXTURE_BINDING
    .union(wgpu::TextureUsages::COPY_DST)
    .union(wgpu::TextureUsages::COPY_SRC);

/// A 2D GPU texture in one of the supported bit-depth formats.
#[derive(Debug)]
pub struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: PixelSize,
    bit_depth: BitDepth,
}

impl GpuTexture {
    /// Wrap an existing texture; its format must map to a [`BitDepth`].
    pub fn from_wgpu(texture: wgpu::Texture) -> LucentResult<Self> {
        let bit_depth = BitDepth::from_pixel_format(texture.format())?;
        let size = PixelSize::new(texture.width(), texture.height());
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self {
            texture,
            view,
            size,
            bit_depth,
        })
    }

    /// Allocate an uninitialized texture.
    pub(crate) fn allocate(
        ctx: &RenderContext,
        label: &str,
        size: PixelSize,
        bit_depth: BitDepth,
        usage: wgpu::TextureUsages,
    ) -> LucentResult<Self> {
        ctx.check_texture(size, bit_depth, usage)?;
        let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: bit_depth.pixel_format(),
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        tracing::debug!(label, %size, %bit_depth, "allocated texture");
        Ok(Self {
            texture,
            view,
            size,
            bit_depth,
        })
    }

    /// Allocate and fill from tightly packed texel bytes.
    pub(crate) fn upload(
        ctx: &RenderContext,
        label: &str,
        size: PixelSize,
        bit_depth: BitDepth,
        texels: &[u8],
    ) -> LucentResult<Self> {
        let row_bytes = size.width as usize * bit_depth.bytes_per_pixel() as usize;
        let expected = row_bytes
            .checked_mul(size.height as usize)
            .ok_or_else(|| LucentError::resource(GpuResource::Texture, "texel size overflow"))?;
        if texels.len() != expected {
            return Err(LucentError::resource(
                GpuResource::Texture,
                format!("expected {expected} texel bytes, got {}", texels.len()),
            ));
        }

        let out = Self::allocate(ctx, label, size, bit_depth, INPUT_USAGE)?;
        ctx.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &out.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            texels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(row_bytes as u32),
                rows_per_image: Some(size.height),
            },
            extent(size),
        );
        Ok(out)
    }

    /// Copy the texels back to the CPU, tightly packed row-major.
    pub(crate) fn read_texels(&self, ctx: &RenderContext) -> LucentResult<Vec<u8>> {
        let device = ctx.device();
        let row_bytes = self
            .size
            .width
            .checked_mul(self.bit_depth.bytes_per_pixel())
            .ok_or_else(|| LucentError::resource(GpuResource::Buffer, "row size overflow"))?;
        let padded_row_bytes = align_to(row_bytes, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
        let buffer_size = u64::from(padded_row_bytes)
            .checked_mul(u64::from(self.size.height))
            .ok_or_else(|| LucentError::resource(GpuResource::Buffer, "readback size overflow"))?;
        ctx.check_buffer(buffer_size)?;

        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lucent_readback"),
            size: buffer_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lucent_readback_encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(self.size.height),
                },
            },
            extent(self.size),
        );
        ctx.queue().submit(Some(encoder.finish()));

        let slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });
        ctx.wait_idle()?;
        rx.recv()
            .map_err(|_| LucentError::resource(GpuResource::Buffer, "readback channel closed"))?
            .map_err(|e| {
                LucentError::resource(GpuResource::Buffer, format!("readback map failed: {e:?}"))
            })?;

        let mapped = slice.get_mapped_range();
        let row_bytes = row_bytes as usize;
        let padded_row_bytes = padded_row_bytes as usize;
        let mut out = Vec::with_capacity(row_bytes * self.size.height as usize);
        for row in 0..self.size.height as usize {
            let start = row * padded_row_bytes;
            out.extend_from_slice(&mapped[start..start + row_bytes]);
        }
        drop(mapped);
        readback.unmap();
        Ok(out)
    }

    /// Underlying wgpu texture.
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Default full-texture view.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Pixel dimensions.
    pub fn size(&self) -> PixelSize {
        self.size
    }

    /// Channel precision.
    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// Consume into the wgpu texture.
    pub fn into_wgpu(self) -> wgpu::Texture {
        self.texture
    }
}

pub(crate) fn extent(size: PixelSize) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

pub(crate) fn align_to(value: u32, alignment: u32) -> u32 {
    let mask = alignment - 1;
    (value + mask) & !mask
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/texture.rs"]
mod tests;
