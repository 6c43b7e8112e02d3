/// Texture resource - sampleable image plus optional render target storage
///
/// A texture used as a pass attachment may own two renderbuffers next to
/// its image: a multisampled color renderbuffer (only when
/// `sample_count > 1`) and a depth/stencil renderbuffer (only when a depth
/// format is requested). Neither exists otherwise.

use crate::error::{Error, Result};
use crate::gfx_warn;
use crate::render::{
    Backend, DepthStencilFormat, Driver, Filter, PixelFormat, RenderbufferFormat,
    RenderbufferId, TextureId, TextureType, Usage, Wrap,
};

/// Sampler parameters baked into a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerState {
    pub wrap_u: Wrap,
    pub wrap_v: Wrap,
    pub wrap_w: Wrap,
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub mip_filter: Filter,
}

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Texture type
    pub texture_type: TextureType,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Depth (3D) or layer count (array); ignored for 2D and cube textures
    pub depth: u32,
    /// Number of mip levels
    pub mip_levels: u32,
    /// Color pixel format
    pub color_format: PixelFormat,
    /// Optional depth/stencil format (render targets)
    pub depth_format: Option<DepthStencilFormat>,
    /// MSAA sample count (1 = no multisampling)
    pub sample_count: u32,
    /// Update frequency hint
    pub usage: Usage,
    /// Whether the texture will be used as a pass attachment
    pub render_target: bool,
    /// Generate the mip chain from level 0 after upload
    pub generate_mipmaps: bool,
    /// Sampler state
    pub sampler: SamplerState,
    /// Optional pixel data for mip level 0 (2D textures)
    pub data: Option<Vec<u8>>,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            texture_type: TextureType::Texture2D,
            width: 1,
            height: 1,
            depth: 1,
            mip_levels: 1,
            color_format: PixelFormat::RGBA8,
            depth_format: None,
            sample_count: 1,
            usage: Usage::Immutable,
            render_target: false,
            generate_mipmaps: false,
            sampler: SamplerState::default(),
            data: None,
        }
    }
}

impl TextureDesc {
    /// Plain 2D texture
    pub fn new_2d(width: u32, height: u32) -> Self {
        Self { width, height, ..Self::default() }
    }

    /// 2D texture usable as a pass attachment
    pub fn render_target(width: u32, height: u32) -> Self {
        Self { width, height, render_target: true, ..Self::default() }
    }
}

/// Read-only properties of a created texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub texture_type: TextureType,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_levels: u32,
    pub color_format: PixelFormat,
    pub depth_format: Option<DepthStencilFormat>,
    pub sample_count: u32,
    pub sampler: SamplerState,
}

impl TextureInfo {
    /// Width and height of a mip level (never smaller than 1)
    pub fn mip_size(&self, mip_level: u32) -> (u32, u32) {
        let w = self.width.checked_shr(mip_level).unwrap_or(0).max(1);
        let h = self.height.checked_shr(mip_level).unwrap_or(0).max(1);
        (w, h)
    }
}

/// Texture resource
#[derive(Debug)]
pub struct Texture {
    info: TextureInfo,
    image: TextureId,
    msaa_renderbuffer: Option<RenderbufferId>,
    depth_renderbuffer: Option<RenderbufferId>,
}

impl Texture {
    pub(crate) fn create(driver: &mut dyn Driver, backend: &dyn Backend, mut desc: TextureDesc) -> Result<Self> {
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::InvalidResource(format!(
                "texture size {}x{} is empty", desc.width, desc.height
            )));
        }
        let volume = matches!(desc.texture_type, TextureType::Texture3D | TextureType::TextureArray);
        if volume && !backend.supports_volume_textures() {
            return Err(Error::Unsupported(format!(
                "{:?} textures require the extended backend", desc.texture_type
            )));
        }
        match desc.texture_type {
            TextureType::Texture2D | TextureType::TextureCube => desc.depth = 1,
            TextureType::Texture3D | TextureType::TextureArray => desc.depth = desc.depth.max(1),
        }
        if desc.texture_type == TextureType::TextureCube && desc.width != desc.height {
            gfx_warn!("altai::texture", "cube texture faces must be square ({}x{})", desc.width, desc.height);
        }
        desc.mip_levels = desc.mip_levels.max(1);
        desc.sample_count = desc.sample_count.max(1);
        if desc.sample_count > 1 && !backend.supports_msaa() {
            gfx_warn!("altai::texture",
                "{}x MSAA not supported by the {:?} backend, falling back to 1 sample",
                desc.sample_count, backend.kind());
            desc.sample_count = 1;
        }
        if desc.sample_count > 1 && desc.texture_type != TextureType::Texture2D {
            gfx_warn!("altai::texture", "MSAA is only supported on 2D textures, falling back to 1 sample");
            desc.sample_count = 1;
        }

        let image = driver.create_texture(&desc)?;

        let msaa_renderbuffer = if desc.sample_count > 1 {
            match driver.create_renderbuffer(
                RenderbufferFormat::Color(desc.color_format),
                desc.width,
                desc.height,
                desc.sample_count,
            ) {
                Ok(renderbuffer) => Some(renderbuffer),
                Err(err) => {
                    driver.delete_texture(image);
                    return Err(err);
                }
            }
        } else {
            None
        };

        let depth_renderbuffer = match desc.depth_format {
            Some(format) => {
                let rb_format = match format {
                    DepthStencilFormat::Depth => RenderbufferFormat::Depth,
                    DepthStencilFormat::DepthStencil => RenderbufferFormat::DepthStencil,
                };
                match driver.create_renderbuffer(rb_format, desc.width, desc.height, desc.sample_count) {
                    Ok(renderbuffer) => Some(renderbuffer),
                    Err(err) => {
                        if let Some(msaa) = msaa_renderbuffer {
                            driver.delete_renderbuffer(msaa);
                        }
                        driver.delete_texture(image);
                        return Err(err);
                    }
                }
            }
            None => None,
        };

        Ok(Self {
            info: TextureInfo {
                texture_type: desc.texture_type,
                width: desc.width,
                height: desc.height,
                depth: desc.depth,
                mip_levels: desc.mip_levels,
                color_format: desc.color_format,
                depth_format: desc.depth_format,
                sample_count: desc.sample_count,
                sampler: desc.sampler,
            },
            image,
            msaa_renderbuffer,
            depth_renderbuffer,
        })
    }

    pub(crate) fn release(&self, driver: &mut dyn Driver) {
        if let Some(renderbuffer) = self.msaa_renderbuffer {
            driver.delete_renderbuffer(renderbuffer);
        }
        if let Some(renderbuffer) = self.depth_renderbuffer {
            driver.delete_renderbuffer(renderbuffer);
        }
        driver.delete_texture(self.image);
    }

    pub fn info(&self) -> &TextureInfo {
        &self.info
    }

    /// Sampleable image
    pub fn image(&self) -> TextureId {
        self.image
    }

    /// Multisampled color storage (only when sample_count > 1)
    pub fn msaa_renderbuffer(&self) -> Option<RenderbufferId> {
        self.msaa_renderbuffer
    }

    /// Depth/stencil storage (only when a depth format was requested)
    pub fn depth_renderbuffer(&self) -> Option<RenderbufferId> {
        self.depth_renderbuffer
    }

    pub fn is_msaa(&self) -> bool {
        self.msaa_renderbuffer.is_some()
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
