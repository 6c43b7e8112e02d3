/// Conversion of layer enums to GL constants

use altai_gfx::altai::render::{
    Attachment, BlendFactor, BlendOp, BufferKind, Capability, ClearFlags, CompareFunc, Face,
    Filter, FramebufferTarget, IndexFormat, PixelFormat, PrimitiveType, RenderbufferFormat,
    StencilOp, TextureTarget, TextureType, Usage, Wrap,
};
use altai_gfx::altai::resource::ScalarType;

/// Internal format, pixel format and component type of a texture upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GlPixelFormat {
    pub internal_format: i32,
    pub format: u32,
    pub ty: u32,
}

/// Upload triple for a pixel format
///
/// Contexts without sized internal formats (GLES 2 / WebGL 1) take the
/// unsized base format as internal format.
pub(crate) fn pixel_format(format: PixelFormat, sized: bool) -> GlPixelFormat {
    let (sized_internal, base, ty) = match format {
        PixelFormat::RGBA8 => (glow::RGBA8, glow::RGBA, glow::UNSIGNED_BYTE),
        PixelFormat::RGB8 => (glow::RGB8, glow::RGB, glow::UNSIGNED_BYTE),
        PixelFormat::RGBA4 => (glow::RGBA4, glow::RGBA, glow::UNSIGNED_SHORT_4_4_4_4),
        PixelFormat::RGB565 => (glow::RGB565, glow::RGB, glow::UNSIGNED_SHORT_5_6_5),
        PixelFormat::RGB5_A1 => (glow::RGB5_A1, glow::RGBA, glow::UNSIGNED_SHORT_5_5_5_1),
        PixelFormat::RGB10_A2 => (glow::RGB10_A2, glow::RGBA, glow::UNSIGNED_INT_2_10_10_10_REV),
        PixelFormat::RGBA32F => (glow::RGBA32F, glow::RGBA, glow::FLOAT),
        PixelFormat::RGBA16F => (glow::RGBA16F, glow::RGBA, glow::HALF_FLOAT),
        PixelFormat::R32F => (glow::R32F, glow::RED, glow::FLOAT),
        PixelFormat::R16F => (glow::R16F, glow::RED, glow::HALF_FLOAT),
    };
    let internal = if sized { sized_internal } else { base };
    GlPixelFormat { internal_format: internal as i32, format: base, ty }
}

/// Bytes per pixel of an upload in `format`
pub(crate) fn pixel_size(format: PixelFormat) -> usize {
    match format {
        PixelFormat::RGBA8 | PixelFormat::RGB10_A2 | PixelFormat::R32F => 4,
        PixelFormat::RGB8 => 3,
        PixelFormat::RGBA4 | PixelFormat::RGB565 | PixelFormat::RGB5_A1 | PixelFormat::R16F => 2,
        PixelFormat::RGBA32F => 16,
        PixelFormat::RGBA16F => 8,
    }
}

/// Renderbuffer storage format
pub(crate) fn renderbuffer_format(format: RenderbufferFormat, sized: bool) -> u32 {
    match format {
        RenderbufferFormat::Color(pixel) => pixel_format(pixel, true).internal_format as u32,
        RenderbufferFormat::Depth if sized => glow::DEPTH_COMPONENT24,
        RenderbufferFormat::Depth => glow::DEPTH_COMPONENT16,
        RenderbufferFormat::DepthStencil if sized => glow::DEPTH24_STENCIL8,
        RenderbufferFormat::DepthStencil => glow::DEPTH_STENCIL,
    }
}

pub(crate) fn buffer_target(kind: BufferKind) -> u32 {
    match kind {
        BufferKind::Vertex => glow::ARRAY_BUFFER,
        BufferKind::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

pub(crate) fn buffer_usage(usage: Usage) -> u32 {
    match usage {
        Usage::Immutable => glow::STATIC_DRAW,
        Usage::Dynamic => glow::DYNAMIC_DRAW,
        Usage::Stream => glow::STREAM_DRAW,
    }
}

/// Element type of an index buffer (`None` for non-indexed draws)
pub(crate) fn index_type(format: IndexFormat) -> Option<u32> {
    match format {
        IndexFormat::None => None,
        IndexFormat::UInt16 => Some(glow::UNSIGNED_SHORT),
        IndexFormat::UInt32 => Some(glow::UNSIGNED_INT),
    }
}

pub(crate) fn primitive_mode(primitive: PrimitiveType) -> u32 {
    match primitive {
        PrimitiveType::Points => glow::POINTS,
        PrimitiveType::Lines => glow::LINES,
        PrimitiveType::LineStrip => glow::LINE_STRIP,
        PrimitiveType::Triangles => glow::TRIANGLES,
        PrimitiveType::TriangleStrip => glow::TRIANGLE_STRIP,
    }
}

/// Bind target of a texture object
pub(crate) fn texture_bind_target(texture_type: TextureType) -> u32 {
    match texture_type {
        TextureType::Texture2D => glow::TEXTURE_2D,
        TextureType::TextureCube => glow::TEXTURE_CUBE_MAP,
        TextureType::Texture3D => glow::TEXTURE_3D,
        TextureType::TextureArray => glow::TEXTURE_2D_ARRAY,
    }
}

/// Image target of a 2D attach or upload
pub(crate) fn texture_image_target(target: TextureTarget) -> u32 {
    match target {
        TextureTarget::Texture2D => glow::TEXTURE_2D,
        TextureTarget::CubeFace(face) => glow::TEXTURE_CUBE_MAP_POSITIVE_X + face.min(5),
    }
}

pub(crate) fn wrap_mode(wrap: Wrap) -> i32 {
    let mode = match wrap {
        Wrap::ClampToEdge => glow::CLAMP_TO_EDGE,
        Wrap::Repeat => glow::REPEAT,
        Wrap::MirroredRepeat => glow::MIRRORED_REPEAT,
    };
    mode as i32
}

/// Minification filter, combined with the mip filter when the texture has mips
pub(crate) fn min_filter(filter: Filter, mip_filter: Filter, has_mips: bool) -> i32 {
    let mode = match (filter, has_mips, mip_filter) {
        (Filter::Nearest, false, _) => glow::NEAREST,
        (Filter::Linear, false, _) => glow::LINEAR,
        (Filter::Nearest, true, Filter::Nearest) => glow::NEAREST_MIPMAP_NEAREST,
        (Filter::Nearest, true, Filter::Linear) => glow::NEAREST_MIPMAP_LINEAR,
        (Filter::Linear, true, Filter::Nearest) => glow::LINEAR_MIPMAP_NEAREST,
        (Filter::Linear, true, Filter::Linear) => glow::LINEAR_MIPMAP_LINEAR,
    };
    mode as i32
}

pub(crate) fn mag_filter(filter: Filter) -> i32 {
    let mode = match filter {
        Filter::Nearest => glow::NEAREST,
        Filter::Linear => glow::LINEAR,
    };
    mode as i32
}

pub(crate) fn capability(capability: Capability) -> u32 {
    match capability {
        Capability::DepthTest => glow::DEPTH_TEST,
        Capability::StencilTest => glow::STENCIL_TEST,
        Capability::Blend => glow::BLEND,
        Capability::CullFace => glow::CULL_FACE,
        Capability::ScissorTest => glow::SCISSOR_TEST,
        Capability::Dither => glow::DITHER,
        Capability::SampleAlphaToCoverage => glow::SAMPLE_ALPHA_TO_COVERAGE,
    }
}

pub(crate) fn compare_func(func: CompareFunc) -> u32 {
    match func {
        CompareFunc::Never => glow::NEVER,
        CompareFunc::Less => glow::LESS,
        CompareFunc::Equal => glow::EQUAL,
        CompareFunc::LessEqual => glow::LEQUAL,
        CompareFunc::Greater => glow::GREATER,
        CompareFunc::NotEqual => glow::NOTEQUAL,
        CompareFunc::GreaterEqual => glow::GEQUAL,
        CompareFunc::Always => glow::ALWAYS,
    }
}

pub(crate) fn stencil_op(op: StencilOp) -> u32 {
    match op {
        StencilOp::Keep => glow::KEEP,
        StencilOp::Zero => glow::ZERO,
        StencilOp::Replace => glow::REPLACE,
        StencilOp::IncrClamp => glow::INCR,
        StencilOp::DecrClamp => glow::DECR,
        StencilOp::Invert => glow::INVERT,
        StencilOp::IncrWrap => glow::INCR_WRAP,
        StencilOp::DecrWrap => glow::DECR_WRAP,
    }
}

pub(crate) fn blend_factor(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstColor => glow::DST_COLOR,
        BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
        BlendFactor::SrcAlphaSaturated => glow::SRC_ALPHA_SATURATE,
        BlendFactor::BlendColor => glow::CONSTANT_COLOR,
        BlendFactor::OneMinusBlendColor => glow::ONE_MINUS_CONSTANT_COLOR,
        BlendFactor::BlendAlpha => glow::CONSTANT_ALPHA,
        BlendFactor::OneMinusBlendAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
    }
}

pub(crate) fn blend_equation(op: BlendOp) -> u32 {
    match op {
        BlendOp::Add => glow::FUNC_ADD,
        BlendOp::Subtract => glow::FUNC_SUBTRACT,
        BlendOp::ReverseSubtract => glow::FUNC_REVERSE_SUBTRACT,
    }
}

pub(crate) fn face(face: Face) -> u32 {
    match face {
        Face::Front => glow::FRONT,
        Face::Back => glow::BACK,
        Face::Both => glow::FRONT_AND_BACK,
    }
}

pub(crate) fn framebuffer_target(target: FramebufferTarget) -> u32 {
    match target {
        FramebufferTarget::Both => glow::FRAMEBUFFER,
        FramebufferTarget::Read => glow::READ_FRAMEBUFFER,
        FramebufferTarget::Draw => glow::DRAW_FRAMEBUFFER,
    }
}

pub(crate) fn attachment(attachment: Attachment) -> u32 {
    match attachment {
        Attachment::Color(index) => glow::COLOR_ATTACHMENT0 + index,
        Attachment::Depth => glow::DEPTH_ATTACHMENT,
        Attachment::Stencil => glow::STENCIL_ATTACHMENT,
        Attachment::DepthStencil => glow::DEPTH_STENCIL_ATTACHMENT,
    }
}

pub(crate) fn scalar_type(scalar: ScalarType) -> u32 {
    match scalar {
        ScalarType::Float => glow::FLOAT,
        ScalarType::Byte => glow::BYTE,
        ScalarType::UnsignedByte => glow::UNSIGNED_BYTE,
        ScalarType::Short => glow::SHORT,
        ScalarType::Int2_10_10_10Rev => glow::INT_2_10_10_10_REV,
        ScalarType::UnsignedInt2_10_10_10Rev => glow::UNSIGNED_INT_2_10_10_10_REV,
    }
}

pub(crate) fn clear_mask(flags: ClearFlags) -> u32 {
    let mut mask = 0;
    if flags.contains(ClearFlags::COLOR) {
        mask |= glow::COLOR_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::DEPTH) {
        mask |= glow::DEPTH_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::STENCIL) {
        mask |= glow::STENCIL_BUFFER_BIT;
    }
    mask
}

/// Readable name of a framebuffer status code
pub(crate) fn framebuffer_status_name(status: u32) -> &'static str {
    match status {
        glow::FRAMEBUFFER_COMPLETE => "complete",
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "incomplete attachment",
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => "missing attachment",
        glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => "incomplete multisample",
        glow::FRAMEBUFFER_UNSUPPORTED => "unsupported",
        _ => "unknown status",
    }
}

#[cfg(test)]
#[path = "glow_format_tests.rs"]
mod tests;
