/// Shared enums and flag types used by resources, the state cache and the driver

use bitflags::bitflags;

/// Buffer contents (also selects the driver bind target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Vertex data (ARRAY_BUFFER)
    Vertex,
    /// Index data (ELEMENT_ARRAY_BUFFER)
    Index,
}

/// Buffer and texture data usage hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Usage {
    /// Data is immutable, cannot be modified after creation
    #[default]
    Immutable,
    /// Data is updated infrequently
    Dynamic,
    /// Data is overwritten each frame
    Stream,
}

/// Vertex index formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// No vertex indices
    #[default]
    None,
    /// 16-bit indices
    UInt16,
    /// 32-bit indices
    UInt32,
}

impl IndexFormat {
    /// Size in bytes of one index element (0 for `None`)
    pub fn byte_size(&self) -> u32 {
        match self {
            IndexFormat::None => 0,
            IndexFormat::UInt16 => 2,
            IndexFormat::UInt32 => 4,
        }
    }
}

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
}

/// Texture pixel formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(non_camel_case_types)]
pub enum PixelFormat {
    /// RGBA with 8 bits per channel
    #[default]
    RGBA8,
    /// RGB with 8 bits per channel
    RGB8,
    /// RGBA with 4 bits per channel
    RGBA4,
    /// RGB with 5/6/5 bits per channel
    RGB565,
    /// RGBA with 5-bit color channels and 1-bit alpha
    RGB5_A1,
    /// RGBA with 10-bit color channels and 2-bit alpha
    RGB10_A2,
    /// RGBA with 32-bit floating point channels
    RGBA32F,
    /// RGBA with 16-bit floating point channels
    RGBA16F,
    /// R component only, 32-bit floating point
    R32F,
    /// R component only, 16-bit floating point
    R16F,
}

/// Depth/stencil surface formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthStencilFormat {
    /// Depth only
    Depth,
    /// Combined depth-stencil
    DepthStencil,
}

impl DepthStencilFormat {
    /// Whether the format carries a stencil component
    pub fn has_stencil(&self) -> bool {
        matches!(self, DepthStencilFormat::DepthStencil)
    }
}

/// Texture object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureType {
    #[default]
    Texture2D,
    TextureCube,
    Texture3D,
    TextureArray,
}

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// Nearest (point) filtering
    #[default]
    Nearest,
    /// Linear filtering
    Linear,
}

/// Texture coordinate wrap mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Wrap {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

/// Polygon faces for culling and per-face stencil state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Face {
    Front,
    #[default]
    Back,
    Both,
}

/// Comparison functions for depth and stencil tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    #[default]
    Always,
}

/// Stencil-buffer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilOp {
    #[default]
    Keep,
    Zero,
    Replace,
    IncrClamp,
    DecrClamp,
    Invert,
    IncrWrap,
    DecrWrap,
}

/// Alpha-blending factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturated,
    BlendColor,
    OneMinusBlendColor,
    BlendAlpha,
    OneMinusBlendAlpha,
}

/// Blend equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendOp {
    /// src + dst
    #[default]
    Add,
    /// src - dst
    Subtract,
    /// dst - src
    ReverseSubtract,
}

/// Vertex fetch step function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StepFunc {
    #[default]
    PerVertex,
    PerInstance,
}

/// What happens to an attachment's content at pass-begin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadAction {
    /// Content is undefined
    DontCare,
    /// Preserve previous content
    Load,
    /// Clear to the attachment's clear value
    #[default]
    Clear,
}

bitflags! {
    /// Color channel write mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorMask: u8 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
        const ALL = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

impl Default for ColorMask {
    fn default() -> Self {
        ColorMask::ALL
    }
}

bitflags! {
    /// Buffers touched by a clear
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}
