/// Driver trait - the immediate-mode graphics interface the layer sits on
///
/// The trait mirrors a GL-style API: objects are created and deleted
/// explicitly, framebuffer attachment calls act on the currently bound
/// framebuffer, and every fixed-function state setter is a separate call.
/// The render-state cache exists to keep traffic through this trait minimal.

use crate::error::Result;
use crate::render::{
    BlendFactor, BlendOp, BufferKind, ClearFlags, ColorMask, CompareFunc, Face,
    IndexFormat, PixelFormat, PrimitiveType, StencilOp, TextureType, Usage,
};
use crate::resource::{ScalarType, TextureDesc};

// ===== HANDLES =====

/// Driver buffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// Driver texture (image) object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Driver renderbuffer object (MSAA color or depth/stencil storage)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderbufferId(pub u32);

/// Driver framebuffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FramebufferId(pub u32);

/// Driver program object (linked vertex + fragment shader)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

/// Uniform location inside a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniformLocation(pub u32);

// ===== CALL PARAMETERS =====

/// Toggleable fixed-function capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    DepthTest,
    StencilTest,
    Blend,
    CullFace,
    ScissorTest,
    Dither,
    SampleAlphaToCoverage,
}

/// Framebuffer bind point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramebufferTarget {
    /// Read and draw
    Both,
    /// Source of blits
    Read,
    /// Destination of draws and blits
    Draw,
}

/// Framebuffer attachment point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attachment {
    Color(u32),
    Depth,
    Stencil,
    DepthStencil,
}

/// Image selected when attaching a texture with a 2D attach call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    /// Plain 2D texture
    Texture2D,
    /// One face of a cube map (0..6: +X, -X, +Y, -Y, +Z, -Z)
    CubeFace(u32),
}

/// Storage format of a renderbuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderbufferFormat {
    Color(PixelFormat),
    Depth,
    DepthStencil,
}

/// Result of compiling and linking a program
///
/// The program handle is allocated even when linking fails; `linked`
/// and `info_log` carry the diagnostic.
#[derive(Debug, Clone)]
pub struct ProgramInfo {
    /// Program handle
    pub program: ProgramId,
    /// Whether compilation and linking succeeded
    pub linked: bool,
    /// Compiler/linker output (empty on success)
    pub info_log: String,
    /// Active vertex attributes (name, slot)
    pub attributes: Vec<(String, u32)>,
    /// Active uniforms (name, location)
    pub uniforms: Vec<(String, UniformLocation)>,
}

// ===== DRIVER TRAIT =====

/// Immediate-mode graphics driver
///
/// Implemented by `altai_gfx_driver_glow::GlowDriver` for real contexts and by
/// the mock driver in unit tests. Only object creation can fail; every other
/// call is fire-and-forget, matching the underlying API.
pub trait Driver {
    // ----- buffers -----

    /// Create a buffer and allocate `size` bytes, optionally initialized with `data`
    fn create_buffer(&mut self, kind: BufferKind, usage: Usage, size: usize, data: Option<&[u8]>) -> Result<BufferId>;

    /// Overwrite a byte range of a buffer
    fn update_buffer(&mut self, buffer: BufferId, kind: BufferKind, offset: usize, data: &[u8]);

    fn delete_buffer(&mut self, buffer: BufferId);

    // ----- textures and renderbuffers -----

    /// Create a texture image with storage for every mip level, face and layer
    ///
    /// Applies the sampler state of `desc` and uploads its initial data.
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId>;

    fn delete_texture(&mut self, texture: TextureId);

    /// Create a renderbuffer; `samples > 1` allocates multisampled storage
    fn create_renderbuffer(&mut self, format: RenderbufferFormat, width: u32, height: u32, samples: u32) -> Result<RenderbufferId>;

    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferId);

    // ----- programs -----

    /// Compile and link a vertex/fragment source pair
    ///
    /// Returns `Err` only when the program object itself cannot be created.
    fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<ProgramInfo>;

    fn delete_program(&mut self, program: ProgramId);

    // ----- framebuffers -----

    fn create_framebuffer(&mut self) -> Result<FramebufferId>;

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId);

    /// Bind a framebuffer (`None` = default framebuffer)
    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferId>);

    /// Attach a 2D image (or cube face) to the bound framebuffer
    fn framebuffer_texture_2d(&mut self, attachment: Attachment, target: TextureTarget, texture: TextureId, mip_level: u32);

    /// Attach one layer of a 3D or array texture to the bound framebuffer
    fn framebuffer_texture_layer(&mut self, attachment: Attachment, texture: TextureId, mip_level: u32, layer: u32);

    /// Attach a renderbuffer to the bound framebuffer
    fn framebuffer_renderbuffer(&mut self, attachment: Attachment, renderbuffer: RenderbufferId);

    /// Completeness of the bound framebuffer
    fn framebuffer_complete(&mut self) -> bool;

    /// Route fragment outputs to color attachments `0..count`
    fn draw_buffers(&mut self, count: u32);

    /// Select the color attachment blits read from
    fn read_buffer(&mut self, color_attachment: u32);

    /// Blit the full color area from the read to the draw framebuffer
    fn blit_framebuffer(&mut self, width: u32, height: u32);

    // ----- fixed-function state -----

    fn set_enabled(&mut self, capability: Capability, enabled: bool);

    fn depth_func(&mut self, func: CompareFunc);

    fn depth_mask(&mut self, write_enabled: bool);

    fn stencil_func(&mut self, face: Face, func: CompareFunc, reference: u32, read_mask: u32);

    fn stencil_op(&mut self, face: Face, fail: StencilOp, depth_fail: StencilOp, pass: StencilOp);

    fn stencil_mask(&mut self, face: Face, write_mask: u32);

    fn blend_func(&mut self, src_rgb: BlendFactor, dst_rgb: BlendFactor, src_alpha: BlendFactor, dst_alpha: BlendFactor);

    fn blend_equation(&mut self, op_rgb: BlendOp, op_alpha: BlendOp);

    fn color_mask(&mut self, mask: ColorMask);

    fn blend_color(&mut self, color: [f32; 4]);

    fn cull_face(&mut self, face: Face);

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    fn scissor(&mut self, x: i32, y: i32, width: u32, height: u32);

    // ----- clears -----

    /// Clear the selected buffers of all active draw targets
    fn clear(&mut self, flags: ClearFlags, color: [f32; 4], depth: f32, stencil: u32);

    /// Clear a single color draw buffer (multiple render targets)
    fn clear_color_buffer(&mut self, draw_buffer: u32, color: [f32; 4]);

    // ----- bindings -----

    fn use_program(&mut self, program: Option<ProgramId>);

    fn bind_buffer(&mut self, kind: BufferKind, buffer: Option<BufferId>);

    /// Describe where attribute `slot` fetches from the bound vertex buffer
    fn vertex_attrib_pointer(&mut self, slot: u32, components: u32, scalar_type: ScalarType, normalized: bool, stride: u32, offset: u32);

    fn set_vertex_attrib_enabled(&mut self, slot: u32, enabled: bool);

    fn vertex_attrib_divisor(&mut self, slot: u32, divisor: u32);

    fn active_texture(&mut self, unit: u32);

    fn bind_texture(&mut self, texture_type: TextureType, texture: Option<TextureId>);

    // ----- uniforms -----

    fn uniform_1i(&mut self, location: UniformLocation, value: i32);

    fn uniform_1f(&mut self, location: UniformLocation, value: f32);

    fn uniform_2f(&mut self, location: UniformLocation, value: [f32; 2]);

    fn uniform_3f(&mut self, location: UniformLocation, value: [f32; 3]);

    fn uniform_4f(&mut self, location: UniformLocation, value: [f32; 4]);

    /// Column-major 4x4 matrix
    fn uniform_matrix_4f(&mut self, location: UniformLocation, value: [f32; 16]);

    // ----- draws -----

    fn draw_arrays(&mut self, primitive: PrimitiveType, first: u32, count: u32);

    fn draw_elements(&mut self, primitive: PrimitiveType, count: u32, index_format: IndexFormat, byte_offset: u32);

    fn draw_arrays_instanced(&mut self, primitive: PrimitiveType, first: u32, count: u32, instances: u32);

    fn draw_elements_instanced(&mut self, primitive: PrimitiveType, count: u32, index_format: IndexFormat, byte_offset: u32, instances: u32);
}
