/// GlowDriver - OpenGL / OpenGL ES / WebGL implementation of the Driver trait
///
/// GL object names never leave this module: the layer sees sequential ids
/// and the driver maps them back to native objects. Calls naming an unknown
/// id are logged and skipped.

use glow::HasContext;
use rustc_hash::FxHashMap;
use altai_gfx::altai::{ContextAttributes, Error, Result};
use altai_gfx::altai::render::{
    Attachment, BlendFactor, BlendOp, BufferId, BufferKind, Capability, ClearFlags, ColorMask,
    CompareFunc, Driver, Face, FramebufferId, FramebufferTarget, IndexFormat, PrimitiveType,
    ProgramId, ProgramInfo, RenderbufferFormat, RenderbufferId, StencilOp, TextureId,
    TextureTarget, TextureType, UniformLocation, Usage,
};
use altai_gfx::altai::resource::{ScalarType, TextureDesc};
use altai_gfx::{gfx_debug, gfx_err, gfx_info, gfx_warn};

use crate::glow_format::{
    attachment, blend_equation, blend_factor, buffer_target, buffer_usage, capability,
    clear_mask, compare_func, face, framebuffer_status_name, framebuffer_target, index_type,
    mag_filter, min_filter, pixel_format, pixel_size, primitive_mode, renderbuffer_format,
    scalar_type, stencil_op, texture_bind_target, texture_image_target, wrap_mode,
};

// glow 0.13 does not export these legacy enums
const ALPHA_BITS: u32 = 0x0D55;
const DEPTH_BITS: u32 = 0x0D56;
const STENCIL_BITS: u32 = 0x0D57;

type GlBuffer = <glow::Context as HasContext>::Buffer;
type GlTexture = <glow::Context as HasContext>::Texture;
type GlRenderbuffer = <glow::Context as HasContext>::Renderbuffer;
type GlFramebuffer = <glow::Context as HasContext>::Framebuffer;
type GlProgram = <glow::Context as HasContext>::Program;
type GlUniformLocation = <glow::Context as HasContext>::UniformLocation;
type GlVertexArray = <glow::Context as HasContext>::VertexArray;

/// Linked program and the uniform ids handed out for it
struct ProgramEntry {
    program: GlProgram,
    uniforms: Vec<u32>,
}

/// Buffer sizes of the default framebuffer as reported by the context
///
/// Bit counts the context cannot report (desktop core profiles) are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct DrawingBuffer {
    pub alpha_bits: Option<i32>,
    pub depth_bits: Option<i32>,
    pub stencil_bits: Option<i32>,
    pub samples: i32,
}

/// Requested attributes the drawing buffer does not provide
pub(crate) fn missing_attributes(requested: &ContextAttributes, granted: &DrawingBuffer) -> Vec<&'static str> {
    let mut missing = Vec::new();
    let absent = |bits: Option<i32>| bits.map_or(false, |bits| bits == 0);
    if requested.alpha && absent(granted.alpha_bits) {
        missing.push("alpha");
    }
    if requested.depth && absent(granted.depth_bits) {
        missing.push("depth");
    }
    if requested.stencil && absent(granted.stencil_bits) {
        missing.push("stencil");
    }
    if requested.antialias && granted.samples <= 1 {
        missing.push("antialias");
    }
    missing
}

/// Driver over a current glow context
pub struct GlowDriver {
    gl: glow::Context,
    /// OpenGL ES or WebGL context
    embedded: bool,
    /// Sized internal formats available (GL, GLES 3, WebGL 2)
    sized_formats: bool,
    next_id: u32,
    buffers: FxHashMap<u32, GlBuffer>,
    textures: FxHashMap<u32, GlTexture>,
    renderbuffers: FxHashMap<u32, GlRenderbuffer>,
    framebuffers: FxHashMap<u32, GlFramebuffer>,
    programs: FxHashMap<u32, ProgramEntry>,
    uniforms: FxHashMap<u32, GlUniformLocation>,
    /// Default vertex array (desktop core profiles require one)
    vertex_array: Option<GlVertexArray>,
}

fn lookup<T: Copy>(map: &FxHashMap<u32, T>, id: u32, kind: &str) -> Option<T> {
    let found = map.get(&id).copied();
    if found.is_none() {
        gfx_warn!("altai::glow", "unknown {} id {}, call skipped", kind, id);
    }
    found
}

impl GlowDriver {
    /// Wrap a context that is current on the calling thread
    pub fn new(gl: glow::Context) -> Result<Self> {
        let (embedded, major) = {
            let version = gl.version();
            (version.is_embedded, version.major)
        };
        let sized_formats = !embedded || major >= 3;

        let vertex_array = if !embedded && major >= 3 {
            unsafe {
                let vao = gl
                    .create_vertex_array()
                    .map_err(|e| Error::InitializationFailed(format!("glCreateVertexArray failed: {}", e)))?;
                gl.bind_vertex_array(Some(vao));
                Some(vao)
            }
        } else {
            None
        };

        unsafe {
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gfx_info!("altai::glow", "GL context: {} ({})",
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::RENDERER));
        }

        Ok(Self {
            gl,
            embedded,
            sized_formats,
            next_id: 1,
            buffers: FxHashMap::default(),
            textures: FxHashMap::default(),
            renderbuffers: FxHashMap::default(),
            framebuffers: FxHashMap::default(),
            programs: FxHashMap::default(),
            uniforms: FxHashMap::default(),
            vertex_array,
        })
    }

    /// The wrapped context
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// Buffer sizes of the default framebuffer
    pub(crate) fn drawing_buffer(&self) -> DrawingBuffer {
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            // Per-buffer bit queries were removed from desktop core profiles
            let bits = |pname: u32| if self.embedded { Some(self.gl.get_parameter_i32(pname)) } else { None };
            DrawingBuffer {
                alpha_bits: bits(ALPHA_BITS),
                depth_bits: bits(DEPTH_BITS),
                stencil_bits: bits(STENCIL_BITS),
                samples: self.gl.get_parameter_i32(glow::SAMPLES),
            }
        }
    }

    /// Compare the context against the attributes it was requested with
    ///
    /// The host creates the context, so missing buffers are only reported.
    /// Returns the number of missing attributes.
    pub fn check_context_attributes(&self, requested: &ContextAttributes) -> usize {
        let granted = self.drawing_buffer();
        let missing = missing_attributes(requested, &granted);
        for attribute in &missing {
            gfx_warn!("altai::glow", "context was requested with {} but the drawing buffer has none", attribute);
        }
        gfx_debug!("altai::glow", "drawing buffer: {:?}", granted);
        missing.len()
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Active attributes and uniforms of a linked program
    fn reflect(&mut self, program: GlProgram) -> (Vec<(String, u32)>, Vec<(String, UniformLocation)>, Vec<u32>) {
        let mut attributes = Vec::new();
        let mut uniforms = Vec::new();
        let mut uniform_ids = Vec::new();

        unsafe {
            for index in 0..self.gl.get_active_attributes(program) {
                let Some(active) = self.gl.get_active_attribute(program, index) else {
                    continue;
                };
                if let Some(slot) = self.gl.get_attrib_location(program, &active.name) {
                    attributes.push((active.name, slot));
                }
            }

            for index in 0..self.gl.get_active_uniforms(program) {
                let Some(active) = self.gl.get_active_uniform(program, index) else {
                    continue;
                };
                // Arrays report "name[0]"
                let name = active.name.strip_suffix("[0]").unwrap_or(&active.name).to_string();
                let Some(location) = self.gl.get_uniform_location(program, &name) else {
                    continue;
                };
                let id = self.allocate();
                self.uniforms.insert(id, location);
                uniform_ids.push(id);
                uniforms.push((name, UniformLocation(id)));
            }
        }

        (attributes, uniforms, uniform_ids)
    }
}

impl Drop for GlowDriver {
    fn drop(&mut self) {
        let leaked = self.buffers.len() + self.textures.len() + self.programs.len() + self.framebuffers.len();
        if leaked > 0 {
            gfx_debug!("altai::glow", "{} GL objects still alive at driver drop", leaked);
        }
        if let Some(vao) = self.vertex_array.take() {
            unsafe {
                self.gl.delete_vertex_array(vao);
            }
        }
    }
}

impl Driver for GlowDriver {
    // ----- buffers -----

    fn create_buffer(&mut self, kind: BufferKind, usage: Usage, size: usize, data: Option<&[u8]>) -> Result<BufferId> {
        let target = buffer_target(kind);
        let gl_usage = buffer_usage(usage);
        let buffer = unsafe { self.gl.create_buffer() }
            .map_err(|e| gfx_err!("altai::glow", "glCreateBuffer failed: {}", e))?;

        unsafe {
            self.gl.bind_buffer(target, Some(buffer));
            match data {
                Some(bytes) if bytes.len() == size => self.gl.buffer_data_u8_slice(target, bytes, gl_usage),
                Some(bytes) => {
                    self.gl.buffer_data_size(target, size as i32, gl_usage);
                    self.gl.buffer_sub_data_u8_slice(target, 0, &bytes[..bytes.len().min(size)]);
                }
                None => self.gl.buffer_data_size(target, size as i32, gl_usage),
            }
        }

        let id = self.allocate();
        self.buffers.insert(id, buffer);
        Ok(BufferId(id))
    }

    fn update_buffer(&mut self, buffer: BufferId, kind: BufferKind, offset: usize, data: &[u8]) {
        let Some(native) = lookup(&self.buffers, buffer.0, "buffer") else {
            return;
        };
        let target = buffer_target(kind);
        unsafe {
            self.gl.bind_buffer(target, Some(native));
            self.gl.buffer_sub_data_u8_slice(target, offset as i32, data);
        }
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if let Some(native) = self.buffers.remove(&buffer.0) {
            unsafe { self.gl.delete_buffer(native) };
        }
    }

    // ----- textures and renderbuffers -----

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId> {
        let target = texture_bind_target(desc.texture_type);
        let format = pixel_format(desc.color_format, self.sized_formats);
        let texture = unsafe { self.gl.create_texture() }
            .map_err(|e| gfx_err!("altai::glow", "glCreateTexture failed: {}", e))?;

        let data = match desc.data.as_deref() {
            Some(bytes) if desc.texture_type != TextureType::Texture2D => {
                gfx_warn!("altai::glow", "initial data is only uploaded for 2D textures ({} bytes ignored)", bytes.len());
                None
            }
            Some(bytes) => {
                let expected = desc.width as usize * desc.height as usize * pixel_size(desc.color_format);
                if bytes.len() < expected {
                    gfx_warn!("altai::glow", "texture data has {} bytes, {} expected, upload skipped", bytes.len(), expected);
                    None
                } else {
                    Some(&bytes[..expected])
                }
            }
            None => None,
        };

        unsafe {
            self.gl.bind_texture(target, Some(texture));

            for level in 0..desc.mip_levels {
                let width = desc.width.checked_shr(level).unwrap_or(0).max(1) as i32;
                let height = desc.height.checked_shr(level).unwrap_or(0).max(1) as i32;
                let level_data = if level == 0 { data } else { None };
                match desc.texture_type {
                    TextureType::Texture2D => self.gl.tex_image_2d(
                        glow::TEXTURE_2D, level as i32, format.internal_format,
                        width, height, 0, format.format, format.ty, level_data,
                    ),
                    TextureType::TextureCube => {
                        for face_index in 0..6 {
                            self.gl.tex_image_2d(
                                texture_image_target(TextureTarget::CubeFace(face_index)), level as i32,
                                format.internal_format, width, height, 0, format.format, format.ty, None,
                            );
                        }
                    }
                    TextureType::Texture3D => {
                        let depth = desc.depth.checked_shr(level).unwrap_or(0).max(1) as i32;
                        self.gl.tex_image_3d(
                            glow::TEXTURE_3D, level as i32, format.internal_format,
                            width, height, depth, 0, format.format, format.ty, None,
                        );
                    }
                    TextureType::TextureArray => self.gl.tex_image_3d(
                        glow::TEXTURE_2D_ARRAY, level as i32, format.internal_format,
                        width, height, desc.depth.max(1) as i32, 0, format.format, format.ty, None,
                    ),
                }
            }

            let sampler = desc.sampler;
            let has_mips = desc.mip_levels > 1 || desc.generate_mipmaps;
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, wrap_mode(sampler.wrap_u));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, wrap_mode(sampler.wrap_v));
            if matches!(desc.texture_type, TextureType::Texture3D | TextureType::TextureArray) {
                self.gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_R, wrap_mode(sampler.wrap_w));
            }
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER,
                min_filter(sampler.min_filter, sampler.mip_filter, has_mips));
            self.gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, mag_filter(sampler.mag_filter));

            if desc.generate_mipmaps && data.is_some() {
                self.gl.generate_mipmap(target);
            }
            self.gl.bind_texture(target, None);
        }

        let id = self.allocate();
        self.textures.insert(id, texture);
        Ok(TextureId(id))
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if let Some(native) = self.textures.remove(&texture.0) {
            unsafe { self.gl.delete_texture(native) };
        }
    }

    fn create_renderbuffer(&mut self, format: RenderbufferFormat, width: u32, height: u32, samples: u32) -> Result<RenderbufferId> {
        let internal_format = renderbuffer_format(format, self.sized_formats);
        let renderbuffer = unsafe { self.gl.create_renderbuffer() }
            .map_err(|e| gfx_err!("altai::glow", "glCreateRenderbuffer failed: {}", e))?;

        unsafe {
            self.gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
            if samples > 1 {
                self.gl.renderbuffer_storage_multisample(
                    glow::RENDERBUFFER, samples as i32, internal_format, width as i32, height as i32,
                );
            } else {
                self.gl.renderbuffer_storage(glow::RENDERBUFFER, internal_format, width as i32, height as i32);
            }
            self.gl.bind_renderbuffer(glow::RENDERBUFFER, None);
        }

        let id = self.allocate();
        self.renderbuffers.insert(id, renderbuffer);
        Ok(RenderbufferId(id))
    }

    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferId) {
        if let Some(native) = self.renderbuffers.remove(&renderbuffer.0) {
            unsafe { self.gl.delete_renderbuffer(native) };
        }
    }

    // ----- programs -----

    fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<ProgramInfo> {
        let program = unsafe { self.gl.create_program() }
            .map_err(|e| gfx_err!("altai::glow", "glCreateProgram failed: {}", e))?;

        let mut info_log = String::new();
        let mut compiled = true;
        let mut shaders = Vec::with_capacity(2);

        for (stage, source, stage_name) in [
            (glow::VERTEX_SHADER, vertex_source, "vertex"),
            (glow::FRAGMENT_SHADER, fragment_source, "fragment"),
        ] {
            let shader = match unsafe { self.gl.create_shader(stage) } {
                Ok(shader) => shader,
                Err(e) => unsafe {
                    for shader in shaders {
                        self.gl.delete_shader(shader);
                    }
                    self.gl.delete_program(program);
                    return Err(gfx_err!("altai::glow", "glCreateShader ({}) failed: {}", stage_name, e));
                },
            };
            unsafe {
                self.gl.shader_source(shader, source);
                self.gl.compile_shader(shader);
                if !self.gl.get_shader_compile_status(shader) {
                    compiled = false;
                    info_log.push_str(&format!("{} shader: {}\n", stage_name, self.gl.get_shader_info_log(shader)));
                }
                self.gl.attach_shader(program, shader);
            }
            shaders.push(shader);
        }

        let linked = compiled && unsafe {
            self.gl.link_program(program);
            let linked = self.gl.get_program_link_status(program);
            if !linked {
                info_log.push_str(&self.gl.get_program_info_log(program));
            }
            linked
        };

        unsafe {
            for shader in shaders {
                self.gl.detach_shader(program, shader);
                self.gl.delete_shader(shader);
            }
        }

        let (attributes, uniforms, uniform_ids) = if linked {
            self.reflect(program)
        } else {
            (Vec::new(), Vec::new(), Vec::new())
        };

        let id = self.allocate();
        self.programs.insert(id, ProgramEntry { program, uniforms: uniform_ids });
        Ok(ProgramInfo {
            program: ProgramId(id),
            linked,
            info_log: info_log.trim_end().to_string(),
            attributes,
            uniforms,
        })
    }

    fn delete_program(&mut self, program: ProgramId) {
        if let Some(entry) = self.programs.remove(&program.0) {
            for uniform in entry.uniforms {
                self.uniforms.remove(&uniform);
            }
            unsafe { self.gl.delete_program(entry.program) };
        }
    }

    // ----- framebuffers -----

    fn create_framebuffer(&mut self) -> Result<FramebufferId> {
        let framebuffer = unsafe { self.gl.create_framebuffer() }
            .map_err(|e| gfx_err!("altai::glow", "glCreateFramebuffer failed: {}", e))?;
        let id = self.allocate();
        self.framebuffers.insert(id, framebuffer);
        Ok(FramebufferId(id))
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId) {
        if let Some(native) = self.framebuffers.remove(&framebuffer.0) {
            unsafe { self.gl.delete_framebuffer(native) };
        }
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferId>) {
        let native = match framebuffer {
            Some(id) => match lookup(&self.framebuffers, id.0, "framebuffer") {
                Some(native) => Some(native),
                None => return,
            },
            None => None,
        };
        unsafe { self.gl.bind_framebuffer(framebuffer_target(target), native) };
    }

    fn framebuffer_texture_2d(&mut self, attach: Attachment, target: TextureTarget, texture: TextureId, mip_level: u32) {
        let Some(native) = lookup(&self.textures, texture.0, "texture") else {
            return;
        };
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER, attachment(attach), texture_image_target(target), Some(native), mip_level as i32,
            );
        }
    }

    fn framebuffer_texture_layer(&mut self, attach: Attachment, texture: TextureId, mip_level: u32, layer: u32) {
        let Some(native) = lookup(&self.textures, texture.0, "texture") else {
            return;
        };
        unsafe {
            self.gl.framebuffer_texture_layer(
                glow::FRAMEBUFFER, attachment(attach), Some(native), mip_level as i32, layer as i32,
            );
        }
    }

    fn framebuffer_renderbuffer(&mut self, attach: Attachment, renderbuffer: RenderbufferId) {
        let Some(native) = lookup(&self.renderbuffers, renderbuffer.0, "renderbuffer") else {
            return;
        };
        unsafe {
            self.gl.framebuffer_renderbuffer(glow::FRAMEBUFFER, attachment(attach), glow::RENDERBUFFER, Some(native));
        }
    }

    fn framebuffer_complete(&mut self) -> bool {
        let status = unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) };
        if status != glow::FRAMEBUFFER_COMPLETE {
            gfx_debug!("altai::glow", "framebuffer status: {} (0x{:X})", framebuffer_status_name(status), status);
        }
        status == glow::FRAMEBUFFER_COMPLETE
    }

    fn draw_buffers(&mut self, count: u32) {
        let buffers: Vec<u32> = (0..count).map(|index| glow::COLOR_ATTACHMENT0 + index).collect();
        unsafe { self.gl.draw_buffers(&buffers) };
    }

    fn read_buffer(&mut self, color_attachment: u32) {
        unsafe { self.gl.read_buffer(glow::COLOR_ATTACHMENT0 + color_attachment) };
    }

    fn blit_framebuffer(&mut self, width: u32, height: u32) {
        let (w, h) = (width as i32, height as i32);
        unsafe {
            self.gl.blit_framebuffer(0, 0, w, h, 0, 0, w, h, glow::COLOR_BUFFER_BIT, glow::NEAREST);
        }
    }

    // ----- fixed-function state -----

    fn set_enabled(&mut self, cap: Capability, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(capability(cap));
            } else {
                self.gl.disable(capability(cap));
            }
        }
    }

    fn depth_func(&mut self, func: CompareFunc) {
        unsafe { self.gl.depth_func(compare_func(func)) };
    }

    fn depth_mask(&mut self, write_enabled: bool) {
        unsafe { self.gl.depth_mask(write_enabled) };
    }

    fn stencil_func(&mut self, side: Face, func: CompareFunc, reference: u32, read_mask: u32) {
        unsafe { self.gl.stencil_func_separate(face(side), compare_func(func), reference as i32, read_mask) };
    }

    fn stencil_op(&mut self, side: Face, fail: StencilOp, depth_fail: StencilOp, pass: StencilOp) {
        unsafe {
            self.gl.stencil_op_separate(face(side), stencil_op(fail), stencil_op(depth_fail), stencil_op(pass));
        }
    }

    fn stencil_mask(&mut self, side: Face, write_mask: u32) {
        unsafe { self.gl.stencil_mask_separate(face(side), write_mask) };
    }

    fn blend_func(&mut self, src_rgb: BlendFactor, dst_rgb: BlendFactor, src_alpha: BlendFactor, dst_alpha: BlendFactor) {
        unsafe {
            self.gl.blend_func_separate(
                blend_factor(src_rgb), blend_factor(dst_rgb), blend_factor(src_alpha), blend_factor(dst_alpha),
            );
        }
    }

    fn blend_equation(&mut self, op_rgb: BlendOp, op_alpha: BlendOp) {
        unsafe { self.gl.blend_equation_separate(blend_equation(op_rgb), blend_equation(op_alpha)) };
    }

    fn color_mask(&mut self, mask: ColorMask) {
        unsafe {
            self.gl.color_mask(
                mask.contains(ColorMask::RED),
                mask.contains(ColorMask::GREEN),
                mask.contains(ColorMask::BLUE),
                mask.contains(ColorMask::ALPHA),
            );
        }
    }

    fn blend_color(&mut self, color: [f32; 4]) {
        unsafe { self.gl.blend_color(color[0], color[1], color[2], color[3]) };
    }

    fn cull_face(&mut self, side: Face) {
        unsafe { self.gl.cull_face(face(side)) };
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { self.gl.viewport(x, y, width as i32, height as i32) };
    }

    fn scissor(&mut self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { self.gl.scissor(x, y, width as i32, height as i32) };
    }

    // ----- clears -----

    fn clear(&mut self, flags: ClearFlags, color: [f32; 4], depth: f32, stencil: u32) {
        unsafe {
            if flags.contains(ClearFlags::COLOR) {
                self.gl.clear_color(color[0], color[1], color[2], color[3]);
            }
            if flags.contains(ClearFlags::DEPTH) {
                self.gl.clear_depth_f32(depth);
            }
            if flags.contains(ClearFlags::STENCIL) {
                self.gl.clear_stencil(stencil as i32);
            }
            self.gl.clear(clear_mask(flags));
        }
    }

    fn clear_color_buffer(&mut self, draw_buffer: u32, color: [f32; 4]) {
        let mut values = color;
        unsafe { self.gl.clear_buffer_f32_slice(glow::COLOR, draw_buffer, &mut values) };
    }

    // ----- bindings -----

    fn use_program(&mut self, program: Option<ProgramId>) {
        let native = match program {
            Some(id) => match self.programs.get(&id.0) {
                Some(entry) => Some(entry.program),
                None => {
                    gfx_warn!("altai::glow", "unknown program id {}, call skipped", id.0);
                    return;
                }
            },
            None => None,
        };
        unsafe { self.gl.use_program(native) };
    }

    fn bind_buffer(&mut self, kind: BufferKind, buffer: Option<BufferId>) {
        let native = match buffer {
            Some(id) => match lookup(&self.buffers, id.0, "buffer") {
                Some(native) => Some(native),
                None => return,
            },
            None => None,
        };
        unsafe { self.gl.bind_buffer(buffer_target(kind), native) };
    }

    fn vertex_attrib_pointer(&mut self, slot: u32, components: u32, scalar: ScalarType, normalized: bool, stride: u32, offset: u32) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                slot, components as i32, scalar_type(scalar), normalized, stride as i32, offset as i32,
            );
        }
    }

    fn set_vertex_attrib_enabled(&mut self, slot: u32, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable_vertex_attrib_array(slot);
            } else {
                self.gl.disable_vertex_attrib_array(slot);
            }
        }
    }

    fn vertex_attrib_divisor(&mut self, slot: u32, divisor: u32) {
        unsafe { self.gl.vertex_attrib_divisor(slot, divisor) };
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
    }

    fn bind_texture(&mut self, texture_type: TextureType, texture: Option<TextureId>) {
        let native = match texture {
            Some(id) => match lookup(&self.textures, id.0, "texture") {
                Some(native) => Some(native),
                None => return,
            },
            None => None,
        };
        unsafe { self.gl.bind_texture(texture_bind_target(texture_type), native) };
    }

    // ----- uniforms -----

    fn uniform_1i(&mut self, location: UniformLocation, value: i32) {
        if let Some(native) = self.uniform(location) {
            unsafe { self.gl.uniform_1_i32(Some(native), value) };
        }
    }

    fn uniform_1f(&mut self, location: UniformLocation, value: f32) {
        if let Some(native) = self.uniform(location) {
            unsafe { self.gl.uniform_1_f32(Some(native), value) };
        }
    }

    fn uniform_2f(&mut self, location: UniformLocation, value: [f32; 2]) {
        if let Some(native) = self.uniform(location) {
            unsafe { self.gl.uniform_2_f32(Some(native), value[0], value[1]) };
        }
    }

    fn uniform_3f(&mut self, location: UniformLocation, value: [f32; 3]) {
        if let Some(native) = self.uniform(location) {
            unsafe { self.gl.uniform_3_f32(Some(native), value[0], value[1], value[2]) };
        }
    }

    fn uniform_4f(&mut self, location: UniformLocation, value: [f32; 4]) {
        if let Some(native) = self.uniform(location) {
            unsafe { self.gl.uniform_4_f32(Some(native), value[0], value[1], value[2], value[3]) };
        }
    }

    fn uniform_matrix_4f(&mut self, location: UniformLocation, value: [f32; 16]) {
        if let Some(native) = self.uniform(location) {
            unsafe { self.gl.uniform_matrix_4_f32_slice(Some(native), false, &value) };
        }
    }

    // ----- draws -----

    fn draw_arrays(&mut self, primitive: PrimitiveType, first: u32, count: u32) {
        unsafe { self.gl.draw_arrays(primitive_mode(primitive), first as i32, count as i32) };
    }

    fn draw_elements(&mut self, primitive: PrimitiveType, count: u32, index_format: IndexFormat, byte_offset: u32) {
        let Some(element_type) = index_type(index_format) else {
            gfx_warn!("altai::glow", "indexed draw without an index format, skipped");
            return;
        };
        unsafe {
            self.gl.draw_elements(primitive_mode(primitive), count as i32, element_type, byte_offset as i32);
        }
    }

    fn draw_arrays_instanced(&mut self, primitive: PrimitiveType, first: u32, count: u32, instances: u32) {
        unsafe {
            self.gl.draw_arrays_instanced(primitive_mode(primitive), first as i32, count as i32, instances as i32);
        }
    }

    fn draw_elements_instanced(&mut self, primitive: PrimitiveType, count: u32, index_format: IndexFormat, byte_offset: u32, instances: u32) {
        let Some(element_type) = index_type(index_format) else {
            gfx_warn!("altai::glow", "indexed draw without an index format, skipped");
            return;
        };
        unsafe {
            self.gl.draw_elements_instanced(
                primitive_mode(primitive), count as i32, element_type, byte_offset as i32, instances as i32,
            );
        }
    }
}

impl GlowDriver {
    fn uniform(&self, location: UniformLocation) -> Option<&GlUniformLocation> {
        let native = self.uniforms.get(&location.0);
        if native.is_none() {
            gfx_warn!("altai::glow", "unknown uniform location {}, call skipped", location.0);
        }
        native
    }
}

#[cfg(test)]
#[path = "glow_driver_tests.rs"]
mod tests;
