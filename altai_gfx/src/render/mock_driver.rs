/// Mock Driver for unit tests (no GPU required)
///
/// Every call is recorded as a `DriverCall` in a shared log so tests can
/// assert on the exact traffic the layer sends to the driver, after the
/// driver itself has been moved into a `Gfx` instance.
///
/// Shader "compilation" is a line scan: `attribute`/`in` declarations of the
/// vertex source become attributes (sequential slots), `uniform`
/// declarations of both sources become uniforms. Linking fails when a source
/// is empty or contains `#error`.

use std::sync::{Arc, Mutex};
use crate::error::Result;
use crate::render::{
    Attachment, BlendFactor, BlendOp, BufferId, BufferKind, Capability, ClearFlags,
    ColorMask, CompareFunc, Driver, Face, FramebufferId, FramebufferTarget, IndexFormat,
    PrimitiveType, ProgramId, ProgramInfo, RenderbufferFormat, RenderbufferId, StencilOp,
    TextureId, TextureTarget, TextureType, UniformLocation, Usage,
};
use crate::resource::{ScalarType, TextureDesc};

/// One recorded driver call
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    CreateBuffer { buffer: BufferId, kind: BufferKind, usage: Usage, size: usize, has_data: bool },
    UpdateBuffer { buffer: BufferId, kind: BufferKind, offset: usize, len: usize },
    DeleteBuffer(BufferId),
    CreateTexture { texture: TextureId, texture_type: TextureType, width: u32, height: u32, mip_levels: u32, has_data: bool },
    DeleteTexture(TextureId),
    CreateRenderbuffer { renderbuffer: RenderbufferId, format: RenderbufferFormat, width: u32, height: u32, samples: u32 },
    DeleteRenderbuffer(RenderbufferId),
    CreateProgram { program: ProgramId, linked: bool },
    DeleteProgram(ProgramId),
    CreateFramebuffer(FramebufferId),
    DeleteFramebuffer(FramebufferId),
    BindFramebuffer(FramebufferTarget, Option<FramebufferId>),
    FramebufferTexture2D { attachment: Attachment, target: TextureTarget, texture: TextureId, mip_level: u32 },
    FramebufferTextureLayer { attachment: Attachment, texture: TextureId, mip_level: u32, layer: u32 },
    FramebufferRenderbuffer { attachment: Attachment, renderbuffer: RenderbufferId },
    FramebufferComplete,
    DrawBuffers(u32),
    ReadBuffer(u32),
    BlitFramebuffer { width: u32, height: u32 },
    SetEnabled(Capability, bool),
    DepthFunc(CompareFunc),
    DepthMask(bool),
    StencilFunc { face: Face, func: CompareFunc, reference: u32, read_mask: u32 },
    StencilOp { face: Face, fail: StencilOp, depth_fail: StencilOp, pass: StencilOp },
    StencilMask { face: Face, write_mask: u32 },
    BlendFunc { src_rgb: BlendFactor, dst_rgb: BlendFactor, src_alpha: BlendFactor, dst_alpha: BlendFactor },
    BlendEquation { op_rgb: BlendOp, op_alpha: BlendOp },
    ColorMask(ColorMask),
    BlendColor([f32; 4]),
    CullFace(Face),
    Viewport { x: i32, y: i32, width: u32, height: u32 },
    Scissor { x: i32, y: i32, width: u32, height: u32 },
    Clear { flags: ClearFlags, color: [f32; 4], depth: f32, stencil: u32 },
    ClearColorBuffer { draw_buffer: u32, color: [f32; 4] },
    UseProgram(Option<ProgramId>),
    BindBuffer(BufferKind, Option<BufferId>),
    VertexAttribPointer { slot: u32, components: u32, scalar_type: ScalarType, normalized: bool, stride: u32, offset: u32 },
    SetVertexAttribEnabled { slot: u32, enabled: bool },
    VertexAttribDivisor { slot: u32, divisor: u32 },
    ActiveTexture(u32),
    BindTexture(TextureType, Option<TextureId>),
    Uniform1i(UniformLocation, i32),
    Uniform1f(UniformLocation, f32),
    Uniform2f(UniformLocation, [f32; 2]),
    Uniform3f(UniformLocation, [f32; 3]),
    Uniform4f(UniformLocation, [f32; 4]),
    UniformMatrix4f(UniformLocation, [f32; 16]),
    DrawArrays { primitive: PrimitiveType, first: u32, count: u32 },
    DrawElements { primitive: PrimitiveType, count: u32, index_format: IndexFormat, byte_offset: u32 },
    DrawArraysInstanced { primitive: PrimitiveType, first: u32, count: u32, instances: u32 },
    DrawElementsInstanced { primitive: PrimitiveType, count: u32, index_format: IndexFormat, byte_offset: u32, instances: u32 },
}

impl DriverCall {
    /// Whether the call is one of the draw calls
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            DriverCall::DrawArrays { .. }
                | DriverCall::DrawElements { .. }
                | DriverCall::DrawArraysInstanced { .. }
                | DriverCall::DrawElementsInstanced { .. }
        )
    }

    /// Whether the call belongs to the fixed-function state groups
    pub fn is_render_state(&self) -> bool {
        match self {
            DriverCall::SetEnabled(capability, _) => *capability != Capability::DepthTest,
            DriverCall::DepthFunc(_)
            | DriverCall::DepthMask(_)
            | DriverCall::StencilFunc { .. }
            | DriverCall::StencilOp { .. }
            | DriverCall::StencilMask { .. }
            | DriverCall::BlendFunc { .. }
            | DriverCall::BlendEquation { .. }
            | DriverCall::ColorMask(_)
            | DriverCall::BlendColor(_)
            | DriverCall::CullFace(_) => true,
            _ => false,
        }
    }
}

/// Shared call log of a MockDriver
pub type CallLog = Arc<Mutex<Vec<DriverCall>>>;

/// Mock driver recording every call
pub struct MockDriver {
    calls: CallLog,
    next_id: u32,
    framebuffers_complete: bool,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            next_id: 1,
            framebuffers_complete: true,
        }
    }

    /// Make every completeness check fail
    pub fn with_incomplete_framebuffers(mut self) -> Self {
        self.framebuffers_complete = false;
        self
    }

    /// Shared handle on the call log
    pub fn call_log(&self) -> CallLog {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: DriverCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the recorded calls
pub fn recorded(log: &CallLog) -> Vec<DriverCall> {
    log.lock().unwrap().clone()
}

/// Forget every recorded call
pub fn clear(log: &CallLog) {
    log.lock().unwrap().clear();
}

fn declared_name(declaration: &str) -> Option<String> {
    let last = declaration.trim().trim_end_matches(';').split_whitespace().last()?;
    let name = last.split('[').next().unwrap_or(last);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn declarations<'a>(source: &'a str, keywords: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
    source.lines().filter_map(move |line| {
        let line = line.trim();
        let rest = keywords.iter().find_map(|keyword| line.strip_prefix(keyword))?;
        if !rest.starts_with(' ') {
            return None;
        }
        declared_name(rest)
    })
}

impl Driver for MockDriver {
    // ----- buffers -----

    fn create_buffer(&mut self, kind: BufferKind, usage: Usage, size: usize, data: Option<&[u8]>) -> Result<BufferId> {
        let buffer = BufferId(self.allocate());
        self.record(DriverCall::CreateBuffer { buffer, kind, usage, size, has_data: data.is_some() });
        Ok(buffer)
    }

    fn update_buffer(&mut self, buffer: BufferId, kind: BufferKind, offset: usize, data: &[u8]) {
        self.record(DriverCall::UpdateBuffer { buffer, kind, offset, len: data.len() });
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.record(DriverCall::DeleteBuffer(buffer));
    }

    // ----- textures and renderbuffers -----

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId> {
        let texture = TextureId(self.allocate());
        self.record(DriverCall::CreateTexture {
            texture,
            texture_type: desc.texture_type,
            width: desc.width,
            height: desc.height,
            mip_levels: desc.mip_levels,
            has_data: desc.data.is_some(),
        });
        Ok(texture)
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.record(DriverCall::DeleteTexture(texture));
    }

    fn create_renderbuffer(&mut self, format: RenderbufferFormat, width: u32, height: u32, samples: u32) -> Result<RenderbufferId> {
        let renderbuffer = RenderbufferId(self.allocate());
        self.record(DriverCall::CreateRenderbuffer { renderbuffer, format, width, height, samples });
        Ok(renderbuffer)
    }

    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferId) {
        self.record(DriverCall::DeleteRenderbuffer(renderbuffer));
    }

    // ----- programs -----

    fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<ProgramInfo> {
        let program = ProgramId(self.allocate());
        let broken = |source: &str| source.trim().is_empty() || source.contains("#error");
        let linked = !broken(vertex_source) && !broken(fragment_source);

        let (attributes, uniforms) = if linked {
            let attributes = declarations(vertex_source, &["attribute", "in"])
                .enumerate()
                .map(|(slot, name)| (name, slot as u32))
                .collect();
            let mut uniforms: Vec<(String, UniformLocation)> = Vec::new();
            for name in declarations(vertex_source, &["uniform"])
                .chain(declarations(fragment_source, &["uniform"]))
            {
                if uniforms.iter().all(|(existing, _)| *existing != name) {
                    let location = UniformLocation(uniforms.len() as u32);
                    uniforms.push((name, location));
                }
            }
            (attributes, uniforms)
        } else {
            (Vec::new(), Vec::new())
        };

        self.record(DriverCall::CreateProgram { program, linked });
        Ok(ProgramInfo {
            program,
            linked,
            info_log: if linked { String::new() } else { "mock: compile error".to_string() },
            attributes,
            uniforms,
        })
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.record(DriverCall::DeleteProgram(program));
    }

    // ----- framebuffers -----

    fn create_framebuffer(&mut self) -> Result<FramebufferId> {
        let framebuffer = FramebufferId(self.allocate());
        self.record(DriverCall::CreateFramebuffer(framebuffer));
        Ok(framebuffer)
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.record(DriverCall::DeleteFramebuffer(framebuffer));
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<FramebufferId>) {
        self.record(DriverCall::BindFramebuffer(target, framebuffer));
    }

    fn framebuffer_texture_2d(&mut self, attachment: Attachment, target: TextureTarget, texture: TextureId, mip_level: u32) {
        self.record(DriverCall::FramebufferTexture2D { attachment, target, texture, mip_level });
    }

    fn framebuffer_texture_layer(&mut self, attachment: Attachment, texture: TextureId, mip_level: u32, layer: u32) {
        self.record(DriverCall::FramebufferTextureLayer { attachment, texture, mip_level, layer });
    }

    fn framebuffer_renderbuffer(&mut self, attachment: Attachment, renderbuffer: RenderbufferId) {
        self.record(DriverCall::FramebufferRenderbuffer { attachment, renderbuffer });
    }

    fn framebuffer_complete(&mut self) -> bool {
        self.record(DriverCall::FramebufferComplete);
        self.framebuffers_complete
    }

    fn draw_buffers(&mut self, count: u32) {
        self.record(DriverCall::DrawBuffers(count));
    }

    fn read_buffer(&mut self, color_attachment: u32) {
        self.record(DriverCall::ReadBuffer(color_attachment));
    }

    fn blit_framebuffer(&mut self, width: u32, height: u32) {
        self.record(DriverCall::BlitFramebuffer { width, height });
    }

    // ----- fixed-function state -----

    fn set_enabled(&mut self, capability: Capability, enabled: bool) {
        self.record(DriverCall::SetEnabled(capability, enabled));
    }

    fn depth_func(&mut self, func: CompareFunc) {
        self.record(DriverCall::DepthFunc(func));
    }

    fn depth_mask(&mut self, write_enabled: bool) {
        self.record(DriverCall::DepthMask(write_enabled));
    }

    fn stencil_func(&mut self, face: Face, func: CompareFunc, reference: u32, read_mask: u32) {
        self.record(DriverCall::StencilFunc { face, func, reference, read_mask });
    }

    fn stencil_op(&mut self, face: Face, fail: StencilOp, depth_fail: StencilOp, pass: StencilOp) {
        self.record(DriverCall::StencilOp { face, fail, depth_fail, pass });
    }

    fn stencil_mask(&mut self, face: Face, write_mask: u32) {
        self.record(DriverCall::StencilMask { face, write_mask });
    }

    fn blend_func(&mut self, src_rgb: BlendFactor, dst_rgb: BlendFactor, src_alpha: BlendFactor, dst_alpha: BlendFactor) {
        self.record(DriverCall::BlendFunc { src_rgb, dst_rgb, src_alpha, dst_alpha });
    }

    fn blend_equation(&mut self, op_rgb: BlendOp, op_alpha: BlendOp) {
        self.record(DriverCall::BlendEquation { op_rgb, op_alpha });
    }

    fn color_mask(&mut self, mask: ColorMask) {
        self.record(DriverCall::ColorMask(mask));
    }

    fn blend_color(&mut self, color: [f32; 4]) {
        self.record(DriverCall::BlendColor(color));
    }

    fn cull_face(&mut self, face: Face) {
        self.record(DriverCall::CullFace(face));
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.record(DriverCall::Viewport { x, y, width, height });
    }

    fn scissor(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.record(DriverCall::Scissor { x, y, width, height });
    }

    // ----- clears -----

    fn clear(&mut self, flags: ClearFlags, color: [f32; 4], depth: f32, stencil: u32) {
        self.record(DriverCall::Clear { flags, color, depth, stencil });
    }

    fn clear_color_buffer(&mut self, draw_buffer: u32, color: [f32; 4]) {
        self.record(DriverCall::ClearColorBuffer { draw_buffer, color });
    }

    // ----- bindings -----

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.record(DriverCall::UseProgram(program));
    }

    fn bind_buffer(&mut self, kind: BufferKind, buffer: Option<BufferId>) {
        self.record(DriverCall::BindBuffer(kind, buffer));
    }

    fn vertex_attrib_pointer(&mut self, slot: u32, components: u32, scalar_type: ScalarType, normalized: bool, stride: u32, offset: u32) {
        self.record(DriverCall::VertexAttribPointer { slot, components, scalar_type, normalized, stride, offset });
    }

    fn set_vertex_attrib_enabled(&mut self, slot: u32, enabled: bool) {
        self.record(DriverCall::SetVertexAttribEnabled { slot, enabled });
    }

    fn vertex_attrib_divisor(&mut self, slot: u32, divisor: u32) {
        self.record(DriverCall::VertexAttribDivisor { slot, divisor });
    }

    fn active_texture(&mut self, unit: u32) {
        self.record(DriverCall::ActiveTexture(unit));
    }

    fn bind_texture(&mut self, texture_type: TextureType, texture: Option<TextureId>) {
        self.record(DriverCall::BindTexture(texture_type, texture));
    }

    // ----- uniforms -----

    fn uniform_1i(&mut self, location: UniformLocation, value: i32) {
        self.record(DriverCall::Uniform1i(location, value));
    }

    fn uniform_1f(&mut self, location: UniformLocation, value: f32) {
        self.record(DriverCall::Uniform1f(location, value));
    }

    fn uniform_2f(&mut self, location: UniformLocation, value: [f32; 2]) {
        self.record(DriverCall::Uniform2f(location, value));
    }

    fn uniform_3f(&mut self, location: UniformLocation, value: [f32; 3]) {
        self.record(DriverCall::Uniform3f(location, value));
    }

    fn uniform_4f(&mut self, location: UniformLocation, value: [f32; 4]) {
        self.record(DriverCall::Uniform4f(location, value));
    }

    fn uniform_matrix_4f(&mut self, location: UniformLocation, value: [f32; 16]) {
        self.record(DriverCall::UniformMatrix4f(location, value));
    }

    // ----- draws -----

    fn draw_arrays(&mut self, primitive: PrimitiveType, first: u32, count: u32) {
        self.record(DriverCall::DrawArrays { primitive, first, count });
    }

    fn draw_elements(&mut self, primitive: PrimitiveType, count: u32, index_format: IndexFormat, byte_offset: u32) {
        self.record(DriverCall::DrawElements { primitive, count, index_format, byte_offset });
    }

    fn draw_arrays_instanced(&mut self, primitive: PrimitiveType, first: u32, count: u32, instances: u32) {
        self.record(DriverCall::DrawArraysInstanced { primitive, first, count, instances });
    }

    fn draw_elements_instanced(&mut self, primitive: PrimitiveType, count: u32, index_format: IndexFormat, byte_offset: u32, instances: u32) {
        self.record(DriverCall::DrawElementsInstanced { primitive, count, index_format, byte_offset, instances });
    }
}

#[cfg(test)]
#[path = "mock_driver_tests.rs"]
mod tests;
