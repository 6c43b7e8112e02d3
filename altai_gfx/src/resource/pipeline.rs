/// Pipeline resource - shader + vertex layouts + baked render state

use crate::gfx_warn;
use crate::render::{IndexFormat, PrimitiveType, ProgramId};
use crate::resource::{
    resolve_attributes, AttributeBinding, Shader, ShaderKey, VertexLayout,
    MAX_VERTEX_ATTRIBUTES,
};
use crate::state::RenderState;

/// Descriptor for creating a pipeline
#[derive(Debug, Clone)]
pub struct PipelineDesc {
    /// Shader with matching vertex inputs
    pub shader: ShaderKey,
    /// One layout per vertex buffer
    pub vertex_layouts: Vec<VertexLayout>,
    /// Primitive topology
    pub primitive_type: PrimitiveType,
    /// Index data format
    pub index_format: IndexFormat,
    /// Fixed-function state applied with this pipeline
    pub render_state: RenderState,
}

impl PipelineDesc {
    /// Triangle-list pipeline without indices and with default render state
    pub fn new(shader: ShaderKey, vertex_layouts: Vec<VertexLayout>) -> Self {
        Self {
            shader,
            vertex_layouts,
            primitive_type: PrimitiveType::Triangles,
            index_format: IndexFormat::None,
            render_state: RenderState::default(),
        }
    }

    pub fn with_index_format(mut self, index_format: IndexFormat) -> Self {
        self.index_format = index_format;
        self
    }

    pub fn with_primitive_type(mut self, primitive_type: PrimitiveType) -> Self {
        self.primitive_type = primitive_type;
        self
    }

    pub fn with_render_state(mut self, render_state: RenderState) -> Self {
        self.render_state = render_state;
        self
    }
}

/// Pipeline resource
///
/// Attribute bindings are resolved once, at creation, against the shader's
/// attribute table.
#[derive(Debug)]
pub struct Pipeline {
    shader: ShaderKey,
    program: ProgramId,
    vertex_layouts: Vec<VertexLayout>,
    primitive_type: PrimitiveType,
    index_format: IndexFormat,
    render_state: RenderState,
    attributes: [AttributeBinding; MAX_VERTEX_ATTRIBUTES],
}

impl Pipeline {
    pub(crate) fn create(desc: PipelineDesc, shader: &Shader) -> Self {
        if !shader.is_valid() {
            gfx_warn!("altai::pipeline", "pipeline created with a shader that failed to link");
        }
        if desc.vertex_layouts.is_empty() {
            gfx_warn!("altai::pipeline", "pipeline created without vertex layouts");
        }
        let attributes = resolve_attributes(&desc.vertex_layouts, shader.attributes());
        Self {
            shader: desc.shader,
            program: shader.program(),
            vertex_layouts: desc.vertex_layouts,
            primitive_type: desc.primitive_type,
            index_format: desc.index_format,
            render_state: desc.render_state,
            attributes,
        }
    }

    pub fn shader(&self) -> ShaderKey {
        self.shader
    }

    /// Driver program of the pipeline's shader
    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn vertex_layouts(&self) -> &[VertexLayout] {
        &self.vertex_layouts
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    pub fn index_format(&self) -> IndexFormat {
        self.index_format
    }

    /// Byte size of one index element (0 without indices)
    pub fn index_size(&self) -> u32 {
        self.index_format.byte_size()
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render_state
    }

    /// Resolved per-slot attribute bindings
    pub fn attributes(&self) -> &[AttributeBinding; MAX_VERTEX_ATTRIBUTES] {
        &self.attributes
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
