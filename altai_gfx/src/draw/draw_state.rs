/// Draw state - the resource bundle one or more draws are issued with

use std::collections::BTreeMap;
use crate::resource::{BufferKey, PipelineKey, TextureKey};

/// Pipeline plus the buffers and textures it reads
///
/// `vertex_buffers[i]` feeds the pipeline's `vertex_layouts[i]`. Textures
/// are bound by sampler uniform name, in name order, to sequential texture
/// units. Fields are public and may be changed between draws.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub pipeline: PipelineKey,
    pub vertex_buffers: Vec<BufferKey>,
    pub index_buffer: Option<BufferKey>,
    pub textures: BTreeMap<String, TextureKey>,
}

impl DrawState {
    pub fn new(pipeline: PipelineKey) -> Self {
        Self {
            pipeline,
            vertex_buffers: Vec::new(),
            index_buffer: None,
            textures: BTreeMap::new(),
        }
    }

    pub fn with_vertex_buffer(mut self, buffer: BufferKey) -> Self {
        self.vertex_buffers.push(buffer);
        self
    }

    pub fn with_index_buffer(mut self, buffer: BufferKey) -> Self {
        self.index_buffer = Some(buffer);
        self
    }

    /// Bind `texture` to the sampler uniform `sampler_name`
    pub fn with_texture(mut self, sampler_name: impl Into<String>, texture: TextureKey) -> Self {
        self.textures.insert(sampler_name.into(), texture);
        self
    }
}
