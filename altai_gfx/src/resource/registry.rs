/// Resource registry - owns every buffer, texture, shader and pipeline
///
/// Resources are stored in slot maps and referenced by stable, typed keys.
/// A key stays valid until its own resource is destroyed; lookups with a
/// stale key return `None` (or `Error::InvalidResource` where a `Result` is
/// expected).

use slotmap::{new_key_type, SlotMap};
use crate::error::{Error, Result};
use crate::render::{Backend, Driver};
use crate::resource::{
    Buffer, BufferDesc, Pipeline, PipelineDesc, Shader, ShaderDesc, Texture, TextureDesc,
};

new_key_type! {
    /// Stable key of a Buffer
    pub struct BufferKey;
    /// Stable key of a Texture
    pub struct TextureKey;
    /// Stable key of a Shader
    pub struct ShaderKey;
    /// Stable key of a Pipeline
    pub struct PipelineKey;
}

/// Owner of all long-lived GPU resources of one layer instance
#[derive(Default)]
pub struct ResourceRegistry {
    buffers: SlotMap<BufferKey, Buffer>,
    textures: SlotMap<TextureKey, Texture>,
    shaders: SlotMap<ShaderKey, Shader>,
    pipelines: SlotMap<PipelineKey, Pipeline>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== CREATION =====

    pub fn create_buffer(&mut self, driver: &mut dyn Driver, desc: &BufferDesc) -> Result<BufferKey> {
        let buffer = Buffer::create(driver, desc)?;
        Ok(self.buffers.insert(buffer))
    }

    pub fn create_texture(&mut self, driver: &mut dyn Driver, backend: &dyn Backend, desc: TextureDesc) -> Result<TextureKey> {
        let texture = Texture::create(driver, backend, desc)?;
        Ok(self.textures.insert(texture))
    }

    pub fn create_shader(&mut self, driver: &mut dyn Driver, desc: &ShaderDesc) -> Result<ShaderKey> {
        let shader = Shader::create(driver, desc)?;
        Ok(self.shaders.insert(shader))
    }

    /// Create a pipeline, resolving its vertex layouts against the shader
    pub fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<PipelineKey> {
        let shader = self.shaders.get(desc.shader).ok_or_else(|| {
            Error::InvalidResource("pipeline references an unknown shader".to_string())
        })?;
        let pipeline = Pipeline::create(desc, shader);
        Ok(self.pipelines.insert(pipeline))
    }

    // ===== DESTRUCTION =====

    /// Returns false if the key is stale
    pub fn destroy_buffer(&mut self, driver: &mut dyn Driver, key: BufferKey) -> bool {
        match self.buffers.remove(key) {
            Some(buffer) => {
                buffer.release(driver);
                true
            }
            None => false,
        }
    }

    pub fn destroy_texture(&mut self, driver: &mut dyn Driver, key: TextureKey) -> bool {
        match self.textures.remove(key) {
            Some(texture) => {
                texture.release(driver);
                true
            }
            None => false,
        }
    }

    /// Pipelines built on the shader keep their program id but must not be drawn with
    pub fn destroy_shader(&mut self, driver: &mut dyn Driver, key: ShaderKey) -> bool {
        match self.shaders.remove(key) {
            Some(shader) => {
                shader.release(driver);
                true
            }
            None => false,
        }
    }

    pub fn destroy_pipeline(&mut self, key: PipelineKey) -> bool {
        self.pipelines.remove(key).is_some()
    }

    /// Release every resource (layer shutdown)
    pub fn clear(&mut self, driver: &mut dyn Driver) {
        self.pipelines.clear();
        for (_, shader) in self.shaders.drain() {
            shader.release(driver);
        }
        for (_, texture) in self.textures.drain() {
            texture.release(driver);
        }
        for (_, buffer) in self.buffers.drain() {
            buffer.release(driver);
        }
    }

    // ===== LOOKUP =====

    pub fn buffer(&self, key: BufferKey) -> Option<&Buffer> {
        self.buffers.get(key)
    }

    pub fn texture(&self, key: TextureKey) -> Option<&Texture> {
        self.textures.get(key)
    }

    pub fn shader(&self, key: ShaderKey) -> Option<&Shader> {
        self.shaders.get(key)
    }

    pub fn pipeline(&self, key: PipelineKey) -> Option<&Pipeline> {
        self.pipelines.get(key)
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
