/// Shader resource - a linked vertex/fragment program and its reflection tables

use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::gfx_error;
use crate::render::{Driver, ProgramId, UniformLocation};

/// Descriptor for creating a shader
#[derive(Debug, Clone, Default)]
pub struct ShaderDesc {
    /// Vertex shader source code
    pub vertex_source: String,
    /// Fragment shader source code
    pub fragment_source: String,
}

impl ShaderDesc {
    pub fn new(vertex_source: impl Into<String>, fragment_source: impl Into<String>) -> Self {
        Self {
            vertex_source: vertex_source.into(),
            fragment_source: fragment_source.into(),
        }
    }
}

/// Shader resource
///
/// A shader whose compilation or linking failed is still a valid handle,
/// but `is_valid()` is false and `status()` returns the link log. Draws
/// with such a shader have undefined visual results.
#[derive(Debug)]
pub struct Shader {
    program: ProgramId,
    valid: bool,
    info_log: String,
    attributes: FxHashMap<String, u32>,
    uniforms: FxHashMap<String, UniformLocation>,
}

impl Shader {
    pub(crate) fn create(driver: &mut dyn Driver, desc: &ShaderDesc) -> Result<Self> {
        let info = driver.create_program(&desc.vertex_source, &desc.fragment_source)?;
        if !info.linked {
            gfx_error!("altai::shader", "shader compile/link failed: {}", info.info_log);
        }
        Ok(Self {
            program: info.program,
            valid: info.linked,
            info_log: info.info_log,
            attributes: info.attributes.into_iter().collect(),
            uniforms: info.uniforms.into_iter().collect(),
        })
    }

    pub(crate) fn release(&self, driver: &mut dyn Driver) {
        driver.delete_program(self.program);
    }

    /// Driver program object
    pub fn program(&self) -> ProgramId {
        self.program
    }

    /// Whether compilation and linking succeeded
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Compiler/linker output
    pub fn info_log(&self) -> &str {
        &self.info_log
    }

    /// `Ok` for a linked program, `Error::ShaderLinkFailed` otherwise
    pub fn status(&self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(Error::ShaderLinkFailed(self.info_log.clone()))
        }
    }

    /// Active vertex attributes (name -> slot)
    pub fn attributes(&self) -> &FxHashMap<String, u32> {
        &self.attributes
    }

    pub fn attribute_slot(&self, name: &str) -> Option<u32> {
        self.attributes.get(name).copied()
    }

    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.uniforms.get(name).copied()
    }
}
