/// Draw dispatcher - binds draw states and issues draw calls
///
/// Tracks the program in use and the last bound vertex buffer so that
/// consecutive draw states sharing them do not rebind.

use crate::draw::{DrawState, UniformValue};
use crate::render::{
    Backend, BufferId, BufferKind, Driver, DrawRange, IndexFormat, PrimitiveType, ProgramId,
};
use crate::resource::{PipelineKey, ResourceRegistry, ShaderKey, MAX_VERTEX_ATTRIBUTES};
use crate::state::RenderStateCache;
use crate::{gfx_trace, gfx_warn};

/// Pipeline parameters captured by the last successful `apply`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActivePipeline {
    pipeline: PipelineKey,
    shader: ShaderKey,
    primitive: PrimitiveType,
    index_format: IndexFormat,
    index_size: u32,
    index_bound: bool,
}

/// Draw-state binding and draw-call issuing
#[derive(Debug, Default)]
pub struct DrawDispatcher {
    current_program: Option<ProgramId>,
    bound_vertex_buffer: Option<BufferId>,
    active: Option<ActivePipeline>,
}

impl DrawDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline of the last applied draw state
    pub fn active_pipeline(&self) -> Option<PipelineKey> {
        self.active.map(|active| active.pipeline)
    }

    /// Forget the vertex buffer binding (after buffer uploads rebound it)
    pub fn invalidate_buffer_bindings(&mut self) {
        self.bound_vertex_buffer = None;
    }

    /// Forget a destroyed pipeline
    pub fn forget_pipeline(&mut self, pipeline: PipelineKey) {
        if self.active_pipeline() == Some(pipeline) {
            self.active = None;
        }
    }

    /// Forget a destroyed program
    pub fn forget_program(&mut self, program: ProgramId) {
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    /// Bind everything `draw_state` references
    ///
    /// Returns the number of render-state groups sent to the driver.
    pub fn apply(
        &mut self,
        driver: &mut dyn Driver,
        backend: &dyn Backend,
        registry: &ResourceRegistry,
        state_cache: &mut RenderStateCache,
        draw_state: &DrawState,
    ) -> usize {
        let Some(pipeline) = registry.pipeline(draw_state.pipeline) else {
            gfx_warn!("altai::draw", "draw state references an unknown pipeline, draws are skipped");
            self.active = None;
            return 0;
        };
        let Some(shader) = registry.shader(pipeline.shader()) else {
            gfx_warn!("altai::draw", "pipeline shader was destroyed, draws are skipped");
            self.active = None;
            return 0;
        };

        let index_format = pipeline.index_format();
        match (draw_state.index_buffer.is_some(), index_format) {
            (true, IndexFormat::None) => gfx_warn!("altai::draw",
                "draw state has an index buffer but the pipeline index format is None"),
            (false, IndexFormat::UInt16 | IndexFormat::UInt32) => gfx_warn!("altai::draw",
                "pipeline index format is {:?} but the draw state has no index buffer", index_format),
            _ => {}
        }
        if draw_state.vertex_buffers.len() < pipeline.vertex_layouts().len() {
            gfx_warn!("altai::draw", "pipeline has {} vertex layouts but the draw state provides {} buffers",
                pipeline.vertex_layouts().len(), draw_state.vertex_buffers.len());
        }

        let changes = state_cache.apply(driver, pipeline.render_state(), false);

        if self.current_program != Some(pipeline.program()) {
            driver.use_program(Some(pipeline.program()));
            self.current_program = Some(pipeline.program());
        }

        // Index buffer
        let index_buffer = match (draw_state.index_buffer, index_format) {
            (_, IndexFormat::None) | (None, _) => None,
            (Some(key), _) => match registry.buffer(key) {
                Some(buffer) => Some(buffer.handle()),
                None => {
                    gfx_warn!("altai::draw", "draw state references a destroyed index buffer");
                    None
                }
            },
        };
        driver.bind_buffer(BufferKind::Index, index_buffer);

        // Vertex attributes
        for (slot, binding) in pipeline.attributes().iter().enumerate().take(MAX_VERTEX_ATTRIBUTES) {
            let slot = slot as u32;
            let source = if binding.enabled {
                let buffer = draw_state
                    .vertex_buffers
                    .get(binding.buffer_index)
                    .and_then(|&key| registry.buffer(key));
                if buffer.is_none() {
                    gfx_warn!("altai::draw", "no vertex buffer {} for attribute slot {}, slot disabled",
                        binding.buffer_index, slot);
                }
                buffer.map(|buffer| buffer.handle())
            } else {
                None
            };

            let Some(handle) = source else {
                driver.set_vertex_attrib_enabled(slot, false);
                continue;
            };
            if self.bound_vertex_buffer != Some(handle) {
                driver.bind_buffer(BufferKind::Vertex, Some(handle));
                self.bound_vertex_buffer = Some(handle);
            }
            driver.vertex_attrib_pointer(
                slot,
                binding.components,
                binding.scalar_type,
                binding.normalized,
                binding.stride,
                binding.offset,
            );
            backend.set_vertex_divisor(driver, slot, binding.divisor);
            driver.set_vertex_attrib_enabled(slot, true);
        }

        // Textures, one unit per sampler in name order
        let mut unit = 0;
        for (name, &key) in &draw_state.textures {
            let Some(location) = shader.uniform_location(name) else {
                gfx_warn!("altai::draw", "sampler '{}' not found in shader, texture skipped", name);
                continue;
            };
            let Some(texture) = registry.texture(key) else {
                gfx_warn!("altai::draw", "sampler '{}' references a destroyed texture", name);
                continue;
            };
            driver.active_texture(unit);
            driver.bind_texture(texture.info().texture_type, Some(texture.image()));
            driver.uniform_1i(location, unit as i32);
            unit += 1;
        }

        self.active = Some(ActivePipeline {
            pipeline: draw_state.pipeline,
            shader: pipeline.shader(),
            primitive: pipeline.primitive_type(),
            index_format,
            index_size: pipeline.index_size(),
            index_bound: index_buffer.is_some(),
        });
        gfx_trace!("altai::draw", "draw state applied ({} state groups, {} textures)", changes, unit);
        changes
    }

    /// Upload one uniform to the active shader
    pub fn apply_uniform(
        &self,
        driver: &mut dyn Driver,
        registry: &ResourceRegistry,
        name: &str,
        value: UniformValue,
    ) -> bool {
        let Some(active) = self.active else {
            gfx_warn!("altai::draw", "uniform '{}' applied without an active draw state", name);
            return false;
        };
        let Some(location) = registry.shader(active.shader).and_then(|s| s.uniform_location(name)) else {
            gfx_warn!("altai::draw", "uniform '{}' not found in shader", name);
            return false;
        };
        value.upload(driver, location);
        true
    }

    /// Issue a draw with the active draw state
    ///
    /// Returns false when nothing was sent to the driver.
    pub fn draw(
        &self,
        driver: &mut dyn Driver,
        backend: &dyn Backend,
        base_element: u32,
        num_elements: u32,
        num_instances: u32,
    ) -> bool {
        let Some(active) = self.active else {
            gfx_warn!("altai::draw", "draw issued without an active draw state, skipped");
            return false;
        };
        if num_elements == 0 || num_instances == 0 {
            return false;
        }

        let range = match active.index_format {
            IndexFormat::None => DrawRange::Vertices { first: base_element, count: num_elements },
            _ if !active.index_bound => {
                gfx_warn!("altai::draw", "indexed draw without a bound index buffer, skipped");
                return false;
            }
            format => {
                // GL takes the offset as a signed pointer-sized value
                let byte_offset = base_element
                    .checked_mul(active.index_size)
                    .filter(|&offset| offset <= i32::MAX as u32);
                let Some(byte_offset) = byte_offset else {
                    gfx_warn!("altai::draw", "base element {} overflows the index byte offset, draw skipped",
                        base_element);
                    return false;
                };
                DrawRange::Indices { format, byte_offset, count: num_elements }
            }
        };

        if num_instances > 1 {
            backend.draw_instanced(driver, active.primitive, range, num_instances);
        } else {
            match range {
                DrawRange::Vertices { first, count } => driver.draw_arrays(active.primitive, first, count),
                DrawRange::Indices { format, byte_offset, count } => {
                    driver.draw_elements(active.primitive, count, format, byte_offset)
                }
            }
        }
        true
    }
}
