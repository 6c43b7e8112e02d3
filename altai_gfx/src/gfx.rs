/// Gfx - the rendering layer facade
///
/// Owns the driver, the backend, the resource registry, the render-state
/// shadow and the draw dispatcher of one rendering context. Independent
/// instances share nothing but the process-wide logger.

use bytemuck::Pod;
use crate::config::GfxConfig;
use crate::draw::{DrawDispatcher, DrawState, UniformValue};
use crate::error::{Error, Result};
use crate::frame::{FrameStats, FramePacer};
use crate::pass::{Pass, PassDesc, PendingResolve};
use crate::render::{create_backend, Backend, BackendKind, BufferKind, Capability, Driver, Usage};
use crate::resource::{
    BufferDesc, BufferKey, PipelineDesc, PipelineKey, ResourceRegistry, ShaderDesc, ShaderKey,
    TextureDesc, TextureKey,
};
use crate::state::{RenderState, RenderStateCache};
use crate::surface::Surface;
use crate::{gfx_debug, gfx_info, gfx_warn};

/// Rendering layer instance
///
/// # Example
///
/// ```no_run
/// use altai_gfx::altai::{self, Gfx, GfxConfig, FixedSurface, ManualFramePacer};
/// # fn driver() -> altai::render::mock_driver::MockDriver { unimplemented!() }
///
/// let mut gfx = Gfx::new(GfxConfig::default(), driver(), FixedSurface::new(800, 600), ManualFramePacer::new())?;
/// let pass = gfx.make_pass(&altai::pass::PassDesc::default_pass().with_clear_color([0.2, 0.2, 0.2, 1.0]))?;
/// gfx.begin_pass(&pass);
/// gfx.end_pass();
/// gfx.commit_frame(|| {});
/// # Ok::<(), altai::Error>(())
/// ```
pub struct Gfx {
    config: GfxConfig,
    driver: Box<dyn Driver>,
    backend: Box<dyn Backend>,
    surface: Box<dyn Surface>,
    pacer: Box<dyn FramePacer>,
    registry: ResourceRegistry,
    state_cache: RenderStateCache,
    dispatcher: DrawDispatcher,
    current_pass: Option<PendingResolve>,
    stats: FrameStats,
    last_frame_stats: FrameStats,
}

impl Gfx {
    /// Create the layer over an initialized driver and its surface
    ///
    /// Resizes the surface when the configuration asks for a size, enables
    /// depth testing and forces the default render state into the driver.
    pub fn new<D, S, P>(config: GfxConfig, driver: D, surface: S, pacer: P) -> Result<Self>
    where
        D: Driver + 'static,
        S: Surface + 'static,
        P: FramePacer + 'static,
    {
        let mut surface: Box<dyn Surface> = Box::new(surface);
        if config.width.is_some() || config.height.is_some() {
            let width = config.width.unwrap_or_else(|| surface.width());
            let height = config.height.unwrap_or_else(|| surface.height());
            surface.resize(width, height);
        }
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            return Err(Error::InitializationFailed(format!(
                "surface '{}' has an empty size {}x{}", config.surface_id, width, height
            )));
        }

        let backend = create_backend(config.backend_kind());
        let mut driver: Box<dyn Driver> = Box::new(driver);
        let mut state_cache = RenderStateCache::new();

        driver.set_enabled(Capability::DepthTest, true);
        state_cache.apply(driver.as_mut(), &RenderState::default(), true);
        driver.viewport(0, 0, width, height);

        gfx_info!("altai::Gfx", "initialized {:?} backend on '{}' ({}x{})",
            backend.kind(), config.surface_id, width, height);

        Ok(Self {
            config,
            driver,
            backend,
            surface,
            pacer: Box::new(pacer),
            registry: ResourceRegistry::new(),
            state_cache,
            dispatcher: DrawDispatcher::new(),
            current_pass: None,
            stats: FrameStats::default(),
            last_frame_stats: FrameStats::default(),
        })
    }

    // ===== RESOURCE CREATION =====

    pub fn make_buffer(&mut self, desc: &BufferDesc) -> Result<BufferKey> {
        let key = self.registry.create_buffer(self.driver.as_mut(), desc)?;
        self.dispatcher.invalidate_buffer_bindings();
        Ok(key)
    }

    /// Create a buffer initialized with a slice of plain-old-data values
    pub fn make_buffer_with_data<T: Pod>(&mut self, kind: BufferKind, usage: Usage, data: &[T]) -> Result<BufferKey> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.make_buffer(&BufferDesc { kind, usage, size: bytes.len(), data: Some(bytes) })
    }

    /// Overwrite part of a Dynamic or Stream buffer
    ///
    /// Returns false (with a warning) for stale keys, immutable buffers and
    /// out-of-range writes.
    pub fn update_buffer(&mut self, key: BufferKey, offset: usize, data: &[u8]) -> bool {
        let Some(buffer) = self.registry.buffer(key) else {
            gfx_warn!("altai::Gfx", "update_buffer: unknown buffer");
            return false;
        };
        let updated = buffer.update(self.driver.as_mut(), offset, data);
        self.dispatcher.invalidate_buffer_bindings();
        updated
    }

    pub fn make_texture(&mut self, desc: TextureDesc) -> Result<TextureKey> {
        self.registry.create_texture(self.driver.as_mut(), self.backend.as_ref(), desc)
    }

    /// Compile and link a shader
    ///
    /// Link failures still return a key; check them with `shader_status`.
    pub fn make_shader(&mut self, desc: &ShaderDesc) -> Result<ShaderKey> {
        self.registry.create_shader(self.driver.as_mut(), desc)
    }

    /// `Error::ShaderLinkFailed` with the link log when the shader is unusable
    pub fn shader_status(&self, key: ShaderKey) -> Result<()> {
        match self.registry.shader(key) {
            Some(shader) => shader.status(),
            None => Err(Error::InvalidResource("unknown shader".to_string())),
        }
    }

    pub fn make_pipeline(&mut self, desc: PipelineDesc) -> Result<PipelineKey> {
        self.registry.create_pipeline(desc)
    }

    /// Create a render pass
    ///
    /// Incomplete framebuffers still return a pass; check them with
    /// `Pass::status`.
    pub fn make_pass(&mut self, desc: &PassDesc) -> Result<Pass> {
        Pass::create(self.driver.as_mut(), self.backend.as_ref(), &self.registry, desc)
    }

    /// Bundle a pipeline with its buffers
    pub fn make_draw_state(
        &self,
        pipeline: PipelineKey,
        vertex_buffers: &[BufferKey],
        index_buffer: Option<BufferKey>,
    ) -> DrawState {
        if self.registry.pipeline(pipeline).is_none() {
            gfx_warn!("altai::Gfx", "make_draw_state: unknown pipeline");
        }
        if vertex_buffers.iter().any(|&key| self.registry.buffer(key).is_none()) {
            gfx_warn!("altai::Gfx", "make_draw_state: unknown vertex buffer");
        }
        DrawState {
            pipeline,
            vertex_buffers: vertex_buffers.to_vec(),
            index_buffer,
            textures: Default::default(),
        }
    }

    // ===== RESOURCE DESTRUCTION =====

    pub fn destroy_buffer(&mut self, key: BufferKey) {
        if !self.registry.destroy_buffer(self.driver.as_mut(), key) {
            gfx_warn!("altai::Gfx", "destroy_buffer: unknown buffer ignored");
        }
        self.dispatcher.invalidate_buffer_bindings();
    }

    pub fn destroy_texture(&mut self, key: TextureKey) {
        if !self.registry.destroy_texture(self.driver.as_mut(), key) {
            gfx_warn!("altai::Gfx", "destroy_texture: unknown texture ignored");
        }
    }

    pub fn destroy_shader(&mut self, key: ShaderKey) {
        let program = self.registry.shader(key).map(|shader| shader.program());
        match program {
            Some(program) => {
                self.registry.destroy_shader(self.driver.as_mut(), key);
                self.dispatcher.forget_program(program);
            }
            None => gfx_warn!("altai::Gfx", "destroy_shader: unknown shader ignored"),
        }
    }

    pub fn destroy_pipeline(&mut self, key: PipelineKey) {
        if self.registry.destroy_pipeline(key) {
            self.dispatcher.forget_pipeline(key);
        } else {
            gfx_warn!("altai::Gfx", "destroy_pipeline: unknown pipeline ignored");
        }
    }

    /// Release the framebuffers of an offscreen pass
    pub fn destroy_pass(&mut self, pass: Pass) {
        pass.release(self.driver.as_mut());
    }

    // ===== FRAME COMMANDS =====

    /// Start rendering into `pass`
    ///
    /// Binds its target, sets the viewport to the full target, forces the
    /// pass-begin render state and clears attachments whose load action is
    /// Clear.
    pub fn begin_pass(&mut self, pass: &Pass) {
        if self.current_pass.is_some() {
            gfx_warn!("altai::Gfx", "begin_pass while a pass is in progress, ending it first");
            self.end_pass();
        }
        let changes = pass.begin(
            self.driver.as_mut(),
            self.backend.as_ref(),
            &mut self.state_cache,
            self.surface.size(),
        );
        self.current_pass = Some(pass.pending_resolve());
        self.stats.passes += 1;
        self.stats.state_changes += changes as u32;
    }

    /// Finish the pass in progress, resolving MSAA attachments
    pub fn end_pass(&mut self) {
        match self.current_pass.take() {
            Some(pending) => pending.run(self.driver.as_mut(), self.backend.as_ref()),
            None => gfx_warn!("altai::Gfx", "end_pass without begin_pass"),
        }
    }

    pub fn apply_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.driver.viewport(x, y, width, height);
    }

    /// Scissor rectangle (effective when the pipeline enables the scissor test)
    pub fn apply_scissor_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.driver.scissor(x, y, width, height);
    }

    pub fn apply_draw_state(&mut self, draw_state: &DrawState) {
        let changes = self.dispatcher.apply(
            self.driver.as_mut(),
            self.backend.as_ref(),
            &self.registry,
            &mut self.state_cache,
            draw_state,
        );
        self.stats.state_changes += changes as u32;
    }

    /// Set one uniform of the active shader
    pub fn apply_uniform(&mut self, name: &str, value: impl Into<UniformValue>) {
        self.dispatcher.apply_uniform(self.driver.as_mut(), &self.registry, name, value.into());
    }

    pub fn apply_uniforms(&mut self, uniforms: &[(&str, UniformValue)]) {
        for (name, value) in uniforms {
            self.dispatcher.apply_uniform(self.driver.as_mut(), &self.registry, name, *value);
        }
    }

    /// Draw `num_elements` vertices or indices starting at `base_element`
    ///
    /// `num_instances > 1` issues an instanced draw on the extended backend;
    /// the baseline backend draws a single instance.
    pub fn draw(&mut self, base_element: u32, num_elements: u32, num_instances: u32) {
        if self.current_pass.is_none() {
            gfx_warn!("altai::Gfx", "draw outside of a pass");
        }
        if self.dispatcher.draw(
            self.driver.as_mut(),
            self.backend.as_ref(),
            base_element,
            num_elements,
            num_instances,
        ) {
            self.stats.draw_calls += 1;
        }
    }

    /// Schedule `callback` for the next frame and reset the frame counters
    pub fn commit_frame<F>(&mut self, callback: F)
    where
        F: FnOnce() + 'static,
    {
        if self.current_pass.is_some() {
            gfx_warn!("altai::Gfx", "commit_frame while a pass is in progress");
        }
        self.last_frame_stats = std::mem::take(&mut self.stats);
        gfx_debug!("altai::Gfx", "frame committed ({} draws, {} state changes, {} passes)",
            self.last_frame_stats.draw_calls,
            self.last_frame_stats.state_changes,
            self.last_frame_stats.passes);
        self.pacer.request_frame(Box::new(callback));
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &GfxConfig {
        &self.config
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Current pixel size of the presentation surface
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface.size()
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Render state the driver is assumed to hold
    pub fn render_state(&self) -> &RenderState {
        self.state_cache.shadow()
    }

    /// Counters of the frame in progress
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Counters of the last committed frame
    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_frame_stats
    }
}

impl Drop for Gfx {
    fn drop(&mut self) {
        self.registry.clear(self.driver.as_mut());
    }
}

#[cfg(test)]
#[path = "gfx_tests.rs"]
mod tests;
