/// Backend capability layer
///
/// Two driver feature levels are supported: a baseline level (WebGL 1 /
/// GLES 2 class: single color attachment, no multisampled renderbuffers, no
/// instancing) and an extended level (WebGL 2 / GLES 3 class). The pass
/// manager and draw dispatcher only talk to the `Backend` trait for the
/// capabilities that differ between the two.

use std::cell::Cell;
use crate::gfx_warn;
use crate::render::{Driver, FramebufferId, FramebufferTarget, IndexFormat, PrimitiveType};

/// Maximum number of color attachments any backend supports
pub const MAX_COLOR_ATTACHMENTS: usize = 4;

/// Backend feature level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Single render target, no MSAA renderbuffers, no instancing
    Baseline,
    /// Multiple render targets, MSAA resolve, instancing
    Extended,
}

/// Element range of a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawRange {
    /// Non-indexed vertex range
    Vertices { first: u32, count: u32 },
    /// Indexed range starting `byte_offset` bytes into the bound index buffer
    Indices { format: IndexFormat, byte_offset: u32, count: u32 },
}

/// A color attachment to resolve at the end of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveTarget {
    /// Color attachment index in the multisampled framebuffer
    pub attachment: u32,
    /// Single-sample framebuffer wrapping the attachment's texture
    pub framebuffer: FramebufferId,
}

/// Capability interface over the driver feature level
pub trait Backend {
    /// Feature level of this backend
    fn kind(&self) -> BackendKind;

    /// Number of color attachments a pass may use
    fn max_color_attachments(&self) -> usize;

    /// Whether multisampled renderbuffers (and their resolve) are available
    fn supports_msaa(&self) -> bool;

    /// Whether instanced draws and attribute divisors are available
    fn supports_instancing(&self) -> bool;

    /// Whether 3D and 2D-array textures are available
    fn supports_volume_textures(&self) -> bool;

    /// Bind a pass framebuffer (`None` = presentation surface)
    fn bind_framebuffer(&self, driver: &mut dyn Driver, framebuffer: Option<FramebufferId>);

    /// Declare the active color draw targets of the bound framebuffer
    fn set_draw_targets(&self, driver: &mut dyn Driver, count: usize);

    /// Clear one color attachment of a multiple-render-target framebuffer
    fn clear_color_attachment(&self, driver: &mut dyn Driver, index: u32, color: [f32; 4]);

    /// Set the instance divisor of an attribute slot
    fn set_vertex_divisor(&self, driver: &mut dyn Driver, slot: u32, divisor: u32);

    /// Issue an instanced draw
    fn draw_instanced(&self, driver: &mut dyn Driver, primitive: PrimitiveType, range: DrawRange, instances: u32);

    /// Resolve multisampled color attachments of `source` into their resolve framebuffers
    fn resolve(&self, driver: &mut dyn Driver, source: FramebufferId, targets: &[ResolveTarget], width: u32, height: u32);
}

/// Create the backend for a feature level
pub fn create_backend(kind: BackendKind) -> Box<dyn Backend> {
    match kind {
        BackendKind::Baseline => Box::new(BaselineBackend::new()),
        BackendKind::Extended => Box::new(ExtendedBackend::new()),
    }
}

fn draw_single(driver: &mut dyn Driver, primitive: PrimitiveType, range: DrawRange) {
    match range {
        DrawRange::Vertices { first, count } => driver.draw_arrays(primitive, first, count),
        DrawRange::Indices { format, byte_offset, count } => {
            driver.draw_elements(primitive, count, format, byte_offset)
        }
    }
}

// ============================================================================
// Baseline backend
// ============================================================================

/// WebGL 1 / GLES 2 class backend
///
/// Instancing is a known gap here: instanced draws degrade to a single
/// non-instanced draw after a one-time warning.
#[derive(Debug, Default)]
pub struct BaselineBackend {
    instancing_warned: Cell<bool>,
    divisor_warned: Cell<bool>,
}

impl BaselineBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for BaselineBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Baseline
    }

    fn max_color_attachments(&self) -> usize {
        1
    }

    fn supports_msaa(&self) -> bool {
        false
    }

    fn supports_instancing(&self) -> bool {
        false
    }

    fn supports_volume_textures(&self) -> bool {
        false
    }

    fn bind_framebuffer(&self, driver: &mut dyn Driver, framebuffer: Option<FramebufferId>) {
        driver.bind_framebuffer(FramebufferTarget::Both, framebuffer);
    }

    fn set_draw_targets(&self, _driver: &mut dyn Driver, count: usize) {
        if count > 1 {
            gfx_warn!("altai::backend",
                "multiple render targets ({}) not supported by the baseline backend, only attachment 0 is written",
                count);
        }
    }

    fn clear_color_attachment(&self, _driver: &mut dyn Driver, index: u32, _color: [f32; 4]) {
        gfx_warn!("altai::backend",
            "per-attachment clear of color attachment {} not supported by the baseline backend", index);
    }

    fn set_vertex_divisor(&self, _driver: &mut dyn Driver, slot: u32, divisor: u32) {
        if divisor > 0 && !self.divisor_warned.replace(true) {
            gfx_warn!("altai::backend",
                "per-instance vertex step (slot {}) not supported by the baseline backend", slot);
        }
    }

    fn draw_instanced(&self, driver: &mut dyn Driver, primitive: PrimitiveType, range: DrawRange, instances: u32) {
        if !self.instancing_warned.replace(true) {
            gfx_warn!("altai::backend",
                "instanced drawing ({} instances) not supported by the baseline backend, drawing once",
                instances);
        }
        draw_single(driver, primitive, range);
    }

    fn resolve(&self, _driver: &mut dyn Driver, _source: FramebufferId, targets: &[ResolveTarget], _width: u32, _height: u32) {
        if !targets.is_empty() {
            gfx_warn!("altai::backend", "MSAA resolve not supported by the baseline backend");
        }
    }
}

// ============================================================================
// Extended backend
// ============================================================================

/// WebGL 2 / GLES 3 class backend
#[derive(Debug, Default)]
pub struct ExtendedBackend;

impl ExtendedBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for ExtendedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Extended
    }

    fn max_color_attachments(&self) -> usize {
        MAX_COLOR_ATTACHMENTS
    }

    fn supports_msaa(&self) -> bool {
        true
    }

    fn supports_instancing(&self) -> bool {
        true
    }

    fn supports_volume_textures(&self) -> bool {
        true
    }

    fn bind_framebuffer(&self, driver: &mut dyn Driver, framebuffer: Option<FramebufferId>) {
        driver.bind_framebuffer(FramebufferTarget::Both, framebuffer);
    }

    fn set_draw_targets(&self, driver: &mut dyn Driver, count: usize) {
        driver.draw_buffers(count as u32);
    }

    fn clear_color_attachment(&self, driver: &mut dyn Driver, index: u32, color: [f32; 4]) {
        driver.clear_color_buffer(index, color);
    }

    fn set_vertex_divisor(&self, driver: &mut dyn Driver, slot: u32, divisor: u32) {
        driver.vertex_attrib_divisor(slot, divisor);
    }

    fn draw_instanced(&self, driver: &mut dyn Driver, primitive: PrimitiveType, range: DrawRange, instances: u32) {
        match range {
            DrawRange::Vertices { first, count } => {
                driver.draw_arrays_instanced(primitive, first, count, instances)
            }
            DrawRange::Indices { format, byte_offset, count } => {
                driver.draw_elements_instanced(primitive, count, format, byte_offset, instances)
            }
        }
    }

    fn resolve(&self, driver: &mut dyn Driver, source: FramebufferId, targets: &[ResolveTarget], width: u32, height: u32) {
        if targets.is_empty() {
            return;
        }
        driver.bind_framebuffer(FramebufferTarget::Read, Some(source));
        for target in targets {
            driver.read_buffer(target.attachment);
            driver.bind_framebuffer(FramebufferTarget::Draw, Some(target.framebuffer));
            driver.blit_framebuffer(width, height);
        }
        driver.bind_framebuffer(FramebufferTarget::Both, None);
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
