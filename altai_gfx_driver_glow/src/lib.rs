/*!
# altai gfx - glow driver

OpenGL, OpenGL ES and WebGL implementation of the altai_gfx `Driver` trait,
built on the glow bindings, plus winit host integration.

The host creates the GL context (glutin, a web canvas, SDL...) and hands
the resulting `glow::Context` to `GlowDriver::new`. The context must stay
current on the thread that drives the `Gfx` instance.
*/

use std::sync::Arc;
use altai_gfx::altai::{Gfx, GfxConfig, Result};
use winit::window::Window;

mod glow_format;
mod glow_driver;
mod winit_surface;

pub use glow_driver::GlowDriver;
pub use winit_surface::{WinitFramePacer, WinitSurface};

// Re-export glow so hosts build their context with the same version
pub use glow;

/// Create a `Gfx` instance rendering into a winit window
///
/// The driver's context is checked against the configured drawing-buffer
/// attributes first; missing buffers are logged as warnings.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use altai_gfx::altai::GfxConfig;
/// use altai_gfx_driver_glow::{create_gfx, GlowDriver};
/// # fn run(gl: altai_gfx_driver_glow::glow::Context, window: Arc<winit::window::Window>) -> altai_gfx::altai::Result<()> {
/// let (mut gfx, pacer) = create_gfx(GfxConfig::default(), GlowDriver::new(gl)?, window)?;
/// gfx.commit_frame(|| {});
/// # let _ = pacer;
/// # Ok(())
/// # }
/// ```
pub fn create_gfx(config: GfxConfig, driver: GlowDriver, window: Arc<Window>) -> Result<(Gfx, WinitFramePacer)> {
    driver.check_context_attributes(&config.context_attributes());
    let surface = WinitSurface::new(Arc::clone(&window), config.high_dpi);
    let pacer = WinitFramePacer::new(window);
    let gfx = Gfx::new(config, driver, surface, pacer.clone())?;
    Ok((gfx, pacer))
}
