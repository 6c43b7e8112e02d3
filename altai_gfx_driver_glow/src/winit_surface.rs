/// winit host integration - window surface and redraw-driven frame pacing

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::window::Window;
use altai_gfx::altai::{FrameCallback, FramePacer, Surface};
use altai_gfx::{gfx_debug, gfx_warn};

/// Surface backed by a winit window
///
/// With `high_dpi` the size is the window's physical pixel size, otherwise
/// its logical size (physical size divided by the scale factor).
pub struct WinitSurface {
    window: Arc<Window>,
    high_dpi: bool,
}

impl WinitSurface {
    pub fn new(window: Arc<Window>, high_dpi: bool) -> Self {
        Self { window, high_dpi }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    fn pixel_size(&self) -> (u32, u32) {
        let physical = self.window.inner_size();
        if self.high_dpi {
            (physical.width, physical.height)
        } else {
            let logical: LogicalSize<u32> = physical.to_logical(self.window.scale_factor());
            (logical.width, logical.height)
        }
    }
}

impl Surface for WinitSurface {
    fn width(&self) -> u32 {
        self.pixel_size().0
    }

    fn height(&self) -> u32 {
        self.pixel_size().1
    }

    fn resize(&mut self, width: u32, height: u32) {
        let granted = if self.high_dpi {
            self.window.request_inner_size(PhysicalSize::new(width, height))
        } else {
            self.window.request_inner_size(LogicalSize::new(width, height))
        };
        match granted {
            Some(size) => gfx_debug!("altai::winit", "window resized to {}x{}", size.width, size.height),
            None => gfx_debug!("altai::winit", "window resize to {}x{} requested", width, height),
        }
    }
}

/// Frame pacer driven by winit redraw requests
///
/// `request_frame` stores the callback and asks the window for a redraw;
/// the host forwards its window events to `handle_event`, which runs the
/// callback on `RedrawRequested`. Clones share the pending callback.
#[derive(Clone)]
pub struct WinitFramePacer {
    window: Arc<Window>,
    pending: Rc<RefCell<Option<FrameCallback>>>,
}

impl WinitFramePacer {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window, pending: Rc::new(RefCell::new(None)) }
    }

    /// Whether a frame callback waits for the next redraw
    pub fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Run the pending callback when `event` is a redraw; returns whether one ran
    pub fn handle_event(&self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::RedrawRequested => self.run_pending(),
            _ => false,
        }
    }

    /// Run the pending callback now; returns whether one ran
    pub fn run_pending(&self) -> bool {
        // Taken before running, the callback may request the next frame
        let callback = self.pending.borrow_mut().take();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl FramePacer for WinitFramePacer {
    fn request_frame(&mut self, callback: FrameCallback) {
        if self.pending.borrow_mut().replace(callback).is_some() {
            gfx_warn!("altai::winit", "frame requested twice before a redraw, previous callback dropped");
        }
        self.window.request_redraw();
    }
}
