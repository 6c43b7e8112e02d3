/// Drawable surface - the presentation target handed over by the host

/// Host-provided drawable surface
///
/// The layer only needs the pixel size of the default render target. Hosts
/// that own a resizable window forward the requested size through `resize`.
pub trait Surface {
    /// Current width in pixels
    fn width(&self) -> u32;

    /// Current height in pixels
    fn height(&self) -> u32;

    /// Request a new pixel size (hosts without resize support ignore it)
    fn resize(&mut self, _width: u32, _height: u32) {}

    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// Surface of a fixed, host-managed size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSurface {
    width: u32,
    height: u32,
}

impl FixedSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Surface for FixedSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
