/*!
# altai gfx

A low-level GPU rendering layer over an immediate-mode graphics driver.

The application describes *what* to render (buffers, textures, shaders,
pipelines, passes and draw states) and the layer turns it into the minimal
stream of driver calls: render state is diffed against a shadow copy, vertex
layouts are resolved once per pipeline, and offscreen passes own their
framebuffers and MSAA resolve targets.

## Architecture

- **Driver**: GL-like immediate-mode interface (implemented by `altai_gfx_driver_glow`)
- **Backend**: baseline (WebGL 1 class) or extended (WebGL 2 class) capabilities
- **ResourceRegistry**: buffers, textures, shaders and pipelines behind typed keys
- **RenderStateCache**: per-instance shadow of the fixed-function state
- **Pass**: framebuffer lifecycle, pass-begin clears, MSAA resolve
- **DrawDispatcher**: draw-state binding and draw calls
- **Gfx**: the facade tying them together, plus the frame driver
*/

// Internal modules
mod error;
mod config;
mod frame;
mod gfx;
mod surface;
pub mod log;
pub mod render;
pub mod resource;
pub mod state;
pub mod pass;
pub mod draw;

#[cfg(test)]
pub(crate) mod test_utils;

// Main altai namespace module
pub mod altai {
    // Error types
    pub use crate::error::{Error, Result};

    // Layer facade and its configuration
    pub use crate::gfx::Gfx;
    pub use crate::config::{ContextAttributes, GfxConfig, PowerPreference};

    // Host collaborators
    pub use crate::surface::{FixedSurface, Surface};
    pub use crate::frame::{FrameCallback, FramePacer, FrameStats, ManualFramePacer};

    // Logging sub-module (types and logger slot, macros are exported at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
    }

    // Driver interface, backends and shared enums
    pub mod render {
        pub use crate::render::*;
    }

    pub mod resource {
        pub use crate::resource::*;
    }

    pub mod state {
        pub use crate::state::*;
    }

    pub mod pass {
        pub use crate::pass::*;
    }

    pub mod draw {
        pub use crate::draw::*;
    }
}

// Re-export math library at crate root
pub use glam;
