/// Layer configuration and the context attributes derived from it

use crate::render::BackendKind;

/// Configuration of a `Gfx` instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GfxConfig {
    /// Use the extended (WebGL 2 / GLES 3 class) backend
    pub use_webgl2: bool,
    /// Identifier of the drawable surface
    pub surface_id: String,
    /// New surface width (None = keep the surface's width)
    pub width: Option<u32>,
    /// New surface height (None = keep the surface's height)
    pub height: Option<u32>,
    /// Drawing buffer has an alpha channel
    pub alpha: bool,
    /// Drawing buffer has a depth buffer
    pub depth: bool,
    /// Drawing buffer has a stencil buffer
    pub stencil: bool,
    /// Drawing buffer is anti-aliased
    pub antialias: bool,
    /// Drawing buffer holds pre-multiplied alpha colors
    pub premultiplied_alpha: bool,
    /// Drawing buffer content survives presentation
    pub preserve_drawing_buffer: bool,
    /// Prefer a low-power context over a high-performance one
    pub prefer_low_power: bool,
    /// Fail context creation when performance would be poor
    pub fail_if_major_performance_caveat: bool,
    /// Render at native resolution on high-density displays
    pub high_dpi: bool,
}

impl Default for GfxConfig {
    fn default() -> Self {
        Self {
            use_webgl2: false,
            surface_id: "canvas".to_string(),
            width: None,
            height: None,
            alpha: true,
            depth: true,
            stencil: false,
            antialias: true,
            premultiplied_alpha: true,
            preserve_drawing_buffer: false,
            prefer_low_power: false,
            fail_if_major_performance_caveat: false,
            high_dpi: false,
        }
    }
}

impl GfxConfig {
    /// Backend feature level selected by `use_webgl2`
    pub fn backend_kind(&self) -> BackendKind {
        if self.use_webgl2 {
            BackendKind::Extended
        } else {
            BackendKind::Baseline
        }
    }

    /// Attributes a surface provider should create its context with
    pub fn context_attributes(&self) -> ContextAttributes {
        ContextAttributes {
            alpha: self.alpha,
            depth: self.depth,
            stencil: self.stencil,
            antialias: self.antialias,
            premultiplied_alpha: self.premultiplied_alpha,
            preserve_drawing_buffer: self.preserve_drawing_buffer,
            power_preference: if self.prefer_low_power {
                PowerPreference::LowPower
            } else {
                PowerPreference::HighPerformance
            },
            fail_if_major_performance_caveat: self.fail_if_major_performance_caveat,
        }
    }
}

/// GPU power preference of a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerPreference {
    LowPower,
    HighPerformance,
}

/// Drawing-buffer attributes for context creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextAttributes {
    pub alpha: bool,
    pub depth: bool,
    pub stencil: bool,
    pub antialias: bool,
    pub premultiplied_alpha: bool,
    pub preserve_drawing_buffer: bool,
    pub power_preference: PowerPreference,
    pub fail_if_major_performance_caveat: bool,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
