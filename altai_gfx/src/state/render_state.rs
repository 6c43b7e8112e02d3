/// Render state - every driver-visible fixed-function value a pipeline bakes

use crate::render::{BlendFactor, BlendOp, ColorMask, CompareFunc, Face, StencilOp};

// ===== DEPTH/STENCIL STATE =====

/// Stencil state of one polygon face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilFaceState {
    /// Comparison function
    pub compare: CompareFunc,
    /// Action on stencil test fail
    pub fail_op: StencilOp,
    /// Action on stencil pass + depth fail
    pub depth_fail_op: StencilOp,
    /// Action on stencil pass + depth pass
    pub pass_op: StencilOp,
    /// Bits of the stencil buffer read for compare
    pub read_mask: u32,
    /// Bits of the stencil buffer written
    pub write_mask: u32,
    /// Reference value for compare/replace
    pub reference: u32,
}

impl Default for StencilFaceState {
    fn default() -> Self {
        Self {
            compare: CompareFunc::Always,
            fail_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            pass_op: StencilOp::Keep,
            read_mask: 0xFF,
            write_mask: 0xFF,
            reference: 0,
        }
    }
}

/// Depth and stencil testing state
///
/// Depth testing itself is always enabled by the layer; `depth_compare =
/// Always` is how a pipeline opts out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilState {
    /// Depth comparison function
    pub depth_compare: CompareFunc,
    /// Enable writing to the depth buffer
    pub depth_write_enable: bool,
    /// Enable stencil testing
    pub stencil_enable: bool,
    /// Stencil state for front faces
    pub front: StencilFaceState,
    /// Stencil state for back faces
    pub back: StencilFaceState,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_compare: CompareFunc::Always,
            depth_write_enable: false,
            stencil_enable: false,
            front: StencilFaceState::default(),
            back: StencilFaceState::default(),
        }
    }
}

// ===== BLEND STATE =====

/// Color blending state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendState {
    /// Enable blending
    pub enabled: bool,
    /// Source color blend factor
    pub src_factor_rgb: BlendFactor,
    /// Destination color blend factor
    pub dst_factor_rgb: BlendFactor,
    /// Source alpha blend factor
    pub src_factor_alpha: BlendFactor,
    /// Destination alpha blend factor
    pub dst_factor_alpha: BlendFactor,
    /// Color blend equation
    pub op_rgb: BlendOp,
    /// Alpha blend equation
    pub op_alpha: BlendOp,
    /// Color write mask
    pub color_write_mask: ColorMask,
    /// Constant color for the BlendColor/BlendAlpha factors
    pub blend_color: [f32; 4],
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            enabled: false,
            src_factor_rgb: BlendFactor::One,
            dst_factor_rgb: BlendFactor::Zero,
            src_factor_alpha: BlendFactor::One,
            dst_factor_alpha: BlendFactor::Zero,
            op_rgb: BlendOp::Add,
            op_alpha: BlendOp::Add,
            color_write_mask: ColorMask::ALL,
            blend_color: [1.0; 4],
        }
    }
}

impl BlendState {
    /// Classic `src * a + dst * (1 - a)` alpha blending
    pub fn alpha_blending() -> Self {
        Self {
            enabled: true,
            src_factor_rgb: BlendFactor::SrcAlpha,
            dst_factor_rgb: BlendFactor::OneMinusSrcAlpha,
            src_factor_alpha: BlendFactor::One,
            dst_factor_alpha: BlendFactor::OneMinusSrcAlpha,
            ..Self::default()
        }
    }
}

// ===== RASTERIZER STATE =====

/// Rasterization state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizerState {
    /// Enable face culling
    pub cull_enable: bool,
    /// Culled face
    pub cull_face: Face,
    /// Enable the scissor test
    pub scissor_test_enable: bool,
    /// Dither color values before writing them
    pub dither_enable: bool,
    /// Derive a coverage mask from fragment alpha (multisampled targets)
    pub alpha_to_coverage_enable: bool,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self {
            cull_enable: false,
            cull_face: Face::Back,
            scissor_test_enable: false,
            dither_enable: true,
            alpha_to_coverage_enable: false,
        }
    }
}

// ===== RENDER STATE =====

/// Complete fixed-function state of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderState {
    pub depth_stencil: DepthStencilState,
    pub blend: BlendState,
    pub rasterizer: RasterizerState,
}

impl RenderState {
    /// State forced at pass-begin
    ///
    /// Defaults with every write mask open, so that depth, stencil and all
    /// color channels can be cleared.
    pub fn for_clear() -> Self {
        let mut state = Self::default();
        state.depth_stencil.depth_write_enable = true;
        state.depth_stencil.front.write_mask = 0xFF;
        state.depth_stencil.back.write_mask = 0xFF;
        state.blend.color_write_mask = ColorMask::ALL;
        state
    }

    /// Depth-tested, depth-writing state (`LessEqual`)
    pub fn depth_tested() -> Self {
        let mut state = Self::default();
        state.depth_stencil.depth_compare = CompareFunc::LessEqual;
        state.depth_stencil.depth_write_enable = true;
        state
    }
}
