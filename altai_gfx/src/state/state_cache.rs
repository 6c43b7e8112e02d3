/// Render state cache - shadow copy of the driver's fixed-function state
///
/// `apply` compares a target state group by group against the shadow and
/// only issues driver calls for groups that differ. There are 19 groups:
///
/// | # | group                          | driver call                  |
/// |---|--------------------------------|------------------------------|
/// | 1 | depth compare                  | `depth_func`                 |
/// | 2 | depth write                    | `depth_mask`                 |
/// | 3 | stencil enable                 | `set_enabled(StencilTest)`   |
/// | 4 | front stencil func/ref/readmask| `stencil_func(Front)`        |
/// | 5 | back stencil func/ref/readmask | `stencil_func(Back)`         |
/// | 6 | front stencil ops              | `stencil_op(Front)`          |
/// | 7 | back stencil ops               | `stencil_op(Back)`           |
/// | 8 | front stencil write mask       | `stencil_mask(Front)`        |
/// | 9 | back stencil write mask        | `stencil_mask(Back)`         |
/// |10 | blend enable                   | `set_enabled(Blend)`         |
/// |11 | blend factors                  | `blend_func`                 |
/// |12 | blend op                       | `blend_equation`             |
/// |13 | color write mask               | `color_mask`                 |
/// |14 | blend color                    | `blend_color`                |
/// |15 | cull enable                    | `set_enabled(CullFace)`      |
/// |16 | cull face                      | `cull_face`                  |
/// |17 | scissor enable                 | `set_enabled(ScissorTest)`   |
/// |18 | dither enable                  | `set_enabled(Dither)`        |
/// |19 | alpha-to-coverage enable       | `set_enabled(SampleAlphaToCoverage)` |

use crate::render::{Capability, Driver, Face};
use crate::state::{RenderState, StencilFaceState};

/// Number of independently diffed state groups
pub const STATE_GROUP_COUNT: usize = 19;

/// Shadow of the render state last sent to the driver
///
/// Owned by one layer instance. The shadow is only meaningful after a forced
/// application; the layer forces one at initialization and at every
/// pass-begin.
#[derive(Debug, Clone, Default)]
pub struct RenderStateCache {
    shadow: RenderState,
}

impl RenderStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// State the driver is assumed to hold
    pub fn shadow(&self) -> &RenderState {
        &self.shadow
    }

    /// Bring the driver to `target`
    ///
    /// With `force`, every group is issued regardless of the shadow.
    /// Returns the number of groups sent to the driver.
    pub fn apply(&mut self, driver: &mut dyn Driver, target: &RenderState, force: bool) -> usize {
        let mut changes = 0;

        // ----- depth -----
        let ds = &target.depth_stencil;
        let cur = &mut self.shadow.depth_stencil;
        if force || ds.depth_compare != cur.depth_compare {
            driver.depth_func(ds.depth_compare);
            cur.depth_compare = ds.depth_compare;
            changes += 1;
        }
        if force || ds.depth_write_enable != cur.depth_write_enable {
            driver.depth_mask(ds.depth_write_enable);
            cur.depth_write_enable = ds.depth_write_enable;
            changes += 1;
        }

        // ----- stencil -----
        if force || ds.stencil_enable != cur.stencil_enable {
            driver.set_enabled(Capability::StencilTest, ds.stencil_enable);
            cur.stencil_enable = ds.stencil_enable;
            changes += 1;
        }
        changes += apply_stencil_func(driver, Face::Front, &ds.front, &mut cur.front, force);
        changes += apply_stencil_func(driver, Face::Back, &ds.back, &mut cur.back, force);
        changes += apply_stencil_ops(driver, Face::Front, &ds.front, &mut cur.front, force);
        changes += apply_stencil_ops(driver, Face::Back, &ds.back, &mut cur.back, force);
        changes += apply_stencil_write_mask(driver, Face::Front, &ds.front, &mut cur.front, force);
        changes += apply_stencil_write_mask(driver, Face::Back, &ds.back, &mut cur.back, force);

        // ----- blend -----
        let blend = &target.blend;
        let cur = &mut self.shadow.blend;
        if force || blend.enabled != cur.enabled {
            driver.set_enabled(Capability::Blend, blend.enabled);
            cur.enabled = blend.enabled;
            changes += 1;
        }
        if force
            || blend.src_factor_rgb != cur.src_factor_rgb
            || blend.dst_factor_rgb != cur.dst_factor_rgb
            || blend.src_factor_alpha != cur.src_factor_alpha
            || blend.dst_factor_alpha != cur.dst_factor_alpha
        {
            driver.blend_func(
                blend.src_factor_rgb,
                blend.dst_factor_rgb,
                blend.src_factor_alpha,
                blend.dst_factor_alpha,
            );
            cur.src_factor_rgb = blend.src_factor_rgb;
            cur.dst_factor_rgb = blend.dst_factor_rgb;
            cur.src_factor_alpha = blend.src_factor_alpha;
            cur.dst_factor_alpha = blend.dst_factor_alpha;
            changes += 1;
        }
        if force || blend.op_rgb != cur.op_rgb || blend.op_alpha != cur.op_alpha {
            driver.blend_equation(blend.op_rgb, blend.op_alpha);
            cur.op_rgb = blend.op_rgb;
            cur.op_alpha = blend.op_alpha;
            changes += 1;
        }
        if force || blend.color_write_mask != cur.color_write_mask {
            driver.color_mask(blend.color_write_mask);
            cur.color_write_mask = blend.color_write_mask;
            changes += 1;
        }
        if force || blend.blend_color != cur.blend_color {
            driver.blend_color(blend.blend_color);
            cur.blend_color = blend.blend_color;
            changes += 1;
        }

        // ----- rasterizer -----
        let raster = &target.rasterizer;
        let cur = &mut self.shadow.rasterizer;
        if force || raster.cull_enable != cur.cull_enable {
            driver.set_enabled(Capability::CullFace, raster.cull_enable);
            cur.cull_enable = raster.cull_enable;
            changes += 1;
        }
        if force || raster.cull_face != cur.cull_face {
            driver.cull_face(raster.cull_face);
            cur.cull_face = raster.cull_face;
            changes += 1;
        }
        if force || raster.scissor_test_enable != cur.scissor_test_enable {
            driver.set_enabled(Capability::ScissorTest, raster.scissor_test_enable);
            cur.scissor_test_enable = raster.scissor_test_enable;
            changes += 1;
        }
        if force || raster.dither_enable != cur.dither_enable {
            driver.set_enabled(Capability::Dither, raster.dither_enable);
            cur.dither_enable = raster.dither_enable;
            changes += 1;
        }
        if force || raster.alpha_to_coverage_enable != cur.alpha_to_coverage_enable {
            driver.set_enabled(Capability::SampleAlphaToCoverage, raster.alpha_to_coverage_enable);
            cur.alpha_to_coverage_enable = raster.alpha_to_coverage_enable;
            changes += 1;
        }

        changes
    }
}

fn apply_stencil_func(
    driver: &mut dyn Driver,
    face: Face,
    target: &StencilFaceState,
    shadow: &mut StencilFaceState,
    force: bool,
) -> usize {
    if force
        || target.compare != shadow.compare
        || target.reference != shadow.reference
        || target.read_mask != shadow.read_mask
    {
        driver.stencil_func(face, target.compare, target.reference, target.read_mask);
        shadow.compare = target.compare;
        shadow.reference = target.reference;
        shadow.read_mask = target.read_mask;
        1
    } else {
        0
    }
}

fn apply_stencil_ops(
    driver: &mut dyn Driver,
    face: Face,
    target: &StencilFaceState,
    shadow: &mut StencilFaceState,
    force: bool,
) -> usize {
    if force
        || target.fail_op != shadow.fail_op
        || target.depth_fail_op != shadow.depth_fail_op
        || target.pass_op != shadow.pass_op
    {
        driver.stencil_op(face, target.fail_op, target.depth_fail_op, target.pass_op);
        shadow.fail_op = target.fail_op;
        shadow.depth_fail_op = target.depth_fail_op;
        shadow.pass_op = target.pass_op;
        1
    } else {
        0
    }
}

fn apply_stencil_write_mask(
    driver: &mut dyn Driver,
    face: Face,
    target: &StencilFaceState,
    shadow: &mut StencilFaceState,
    force: bool,
) -> usize {
    if force || target.write_mask != shadow.write_mask {
        driver.stencil_mask(face, target.write_mask);
        shadow.write_mask = target.write_mask;
        1
    } else {
        0
    }
}

#[cfg(test)]
#[path = "state_cache_tests.rs"]
mod tests;
