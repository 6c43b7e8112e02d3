//! Unit tests for the Gfx facade
//!
//! Drives complete frames through the mock driver and checks the driver
//! traffic each layer operation produces.
//!
//! Tests that inspect warnings install the process-wide capture logger and
//! are marked #[serial].

use std::cell::Cell;
use std::rc::Rc;
use glam::{Mat4, Vec4};
use serial_test::serial;
use crate::altai::{FixedSurface, Gfx, GfxConfig, ManualFramePacer};
use crate::draw::UniformValue;
use crate::error::Error;
use crate::frame::FrameStats;
use crate::pass::PassDesc;
use crate::render::mock_driver::{clear, recorded, CallLog, DriverCall, MockDriver};
use crate::render::{
    BackendKind, BufferKind, Capability, ClearFlags, FramebufferTarget, IndexFormat, LoadAction,
    PrimitiveType, TextureType, UniformLocation, Usage,
};
use crate::resource::{
    BufferDesc, BufferKey, PipelineDesc, PipelineKey, ShaderDesc, TextureDesc, VertexFormat,
    VertexLayout, MAX_VERTEX_ATTRIBUTES,
};
use crate::state::{BlendState, RenderState, STATE_GROUP_COUNT};
use crate::test_utils::CaptureLogger;

// ============================================================================
// TEST HELPERS
// ============================================================================

const VS: &str = "
    attribute vec3 position;
    attribute vec4 color0;
    uniform mat4 mvp;
    uniform vec4 tint;
    void main() {}
";

const FS: &str = "
    uniform sampler2D tex;
    uniform sampler2D normal_map;
    void main() {}
";

struct Harness {
    gfx: Gfx,
    log: CallLog,
    pacer: ManualFramePacer,
}

fn harness_with(config: GfxConfig) -> Harness {
    let driver = MockDriver::new();
    let log = driver.call_log();
    let pacer = ManualFramePacer::new();
    let gfx = Gfx::new(config, driver, FixedSurface::new(640, 480), pacer.clone()).unwrap();
    Harness { gfx, log, pacer }
}

fn harness(kind: BackendKind) -> Harness {
    harness_with(GfxConfig { use_webgl2: kind == BackendKind::Extended, ..GfxConfig::default() })
}

fn vertex_layout() -> VertexLayout {
    VertexLayout::new([("position", VertexFormat::Float3), ("color0", VertexFormat::Float4)])
}

fn triangle_buffer(gfx: &mut Gfx) -> BufferKey {
    let vertices: [f32; 21] = [
        0.0, 0.5, 0.5, 1.0, 0.0, 0.0, 1.0,
        0.5, -0.5, 0.5, 0.0, 1.0, 0.0, 1.0,
        -0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 1.0,
    ];
    gfx.make_buffer_with_data(BufferKind::Vertex, Usage::Immutable, &vertices).unwrap()
}

fn pipeline(gfx: &mut Gfx, layouts: Vec<VertexLayout>, index_format: IndexFormat) -> PipelineKey {
    let shader = gfx.make_shader(&ShaderDesc::new(VS, FS)).unwrap();
    gfx.make_pipeline(PipelineDesc::new(shader, layouts).with_index_format(index_format)).unwrap()
}

fn draws(log: &CallLog) -> Vec<DriverCall> {
    recorded(log).into_iter().filter(|call| call.is_draw()).collect()
}

// ============================================================================
// INITIALIZATION
// ============================================================================

#[test]
fn test_init_enables_depth_and_forces_default_state() {
    let h = harness(BackendKind::Baseline);
    let calls = recorded(&h.log);

    assert_eq!(calls[0], DriverCall::SetEnabled(Capability::DepthTest, true));
    assert!(calls[1..20].iter().all(|call| call.is_render_state()));
    assert_eq!(calls[20], DriverCall::Viewport { x: 0, y: 0, width: 640, height: 480 });
    assert_eq!(calls.len(), 21);
    assert_eq!(h.gfx.render_state(), &RenderState::default());
    assert_eq!(h.gfx.backend_kind(), BackendKind::Baseline);
    assert_eq!(h.gfx.surface_size(), (640, 480));
}

#[test]
fn test_init_selects_extended_backend() {
    let h = harness(BackendKind::Extended);
    assert_eq!(h.gfx.backend_kind(), BackendKind::Extended);
    assert!(h.gfx.config().use_webgl2);
}

#[test]
fn test_init_resizes_surface_when_configured() {
    let h = harness_with(GfxConfig { width: Some(1024), ..GfxConfig::default() });
    assert_eq!(h.gfx.surface_size(), (1024, 480));
    assert!(recorded(&h.log).contains(&DriverCall::Viewport { x: 0, y: 0, width: 1024, height: 480 }));
}

#[test]
fn test_init_empty_surface_fails() {
    let result = Gfx::new(GfxConfig::default(), MockDriver::new(), FixedSurface::new(0, 0), ManualFramePacer::new());
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
}

// ============================================================================
// DRAWING
// ============================================================================

#[test]
fn test_triangle_frame() {
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::None);
    let pass = h.gfx.make_pass(&PassDesc::default_pass()).unwrap();
    let draw_state = h.gfx.make_draw_state(pip, &[buffer], None);

    h.gfx.begin_pass(&pass);
    h.gfx.apply_draw_state(&draw_state);
    h.gfx.draw(0, 3, 1);
    h.gfx.end_pass();

    assert_eq!(draws(&h.log), vec![DriverCall::DrawArrays { primitive: PrimitiveType::Triangles, first: 0, count: 3 }]);
    let stats = h.gfx.stats();
    assert_eq!(stats.draw_calls, 1);
    assert_eq!(stats.passes, 1);
    assert_eq!(stats.state_changes, STATE_GROUP_COUNT as u32 + 1);
}

#[test]
fn test_indexed_draw_byte_offset() {
    let mut h = harness(BackendKind::Baseline);
    let vertices = triangle_buffer(&mut h.gfx);
    let indices = h.gfx.make_buffer_with_data(BufferKind::Index, Usage::Immutable, &[0u16, 1, 2, 2, 1, 0, 0, 1]).unwrap();
    let index_handle = h.gfx.registry().buffer(indices).unwrap().handle();
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::UInt16);
    let pass = h.gfx.make_pass(&PassDesc::default_pass()).unwrap();
    let draw_state = h.gfx.make_draw_state(pip, &[vertices], Some(indices));

    h.gfx.begin_pass(&pass);
    h.gfx.apply_draw_state(&draw_state);
    h.gfx.draw(2, 6, 1);

    assert!(recorded(&h.log).contains(&DriverCall::BindBuffer(BufferKind::Index, Some(index_handle))));
    assert_eq!(draws(&h.log), vec![DriverCall::DrawElements {
        primitive: PrimitiveType::Triangles,
        count: 6,
        index_format: IndexFormat::UInt16,
        byte_offset: 4,
    }]);
}

#[test]
fn test_indexed_draw_32_bit_offset() {
    let mut h = harness(BackendKind::Baseline);
    let vertices = triangle_buffer(&mut h.gfx);
    let indices = h.gfx.make_buffer_with_data(BufferKind::Index, Usage::Immutable, &[0u32, 1, 2, 0, 1, 2]).unwrap();
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::UInt32);
    let pass = h.gfx.make_pass(&PassDesc::default_pass()).unwrap();

    h.gfx.begin_pass(&pass);
    h.gfx.apply_draw_state(&h.gfx.make_draw_state(pip, &[vertices], Some(indices)));
    h.gfx.draw(3, 3, 1);

    assert_eq!(draws(&h.log), vec![DriverCall::DrawElements {
        primitive: PrimitiveType::Triangles,
        count: 3,
        index_format: IndexFormat::UInt32,
        byte_offset: 12,
    }]);
}

#[test]
#[serial]
fn test_indexed_draw_offset_overflow_is_skipped() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Baseline);
    let vertices = triangle_buffer(&mut h.gfx);
    let indices = h.gfx.make_buffer_with_data(BufferKind::Index, Usage::Immutable, &[0u32, 1, 2]).unwrap();
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::UInt32);
    let pass = h.gfx.make_pass(&PassDesc::default_pass()).unwrap();

    h.gfx.begin_pass(&pass);
    h.gfx.apply_draw_state(&h.gfx.make_draw_state(pip, &[vertices], Some(indices)));
    h.gfx.draw(0x4000_0000, 3, 1);
    h.gfx.draw(0x2000_0000, 3, 1);

    assert!(draws(&h.log).is_empty());
    assert_eq!(h.gfx.stats().draw_calls, 0);
    assert!(logger.has_warning("overflows the index byte offset"));
}

#[test]
#[serial]
fn test_indexed_draw_without_index_buffer_is_skipped() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Baseline);
    let vertices = triangle_buffer(&mut h.gfx);
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::UInt16);
    let pass = h.gfx.make_pass(&PassDesc::default_pass()).unwrap();

    h.gfx.begin_pass(&pass);
    clear(&h.log);
    h.gfx.apply_draw_state(&h.gfx.make_draw_state(pip, &[vertices], None));
    h.gfx.draw(0, 3, 1);

    assert!(recorded(&h.log).contains(&DriverCall::BindBuffer(BufferKind::Index, None)));
    assert!(draws(&h.log).is_empty());
    assert!(logger.has_warning("the draw state has no index buffer"));
    assert!(logger.has_warning("indexed draw without a bound index buffer, skipped"));
}

#[test]
#[serial]
fn test_indexed_draw_with_destroyed_index_buffer_is_skipped() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Extended);
    let vertices = triangle_buffer(&mut h.gfx);
    let indices = h.gfx.make_buffer_with_data(BufferKind::Index, Usage::Immutable, &[0u16, 1, 2]).unwrap();
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::UInt16);
    let draw_state = h.gfx.make_draw_state(pip, &[vertices], Some(indices));
    h.gfx.destroy_buffer(indices);

    h.gfx.apply_draw_state(&draw_state);
    h.gfx.draw(0, 3, 4);

    assert!(draws(&h.log).is_empty());
    assert!(logger.has_warning("destroyed index buffer"));
}

#[test]
#[serial]
fn test_index_buffer_with_format_none_warns_and_still_draws() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Baseline);
    let vertices = triangle_buffer(&mut h.gfx);
    let indices = h.gfx.make_buffer_with_data(BufferKind::Index, Usage::Immutable, &[0u16, 1, 2]).unwrap();
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::None);
    let pass = h.gfx.make_pass(&PassDesc::default_pass()).unwrap();

    h.gfx.begin_pass(&pass);
    h.gfx.apply_draw_state(&h.gfx.make_draw_state(pip, &[vertices], Some(indices)));
    h.gfx.draw(0, 3, 1);

    assert!(logger.has_warning("draw state has an index buffer but the pipeline index format is None"));
    assert!(recorded(&h.log).contains(&DriverCall::BindBuffer(BufferKind::Index, None)));
    assert_eq!(draws(&h.log), vec![DriverCall::DrawArrays { primitive: PrimitiveType::Triangles, first: 0, count: 3 }]);
}

#[test]
#[serial]
fn test_attribute_miss_disables_slot() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let layout = VertexLayout::new([("position", VertexFormat::Float3), ("normal", VertexFormat::Float4)]);

    let pip = pipeline(&mut h.gfx, vec![layout], IndexFormat::None);
    assert!(logger.has_warning("vertex attribute 'normal' (layout 0) not found in shader"));

    clear(&h.log);
    h.gfx.apply_draw_state(&h.gfx.make_draw_state(pip, &[buffer], None));

    let calls = recorded(&h.log);
    assert!(calls.contains(&DriverCall::SetVertexAttribEnabled { slot: 0, enabled: true }));
    assert!(calls.contains(&DriverCall::SetVertexAttribEnabled { slot: 1, enabled: false }));
}

#[test]
fn test_apply_draw_state_binds_every_slot() {
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let handle = h.gfx.registry().buffer(buffer).unwrap().handle();
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::None);
    clear(&h.log);

    h.gfx.apply_draw_state(&h.gfx.make_draw_state(pip, &[buffer], None));

    let calls = recorded(&h.log);
    let vertex_binds = calls.iter().filter(|c| matches!(c, DriverCall::BindBuffer(BufferKind::Vertex, _))).count();
    assert_eq!(vertex_binds, 1);
    assert!(calls.contains(&DriverCall::BindBuffer(BufferKind::Vertex, Some(handle))));
    let pointers: Vec<(u32, u32, u32, u32)> = calls
        .iter()
        .filter_map(|c| match c {
            DriverCall::VertexAttribPointer { slot, components, stride, offset, .. } => {
                Some((*slot, *components, *stride, *offset))
            }
            _ => None,
        })
        .collect();
    assert_eq!(pointers, vec![(0, 3, 28, 0), (1, 4, 28, 12)]);
    let disabled = calls
        .iter()
        .filter(|c| matches!(c, DriverCall::SetVertexAttribEnabled { enabled: false, .. }))
        .count();
    assert_eq!(disabled, MAX_VERTEX_ATTRIBUTES - 2);
}

#[test]
fn test_reapplying_draw_state_skips_redundant_calls() {
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::None);
    let draw_state = h.gfx.make_draw_state(pip, &[buffer], None);
    h.gfx.apply_draw_state(&draw_state);
    clear(&h.log);

    h.gfx.apply_draw_state(&draw_state);

    let calls = recorded(&h.log);
    assert!(!calls.iter().any(|c| matches!(c, DriverCall::UseProgram(_))));
    assert!(!calls.iter().any(|c| matches!(c, DriverCall::BindBuffer(BufferKind::Vertex, _))));
    assert!(!calls.iter().any(|c| c.is_render_state()));
}

#[test]
fn test_program_switches_only_between_shaders() {
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let first = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::None);
    let second = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::None);
    clear(&h.log);

    h.gfx.apply_draw_state(&h.gfx.make_draw_state(first, &[buffer], None));
    h.gfx.apply_draw_state(&h.gfx.make_draw_state(first, &[buffer], None));
    h.gfx.apply_draw_state(&h.gfx.make_draw_state(second, &[buffer], None));

    let switches = recorded(&h.log).iter().filter(|c| matches!(c, DriverCall::UseProgram(_))).count();
    assert_eq!(switches, 2);
}

#[test]
fn test_pipeline_render_state_is_diffed() {
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let shader = h.gfx.make_shader(&ShaderDesc::new(VS, FS)).unwrap();
    let state = RenderState { blend: BlendState::alpha_blending(), ..RenderState::default() };
    let pip = h.gfx.make_pipeline(PipelineDesc::new(shader, vec![vertex_layout()]).with_render_state(state)).unwrap();
    clear(&h.log);

    h.gfx.apply_draw_state(&h.gfx.make_draw_state(pip, &[buffer], None));

    let state_calls: Vec<DriverCall> = recorded(&h.log).into_iter().filter(|c| c.is_render_state()).collect();
    assert_eq!(state_calls.len(), 2);
    assert_eq!(state_calls[0], DriverCall::SetEnabled(Capability::Blend, true));
    assert_eq!(h.gfx.render_state().blend, BlendState::alpha_blending());
    assert_eq!(h.gfx.stats().state_changes, 2);
}

#[test]
fn test_textures_bound_to_sequential_units_in_name_order() {
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::None);
    let albedo = h.gfx.make_texture(TextureDesc::new_2d(4, 4)).unwrap();
    let normals = h.gfx.make_texture(TextureDesc::new_2d(4, 4)).unwrap();
    let albedo_image = h.gfx.registry().texture(albedo).unwrap().image();
    let normals_image = h.gfx.registry().texture(normals).unwrap().image();
    let draw_state = h
        .gfx
        .make_draw_state(pip, &[buffer], None)
        .with_texture("tex", albedo)
        .with_texture("normal_map", normals);
    clear(&h.log);

    h.gfx.apply_draw_state(&draw_state);

    let texture_calls: Vec<DriverCall> = recorded(&h.log)
        .into_iter()
        .filter(|c| matches!(c, DriverCall::ActiveTexture(_) | DriverCall::BindTexture(..) | DriverCall::Uniform1i(..)))
        .collect();
    assert_eq!(texture_calls, vec![
        DriverCall::ActiveTexture(0),
        DriverCall::BindTexture(TextureType::Texture2D, Some(normals_image)),
        DriverCall::Uniform1i(UniformLocation(3), 0),
        DriverCall::ActiveTexture(1),
        DriverCall::BindTexture(TextureType::Texture2D, Some(albedo_image)),
        DriverCall::Uniform1i(UniformLocation(2), 1),
    ]);
}

#[test]
#[serial]
fn test_unknown_sampler_is_skipped() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::None);
    let texture = h.gfx.make_texture(TextureDesc::new_2d(2, 2)).unwrap();
    clear(&h.log);

    h.gfx.apply_draw_state(&h.gfx.make_draw_state(pip, &[buffer], None).with_texture("specular", texture));

    assert!(logger.has_warning("sampler 'specular' not found in shader"));
    assert!(!recorded(&h.log).iter().any(|c| matches!(c, DriverCall::BindTexture(..))));
}

// ============================================================================
// UNIFORMS
// ============================================================================

#[test]
#[serial]
fn test_apply_uniforms() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::None);

    h.gfx.apply_uniform("mvp", Mat4::IDENTITY);
    assert!(logger.has_warning("uniform 'mvp' applied without an active draw state"));

    h.gfx.apply_draw_state(&h.gfx.make_draw_state(pip, &[buffer], None));
    clear(&h.log);
    h.gfx.apply_uniform("mvp", Mat4::IDENTITY);
    h.gfx.apply_uniforms(&[
        ("tint", UniformValue::Vec4(Vec4::new(1.0, 0.5, 0.25, 1.0))),
        ("missing", UniformValue::Scalar(1.0)),
    ]);

    assert_eq!(recorded(&h.log), vec![
        DriverCall::UniformMatrix4f(UniformLocation(0), Mat4::IDENTITY.to_cols_array()),
        DriverCall::Uniform4f(UniformLocation(1), [1.0, 0.5, 0.25, 1.0]),
    ]);
    assert!(logger.has_warning("uniform 'missing' not found in shader"));
}

// ============================================================================
// INSTANCING
// ============================================================================

#[test]
fn test_extended_instanced_draw_and_divisors() {
    let mut h = harness(BackendKind::Extended);
    let vertices = triangle_buffer(&mut h.gfx);
    let offsets = h.gfx.make_buffer_with_data(BufferKind::Vertex, Usage::Immutable, &[0.0f32; 40]).unwrap();
    let layouts = vec![
        VertexLayout::new([("position", VertexFormat::Float3)]),
        VertexLayout::new([("color0", VertexFormat::Float4)]).per_instance(1),
    ];
    let pip = pipeline(&mut h.gfx, layouts, IndexFormat::None);
    let pass = h.gfx.make_pass(&PassDesc::default_pass()).unwrap();

    h.gfx.begin_pass(&pass);
    h.gfx.apply_draw_state(&h.gfx.make_draw_state(pip, &[vertices, offsets], None));
    h.gfx.draw(0, 3, 10);

    let calls = recorded(&h.log);
    assert!(calls.contains(&DriverCall::VertexAttribDivisor { slot: 0, divisor: 0 }));
    assert!(calls.contains(&DriverCall::VertexAttribDivisor { slot: 1, divisor: 1 }));
    assert_eq!(draws(&h.log), vec![DriverCall::DrawArraysInstanced {
        primitive: PrimitiveType::Triangles,
        first: 0,
        count: 3,
        instances: 10,
    }]);
    let vertex_binds = calls.iter().filter(|c| matches!(c, DriverCall::BindBuffer(BufferKind::Vertex, _))).count();
    assert_eq!(vertex_binds, 2);
}

#[test]
#[serial]
fn test_baseline_instanced_draw_falls_back_to_single_draw() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::None);
    let pass = h.gfx.make_pass(&PassDesc::default_pass()).unwrap();

    h.gfx.begin_pass(&pass);
    h.gfx.apply_draw_state(&h.gfx.make_draw_state(pip, &[buffer], None));
    h.gfx.draw(0, 3, 5);
    h.gfx.draw(0, 3, 5);

    assert_eq!(draws(&h.log), vec![DriverCall::DrawArrays { primitive: PrimitiveType::Triangles, first: 0, count: 3 }; 2]);
    assert_eq!(logger.count_warnings("instanced drawing (5 instances)"), 1);
    assert_eq!(h.gfx.stats().draw_calls, 2);
}

#[test]
#[serial]
fn test_draw_without_draw_state_is_skipped() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Baseline);
    let pass = h.gfx.make_pass(&PassDesc::default_pass()).unwrap();

    h.gfx.begin_pass(&pass);
    h.gfx.draw(0, 3, 1);

    assert!(draws(&h.log).is_empty());
    assert_eq!(h.gfx.stats().draw_calls, 0);
    assert!(logger.has_warning("draw issued without an active draw state"));
}

// ============================================================================
// PASSES
// ============================================================================

#[test]
fn test_begin_pass_forces_state_every_time() {
    let mut h = harness(BackendKind::Baseline);
    let pass = h.gfx.make_pass(&PassDesc::default_pass()).unwrap();
    clear(&h.log);

    h.gfx.begin_pass(&pass);
    h.gfx.end_pass();
    h.gfx.begin_pass(&pass);
    h.gfx.end_pass();

    let state_calls = recorded(&h.log).iter().filter(|c| c.is_render_state()).count();
    assert_eq!(state_calls, 2 * STATE_GROUP_COUNT);
    assert_eq!(h.gfx.stats().passes, 2);
}

#[test]
fn test_default_pass_color_clear_depth_dont_care() {
    let mut h = harness(BackendKind::Baseline);
    let desc = PassDesc::default_pass().with_clear_color([0.1, 0.2, 0.3, 1.0]).with_depth_action(LoadAction::DontCare);
    let pass = h.gfx.make_pass(&desc).unwrap();
    clear(&h.log);

    h.gfx.begin_pass(&pass);

    let calls = recorded(&h.log);
    assert_eq!(calls[1], DriverCall::Viewport { x: 0, y: 0, width: 640, height: 480 });
    assert_eq!(calls.last(), Some(&DriverCall::Clear {
        flags: ClearFlags::COLOR,
        color: [0.1, 0.2, 0.3, 1.0],
        depth: 1.0,
        stencil: 0,
    }));
}

#[test]
fn test_offscreen_msaa_pass_resolves_at_end() {
    let mut h = harness(BackendKind::Extended);
    let color = h.gfx.make_texture(TextureDesc { sample_count: 4, ..TextureDesc::render_target(128, 64) }).unwrap();
    let pass = h.gfx.make_pass(&PassDesc::offscreen(&[color])).unwrap();
    assert!(pass.status().is_ok());
    clear(&h.log);

    h.gfx.begin_pass(&pass);
    assert!(recorded(&h.log).contains(&DriverCall::Viewport { x: 0, y: 0, width: 128, height: 64 }));
    clear(&h.log);
    h.gfx.end_pass();

    let calls = recorded(&h.log);
    assert_eq!(calls.first(), Some(&DriverCall::BindFramebuffer(FramebufferTarget::Read, pass.framebuffer())));
    assert!(calls.contains(&DriverCall::BlitFramebuffer { width: 128, height: 64 }));

    h.gfx.destroy_pass(pass);
    assert_eq!(
        recorded(&h.log).iter().filter(|c| matches!(c, DriverCall::DeleteFramebuffer(_))).count(),
        2
    );
}

#[test]
#[serial]
fn test_end_pass_without_begin_warns() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Baseline);
    clear(&h.log);

    h.gfx.end_pass();

    assert!(recorded(&h.log).is_empty());
    assert!(logger.has_warning("end_pass without begin_pass"));
}

#[test]
fn test_viewport_and_scissor_rect() {
    let mut h = harness(BackendKind::Baseline);
    clear(&h.log);

    h.gfx.apply_viewport(10, 20, 100, 50);
    h.gfx.apply_scissor_rect(0, 0, 32, 16);

    assert_eq!(recorded(&h.log), vec![
        DriverCall::Viewport { x: 10, y: 20, width: 100, height: 50 },
        DriverCall::Scissor { x: 0, y: 0, width: 32, height: 16 },
    ]);
}

// ============================================================================
// RESOURCES
// ============================================================================

#[test]
fn test_make_buffer_with_data_uses_byte_size() {
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    assert_eq!(h.gfx.registry().buffer(buffer).unwrap().size(), 21 * 4);
}

#[test]
#[serial]
fn test_update_buffer() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Baseline);
    let dynamic = h.gfx.make_buffer(&BufferDesc::empty(BufferKind::Vertex, Usage::Dynamic, 64)).unwrap();
    let immutable = triangle_buffer(&mut h.gfx);

    assert!(h.gfx.update_buffer(dynamic, 0, &[0u8; 32]));
    assert!(!h.gfx.update_buffer(immutable, 0, &[0u8; 4]));
    assert!(logger.has_warning("update of immutable buffer ignored"));

    h.gfx.destroy_buffer(dynamic);
    assert!(!h.gfx.update_buffer(dynamic, 0, &[0u8; 4]));
    assert!(logger.has_warning("update_buffer: unknown buffer"));
}

#[test]
fn test_shader_status() {
    let mut h = harness(BackendKind::Baseline);
    let good = h.gfx.make_shader(&ShaderDesc::new(VS, FS)).unwrap();
    let bad = h.gfx.make_shader(&ShaderDesc::new(VS, "#error missing main")).unwrap();

    assert!(h.gfx.shader_status(good).is_ok());
    assert!(matches!(h.gfx.shader_status(bad), Err(Error::ShaderLinkFailed(_))));
    assert!(!h.gfx.registry().shader(bad).unwrap().is_valid());

    h.gfx.destroy_shader(good);
    assert!(matches!(h.gfx.shader_status(good), Err(Error::InvalidResource(_))));
}

#[test]
#[serial]
fn test_destroyed_pipeline_skips_draws() {
    let logger = CaptureLogger::install();
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let pip = pipeline(&mut h.gfx, vec![vertex_layout()], IndexFormat::None);
    let draw_state = h.gfx.make_draw_state(pip, &[buffer], None);
    h.gfx.apply_draw_state(&draw_state);

    h.gfx.destroy_pipeline(pip);
    h.gfx.draw(0, 3, 1);
    h.gfx.apply_draw_state(&draw_state);
    h.gfx.destroy_pipeline(pip);

    assert!(draws(&h.log).is_empty());
    assert!(logger.has_warning("draw state references an unknown pipeline"));
    assert!(logger.has_warning("destroy_pipeline: unknown pipeline ignored"));
}

#[test]
fn test_destroy_releases_driver_objects() {
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let texture = h.gfx.make_texture(TextureDesc::new_2d(2, 2)).unwrap();
    let buffer_id = h.gfx.registry().buffer(buffer).unwrap().handle();
    let texture_id = h.gfx.registry().texture(texture).unwrap().image();

    h.gfx.destroy_buffer(buffer);
    h.gfx.destroy_texture(texture);

    let calls = recorded(&h.log);
    assert!(calls.contains(&DriverCall::DeleteBuffer(buffer_id)));
    assert!(calls.contains(&DriverCall::DeleteTexture(texture_id)));
    assert!(h.gfx.registry().buffer(buffer).is_none());
}

#[test]
fn test_drop_releases_remaining_resources() {
    let mut h = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut h.gfx);
    let buffer_id = h.gfx.registry().buffer(buffer).unwrap().handle();
    let log = h.log.clone();

    drop(h);

    assert!(recorded(&log).contains(&DriverCall::DeleteBuffer(buffer_id)));
}

// ============================================================================
// FRAME DRIVER
// ============================================================================

#[test]
fn test_commit_frame_schedules_callback_and_resets_stats() {
    let mut h = harness(BackendKind::Baseline);
    let pass = h.gfx.make_pass(&PassDesc::default_pass()).unwrap();
    h.gfx.begin_pass(&pass);
    h.gfx.end_pass();
    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);

    h.gfx.commit_frame(move || flag.set(true));

    assert_eq!(h.gfx.stats(), FrameStats::default());
    assert_eq!(h.gfx.last_frame_stats().passes, 1);
    assert_eq!(h.gfx.last_frame_stats().state_changes, STATE_GROUP_COUNT as u32);
    assert!(!ran.get());
    assert_eq!(h.pacer.run_pending(), 1);
    assert!(ran.get());
}

// ============================================================================
// INSTANCE ISOLATION
// ============================================================================

#[test]
fn test_independent_instances_do_not_share_state() {
    let mut first = harness(BackendKind::Baseline);
    let second = harness(BackendKind::Baseline);
    let buffer = triangle_buffer(&mut first.gfx);
    let shader = first.gfx.make_shader(&ShaderDesc::new(VS, FS)).unwrap();
    let state = RenderState { blend: BlendState::alpha_blending(), ..RenderState::default() };
    let pip = first
        .gfx
        .make_pipeline(PipelineDesc::new(shader, vec![vertex_layout()]).with_render_state(state))
        .unwrap();

    first.gfx.apply_draw_state(&first.gfx.make_draw_state(pip, &[buffer], None));

    assert!(first.gfx.render_state().blend.enabled);
    assert!(!second.gfx.render_state().blend.enabled);
    assert_eq!(second.gfx.registry().pipeline_count(), 0);
}
