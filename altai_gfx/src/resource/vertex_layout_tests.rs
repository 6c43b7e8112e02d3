//! Unit tests for vertex_layout.rs
//!
//! Tests the format size table, layout stride/offset math and the
//! attribute resolver.

use rustc_hash::FxHashMap;
use serial_test::serial;
use crate::render::StepFunc;
use crate::resource::{
    resolve_attributes, AttributeBinding, ScalarType, VertexFormat, VertexLayout,
    MAX_VERTEX_ATTRIBUTES,
};
use crate::test_utils::CaptureLogger;

fn shader_attributes(names: &[(&str, u32)]) -> FxHashMap<String, u32> {
    names.iter().map(|(name, slot)| (name.to_string(), *slot)).collect()
}

// ============================================================================
// FORMAT TABLE
// ============================================================================

#[test]
fn test_vertex_format_byte_sizes() {
    let table = [
        (VertexFormat::Float, 4),
        (VertexFormat::Float2, 8),
        (VertexFormat::Float3, 12),
        (VertexFormat::Float4, 16),
        (VertexFormat::Byte4, 4),
        (VertexFormat::Byte4N, 4),
        (VertexFormat::UByte4, 4),
        (VertexFormat::UByte4N, 4),
        (VertexFormat::Short2, 4),
        (VertexFormat::Short2N, 4),
        (VertexFormat::Short4, 8),
        (VertexFormat::Short4N, 8),
        (VertexFormat::Int10_2N, 4),
        (VertexFormat::UInt10_2N, 4),
    ];
    for (format, size) in table {
        assert_eq!(format.byte_size(), size, "{:?}", format);
    }
}

#[test]
fn test_vertex_format_component_info() {
    assert_eq!(VertexFormat::Float3.component_count(), 3);
    assert_eq!(VertexFormat::Short2N.component_count(), 2);
    assert_eq!(VertexFormat::UByte4N.component_count(), 4);

    assert_eq!(VertexFormat::Float2.scalar_type(), ScalarType::Float);
    assert_eq!(VertexFormat::Byte4.scalar_type(), ScalarType::Byte);
    assert_eq!(VertexFormat::UByte4N.scalar_type(), ScalarType::UnsignedByte);
    assert_eq!(VertexFormat::Short4N.scalar_type(), ScalarType::Short);
    assert_eq!(VertexFormat::Int10_2N.scalar_type(), ScalarType::Int2_10_10_10Rev);
    assert_eq!(VertexFormat::UInt10_2N.scalar_type(), ScalarType::UnsignedInt2_10_10_10Rev);
    assert_eq!(VertexFormat::UInt10_2N.component_count(), 4);

    assert!(VertexFormat::UByte4N.is_normalized());
    assert!(!VertexFormat::UByte4.is_normalized());
    assert!(!VertexFormat::Float4.is_normalized());
    assert!(VertexFormat::Int10_2N.is_normalized());
    assert!(VertexFormat::UInt10_2N.is_normalized());
}

// ============================================================================
// LAYOUT MATH
// ============================================================================

#[test]
fn test_layout_float3_float4_size_and_offsets() {
    let layout = VertexLayout::new([("position", VertexFormat::Float3), ("color0", VertexFormat::Float4)]);

    assert_eq!(layout.byte_size(), 28);
    assert_eq!(layout.component_offset(0), Some(0));
    assert_eq!(layout.component_offset(1), Some(12));
    assert_eq!(layout.component_offset(2), None);
}

#[test]
fn test_layout_packed_normal_offsets() {
    let layout = VertexLayout::new([
        ("position", VertexFormat::Float3),
        ("normal", VertexFormat::Int10_2N),
        ("tangent", VertexFormat::UInt10_2N),
    ]);

    assert_eq!(layout.byte_size(), 20);
    assert_eq!(layout.component_offset(1), Some(12));
    assert_eq!(layout.component_offset(2), Some(16));
}

#[test]
fn test_layout_step_function() {
    let per_vertex = VertexLayout::new([("position", VertexFormat::Float3)]);
    assert_eq!(per_vertex.step_func, StepFunc::PerVertex);
    assert_eq!(per_vertex.divisor(), 0);

    let per_instance = VertexLayout::new([("offset", VertexFormat::Float2)]).per_instance(3);
    assert_eq!(per_instance.step_func, StepFunc::PerInstance);
    assert_eq!(per_instance.divisor(), 3);

    let zero_rate = VertexLayout::new([("offset", VertexFormat::Float2)]).per_instance(0);
    assert_eq!(zero_rate.divisor(), 1);
}

// ============================================================================
// RESOLVER
// ============================================================================

#[test]
fn test_resolve_maps_names_to_shader_slots() {
    let layouts = vec![
        VertexLayout::new([
            ("position", VertexFormat::Float3),
            ("color0", VertexFormat::UByte4N),
            ("texcoord0", VertexFormat::Short2),
        ]),
        VertexLayout::new([("instance_pos", VertexFormat::Float4)]).per_instance(1),
    ];
    let attributes = shader_attributes(&[("position", 2), ("color0", 0), ("texcoord0", 5), ("instance_pos", 1)]);

    let bindings = resolve_attributes(&layouts, &attributes);

    assert_eq!(bindings[2], AttributeBinding {
        enabled: true,
        buffer_index: 0,
        stride: 20,
        offset: 0,
        components: 3,
        scalar_type: ScalarType::Float,
        normalized: false,
        divisor: 0,
    });
    assert_eq!(bindings[0].offset, 12);
    assert_eq!(bindings[0].scalar_type, ScalarType::UnsignedByte);
    assert!(bindings[0].normalized);
    assert_eq!(bindings[5].offset, 16);
    assert_eq!(bindings[5].components, 2);
    assert_eq!(bindings[1].buffer_index, 1);
    assert_eq!(bindings[1].stride, 16);
    assert_eq!(bindings[1].divisor, 1);

    let enabled = bindings.iter().filter(|b| b.enabled).count();
    assert_eq!(enabled, 4);
    assert_eq!(bindings.len(), MAX_VERTEX_ATTRIBUTES);
}

#[test]
#[serial]
fn test_resolve_attribute_miss_leaves_slot_disabled() {
    let logger = CaptureLogger::install();
    let layouts = vec![VertexLayout::new([("position", VertexFormat::Float3), ("normal", VertexFormat::Float3)])];
    let attributes = shader_attributes(&[("position", 0)]);

    let bindings = resolve_attributes(&layouts, &attributes);

    assert!(bindings[0].enabled);
    assert_eq!(bindings[0].stride, 24);
    assert!(bindings[1..].iter().all(|b| !b.enabled));
    assert!(logger.has_warning("vertex attribute 'normal' (layout 0) not found in shader"));
}

#[test]
#[serial]
fn test_resolve_out_of_range_and_duplicate_slots() {
    let logger = CaptureLogger::install();
    let layouts = vec![
        VertexLayout::new([("a", VertexFormat::Float), ("far", VertexFormat::Float)]),
        VertexLayout::new([("a", VertexFormat::Float2)]),
    ];
    let attributes = shader_attributes(&[("a", 3), ("far", 16)]);

    let bindings = resolve_attributes(&layouts, &attributes);

    assert!(bindings[3].enabled);
    assert_eq!(bindings[3].buffer_index, 0);
    assert_eq!(bindings.iter().filter(|b| b.enabled).count(), 1);
    assert!(logger.has_warning("vertex attribute 'far' uses slot 16"));
    assert!(logger.has_warning("vertex attribute 'a' bound twice (slot 3)"));
}

#[test]
fn test_resolve_without_layouts_disables_everything() {
    let bindings = resolve_attributes(&[], &shader_attributes(&[("position", 0)]));
    assert!(bindings.iter().all(|b| *b == AttributeBinding::DISABLED));
}
