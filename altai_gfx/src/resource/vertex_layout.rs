/// Vertex layouts and the vertex layout resolver
///
/// A `VertexLayout` describes one vertex buffer's record structure by
/// attribute *name*. The resolver maps those names onto the attribute slots
/// a linked shader actually exposes, producing one `AttributeBinding` per
/// slot. All stride/offset math goes through `VertexFormat::byte_size`.

use rustc_hash::FxHashMap;
use crate::gfx_warn;
use crate::render::StepFunc;

/// Number of vertex attribute slots
pub const MAX_VERTEX_ATTRIBUTES: usize = 16;

/// Vertex component formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// 32-bit float, single component in X
    Float,
    /// 32-bit floats, 2 components in XY
    Float2,
    /// 32-bit floats, 3 components in XYZ
    Float3,
    /// 32-bit floats, 4 components in XYZW
    Float4,
    /// 4 packed bytes, signed (-128 .. 127)
    Byte4,
    /// 4 packed bytes, signed, normalized (-1.0 .. +1.0)
    Byte4N,
    /// 4 packed bytes, unsigned (0 .. 255)
    UByte4,
    /// 4 packed bytes, unsigned, normalized (0.0 .. 1.0)
    UByte4N,
    /// 2 packed 16-bit shorts, signed
    Short2,
    /// 2 packed 16-bit shorts, signed, normalized
    Short2N,
    /// 4 packed 16-bit shorts, signed
    Short4,
    /// 4 packed 16-bit shorts, signed, normalized
    Short4N,
    /// XYZ in 10 bits each, W in 2 bits, signed, normalized
    Int10_2N,
    /// XYZ in 10 bits each, W in 2 bits, unsigned, normalized
    UInt10_2N,
}

/// Scalar type of a vertex component as seen by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Float,
    Byte,
    UnsignedByte,
    Short,
    /// Packed signed 2_10_10_10 (reversed component order)
    Int2_10_10_10Rev,
    /// Packed unsigned 2_10_10_10 (reversed component order)
    UnsignedInt2_10_10_10Rev,
}

impl VertexFormat {
    /// Size in bytes of one component of this format
    ///
    /// Every new format must be added here, stride and offset
    /// computations depend on nothing else.
    pub fn byte_size(&self) -> u32 {
        match self {
            VertexFormat::Float => 4,
            VertexFormat::Float2 => 8,
            VertexFormat::Float3 => 12,
            VertexFormat::Float4 => 16,
            VertexFormat::Byte4 => 4,
            VertexFormat::Byte4N => 4,
            VertexFormat::UByte4 => 4,
            VertexFormat::UByte4N => 4,
            VertexFormat::Short2 => 4,
            VertexFormat::Short2N => 4,
            VertexFormat::Short4 => 8,
            VertexFormat::Short4N => 8,
            VertexFormat::Int10_2N => 4,
            VertexFormat::UInt10_2N => 4,
        }
    }

    /// Number of scalar components
    pub fn component_count(&self) -> u32 {
        match self {
            VertexFormat::Float => 1,
            VertexFormat::Float2 | VertexFormat::Short2 | VertexFormat::Short2N => 2,
            VertexFormat::Float3 => 3,
            _ => 4,
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            VertexFormat::Float
            | VertexFormat::Float2
            | VertexFormat::Float3
            | VertexFormat::Float4 => ScalarType::Float,
            VertexFormat::Byte4 | VertexFormat::Byte4N => ScalarType::Byte,
            VertexFormat::UByte4 | VertexFormat::UByte4N => ScalarType::UnsignedByte,
            VertexFormat::Short2
            | VertexFormat::Short2N
            | VertexFormat::Short4
            | VertexFormat::Short4N => ScalarType::Short,
            VertexFormat::Int10_2N => ScalarType::Int2_10_10_10Rev,
            VertexFormat::UInt10_2N => ScalarType::UnsignedInt2_10_10_10Rev,
        }
    }

    /// Whether integer data is normalized to [-1, 1] / [0, 1]
    pub fn is_normalized(&self) -> bool {
        matches!(
            self,
            VertexFormat::Byte4N
                | VertexFormat::UByte4N
                | VertexFormat::Short2N
                | VertexFormat::Short4N
                | VertexFormat::Int10_2N
                | VertexFormat::UInt10_2N
        )
    }
}

/// One named component of a vertex record
#[derive(Debug, Clone, PartialEq)]
pub struct VertexComponent {
    /// Attribute name, matched against the shader's vertex inputs
    pub name: String,
    /// Component format
    pub format: VertexFormat,
}

/// Record structure of one vertex buffer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertexLayout {
    /// Components in memory order
    pub components: Vec<VertexComponent>,
    /// Advance per vertex or per instance
    pub step_func: StepFunc,
    /// Instance divisor when stepping per instance
    pub step_rate: u32,
}

impl VertexLayout {
    /// Create a per-vertex layout from (name, format) pairs
    pub fn new<'a, I>(components: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, VertexFormat)>,
    {
        Self {
            components: components
                .into_iter()
                .map(|(name, format)| VertexComponent { name: name.to_string(), format })
                .collect(),
            step_func: StepFunc::PerVertex,
            step_rate: 1,
        }
    }

    /// Step this layout once every `step_rate` instances
    pub fn per_instance(mut self, step_rate: u32) -> Self {
        self.step_func = StepFunc::PerInstance;
        self.step_rate = step_rate;
        self
    }

    /// Size in bytes of one full vertex record
    pub fn byte_size(&self) -> u32 {
        self.components.iter().map(|c| c.format.byte_size()).sum()
    }

    /// Byte offset of component `index` within the record
    pub fn component_offset(&self, index: usize) -> Option<u32> {
        if index >= self.components.len() {
            return None;
        }
        Some(self.components[..index].iter().map(|c| c.format.byte_size()).sum())
    }

    /// Instance divisor fed to the driver (0 = per vertex)
    pub fn divisor(&self) -> u32 {
        match self.step_func {
            StepFunc::PerVertex => 0,
            StepFunc::PerInstance => self.step_rate.max(1),
        }
    }
}

/// Resolved binding of one attribute slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeBinding {
    /// Whether the slot receives data
    pub enabled: bool,
    /// Index of the source vertex buffer (= index of the layout)
    pub buffer_index: usize,
    /// Byte stride between consecutive records
    pub stride: u32,
    /// Byte offset of the component inside a record
    pub offset: u32,
    /// Number of scalar components
    pub components: u32,
    /// Scalar type of the components
    pub scalar_type: ScalarType,
    /// Integer normalization
    pub normalized: bool,
    /// Instance divisor (0 = per vertex)
    pub divisor: u32,
}

impl AttributeBinding {
    /// A slot that receives no data
    pub const DISABLED: Self = Self {
        enabled: false,
        buffer_index: 0,
        stride: 0,
        offset: 0,
        components: 0,
        scalar_type: ScalarType::Float,
        normalized: false,
        divisor: 0,
    };
}

impl Default for AttributeBinding {
    fn default() -> Self {
        Self::DISABLED
    }
}

/// Resolve vertex layouts against a shader's attribute table (name -> slot)
///
/// Components without a matching shader attribute are skipped with a warning;
/// their slots stay disabled.
pub fn resolve_attributes(
    layouts: &[VertexLayout],
    shader_attributes: &FxHashMap<String, u32>,
) -> [AttributeBinding; MAX_VERTEX_ATTRIBUTES] {
    let mut bindings = [AttributeBinding::DISABLED; MAX_VERTEX_ATTRIBUTES];

    for (buffer_index, layout) in layouts.iter().enumerate() {
        let stride = layout.byte_size();
        let divisor = layout.divisor();
        let mut offset = 0;

        for component in &layout.components {
            let component_offset = offset;
            offset += component.format.byte_size();

            let Some(&slot) = shader_attributes.get(&component.name) else {
                gfx_warn!("altai::vertex_layout",
                    "vertex attribute '{}' (layout {}) not found in shader, skipped",
                    component.name, buffer_index);
                continue;
            };
            let slot = slot as usize;
            if slot >= MAX_VERTEX_ATTRIBUTES {
                gfx_warn!("altai::vertex_layout",
                    "vertex attribute '{}' uses slot {} beyond the {} supported slots, skipped",
                    component.name, slot, MAX_VERTEX_ATTRIBUTES);
                continue;
            }
            if bindings[slot].enabled {
                gfx_warn!("altai::vertex_layout",
                    "vertex attribute '{}' bound twice (slot {}), keeping the first binding",
                    component.name, slot);
                continue;
            }

            bindings[slot] = AttributeBinding {
                enabled: true,
                buffer_index,
                stride,
                offset: component_offset,
                components: component.format.component_count(),
                scalar_type: component.format.scalar_type(),
                normalized: component.format.is_normalized(),
                divisor,
            };
        }
    }

    bindings
}

#[cfg(test)]
#[path = "vertex_layout_tests.rs"]
mod tests;
