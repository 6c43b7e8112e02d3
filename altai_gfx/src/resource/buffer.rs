/// Buffer resource - vertex and index data

use crate::error::{Error, Result};
use crate::gfx_warn;
use crate::render::{BufferId, BufferKind, Driver, Usage};

/// Descriptor for creating a buffer
#[derive(Debug, Clone, Copy)]
pub struct BufferDesc<'a> {
    /// Vertex or index data
    pub kind: BufferKind,
    /// Whether the buffer can be updated after creation
    pub usage: Usage,
    /// Size in bytes when no initial data is given
    pub size: usize,
    /// Optional initial content (its length defines the buffer size)
    pub data: Option<&'a [u8]>,
}

impl<'a> BufferDesc<'a> {
    /// Immutable vertex buffer initialized with `data`
    pub fn vertex(data: &'a [u8]) -> Self {
        Self { kind: BufferKind::Vertex, usage: Usage::Immutable, size: data.len(), data: Some(data) }
    }

    /// Immutable index buffer initialized with `data`
    pub fn index(data: &'a [u8]) -> Self {
        Self { kind: BufferKind::Index, usage: Usage::Immutable, size: data.len(), data: Some(data) }
    }

    /// Uninitialized buffer of `size` bytes meant to be filled with `update_buffer`
    pub fn empty(kind: BufferKind, usage: Usage, size: usize) -> Self {
        Self { kind, usage, size, data: None }
    }
}

/// Buffer resource
///
/// Immutable once created, apart from in-place content updates of
/// Dynamic and Stream buffers.
#[derive(Debug)]
pub struct Buffer {
    kind: BufferKind,
    usage: Usage,
    handle: BufferId,
    size: usize,
}

impl Buffer {
    pub(crate) fn create(driver: &mut dyn Driver, desc: &BufferDesc) -> Result<Self> {
        let size = match desc.data {
            Some(data) => {
                if desc.size != 0 && desc.size != data.len() {
                    gfx_warn!("altai::buffer",
                        "buffer size {} differs from initial data length {}, using the data length",
                        desc.size, data.len());
                }
                data.len()
            }
            None => desc.size,
        };
        if size == 0 {
            return Err(Error::InvalidResource("buffer size must be greater than zero".to_string()));
        }
        if desc.usage == Usage::Immutable && desc.data.is_none() {
            gfx_warn!("altai::buffer", "immutable buffer created without initial data");
        }

        let handle = driver.create_buffer(desc.kind, desc.usage, size, desc.data)?;
        Ok(Self { kind: desc.kind, usage: desc.usage, handle, size })
    }

    /// Overwrite part of the buffer content
    ///
    /// Immutable buffers and out-of-range writes are rejected with a warning.
    pub(crate) fn update(&self, driver: &mut dyn Driver, offset: usize, data: &[u8]) -> bool {
        if self.usage == Usage::Immutable {
            gfx_warn!("altai::buffer", "update of immutable buffer ignored");
            return false;
        }
        if offset.checked_add(data.len()).map_or(true, |end| end > self.size) {
            gfx_warn!("altai::buffer",
                "buffer update out of range (offset {} + {} bytes > size {}), ignored",
                offset, data.len(), self.size);
            return false;
        }
        driver.update_buffer(self.handle, self.kind, offset, data);
        true
    }

    pub(crate) fn release(&self, driver: &mut dyn Driver) {
        driver.delete_buffer(self.handle);
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    pub fn usage(&self) -> Usage {
        self.usage
    }

    /// Driver buffer object
    pub fn handle(&self) -> BufferId {
        self.handle
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
