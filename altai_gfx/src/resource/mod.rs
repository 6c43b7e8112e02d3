/// Resource module - buffers, textures, shaders, pipelines and their registry

pub mod vertex_layout;
pub mod buffer;
pub mod texture;
pub mod shader;
pub mod pipeline;
pub mod registry;

pub use vertex_layout::*;
pub use buffer::*;
pub use texture::*;
pub use shader::*;
pub use pipeline::*;
pub use registry::*;
