/// Draw module - draw states, uniforms and the draw dispatcher

pub mod draw_state;
pub mod uniform;
pub mod dispatcher;

pub use draw_state::*;
pub use uniform::*;
pub use dispatcher::*;
