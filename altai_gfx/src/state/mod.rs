/// State module - render state description and its shadow cache

pub mod render_state;
pub mod state_cache;

pub use render_state::*;
pub use state_cache::*;
