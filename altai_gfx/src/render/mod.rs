/// Render module - driver interface, backend capabilities and shared enums

// Module declarations
pub mod types;
pub mod driver;
pub mod backend;

// Re-export everything
pub use types::*;
pub use driver::*;
pub use backend::*;

// Mock driver for tests (no GPU required)
pub mod mock_driver;
