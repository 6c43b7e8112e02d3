//! Error types for the altai rendering layer
//!
//! The layer follows a "never halt the frame loop" policy: most anomalies are
//! logged and execution continues. The variants below are what surfaces when
//! a caller explicitly asks for a status, or when the driver itself fails to
//! allocate an object.

use std::fmt;

/// Result type for altai operations
pub type Result<T> = std::result::Result<T, Error>;

/// altai errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Driver-specific error (GL object allocation, context loss, etc.)
    BackendError(String),

    /// Invalid or stale resource handle
    InvalidResource(String),

    /// Initialization failed (layer, driver, surface)
    InitializationFailed(String),

    /// Shader compilation or program linking failed
    ShaderLinkFailed(String),

    /// Framebuffer completeness check failed
    FramebufferIncomplete(String),

    /// Requested capability is not available on the active backend
    Unsupported(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ShaderLinkFailed(msg) => write!(f, "Shader link failed: {}", msg),
            Error::FramebufferIncomplete(msg) => write!(f, "Framebuffer incomplete: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an ERROR message and build an `Error::BackendError` from it
///
/// # Example
///
/// ```no_run
/// # use altai_gfx::gfx_err;
/// let err = gfx_err!("altai::glow", "glCreateBuffer failed: {}", "out of handles");
/// ```
#[macro_export]
macro_rules! gfx_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::gfx_error!($source, "{}", message);
        $crate::altai::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return early with an `Error::BackendError`
#[macro_export]
macro_rules! gfx_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::gfx_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
