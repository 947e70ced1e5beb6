//! Error types for the Galaxy3D compositor
//!
//! A single error enum is shared by the core and by graphics backends.
//! The frame driver uses `Error::is_fatal()` to decide whether the loop
//! keeps scheduling ticks after a failure.

use std::fmt;

/// Result type for compositor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Compositor errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (command recording, submission, etc.)
    BackendError(String),

    /// Render target allocation exceeded the device memory budget
    OutOfMemory,

    /// Invalid resource (texture, command list, pass input, etc.)
    InvalidResource(String),

    /// Initialization failed (graphics device, frame driver)
    InitializationFailed(String),

    /// Startup configuration is out of range
    InvalidConfig(String),

    /// Render graph is malformed (cycle, unknown composer, stale input)
    InvalidGraph(String),
}

impl Error {
    /// Whether the frame loop must stop after this error.
    ///
    /// Only backend errors are transient; every other failure leaves the
    /// pipeline without the resources or wiring it needs to continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::BackendError(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InvalidGraph(msg) => write!(f, "Invalid render graph: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error and return early with it
///
/// Without a variant the error is a `BackendError` carrying the message.
/// With `source => Variant` the message is wrapped in that variant.
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_compositor::engine_bail;
/// # #[allow(unreachable_code)]
/// # fn f(name: &str) -> galaxy_3d_compositor::galaxy3d::Result<()> {
/// engine_bail!("galaxy3d::RenderGraph", "Composer '{}' already exists", name);
/// engine_bail!("galaxy3d::RenderGraph" => InvalidGraph, "Cycle through '{}'", name);
/// # }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr => $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        return Err($crate::galaxy3d::Error::$variant(message));
    }};
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        return Err($crate::galaxy3d::Error::BackendError(message));
    }};
}

/// Log an error and evaluate to it (for `ok_or_else` / `map_err`)
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_compositor::engine_err;
/// # fn f(targets: Vec<u32>) -> galaxy_3d_compositor::galaxy3d::Result<()> {
/// let target = targets.get(0).ok_or_else(|| engine_err!("galaxy3d::PassComposer", "No target"))?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr => $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
