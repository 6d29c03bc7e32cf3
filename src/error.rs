//! Error types and the error policy shared by all GLGE subsystems.
//!
//! Every fallible operation returns a [`GlgeError`]. Callers that want the
//! classic "print and continue" or "print and quit" behaviour hand the result
//! to an [`ErrorPolicy`] instead of matching on it themselves.

use std::io;

/// Errors produced by mesh generation, OBJ import and the binary file formats.
#[derive(Debug, thiserror::Error)]
pub enum GlgeError {
    /// Malformed header, wrong version or structurally invalid data.
    #[error("invalid {what}: {reason}")]
    Format { what: &'static str, reason: String },

    /// An object was decoded under a type tag other than the one it was stored with.
    #[error("trying to decode object of type '{stored}' as type '{requested}'")]
    TypeMismatch { stored: String, requested: String },

    /// An atlas image does not fit into the atlas bounds.
    #[error("image '{0}' does not fit into the atlas")]
    OutOfSpace(String),

    /// A file, scene entry or atlas image is missing.
    #[error("{0} not found")]
    NotFound(String),

    /// Input the engine does not know how to handle (mesh formats, preset ids, ...).
    #[error("unsupported input: {0}")]
    Unsupported(String),

    /// A file was opened with a mode other than 'r' or 'w'.
    #[error("invalid file mode '{0}', expected 'r' or 'w'")]
    InvalidMode(char),

    /// A read was attempted on a file opened for writing, or the other way around.
    #[error("file is not opened for {0}")]
    WrongMode(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl GlgeError {
    pub(crate) fn format(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Format {
            what,
            reason: reason.into(),
        }
    }
}

/// Decides what happens when an error reaches the caller's "don't care" path.
///
/// `output` logs the error through `log::error!`, `exit_on_error` terminates the
/// process after logging. The policy is a plain value: pass the one you want to
/// whoever needs it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorPolicy {
    pub output: bool,
    pub exit_on_error: bool,
}

impl ErrorPolicy {
    /// Log and continue with a fallback value.
    pub const LOG: Self = Self {
        output: true,
        exit_on_error: false,
    };

    /// Swallow errors without any output.
    pub const SILENT: Self = Self {
        output: false,
        exit_on_error: false,
    };

    /// Log and terminate the process.
    pub const ABORT: Self = Self {
        output: true,
        exit_on_error: true,
    };

    pub fn report(&self, err: &GlgeError) {
        if self.output || self.exit_on_error {
            log::error!("[GLGE ERROR] {err}");
        }
        if self.exit_on_error {
            std::process::exit(1);
        }
    }

    /// Unwraps `result`, reporting the error and substituting `fallback` on failure.
    pub fn recover<T>(&self, result: Result<T, GlgeError>, fallback: T) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.report(&err);
                fallback
            }
        }
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::LOG
    }
}
