use thiserror::Error;

/// Construction-time failures. Nothing on the per-frame path returns this.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwarmError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("invalid color `{0}`: expected #rrggbb")]
    InvalidColor(String),

    #[error("bitmap of {width}x{height} needs {expected} bytes, got {actual}")]
    BitmapSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}
