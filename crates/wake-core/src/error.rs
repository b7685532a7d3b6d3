use thiserror::Error;

/// Errors surfaced by engine construction. Once running, the simulation
/// never fails; degenerate inputs fall back to neutral behavior instead.
#[derive(Debug, Error)]
pub enum WakeError {
    #[error("invalid field dimensions {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("kernel programs failed to resolve: {names}")]
    KernelLoad { names: String },

    #[error("invalid color literal '{0}'")]
    InvalidColor(String),
}
