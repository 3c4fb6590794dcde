//! Render error types.

/// Error surfaced when a render invocation finishes in a bad state.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RenderError {
    /// A buffering printer was pushed and never popped. Push and pop must
    /// be paired on every path; this is a programmer error in a renderer.
    #[error("printer stack imbalance: {depth} buffering printer(s) left unpopped")]
    PrinterStackImbalance { depth: usize },
}
