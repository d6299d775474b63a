//! Handler chain result type.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Not handled here; pass to the next handler.
    Continue,
    /// The message was consumed; stop the handle phase.
    Stop,
}
