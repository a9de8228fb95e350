//! Error types for element building.

/// Errors from element operations.
#[derive(Debug, thiserror::Error)]
pub enum ElemError {
    /// An inline script was attached to an element without an `id`.
    #[error("cannot attach script to <{tag}>: element has no id")]
    MissingId {
        /// Tag of the offending element.
        tag: String,
    },
}
