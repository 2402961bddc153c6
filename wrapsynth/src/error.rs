//! Synthesis errors.

use thiserror::Error;

use crate::model::CallingConvention;

/// Error types for [`WrapperSynthesizer`](crate::WrapperSynthesizer)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// A deferred or streaming method needs an execution-scope provider, but
    /// the generation context has none.
    #[error("`{class}::{method}` is a {convention} method but no execution-scope provider was configured")]
    MissingExecutionScope {
        /// Class being wrapped.
        class: String,
        /// Offending method.
        method: String,
        /// Its calling convention.
        convention: CallingConvention,
    },
}
