//! Override inference for rewritten methods.
//!
//! The generated interface and the wrapper are unrelated through the original
//! class hierarchy, so a target compiler cannot infer that a wrapper method
//! implements an interface member. Matching methods get the flag explicitly.
//!
//! Signatures match on name plus the full parameter list, names included.
//! This is stricter than most languages' override rules; see
//! [`MethodDescription::same_signature`].

use crate::context::GeneratedInterfaceBinding;
use crate::model::MethodDescription;

/// Whether `method` must be flagged as an override.
///
/// `true` when the generated interface declares a method with the same
/// signature, or when the method already carries the flag.
pub fn infer_override(method: &MethodDescription, interface: Option<&GeneratedInterfaceBinding>) -> bool {
    method.is_override() || interface.is_some_and(|binding| binding.declares(method))
}
