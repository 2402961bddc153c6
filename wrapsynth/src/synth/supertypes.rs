//! Wrapper supertype resolution.

use tracing::trace;

use crate::context::{GeneratedInterfaceBinding, InterfaceSubstitutionBinding};
use crate::model::TypeRef;

/// Compute the wrapper's supertypes.
///
/// Declared supertypes keep their order. One whose name matches the
/// substitution's original is replaced by the generated name (type arguments
/// are kept), and the generated interface, when present, is appended last.
///
/// # Example
///
/// ```
/// use wrapsynth::synth::resolve_supertypes;
/// use wrapsynth::{InterfaceSubstitutionBinding, TypeRef};
///
/// let declared = [TypeRef::new("A"), TypeRef::new("B"), TypeRef::new("C")];
/// let sub = InterfaceSubstitutionBinding::new("B", "BWrapper");
/// let resolved = resolve_supertypes(&declared, Some(&sub), None);
/// assert_eq!(resolved, [TypeRef::new("A"), TypeRef::new("BWrapper"), TypeRef::new("C")]);
/// ```
pub fn resolve_supertypes(
    declared: &[TypeRef],
    substitution: Option<&InterfaceSubstitutionBinding>,
    also_implement: Option<&GeneratedInterfaceBinding>,
) -> Vec<TypeRef> {
    let mut supertypes: Vec<TypeRef> = declared
        .iter()
        .map(|ty| match substitution {
            Some(sub) if sub.original == ty.name() => {
                trace!(original = %ty, generated = %sub.generated, "substituting supertype");
                ty.renamed(sub.generated.as_str())
            }
            _ => ty.clone(),
        })
        .collect();

    if let Some(binding) = also_implement {
        supertypes.push(binding.interface.clone());
    }
    supertypes
}
