//! Generation context: everything the synthesizer needs besides the class.
//!
//! The context is the single configuration value for a synthesis run. Both
//! companion artifacts are explicit `Option` fields so the synthesizer stays a
//! pure function of its arguments.
//!
//! # Defaults
//!
//! | Setting | Default |
//! |---------|---------|
//! | `scope_provider` | none |
//! | `delegate_field` | `wrapped` |
//! | `wrapper_name` | `<Class>Wrapper` |
//! | `adapters.deferred` | `DeferredWrapper` |
//! | `adapters.stream` | `StreamWrapper` |
//! | bindings | none |
//!
//! # Example
//!
//! ```
//! use wrapsynth::{GenerationContext, InterfaceSubstitutionBinding};
//!
//! let ctx = GenerationContext::new()
//!     .with_scope_provider("scope")
//!     .with_substitution(InterfaceSubstitutionBinding::new("Source", "SourceWrapper"));
//! assert_eq!(ctx.delegate_field(), "wrapped");
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::{MethodDescription, TypeRef};

/// Default name of the delegate field.
pub const DEFAULT_DELEGATE_FIELD: &str = "wrapped";

/// Suffix appended to the class name when no wrapper name is configured.
pub const DEFAULT_WRAPPER_SUFFIX: &str = "Wrapper";

/// A freshly generated interface mirroring the class's methods.
///
/// The wrapper additionally implements [`interface`](Self::interface); its
/// method list is only used to answer "does the interface declare this
/// signature".
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeneratedInterfaceBinding {
    /// The generated interface type.
    pub interface: TypeRef,
    /// Methods the interface declares.
    pub methods: Vec<MethodDescription>,
}

impl GeneratedInterfaceBinding {
    /// Bind `interface` to its declared methods.
    pub fn new(interface: TypeRef, methods: Vec<MethodDescription>) -> Self {
        Self { interface, methods }
    }

    /// Whether the interface declares a method with the same signature.
    pub fn declares(&self, method: &MethodDescription) -> bool {
        self.methods.iter().any(|m| m.same_signature(method))
    }
}

/// Swap one declared supertype for a generated wrapper interface.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterfaceSubstitutionBinding {
    /// Name of the supertype to replace.
    pub original: String,
    /// Name of the replacement.
    pub generated: String,
}

impl InterfaceSubstitutionBinding {
    /// Replace `original` with `generated`.
    pub fn new(original: impl Into<String>, generated: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            generated: generated.into(),
        }
    }
}

/// Type names used for the calling-convention adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdapterNames {
    /// Deferred-result wrapper type.
    pub deferred: String,
    /// Stream wrapper type.
    pub stream: String,
}

impl Default for AdapterNames {
    fn default() -> Self {
        Self {
            deferred: "DeferredWrapper".into(),
            stream: "StreamWrapper".into(),
        }
    }
}

/// Configuration for one synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationContext {
    scope_provider: Option<String>,
    generated_interface: Option<GeneratedInterfaceBinding>,
    substitution: Option<InterfaceSubstitutionBinding>,
    delegate_field: String,
    wrapper_name: Option<String>,
    adapters: AdapterNames,
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self {
            scope_provider: None,
            generated_interface: None,
            substitution: None,
            delegate_field: DEFAULT_DELEGATE_FIELD.into(),
            wrapper_name: None,
            adapters: AdapterNames::default(),
        }
    }
}

impl GenerationContext {
    /// Context with every default applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the execution-scope provider used by deferred and streaming adapters.
    pub fn with_scope_provider(mut self, name: impl Into<String>) -> Self {
        self.scope_provider = Some(name.into());
        self
    }

    /// Also implement a generated interface.
    pub fn with_generated_interface(mut self, binding: GeneratedInterfaceBinding) -> Self {
        self.generated_interface = Some(binding);
        self
    }

    /// Substitute one declared supertype.
    pub fn with_substitution(mut self, binding: InterfaceSubstitutionBinding) -> Self {
        self.substitution = Some(binding);
        self
    }

    /// Rename the delegate field.
    pub fn with_delegate_field(mut self, name: impl Into<String>) -> Self {
        self.delegate_field = name.into();
        self
    }

    /// Name the wrapper explicitly.
    pub fn with_wrapper_name(mut self, name: impl Into<String>) -> Self {
        self.wrapper_name = Some(name.into());
        self
    }

    /// Override the adapter type names.
    pub fn with_adapters(mut self, adapters: AdapterNames) -> Self {
        self.adapters = adapters;
        self
    }

    #[inline]
    pub fn scope_provider(&self) -> Option<&str> {
        self.scope_provider.as_deref()
    }

    #[inline]
    pub fn generated_interface(&self) -> Option<&GeneratedInterfaceBinding> {
        self.generated_interface.as_ref()
    }

    #[inline]
    pub fn substitution(&self) -> Option<&InterfaceSubstitutionBinding> {
        self.substitution.as_ref()
    }

    #[inline]
    pub fn delegate_field(&self) -> &str {
        &self.delegate_field
    }

    #[inline]
    pub fn adapters(&self) -> &AdapterNames {
        &self.adapters
    }

    /// Configured wrapper name, or `<class>Wrapper`.
    pub fn wrapper_name_for(&self, class_name: &str) -> String {
        match &self.wrapper_name {
            Some(name) => name.clone(),
            None => format!("{class_name}{DEFAULT_WRAPPER_SUFFIX}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CallingConvention;

    #[test]
    fn test_defaults() {
        let ctx = GenerationContext::new();
        assert_eq!(ctx.scope_provider(), None);
        assert_eq!(ctx.delegate_field(), "wrapped");
        assert_eq!(ctx.wrapper_name_for("Repo"), "RepoWrapper");
        assert_eq!(ctx.adapters().deferred, "DeferredWrapper");
        assert_eq!(ctx.adapters().stream, "StreamWrapper");
        assert!(ctx.generated_interface().is_none());
        assert!(ctx.substitution().is_none());
    }

    #[test]
    fn test_explicit_wrapper_name_wins() {
        let ctx = GenerationContext::new().with_wrapper_name("RepoBlocking");
        assert_eq!(ctx.wrapper_name_for("Repo"), "RepoBlocking");
    }

    #[test]
    fn test_binding_declares_by_signature() {
        let foo = MethodDescription::new("foo", TypeRef::new("Unit"), CallingConvention::Direct)
            .with_parameter("x", TypeRef::new("Int"));
        let binding = GeneratedInterfaceBinding::new(TypeRef::new("RepoApi"), vec![foo.clone()]);

        assert!(binding.declares(&foo));
        let bar = MethodDescription::new("bar", TypeRef::new("Unit"), CallingConvention::Direct)
            .with_parameter("x", TypeRef::new("Int"));
        assert!(!binding.declares(&bar));
    }
}
