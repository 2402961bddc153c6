//! The wrapper synthesizer.
//!
//! Turns a [`ClassDescription`] into a [`WrapperTypeDescription`]: a type that
//! holds an instance of the class and re-exposes every method with a
//! non-suspending calling convention.
//!
//! # Stages
//!
//! | Stage | Function | Output |
//! |-------|----------|--------|
//! | 1 | [`resolve_supertypes`] | Wrapper supertypes |
//! | 2 | [`adapt_method`] | Rewritten methods |
//! | 3 | [`infer_override`] (from stage 2) | `Override` flags |
//! | 4 | [`WrapperSynthesizer::synthesize`] | Assembled type |
//!
//! # Example
//!
//! ```
//! use wrapsynth::{
//!     CallingConvention, ClassDescription, GenerationContext, MethodDescription, TypeRef,
//!     WrapperSynthesizer,
//! };
//!
//! let class = ClassDescription::new("Repo").with_method(
//!     MethodDescription::new("fetch", TypeRef::new("User"), CallingConvention::Deferred)
//!         .with_parameter("id", TypeRef::new("String")),
//! );
//! let ctx = GenerationContext::new().with_scope_provider("scope");
//!
//! let wrapper = WrapperSynthesizer::new(&ctx).synthesize(&class)?;
//! assert_eq!(wrapper.name, "RepoWrapper");
//! assert_eq!(
//!     wrapper.methods[0].body.as_ref().unwrap().to_string(),
//!     "DeferredWrapper(scope) { wrapped.fetch(id) }",
//! );
//! # Ok::<(), wrapsynth::SynthesisError>(())
//! ```

mod adapter;
mod overrides;
mod supertypes;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::context::GenerationContext;
use crate::error::SynthesisError;
use crate::model::{ClassDescription, MethodDescription, Parameter, TypeRef};

pub use adapter::{adapt_method, delegating_call};
pub use overrides::infer_override;
pub use supertypes::resolve_supertypes;

/// The field holding the delegate instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DelegateField {
    /// Field name.
    pub name: String,
    /// The wrapped class's type.
    pub ty: TypeRef,
}

/// The wrapper's only constructor: it takes the delegate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constructor {
    /// Constructor parameters; exactly the delegate.
    pub parameters: Vec<Parameter>,
}

/// A synthesized wrapper type, ready for an emitter.
///
/// Every method is [`Direct`](crate::CallingConvention::Direct), carries no
/// [`Suspend`](crate::Modifier::Suspend) modifier and has a body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WrapperTypeDescription {
    /// Wrapper type name.
    pub name: String,
    /// Supertypes in declaration order.
    pub supertypes: Vec<TypeRef>,
    /// Rewritten methods, in the class's order.
    pub methods: Vec<MethodDescription>,
    /// Delegate field.
    pub field: DelegateField,
    /// Constructor accepting the delegate.
    pub constructor: Constructor,
}

impl WrapperTypeDescription {
    /// Look up a rewritten method by name.
    pub fn method(&self, name: &str) -> Option<&MethodDescription> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Synthesizes wrappers under one [`GenerationContext`].
///
/// Holds only a shared reference to the context; synthesizing several classes
/// with one synthesizer (or in parallel with clones of it) is fine.
#[derive(Debug, Clone, Copy)]
pub struct WrapperSynthesizer<'a> {
    ctx: &'a GenerationContext,
}

impl<'a> WrapperSynthesizer<'a> {
    /// Bind a synthesizer to `ctx`.
    pub fn new(ctx: &'a GenerationContext) -> Self {
        Self { ctx }
    }

    /// Build the wrapper for `class`.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::MissingExecutionScope`] if the class has a
    /// deferred or streaming method and the context has no scope provider.
    pub fn synthesize(&self, class: &ClassDescription) -> Result<WrapperTypeDescription, SynthesisError> {
        let _span = debug_span!("synthesize", class = %class.name).entered();
        let ctx = self.ctx;

        let supertypes = resolve_supertypes(
            &class.declared_supertypes,
            ctx.substitution(),
            ctx.generated_interface(),
        );

        let methods = class
            .methods
            .iter()
            .map(|method| adapt_method(&class.name, method, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        let field = DelegateField {
            name: ctx.delegate_field().to_owned(),
            ty: class.type_ref(),
        };
        let constructor = Constructor {
            parameters: vec![Parameter::new(field.name.clone(), field.ty.clone())],
        };
        let name = ctx.wrapper_name_for(&class.name);

        debug!(wrapper = %name, methods = methods.len(), supertypes = supertypes.len(), "synthesized wrapper");

        Ok(WrapperTypeDescription {
            name,
            supertypes,
            methods,
            field,
            constructor,
        })
    }
}

/// Shorthand for `WrapperSynthesizer::new(ctx).synthesize(class)`.
///
/// # Errors
///
/// See [`WrapperSynthesizer::synthesize`].
pub fn synthesize(class: &ClassDescription, ctx: &GenerationContext) -> Result<WrapperTypeDescription, SynthesisError> {
    WrapperSynthesizer::new(ctx).synthesize(class)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{GeneratedInterfaceBinding, InterfaceSubstitutionBinding};
    use crate::expr::Expr;
    use crate::model::{CallingConvention, Modifier};

    fn repo() -> ClassDescription {
        ClassDescription::new("Repo")
            .with_method(
                MethodDescription::new("fetch", TypeRef::new("User"), CallingConvention::Deferred)
                    .with_parameter("id", TypeRef::new("String")),
            )
            .with_method(
                MethodDescription::new("updates", TypeRef::generic("Flow", [TypeRef::new("User")]), CallingConvention::Streaming)
                    .with_parameter("since", TypeRef::new("Long")),
            )
            .with_method(
                MethodDescription::new("count", TypeRef::new("Int"), CallingConvention::Direct)
                    .with_parameter("filter", TypeRef::new("String"))
                    .with_parameter("limit", TypeRef::new("Int")),
            )
            .with_method(
                MethodDescription::new("toString", TypeRef::new("String"), CallingConvention::Direct)
                    .with_modifier(Modifier::Override),
            )
            .with_supertype(TypeRef::new("Closeable"))
            .with_supertype(TypeRef::new("Source"))
            .with_supertype(TypeRef::new("Named"))
    }

    fn scoped() -> GenerationContext {
        GenerationContext::new().with_scope_provider("scope")
    }

    #[test]
    fn test_fetch_scenario() {
        let class = ClassDescription::new("Repo").with_method(
            MethodDescription::new("fetch", TypeRef::new("User"), CallingConvention::Deferred)
                .with_parameter("id", TypeRef::new("String")),
        );
        let wrapper = synthesize(&class, &scoped()).unwrap();

        let fetch = wrapper.method("fetch").unwrap();
        assert_eq!(fetch.parameters, [Parameter::new("id", TypeRef::new("String"))]);
        assert_eq!(fetch.body.as_ref().unwrap().to_string(), "DeferredWrapper(scope) { wrapped.fetch(id) }");
        assert!(wrapper.supertypes.is_empty());
    }

    #[test]
    fn test_every_method_is_direct_with_body() {
        let wrapper = synthesize(&repo(), &scoped()).unwrap();
        assert_eq!(wrapper.methods.len(), 4);
        for method in &wrapper.methods {
            assert_eq!(method.calling_convention, CallingConvention::Direct);
            assert!(!method.has_modifier(Modifier::Suspend));
            assert!(method.body.is_some());
        }
    }

    #[test]
    fn test_method_order_preserved() {
        let wrapper = synthesize(&repo(), &scoped()).unwrap();
        let names: Vec<_> = wrapper.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["fetch", "updates", "count", "toString"]);
    }

    #[test]
    fn test_direct_body_keeps_parameters() {
        let wrapper = synthesize(&repo(), &scoped()).unwrap();
        let count = wrapper.method("count").unwrap();
        assert_eq!(
            count.body,
            Some(Expr::call(
                Expr::field("wrapped"),
                "count",
                vec![Expr::ident("filter"), Expr::ident("limit")]
            ))
        );
    }

    #[test]
    fn test_field_and_constructor() {
        let wrapper = synthesize(&repo(), &scoped().with_delegate_field("inner")).unwrap();
        assert_eq!(wrapper.field, DelegateField { name: "inner".into(), ty: TypeRef::new("Repo") });
        assert_eq!(wrapper.constructor.parameters, [Parameter::new("inner", TypeRef::new("Repo"))]);
        assert_eq!(
            wrapper.method("updates").unwrap().body.as_ref().unwrap().to_string(),
            "StreamWrapper(scope, inner.updates(since))"
        );
    }

    #[test]
    fn test_supertypes_substituted_and_augmented() {
        let iface = GeneratedInterfaceBinding::new(TypeRef::new("RepoApi"), Vec::new());
        let ctx = scoped()
            .with_substitution(InterfaceSubstitutionBinding::new("Source", "SourceWrapper"))
            .with_generated_interface(iface);
        let wrapper = synthesize(&repo(), &ctx).unwrap();

        let names: Vec<_> = wrapper.supertypes.iter().map(TypeRef::name).collect();
        assert_eq!(names, ["Closeable", "SourceWrapper", "Named", "RepoApi"]);
    }

    #[test]
    fn test_overrides_from_generated_interface() {
        let class = repo();
        // Interface declares `fetch(id: String)` and a `count` with renamed parameters.
        let declared = vec![
            class.methods[0].clone(),
            MethodDescription::new("count", TypeRef::new("Int"), CallingConvention::Direct)
                .with_parameter("query", TypeRef::new("String"))
                .with_parameter("limit", TypeRef::new("Int")),
        ];
        let ctx = scoped().with_generated_interface(GeneratedInterfaceBinding::new(TypeRef::new("RepoApi"), declared));
        let wrapper = synthesize(&class, &ctx).unwrap();

        assert!(wrapper.method("fetch").unwrap().is_override());
        assert!(!wrapper.method("updates").unwrap().is_override());
        assert!(!wrapper.method("count").unwrap().is_override());
        // Inherited flag survives.
        assert!(wrapper.method("toString").unwrap().is_override());
    }

    #[test]
    fn test_idempotent() {
        let ctx = scoped().with_substitution(InterfaceSubstitutionBinding::new("Named", "NamedWrapper"));
        let class = repo();
        assert_eq!(synthesize(&class, &ctx).unwrap(), synthesize(&class, &ctx).unwrap());
    }

    #[test]
    fn test_missing_scope_reports_first_offender() {
        let err = synthesize(&repo(), &GenerationContext::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`Repo::fetch` is a deferred method but no execution-scope provider was configured"
        );
    }

    #[test]
    fn test_direct_only_class_needs_no_scope() {
        let class = ClassDescription::new("Counter")
            .with_method(MethodDescription::new("get", TypeRef::new("Int"), CallingConvention::Direct));
        let wrapper = synthesize(&class, &GenerationContext::new()).unwrap();
        assert_eq!(wrapper.name, "CounterWrapper");
        assert_eq!(wrapper.methods[0].body.as_ref().unwrap().to_string(), "wrapped.get()");
    }
}
