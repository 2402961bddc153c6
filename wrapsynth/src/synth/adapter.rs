//! Per-method calling-convention adaptation.
//!
//! Every wrapper method delegates to the held instance through the same call
//! shape, `<field>.<method>(<params>)`. Only the wrapping differs:
//!
//! | Input convention | Wrapper body | Wrapper return type |
//! |------------------|--------------|---------------------|
//! | `Direct` | `wrapped.m(a, b)` | unchanged |
//! | `Deferred` | `DeferredWrapper(scope) { wrapped.m(a, b) }` | `DeferredWrapper<R>` |
//! | `Streaming` | `StreamWrapper(scope, wrapped.m(a, b))` | `StreamWrapper<Item>` |
//!
//! The wrapper method is always `Direct` and never carries
//! [`Modifier::Suspend`].

use tracing::debug;

use crate::context::GenerationContext;
use crate::error::SynthesisError;
use crate::expr::Expr;
use crate::model::{CallingConvention, MethodDescription, Modifier, TypeRef};

use super::overrides::infer_override;

/// `<field>.<method>(<parameter names in order>)`
pub fn delegating_call(field: &str, method: &MethodDescription) -> Expr {
    let args = method.parameters.iter().map(|p| Expr::ident(p.name.as_str())).collect();
    Expr::call(Expr::field(field), method.name.as_str(), args)
}

/// Element type of a stream return type: its first type argument, or the type
/// itself when it has none.
fn stream_item(return_type: &TypeRef) -> TypeRef {
    return_type.arguments().first().unwrap_or(return_type).clone()
}

/// Rewrite one method of `class` for the wrapper.
///
/// # Errors
///
/// Returns [`SynthesisError::MissingExecutionScope`] for a `Deferred` or
/// `Streaming` method when the context has no scope provider.
pub fn adapt_method(
    class: &str,
    method: &MethodDescription,
    ctx: &GenerationContext,
) -> Result<MethodDescription, SynthesisError> {
    let call = delegating_call(ctx.delegate_field(), method);

    let (body, return_type) = match method.calling_convention {
        CallingConvention::Direct => (call, method.return_type.clone()),
        CallingConvention::Deferred => {
            let scope = require_scope(class, method, ctx)?;
            let ty = TypeRef::generic(ctx.adapters().deferred.as_str(), [method.return_type.clone()]);
            let body = Expr::construct_with_block(ty.clone(), vec![scope], call);
            (body, ty)
        }
        CallingConvention::Streaming => {
            let scope = require_scope(class, method, ctx)?;
            let ty = TypeRef::generic(ctx.adapters().stream.as_str(), [stream_item(&method.return_type)]);
            let body = Expr::construct(ty.clone(), vec![scope, call]);
            (body, ty)
        }
    };

    let mut modifiers = method.modifiers.clone();
    modifiers.remove(&Modifier::Suspend);
    let is_override = infer_override(method, ctx.generated_interface());
    if is_override {
        modifiers.insert(Modifier::Override);
    }

    debug!(
        method = %method.name,
        convention = %method.calling_convention,
        is_override,
        "adapted method"
    );

    Ok(MethodDescription {
        name: method.name.clone(),
        parameters: method.parameters.clone(),
        return_type,
        calling_convention: CallingConvention::Direct,
        modifiers,
        body: Some(body),
    })
}

fn require_scope(class: &str, method: &MethodDescription, ctx: &GenerationContext) -> Result<Expr, SynthesisError> {
    ctx.scope_provider()
        .map(Expr::ident)
        .ok_or_else(|| SynthesisError::MissingExecutionScope {
            class: class.to_owned(),
            method: method.name.clone(),
            convention: method.calling_convention,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GeneratedInterfaceBinding;

    fn ctx() -> GenerationContext {
        GenerationContext::new().with_scope_provider("scope")
    }

    fn put(convention: CallingConvention, return_type: TypeRef) -> MethodDescription {
        MethodDescription::new("put", return_type, convention)
            .with_parameter("key", TypeRef::new("String"))
            .with_parameter("value", TypeRef::new("Int"))
    }

    #[test]
    fn test_delegating_call_preserves_parameter_order() {
        let call = delegating_call("inner", &put(CallingConvention::Direct, TypeRef::new("Unit")));
        assert_eq!(call.to_string(), "inner.put(key, value)");
    }

    #[test]
    fn test_parameter_named_like_the_field_stays_an_argument() {
        let method = MethodDescription::new("merge", TypeRef::new("Unit"), CallingConvention::Direct)
            .with_parameter("wrapped", TypeRef::new("Int"));
        let out = adapt_method("Store", &method, &GenerationContext::new()).unwrap();
        assert_eq!(
            out.body,
            Some(Expr::call(Expr::field("wrapped"), "merge", vec![Expr::ident("wrapped")]))
        );
    }

    #[test]
    fn test_direct_body_is_the_call() {
        let method = put(CallingConvention::Direct, TypeRef::new("Unit"));
        let out = adapt_method("Store", &method, &GenerationContext::new()).unwrap();

        assert_eq!(out.body, Some(delegating_call("wrapped", &method)));
        assert_eq!(out.return_type, TypeRef::new("Unit"));
        assert_eq!(out.calling_convention, CallingConvention::Direct);
        assert_eq!(out.modifiers, method.modifiers);
    }

    #[test]
    fn test_deferred_wraps_call_once() {
        let method = put(CallingConvention::Deferred, TypeRef::new("Boolean"));
        let out = adapt_method("Store", &method, &ctx()).unwrap();
        let body = out.body.as_ref().unwrap();

        assert_eq!(body.to_string(), "DeferredWrapper(scope) { wrapped.put(key, value) }");
        assert_eq!(body.occurrences(&delegating_call("wrapped", &method)), 1);
        assert_eq!(out.return_type.to_string(), "DeferredWrapper<Boolean>");
        assert_eq!(out.calling_convention, CallingConvention::Direct);
        assert!(!out.has_modifier(Modifier::Suspend));
        assert!(out.has_modifier(Modifier::Public));
    }

    #[test]
    fn test_streaming_wraps_call_once() {
        let flow = TypeRef::generic("Flow", [TypeRef::new("Event")]);
        let method = put(CallingConvention::Streaming, flow);
        let out = adapt_method("Store", &method, &ctx()).unwrap();
        let body = out.body.as_ref().unwrap();

        assert_eq!(body.to_string(), "StreamWrapper(scope, wrapped.put(key, value))");
        assert_eq!(body.occurrences(&delegating_call("wrapped", &method)), 1);
        assert_eq!(out.return_type.to_string(), "StreamWrapper<Event>");
        assert_eq!(out.calling_convention, CallingConvention::Direct);
    }

    #[test]
    fn test_streaming_without_type_argument_uses_return_type() {
        let method = put(CallingConvention::Streaming, TypeRef::new("Ticks"));
        let out = adapt_method("Clock", &method, &ctx()).unwrap();
        assert_eq!(out.return_type.to_string(), "StreamWrapper<Ticks>");
    }

    #[test]
    fn test_missing_scope_fails_fast() {
        for convention in [CallingConvention::Deferred, CallingConvention::Streaming] {
            let err = adapt_method("Store", &put(convention, TypeRef::new("Unit")), &GenerationContext::new()).unwrap_err();
            assert_eq!(
                err,
                SynthesisError::MissingExecutionScope {
                    class: "Store".into(),
                    method: "put".into(),
                    convention,
                }
            );
        }
    }

    #[test]
    fn test_custom_field_and_adapter_names() {
        let ctx = ctx().with_delegate_field("inner").with_adapters(crate::AdapterNames {
            deferred: "Promise".into(),
            stream: "Observable".into(),
        });
        let out = adapt_method("Store", &put(CallingConvention::Deferred, TypeRef::new("Int")), &ctx).unwrap();
        assert_eq!(out.body.unwrap().to_string(), "Promise(scope) { inner.put(key, value) }");
        assert_eq!(out.return_type.to_string(), "Promise<Int>");
    }

    #[test]
    fn test_interface_match_adds_override() {
        let method = put(CallingConvention::Deferred, TypeRef::new("Unit"));
        let binding = GeneratedInterfaceBinding::new(TypeRef::new("StoreApi"), vec![method.clone()]);
        let out = adapt_method("Store", &method, &ctx().with_generated_interface(binding)).unwrap();
        assert!(out.is_override());
    }
}
