//! Reads an inherent `impl` block into a [`ClassDescription`].
//!
//! | Method shape | Calling convention |
//! |--------------|--------------------|
//! | `async fn m(&self, ..)` | `Deferred` |
//! | `#[streaming] fn m(&self, ..) -> impl Stream<Item = T>` | `Streaming` |
//! | `fn m(&self, ..)` | `Direct` |
//!
//! Methods without a `&self` receiver are not wrapped.

use syn::spanned::Spanned;
use syn::{
    FnArg, GenericArgument, ImplItem, ImplItemFn, ItemImpl, Pat, PathArguments, ReturnType, Type, TypeParamBound,
    Visibility,
};
use wrapsynth::{CallingConvention, ClassDescription, MethodDescription, Modifier, TypeRef};

use crate::args::{tokens_text, WrapperArgs};

/// Marker attribute for streaming methods.
pub(crate) const STREAMING_MARKER: &str = "streaming";

fn is_streaming_marker(attr: &syn::Attribute) -> bool {
    attr.path().is_ident(STREAMING_MARKER)
}

/// Build the class description for `item`.
///
/// # Errors
///
/// - trait impls, generic impls and non-identifier self types
/// - generic methods, `async` methods marked `#[streaming]`
/// - parameters that are not plain identifiers
pub(crate) fn read_class(item: &ItemImpl, args: &WrapperArgs) -> syn::Result<ClassDescription> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new(path.span(), "#[wrapper] expects an inherent impl block"));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(item.generics.span(), "#[wrapper] does not support generic impl blocks"));
    }
    let name = match item.self_ty.as_ref() {
        Type::Path(type_path) if type_path.qself.is_none() => type_path.path.get_ident().cloned(),
        _ => None,
    }
    .ok_or_else(|| syn::Error::new(item.self_ty.span(), "#[wrapper] expects a plain type name"))?;

    let mut class = ClassDescription::new(name.to_string());
    class.declared_supertypes = args.declared_supertypes();

    for impl_item in &item.items {
        if let ImplItem::Fn(method) = impl_item {
            if let Some(description) = read_method(method)? {
                class.methods.push(description);
            }
        }
    }
    Ok(class)
}

fn is_self_type(ty: &Type) -> bool {
    matches!(ty, Type::Path(type_path) if type_path.qself.is_none() && type_path.path.is_ident("Self"))
}

/// `&self` or `self: &Self`. syn fills `ty` for the shorthand form too.
fn takes_shared_self(method: &ImplItemFn) -> bool {
    method.sig.receiver().is_some_and(|r| match r.ty.as_ref() {
        Type::Reference(reference) => reference.mutability.is_none() && is_self_type(&reference.elem),
        _ => false,
    })
}

fn read_method(method: &ImplItemFn) -> syn::Result<Option<MethodDescription>> {
    if !takes_shared_self(method) {
        return Ok(None);
    }
    let sig = &method.sig;
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new(sig.generics.span(), "#[wrapper] does not support generic methods"));
    }

    let streaming = method.attrs.iter().any(is_streaming_marker);
    let convention = match (sig.asyncness, streaming) {
        (Some(asyncness), true) => {
            return Err(syn::Error::new(asyncness.span(), "a #[streaming] method cannot be async"));
        }
        (Some(_), false) => CallingConvention::Deferred,
        (None, true) => CallingConvention::Streaming,
        (None, false) => CallingConvention::Direct,
    };

    let return_type = match &sig.output {
        ReturnType::Default => TypeRef::new("()"),
        ReturnType::Type(_, ty) if streaming => stream_type(ty),
        ReturnType::Type(_, ty) => TypeRef::new(tokens_text(ty)),
    };

    let mut description = MethodDescription::new(sig.ident.to_string(), return_type, convention);
    if !matches!(method.vis, Visibility::Public(_)) {
        description.modifiers.remove(&Modifier::Public);
    }

    for input in &sig.inputs {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        match pat_type.pat.as_ref() {
            Pat::Ident(pat) if pat.by_ref.is_none() && pat.subpat.is_none() => {
                description = description.with_parameter(pat.ident.to_string(), TypeRef::new(tokens_text(&pat_type.ty)));
            }
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "#[wrapper] methods need plain identifier parameters",
                ));
            }
        }
    }
    Ok(Some(description))
}

/// `impl Stream<Item = T>` records `T` as the type argument; anything else is
/// kept whole.
fn stream_type(ty: &Type) -> TypeRef {
    if let Type::ImplTrait(impl_trait) = ty {
        for bound in &impl_trait.bounds {
            let TypeParamBound::Trait(trait_bound) = bound else {
                continue;
            };
            let Some(segment) = trait_bound.path.segments.last() else {
                continue;
            };
            let PathArguments::AngleBracketed(generics) = &segment.arguments else {
                continue;
            };
            for arg in &generics.args {
                if let GenericArgument::AssocType(assoc) = arg {
                    if assoc.ident == "Item" {
                        return TypeRef::generic(segment.ident.to_string(), [TypeRef::new(tokens_text(&assoc.ty))]);
                    }
                }
            }
        }
    }
    TypeRef::new(tokens_text(ty))
}

/// Remove `#[streaming]` markers so the original impl block compiles as-is.
pub(crate) fn strip_markers(item: &mut ItemImpl) {
    for impl_item in &mut item.items {
        if let ImplItem::Fn(method) = impl_item {
            method.attrs.retain(|attr| !is_streaming_marker(attr));
        }
    }
}
