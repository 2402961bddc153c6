//! Lowers a [`WrapperTypeDescription`] to Rust items.
//!
//! # Generated Items
//!
//! | Item | From |
//! |------|------|
//! | `pub struct Name { field: Class }` | name + delegate field |
//! | `pub fn new(field: Class) -> Self` | constructor |
//! | inherent `impl Name` | methods without the override flag |
//! | `impl Interface for Name` | methods flagged as override |
//! | `impl Supertype for Name {}` | every other supertype |
//!
//! Construction expressions become `Ty::new(args..)`; a trailing block becomes
//! a final `async move { block.await }` argument.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parse;
use wrapsynth::{Expr, MethodDescription, Modifier, TypeRef, WrapperTypeDescription};

/// Name of the generated constructor.
pub(crate) const CONSTRUCTOR: &str = "new";

/// Whether `method` is emitted in the interface impl rather than the inherent one.
pub(crate) fn in_interface_impl(method: &MethodDescription, interface: Option<&TypeRef>) -> bool {
    interface.is_some() && method.is_override()
}

fn parse_text<T: Parse>(text: &str) -> syn::Result<T> {
    syn::parse_str(text).map_err(|err| syn::Error::new(Span::call_site(), format!("invalid `{text}` in wrapper: {err}")))
}

fn lower_type(ty: &TypeRef) -> syn::Result<syn::Type> {
    parse_text(&ty.to_string())
}

/// Lower a body expression. Fields are reached through `self`; identifiers
/// are emitted as written.
pub(crate) fn lower_expr(expr: &Expr) -> syn::Result<TokenStream> {
    match expr {
        Expr::Field(name) => {
            let field: syn::Ident = parse_text(name)?;
            Ok(quote!(self.#field))
        }
        Expr::Ident(name) => {
            let value: syn::Expr = parse_text(name)?;
            Ok(quote!(#value))
        }
        Expr::Call { receiver, method, args } => {
            let receiver = lower_expr(receiver)?;
            let method: syn::Ident = parse_text(method)?;
            let args = args.iter().map(lower_expr).collect::<syn::Result<Vec<_>>>()?;
            Ok(quote!(#receiver.#method(#(#args),*)))
        }
        Expr::Construct { ty, args, block } => {
            let path: syn::Path = parse_text(ty.name())?;
            let args = args.iter().map(lower_expr).collect::<syn::Result<Vec<_>>>()?;
            match block {
                Some(block) => {
                    let block = lower_expr(block)?;
                    Ok(quote!(#path::new(#(#args,)* async move { #block.await })))
                }
                None => Ok(quote!(#path::new(#(#args),*))),
            }
        }
    }
}

fn lower_method(method: &MethodDescription, in_trait: bool) -> syn::Result<TokenStream> {
    let name: syn::Ident = parse_text(&method.name)?;
    let params = method
        .parameters
        .iter()
        .map(|p| {
            let name: syn::Ident = parse_text(&p.name)?;
            let ty = lower_type(&p.ty)?;
            Ok(quote!(#name: #ty))
        })
        .collect::<syn::Result<Vec<_>>>()?;
    let output = if method.return_type.name() == "()" && method.return_type.arguments().is_empty() {
        quote!()
    } else {
        let ty = lower_type(&method.return_type)?;
        quote!(-> #ty)
    };
    let body = match &method.body {
        Some(body) => lower_expr(body)?,
        None => quote!(unreachable!()),
    };
    let vis = if !in_trait && method.has_modifier(Modifier::Public) {
        quote!(pub)
    } else {
        quote!()
    };

    Ok(quote! {
        #[inline]
        #vis fn #name(&self, #(#params),*) #output {
            #body
        }
    })
}

/// Emit the wrapper struct and its impls.
///
/// `interface` is the generated interface the override-flagged methods
/// implement, if any.
pub(crate) fn emit_wrapper(wrapper: &WrapperTypeDescription, interface: Option<&TypeRef>) -> syn::Result<TokenStream> {
    let name: syn::Ident = parse_text(&wrapper.name)?;
    let field: syn::Ident = parse_text(&wrapper.field.name)?;
    let field_ty = lower_type(&wrapper.field.ty)?;
    let constructor = syn::Ident::new(CONSTRUCTOR, Span::call_site());
    let doc = format!(" Non-suspending wrapper around [`{}`].", wrapper.field.ty);

    let mut inherent = Vec::new();
    let mut overriding = Vec::new();
    for method in &wrapper.methods {
        let in_trait = in_interface_impl(method, interface);
        let lowered = lower_method(method, in_trait)?;
        if in_trait {
            overriding.push(lowered);
        } else {
            inherent.push(lowered);
        }
    }

    let interface_impl = match interface {
        Some(interface) => {
            let ty = lower_type(interface)?;
            quote! {
                impl #ty for #name {
                    #(#overriding)*
                }
            }
        }
        None => quote!(),
    };

    let marker_impls = wrapper
        .supertypes
        .iter()
        .filter(|ty| Some(*ty) != interface)
        .map(|ty| {
            let ty = lower_type(ty)?;
            Ok(quote!(impl #ty for #name {}))
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        #[doc = #doc]
        pub struct #name {
            #field: #field_ty,
        }

        impl #name {
            /// Wrap an instance.
            #[inline]
            pub fn #constructor(#field: #field_ty) -> Self {
                Self { #field }
            }

            #(#inherent)*
        }

        #interface_impl

        #(#marker_impls)*
    })
}
