//! Procedural macros for Wrapsynth.
//!
//! This crate connects the [`wrapsynth`] synthesizer to Rust source: it reads
//! an inherent `impl` block as the class description, runs the synthesizer,
//! and emits the wrapper type next to the original impl.
//!
//! # Available Macros
//!
//! | Macro | Type | Purpose |
//! |-------|------|---------|
//! | [`macro@wrapper`] | Attribute | Non-suspending wrapper for an impl block |
//!
//! # Quick Start
//!
//! ```ignore
//! use wrapsynth_macros::wrapper;
//!
//! #[wrapper(scope = runtime(), name = RepoBlocking)]
//! impl Repo {
//!     pub async fn fetch(&self, id: u64) -> User { /* ... */ }
//!
//!     #[streaming]
//!     pub fn changes(&self) -> impl Stream<Item = User> { /* ... */ }
//!
//!     pub fn len(&self) -> usize { /* ... */ }
//! }
//! ```
//!
//! # Generated Code
//!
//! ```ignore
//! pub struct RepoBlocking {
//!     wrapped: Repo,
//! }
//!
//! impl RepoBlocking {
//!     pub fn new(wrapped: Repo) -> Self { Self { wrapped } }
//!
//!     pub fn fetch(&self, id: u64) -> DeferredWrapper<User> {
//!         DeferredWrapper::new(runtime(), async move { self.wrapped.fetch(id).await })
//!     }
//!
//!     pub fn changes(&self) -> StreamWrapper<User> {
//!         StreamWrapper::new(runtime(), self.wrapped.changes())
//!     }
//!
//!     pub fn len(&self) -> usize {
//!         self.wrapped.len()
//!     }
//! }
//! ```
//!
//! `DeferredWrapper` and `StreamWrapper` (or the types named by `deferred =`
//! and `stream =`) are resolved at the expansion site; this crate does not
//! provide them.

mod args;
mod emit;
mod reader;

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, ImplItem, ItemImpl};
use wrapsynth::{TypeRef, WrapperTypeDescription};

use crate::args::WrapperArgs;

/// Attribute macro generating a non-suspending wrapper for an impl block.
///
/// Every method taking `&self` is re-exposed on the wrapper:
///
/// | Method | Wrapper method returns |
/// |--------|------------------------|
/// | `async fn m(&self) -> T` | `DeferredWrapper<T>` |
/// | `#[streaming] fn m(&self) -> impl Stream<Item = T>` | `StreamWrapper<T>` |
/// | `fn m(&self) -> T` | `T` |
///
/// # Arguments
///
/// | Argument | Default |
/// |----------|---------|
/// | `scope = <expr>` | required when any method is async or streaming |
/// | `name = Ident` | `<Type>Wrapper` |
/// | `field = ident` | `wrapped` |
/// | `deferred = Path` | `DeferredWrapper` |
/// | `stream = Path` | `StreamWrapper` |
/// | `supertypes(A, B)` | none |
/// | `substitute(Old => New)` | none |
/// | `interface = Trait` | none |
///
/// With `interface = Trait`, the trait is expected to declare every wrapped
/// method with the wrapper's signature; those methods are emitted in an
/// `impl Trait for Wrapper` block instead of the inherent impl. Other
/// supertypes get an empty `impl Supertype for Wrapper {}`.
///
/// # Errors
///
/// Compile errors are reported for trait or generic impl blocks, generic
/// methods, non-identifier parameters, `async` methods marked `#[streaming]`,
/// async or streaming methods without `scope`, and a wrapped `&self` method
/// named `new` that would land next to the generated constructor.
#[proc_macro_attribute]
pub fn wrapper(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as WrapperArgs);
    let mut input = parse_macro_input!(item as ItemImpl);

    expand(&args, &mut input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(args: &WrapperArgs, input: &mut ItemImpl) -> syn::Result<proc_macro2::TokenStream> {
    let class = reader::read_class(input, args)?;
    reader::strip_markers(input);

    let ctx = args.context(&class);
    let wrapper = wrapsynth::synthesize(&class, &ctx).map_err(|err| syn::Error::new(Span::call_site(), err))?;
    let interface = ctx.generated_interface().map(|b| &b.interface);
    check_constructor_clash(input, &wrapper, interface)?;
    let generated = emit::emit_wrapper(&wrapper, interface)?;

    Ok(quote! {
        #input
        #generated
    })
}

/// The inherent impl already holds the generated constructor.
fn check_constructor_clash(
    input: &ItemImpl,
    wrapper: &WrapperTypeDescription,
    interface: Option<&TypeRef>,
) -> syn::Result<()> {
    let clashes = wrapper
        .method(emit::CONSTRUCTOR)
        .is_some_and(|method| !emit::in_interface_impl(method, interface));
    if !clashes {
        return Ok(());
    }
    let span = input
        .items
        .iter()
        .find_map(|item| match item {
            ImplItem::Fn(method) if method.sig.ident == emit::CONSTRUCTOR => Some(method.sig.ident.span()),
            _ => None,
        })
        .unwrap_or_else(Span::call_site);
    Err(syn::Error::new(
        span,
        format!(
            "method `{}` clashes with the constructor generated for `{}`",
            emit::CONSTRUCTOR,
            wrapper.name
        ),
    ))
}
