//! `#[wrapper(...)]` attribute arguments.
//!
//! | Argument | Form | Effect |
//! |----------|------|--------|
//! | `scope` | `scope = <expr>` | Execution-scope provider for async methods |
//! | `name` | `name = Ident` | Wrapper type name (default `<Type>Wrapper`) |
//! | `field` | `field = ident` | Delegate field name (default `wrapped`) |
//! | `deferred` | `deferred = Path` | Deferred adapter type (default `DeferredWrapper`) |
//! | `stream` | `stream = Path` | Stream adapter type (default `StreamWrapper`) |
//! | `supertypes` | `supertypes(A, B)` | Traits the wrapped type declares |
//! | `substitute` | `substitute(Old => New)` | Swap one supertype |
//! | `interface` | `interface = Trait` | Generated trait mirroring the methods |

use quote::ToTokens;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{parenthesized, Expr, Ident, Path, Token};
use wrapsynth::{
    AdapterNames, ClassDescription, GeneratedInterfaceBinding, GenerationContext, InterfaceSubstitutionBinding,
    TypeRef,
};

/// Token text of a syntax node, as used for type and value names.
pub(crate) fn tokens_text(node: &impl ToTokens) -> String {
    node.to_token_stream().to_string()
}

/// Parsed attribute arguments.
#[derive(Default)]
pub(crate) struct WrapperArgs {
    pub scope: Option<Expr>,
    pub name: Option<Ident>,
    pub field: Option<Ident>,
    pub deferred: Option<Path>,
    pub stream: Option<Path>,
    pub supertypes: Vec<Path>,
    pub substitute: Option<(Path, Path)>,
    pub interface: Option<Path>,
}

fn set_once<T>(slot: &mut Option<T>, key: &Ident, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(key.span(), format!("duplicate wrapper argument `{key}`")));
    }
    *slot = Some(value);
    Ok(())
}

impl Parse for WrapperArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = WrapperArgs::default();
        let mut seen_supertypes = false;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            match key.to_string().as_str() {
                "scope" => {
                    input.parse::<Token![=]>()?;
                    set_once(&mut args.scope, &key, input.parse()?)?;
                }
                "name" => {
                    input.parse::<Token![=]>()?;
                    set_once(&mut args.name, &key, input.parse()?)?;
                }
                "field" => {
                    input.parse::<Token![=]>()?;
                    set_once(&mut args.field, &key, input.parse()?)?;
                }
                "deferred" => {
                    input.parse::<Token![=]>()?;
                    set_once(&mut args.deferred, &key, input.parse()?)?;
                }
                "stream" => {
                    input.parse::<Token![=]>()?;
                    set_once(&mut args.stream, &key, input.parse()?)?;
                }
                "interface" => {
                    input.parse::<Token![=]>()?;
                    set_once(&mut args.interface, &key, input.parse()?)?;
                }
                "supertypes" => {
                    if seen_supertypes {
                        return Err(syn::Error::new(key.span(), "duplicate wrapper argument `supertypes`"));
                    }
                    seen_supertypes = true;
                    let content;
                    parenthesized!(content in input);
                    args.supertypes = Punctuated::<Path, Token![,]>::parse_terminated(&content)?
                        .into_iter()
                        .collect();
                }
                "substitute" => {
                    let content;
                    parenthesized!(content in input);
                    let original: Path = content.parse()?;
                    content.parse::<Token![=>]>()?;
                    let generated: Path = content.parse()?;
                    set_once(&mut args.substitute, &key, (original, generated))?;
                }
                other => {
                    return Err(syn::Error::new(key.span(), format!("unknown wrapper argument `{other}`")));
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }
        Ok(args)
    }
}

impl WrapperArgs {
    /// Declared supertypes as type references.
    pub fn declared_supertypes(&self) -> Vec<TypeRef> {
        self.supertypes.iter().map(|p| TypeRef::new(tokens_text(p))).collect()
    }

    /// Build the generation context for `class`.
    ///
    /// With `interface`, the generated trait is taken to mirror every method
    /// read from the impl block.
    pub fn context(&self, class: &ClassDescription) -> GenerationContext {
        let mut ctx = GenerationContext::new();
        if let Some(scope) = &self.scope {
            ctx = ctx.with_scope_provider(tokens_text(scope));
        }
        if let Some(name) = &self.name {
            ctx = ctx.with_wrapper_name(name.to_string());
        }
        if let Some(field) = &self.field {
            ctx = ctx.with_delegate_field(field.to_string());
        }
        if self.deferred.is_some() || self.stream.is_some() {
            let defaults = AdapterNames::default();
            ctx = ctx.with_adapters(AdapterNames {
                deferred: self.deferred.as_ref().map(tokens_text).unwrap_or(defaults.deferred),
                stream: self.stream.as_ref().map(tokens_text).unwrap_or(defaults.stream),
            });
        }
        if let Some((original, generated)) = &self.substitute {
            ctx = ctx.with_substitution(InterfaceSubstitutionBinding::new(
                tokens_text(original),
                tokens_text(generated),
            ));
        }
        if let Some(interface) = &self.interface {
            ctx = ctx.with_generated_interface(GeneratedInterfaceBinding::new(
                TypeRef::new(tokens_text(interface)),
                class.methods.clone(),
            ));
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn parse(tokens: proc_macro2::TokenStream) -> syn::Result<WrapperArgs> {
        syn::parse2(tokens)
    }

    #[test]
    fn test_empty_args() {
        let args = parse(quote!()).unwrap();
        assert!(args.scope.is_none());
        assert!(args.supertypes.is_empty());
        assert_eq!(args.context(&ClassDescription::new("Repo")), GenerationContext::new());
    }

    #[test]
    fn test_full_args_to_context() {
        let args = parse(quote!(
            scope = self.runtime,
            name = RepoBlocking,
            field = inner,
            deferred = crate::Promise,
            supertypes(Marker, Source),
            substitute(Source => SourceBlocking),
            interface = RepoApi,
        ))
        .unwrap();

        let ctx = args.context(&ClassDescription::new("Repo"));
        assert_eq!(ctx.scope_provider(), Some(tokens_text(&quote!(self.runtime)).as_str()));
        assert_eq!(ctx.wrapper_name_for("Repo"), "RepoBlocking");
        assert_eq!(ctx.delegate_field(), "inner");
        assert_eq!(ctx.adapters().deferred, tokens_text(&quote!(crate::Promise)));
        assert_eq!(ctx.adapters().stream, "StreamWrapper");
        assert_eq!(ctx.substitution(), Some(&InterfaceSubstitutionBinding::new("Source", "SourceBlocking")));
        assert_eq!(ctx.generated_interface().unwrap().interface, TypeRef::new("RepoApi"));
        assert_eq!(args.declared_supertypes(), [TypeRef::new("Marker"), TypeRef::new("Source")]);
    }

    #[test]
    fn test_unknown_argument_rejected() {
        let err = parse(quote!(scoped = rt)).err().unwrap();
        assert_eq!(err.to_string(), "unknown wrapper argument `scoped`");
    }

    #[test]
    fn test_duplicate_argument_rejected() {
        let err = parse(quote!(name = A, name = B)).err().unwrap();
        assert_eq!(err.to_string(), "duplicate wrapper argument `name`");
    }
}
