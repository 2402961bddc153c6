//! Structured body expressions.
//!
//! Wrapper bodies are kept as a small expression tree rather than text so an
//! emitter can serialize them into whatever concrete syntax it targets. The
//! [`Display`](std::fmt::Display) impl renders a neutral notation used in
//! diagnostics and tests:
//!
//! ```text
//! wrapped.fetch(id)                             // Call on the delegate field
//! DeferredWrapper(scope) { wrapped.fetch(id) }  // Construct with trailing block
//! StreamWrapper(scope, wrapped.events())        // Construct without block
//! ```

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::model::TypeRef;

/// A body expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Expr {
    /// A field of the wrapper itself, such as the delegate.
    Field(String),
    /// A reference to a named value in scope (a parameter or context value).
    Ident(String),
    /// A method call on a receiver.
    Call {
        /// Receiver expression.
        receiver: Box<Expr>,
        /// Method name.
        method: String,
        /// Arguments in order.
        args: Vec<Expr>,
    },
    /// Construction of a value of type `ty`.
    Construct {
        /// Type being constructed.
        ty: TypeRef,
        /// Constructor arguments in order.
        args: Vec<Expr>,
        /// Trailing computation evaluated inside the constructed value.
        block: Option<Box<Expr>>,
    },
}

impl Expr {
    /// Reference a field of the wrapper.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Reference a named value.
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    /// `receiver.method(args...)`
    pub fn call(receiver: Expr, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            receiver: Box::new(receiver),
            method: method.into(),
            args,
        }
    }

    /// `Ty(args...)`
    pub fn construct(ty: TypeRef, args: Vec<Expr>) -> Self {
        Self::Construct { ty, args, block: None }
    }

    /// `Ty(args...) { block }`
    pub fn construct_with_block(ty: TypeRef, args: Vec<Expr>, block: Expr) -> Self {
        Self::Construct {
            ty,
            args,
            block: Some(Box::new(block)),
        }
    }

    /// Direct child expressions, in evaluation order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Field(_) | Self::Ident(_) => Vec::new(),
            Self::Call { receiver, args, .. } => {
                let mut out = Vec::with_capacity(args.len() + 1);
                out.push(receiver.as_ref());
                out.extend(args);
                out
            }
            Self::Construct { args, block, .. } => {
                let mut out: Vec<&Expr> = args.iter().collect();
                out.extend(block.as_deref());
                out
            }
        }
    }

    /// Number of sub-expressions (including `self`) equal to `needle`.
    pub fn occurrences(&self, needle: &Expr) -> usize {
        let here = usize::from(self == needle);
        here + self.children().into_iter().map(|c| c.occurrences(needle)).sum::<usize>()
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) | Self::Ident(name) => f.write_str(name),
            Self::Call { receiver, method, args } => {
                write!(f, "{receiver}.{method}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Self::Construct { ty, args, block } => {
                // Type arguments are inferred at construction sites.
                write!(f, "{}(", ty.name())?;
                write_list(f, args)?;
                f.write_str(")")?;
                if let Some(block) = block {
                    write!(f, " {{ {block} }}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_call() {
        let call = Expr::call(Expr::field("wrapped"), "put", vec![Expr::ident("k"), Expr::ident("v")]);
        assert_eq!(call.to_string(), "wrapped.put(k, v)");
    }

    #[test]
    fn test_display_construct_forms() {
        let call = Expr::call(Expr::field("wrapped"), "all", vec![]);
        let stream = Expr::construct(
            TypeRef::generic("StreamWrapper", [TypeRef::new("Row")]),
            vec![Expr::ident("scope"), call.clone()],
        );
        assert_eq!(stream.to_string(), "StreamWrapper(scope, wrapped.all())");

        let deferred = Expr::construct_with_block(TypeRef::new("DeferredWrapper"), vec![Expr::ident("scope")], call);
        assert_eq!(deferred.to_string(), "DeferredWrapper(scope) { wrapped.all() }");
    }

    #[test]
    fn test_occurrences_counts_nested_matches() {
        let inner = Expr::call(Expr::field("wrapped"), "fetch", vec![Expr::ident("id")]);
        let outer = Expr::construct_with_block(TypeRef::new("DeferredWrapper"), vec![Expr::ident("scope")], inner.clone());

        assert_eq!(outer.occurrences(&inner), 1);
        assert_eq!(outer.occurrences(&Expr::ident("scope")), 1);
        assert_eq!(outer.occurrences(&Expr::ident("missing")), 0);
    }

    #[test]
    fn test_field_and_ident_with_same_name_differ() {
        let call = Expr::call(Expr::field("wrapped"), "merge", vec![Expr::ident("wrapped")]);
        assert_eq!(call.to_string(), "wrapped.merge(wrapped)");
        assert_ne!(Expr::field("wrapped"), Expr::ident("wrapped"));
        assert_eq!(call.occurrences(&Expr::ident("wrapped")), 1);
        assert_eq!(call.occurrences(&Expr::field("wrapped")), 1);
    }
}
