//! Class and method descriptions consumed by the synthesizer.
//!
//! These types describe a class the way a compiled-metadata reader sees it:
//! names, parameter lists, nominal types and a calling-convention tag per
//! method. They are plain values with structural equality and are never
//! mutated by the synthesizer.
//!
//! # Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`TypeRef`] | Nominal type, optionally with type arguments |
//! | [`Parameter`] | Parameter name + type |
//! | [`CallingConvention`] | `Direct`, `Deferred` or `Streaming` |
//! | [`Modifier`] | Declaration modifiers (`Override`, `Suspend`, ...) |
//! | [`MethodDescription`] | One method signature, plus a body on output |
//! | [`ClassDescription`] | The input class |

use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::expr::Expr;

/// A nominal type reference.
///
/// Two references are equal when their names and type arguments are equal.
/// No generic unification or subtyping is performed.
///
/// # Example
///
/// ```
/// use wrapsynth::TypeRef;
///
/// let user = TypeRef::new("User");
/// let deferred = TypeRef::generic("DeferredWrapper", [user.clone()]);
/// assert_eq!(deferred.to_string(), "DeferredWrapper<User>");
/// assert_eq!(deferred.arguments(), &[user]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeRef {
    name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    arguments: Vec<TypeRef>,
}

impl TypeRef {
    /// Create a reference with no type arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Create a reference with type arguments, in order.
    pub fn generic(name: impl Into<String>, arguments: impl IntoIterator<Item = TypeRef>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into_iter().collect(),
        }
    }

    /// The type's identifier, without arguments.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type arguments in declaration order.
    #[inline]
    pub fn arguments(&self) -> &[TypeRef] {
        &self.arguments
    }

    /// Same arguments, different identifier.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: self.arguments.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some((first, rest)) = self.arguments.split_first() {
            write!(f, "<{first}")?;
            for arg in rest {
                write!(f, ", {arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// A named, typed method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    /// Parameter name as declared.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
}

impl Parameter {
    /// Create a parameter.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// How a method hands its result back to the caller.
///
/// | Variant | Original shape | Wrapper exposes |
/// |---------|----------------|-----------------|
/// | `Direct` | returns a value | same value |
/// | `Deferred` | suspending call | deferred-result wrapper |
/// | `Streaming` | asynchronous multi-value sequence | stream wrapper |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CallingConvention {
    /// Returns its result directly.
    #[default]
    Direct,
    /// Suspends; the result arrives later.
    Deferred,
    /// Produces an asynchronous sequence of values.
    Streaming,
}

impl fmt::Display for CallingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct",
            Self::Deferred => "deferred",
            Self::Streaming => "streaming",
        })
    }
}

/// Declaration modifiers carried on a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Modifier {
    /// Publicly visible.
    Public,
    /// Overrides a supertype member.
    Override,
    /// Suspending call marker. Never present on wrapper methods.
    Suspend,
}

/// A method signature, with a body once rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodDescription {
    /// Method name.
    pub name: String,
    /// Parameters in declaration order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parameters: Vec<Parameter>,
    /// Declared return type.
    pub return_type: TypeRef,
    /// Calling convention of the declaration.
    #[cfg_attr(feature = "serde", serde(default))]
    pub calling_convention: CallingConvention,
    /// Declaration modifiers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: BTreeSet<Modifier>,
    /// Body expression. Absent on input signatures.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub body: Option<Expr>,
}

impl MethodDescription {
    /// A public method with no parameters and no body.
    pub fn new(name: impl Into<String>, return_type: TypeRef, calling_convention: CallingConvention) -> Self {
        let mut modifiers = BTreeSet::from([Modifier::Public]);
        if calling_convention == CallingConvention::Deferred {
            modifiers.insert(Modifier::Suspend);
        }
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type,
            calling_convention,
            modifiers,
            body: None,
        }
    }

    /// Append a parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.parameters.push(Parameter::new(name, ty));
        self
    }

    /// Add a modifier.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Whether `modifier` is present.
    #[inline]
    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Whether this method is flagged as overriding a supertype member.
    #[inline]
    pub fn is_override(&self) -> bool {
        self.has_modifier(Modifier::Override)
    }

    /// Name and parameter list (names and types, in order) both match.
    ///
    /// Return types and modifiers do not take part in the comparison.
    pub fn same_signature(&self, other: &MethodDescription) -> bool {
        self.name == other.name && self.parameters == other.parameters
    }
}

/// The class a wrapper is synthesized for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassDescription {
    /// Class name; also the delegate field's type.
    pub name: String,
    /// Methods in declaration order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub methods: Vec<MethodDescription>,
    /// Declared supertypes in declaration order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub declared_supertypes: Vec<TypeRef>,
}

impl ClassDescription {
    /// A class with no methods or supertypes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
            declared_supertypes: Vec::new(),
        }
    }

    /// Append a method.
    pub fn with_method(mut self, method: MethodDescription) -> Self {
        self.methods.push(method);
        self
    }

    /// Append a declared supertype.
    pub fn with_supertype(mut self, supertype: TypeRef) -> Self {
        self.declared_supertypes.push(supertype);
        self
    }

    /// The class as a type reference.
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::new(self.name.clone())
    }
}
