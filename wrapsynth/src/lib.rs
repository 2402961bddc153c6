//! # Wrapsynth - Calling-Convention Wrapper Synthesis
//!
//! Wrapsynth generates *wrapper types*: a type that holds an instance of some
//! class and re-exposes each of its methods under a non-suspending calling
//! convention. Suspending methods come back as deferred-result handles,
//! asynchronous sequences come back as stream handles, and plain methods are
//! forwarded untouched.
//!
//! The crate is the pure core of that transformation. Reading class metadata
//! and emitting source text are left to collaborators; the
//! `wrapsynth-macros` crate provides both for Rust `impl` blocks.
//!
//! ## Pipeline
//!
//! ```text
//! ClassDescription ──► resolve_supertypes ──┐
//!         │                                 ├──► WrapperTypeDescription
//!         └──────────► adapt_method ────────┘
//!                        └─ infer_override
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use wrapsynth::{
//!     CallingConvention, ClassDescription, GenerationContext, MethodDescription, TypeRef,
//!     synthesize,
//! };
//!
//! let class = ClassDescription::new("Repo")
//!     .with_method(
//!         MethodDescription::new("fetch", TypeRef::new("User"), CallingConvention::Deferred)
//!             .with_parameter("id", TypeRef::new("String")),
//!     )
//!     .with_method(
//!         MethodDescription::new(
//!             "changes",
//!             TypeRef::generic("Flow", [TypeRef::new("User")]),
//!             CallingConvention::Streaming,
//!         ),
//!     );
//!
//! let ctx = GenerationContext::new().with_scope_provider("scope");
//! let wrapper = synthesize(&class, &ctx)?;
//!
//! let changes = wrapper.method("changes").unwrap();
//! assert_eq!(changes.return_type.to_string(), "StreamWrapper<User>");
//! assert_eq!(changes.body.as_ref().unwrap().to_string(), "StreamWrapper(scope, wrapped.changes())");
//! # Ok::<(), wrapsynth::SynthesisError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`model`]: class, method and type descriptions
//! - [`expr`]: structured body expressions
//! - [`context`]: [`GenerationContext`] and the companion bindings
//! - [`synth`]: supertype resolution, method adaptation, override inference
//!
//! ## Logging
//!
//! Synthesis emits `tracing` events at `debug` and `trace` level under a
//! `synthesize` span. No subscriber is installed by this crate.
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for every description type.

pub mod context;
mod error;
pub mod expr;
pub mod model;
pub mod synth;

pub use context::{AdapterNames, GeneratedInterfaceBinding, GenerationContext, InterfaceSubstitutionBinding};
pub use error::SynthesisError;
pub use expr::Expr;
pub use model::{CallingConvention, ClassDescription, MethodDescription, Modifier, Parameter, TypeRef};
pub use synth::{synthesize, Constructor, DelegateField, WrapperSynthesizer, WrapperTypeDescription};
