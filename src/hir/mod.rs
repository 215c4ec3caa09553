//! High-level IR (HIR): the resolved model a frontend hands to analysis.
//!
//! ## Key Types
//!
//! - [`Symbol`] - a declared type with its method set and positions
//! - [`IdentityKey`] - (package, textual type) identity of a symbol
//! - [`SymbolTable`] - all symbols of one compilation unit
//! - [`MethodSet`] - method name to [`Signature`], compared by Go identity
//! - [`Ty`] - resolved type descriptor
//!
//! Nothing here knows how symbols are produced; see [`crate::frontend`].

mod symbols;
mod types;

pub use symbols::{IdentityKey, Symbol, SymbolKind, SymbolTable};
pub use types::{MethodName, MethodSet, Signature, StructField, Ty, TypeOwner, is_exported};
