//! # goimpl
//!
//! Find the declared types that structurally implement a Go interface.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! cli       → clap surface, logging setup, exit codes
//!   ↓
//! output    → plain / JSON / XML rendering of match results
//!   ↓
//! analysis  → collector, fan-in aggregator, implementer matcher
//!   ↓
//! frontend  → Frontend trait + Go declaration frontend
//!   ↓
//! project   → unit walker, compilation units, file loading
//!   ↓
//! hir       → Symbol, IdentityKey, SymbolTable, MethodSet
//!   ↓
//! parser    → Logos lexer, rowan CST, typed AST
//!   ↓
//! base      → positions, line index, package identity
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → hir → project → frontend → analysis → output)
// ============================================================================

/// Foundation types: positions, line index, package identity
pub mod base;

/// Parser: Logos lexer, rowan CST, typed AST for Go declarations
pub mod parser;

/// High-level IR: symbols and method sets
pub mod hir;

/// Project layout: compilation units and source discovery
pub mod project;

/// Frontends turning compilation units into symbol tables
pub mod frontend;

/// Query engine: collection, aggregation and matching
pub mod analysis;

/// Result rendering
pub mod output;

/// Command line surface
#[cfg(feature = "cli")]
pub mod cli;

// Re-export the query surface
pub use analysis::{Config, ImplError, InterfaceName, MatchResult, find_implementers};
pub use base::{PackageId, SourcePosition};
pub use hir::{IdentityKey, Symbol, SymbolKind};
pub use output::{OutputFormat, OutputOptions, render};
