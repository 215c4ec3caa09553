//! Foundation types for goimpl.
//!
//! This module provides fundamental types used throughout the analyzer:
//! - [`SourcePosition`] - Resolved file/line/column of a declaration
//! - [`LineIndex`] - Byte offset to line/column conversion
//! - [`PackageId`] - Identity of one resolved package
//! - Domain constants (file extensions, predeclared names)
//!
//! This module has NO dependencies on other goimpl modules.

pub mod constants;
mod line_index;
mod package;
mod position;

pub use line_index::LineIndex;
pub use package::PackageId;
pub use position::SourcePosition;

// Re-export text-size types for convenience
pub use text_size::{self, TextRange, TextSize};
