//! Error types for frontend resolution.

use std::path::PathBuf;

use thiserror::Error;

use crate::base::SourcePosition;

/// Errors a frontend reports for one compilation unit.
///
/// Every variant except `Io` carries the source position it refers to.
#[derive(Debug, Error)]
pub enum FrontendError {
    /// A source file could not be read.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source does not parse.
    #[error("{position}: {message}")]
    Syntax {
        position: SourcePosition,
        message: String,
    },

    /// A name that resolves to nothing.
    #[error("{position}: undefined: {name}")]
    Undefined {
        position: SourcePosition,
        name: String,
    },

    /// Two package-level declarations of one name.
    #[error("{position}: {name} redeclared in this block (previous declaration at {previous})")]
    Redeclared {
        position: SourcePosition,
        name: String,
        previous: SourcePosition,
    },

    /// A type whose definition refers back to itself.
    #[error("{position}: invalid recursive type {name}")]
    InvalidRecursiveType {
        position: SourcePosition,
        name: String,
    },

    /// One method name with conflicting declarations.
    #[error("{position}: duplicate method {method}")]
    DuplicateMethod {
        position: SourcePosition,
        method: String,
    },

    /// A method declared on a type that cannot have methods.
    #[error("{position}: invalid receiver type {name}")]
    InvalidReceiver {
        position: SourcePosition,
        name: String,
    },
}

impl FrontendError {
    /// Create a syntax error.
    pub fn syntax(position: SourcePosition, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Create an undefined-name error.
    pub fn undefined(position: SourcePosition, name: impl Into<String>) -> Self {
        Self::Undefined {
            position,
            name: name.into(),
        }
    }

    /// Create an invalid recursive type error.
    pub fn recursive(position: SourcePosition, name: impl Into<String>) -> Self {
        Self::InvalidRecursiveType {
            position,
            name: name.into(),
        }
    }

    /// Create a duplicate method error.
    pub fn duplicate_method(position: SourcePosition, method: impl Into<String>) -> Self {
        Self::DuplicateMethod {
            position,
            method: method.into(),
        }
    }

    /// Position the error refers to, if it has one.
    pub fn position(&self) -> Option<&SourcePosition> {
        match self {
            Self::Io { .. } => None,
            Self::Syntax { position, .. }
            | Self::Undefined { position, .. }
            | Self::Redeclared { position, .. }
            | Self::InvalidRecursiveType { position, .. }
            | Self::DuplicateMethod { position, .. }
            | Self::InvalidReceiver { position, .. } => Some(position),
        }
    }
}
