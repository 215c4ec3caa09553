//! Errors surfaced by the query engine.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::frontend::FrontendError;
use crate::project::WalkError;

/// Terminal failure of one query.
#[derive(Debug, Error)]
pub enum ImplError {
    /// The root path is missing or unreadable.
    #[error("{}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory-only entry point was given a file.
    #[error("{}: path must be a directory", .0.display())]
    NotADirectory(PathBuf),

    /// A compilation unit failed to resolve.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Malformed user input, detected before the engine runs.
    #[error("{0}")]
    Usage(String),

    /// Results could not be rendered.
    #[error("cannot render results: {0}")]
    Output(String),

    /// A collector worker panicked.
    #[error("a collector worker panicked")]
    WorkerPanicked,

    /// The caller cancelled the query.
    #[error("query cancelled")]
    Cancelled,
}

impl ImplError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::Output(message.into())
    }
}

impl From<WalkError> for ImplError {
    fn from(err: WalkError) -> Self {
        match err {
            WalkError::Path { path, source } => ImplError::Path { path, source },
            WalkError::NotADirectory(path) => ImplError::NotADirectory(path),
        }
    }
}

/// A frontend failure with the compilation unit it happened in.
///
/// Re-wrapping with [`ResolutionError::context`] builds an explicit chain:
/// [`inner`](ResolutionError::inner) walks one level down and
/// [`root`](ResolutionError::root) reaches the [`FrontendError`].
#[derive(Debug, Error)]
#[error("{message}: {cause}")]
pub struct ResolutionError {
    unit: PathBuf,
    message: String,
    #[source]
    cause: Cause,
}

#[derive(Debug, Error)]
enum Cause {
    #[error(transparent)]
    Frontend(FrontendError),
    #[error(transparent)]
    Wrapped(Box<ResolutionError>),
}

impl ResolutionError {
    /// Wrap a frontend failure for `unit`.
    pub fn new(unit: &Path, err: FrontendError) -> Self {
        let message = match err {
            FrontendError::Io { .. } | FrontendError::Syntax { .. } => {
                format!("failed to parse {}", unit.display())
            }
            _ => format!("type-check failed in {}", unit.display()),
        };
        Self {
            unit: unit.to_path_buf(),
            message,
            cause: Cause::Frontend(err),
        }
    }

    /// Add an outer context message, keeping this error as the inner cause.
    pub fn context(self, message: impl Into<String>) -> Self {
        Self {
            unit: self.unit.clone(),
            message: message.into(),
            cause: Cause::Wrapped(Box::new(self)),
        }
    }

    pub fn unit(&self) -> &Path {
        &self.unit
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped resolution error, if this one only adds context.
    pub fn inner(&self) -> Option<&ResolutionError> {
        match &self.cause {
            Cause::Wrapped(inner) => Some(inner),
            Cause::Frontend(_) => None,
        }
    }

    /// The frontend failure at the bottom of the chain.
    pub fn root(&self) -> &FrontendError {
        let mut current = self;
        loop {
            match &current.cause {
                Cause::Frontend(err) => return err,
                Cause::Wrapped(inner) => current = inner,
            }
        }
    }
}
