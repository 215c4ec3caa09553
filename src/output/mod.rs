//! Result rendering: plain text, JSON and XML.
//!
//! Every format renders the same projection ([`RenderedResult`]), sorted by
//! declaration position so output does not depend on worker scheduling.

mod model;
mod plain;
mod xml;

#[cfg(test)]
mod tests;

pub use model::{Position, RenderedResult, ResultIdentifier, rendered};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::analysis::{ImplError, MatchResult};

/// Output format of the result listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
    Xml,
}

impl FromStr for OutputFormat {
    type Err = ImplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            other => Err(ImplError::usage(format!(
                "output format {:?} should be one of: {{plain,json,xml}}",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Json => "json",
            Self::Xml => "xml",
        })
    }
}

/// How results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub format: OutputFormat,
    /// Colour plain output. Ignored by JSON and XML.
    pub color: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Plain,
            color: true,
        }
    }
}

/// Failure while rendering results.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("formatting error")]
    Fmt(#[from] fmt::Error),
}

impl From<OutputError> for ImplError {
    fn from(err: OutputError) -> Self {
        ImplError::output(err.to_string())
    }
}

/// Render `results` in the requested format. The text always ends with a
/// newline unless it is empty.
pub fn render(results: &[MatchResult], options: &OutputOptions) -> Result<String, OutputError> {
    let rendered = rendered(results);
    match options.format {
        OutputFormat::Plain => plain::render(&rendered, options),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&rendered)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Xml => xml::render(&rendered),
    }
}
