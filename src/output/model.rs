use serde::Serialize;

use crate::analysis::MatchResult;
use crate::base::SourcePosition;
use crate::hir::Symbol;

/// Where a reported type is declared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Position {
    pub filename: String,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Base file name plus line and column, as shown in plain listings.
    pub fn short(&self) -> String {
        let base = self
            .filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.filename);
        format!("{}:{}:{}", base, self.line, self.column)
    }
}

impl From<&SourcePosition> for Position {
    fn from(position: &SourcePosition) -> Self {
        Self {
            filename: position.file.display().to_string(),
            line: position.line,
            column: position.column,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// A reported type: its textual type and declaration position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultIdentifier {
    pub name: String,
    pub pos: Position,
}

impl From<&Symbol> for ResultIdentifier {
    fn from(symbol: &Symbol) -> Self {
        Self {
            name: symbol.type_string(),
            pos: Position::from(&symbol.declaration),
        }
    }
}

/// Serializable projection of a [`MatchResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RenderedResult {
    pub interface: ResultIdentifier,
    pub implementers: Vec<ResultIdentifier>,
}

impl From<&MatchResult> for RenderedResult {
    fn from(result: &MatchResult) -> Self {
        let mut implementers: Vec<ResultIdentifier> =
            result.implementers.iter().map(ResultIdentifier::from).collect();
        implementers.sort_by(|a, b| a.pos.cmp(&b.pos).then_with(|| a.name.cmp(&b.name)));
        Self {
            interface: ResultIdentifier::from(&result.interface),
            implementers,
        }
    }
}

/// Project and sort results so output is stable across runs.
pub fn rendered(results: &[MatchResult]) -> Vec<RenderedResult> {
    let mut rendered: Vec<RenderedResult> = results.iter().map(RenderedResult::from).collect();
    rendered.sort_by(|a, b| {
        a.interface
            .pos
            .cmp(&b.interface.pos)
            .then_with(|| a.interface.name.cmp(&b.interface.name))
    });
    rendered
}
