//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree
//! of a Go source file. Only declaration-level structure gets its own node
//! kinds; function bodies and value declarations are kept as token runs.

/// All syntax kinds (tokens and nodes) of a Go source file
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, type expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    /// A newline that terminates a statement (automatic semicolon insertion)
    NEWLINE,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,
    INT,
    FLOAT,
    IMAGINARY,
    RUNE,
    STRING,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,   // {
    R_BRACE,   // }
    L_BRACKET, // [
    R_BRACKET, // ]
    L_PAREN,   // (
    R_PAREN,   // )
    SEMICOLON, // ;
    COLON,     // :
    DOT,       // .
    ELLIPSIS,  // ...
    COMMA,     // ,
    EQ,        // =
    COLON_EQ,  // :=
    STAR,      // *
    ARROW,     // <-
    TILDE,     // ~
    PIPE,      // |
    PLUS_PLUS, // ++
    MINUS_MINUS, // --
    /// Any other operator; never structurally significant at declaration level
    OPERATOR,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    BREAK_KW,
    CASE_KW,
    CHAN_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DEFER_KW,
    ELSE_KW,
    FALLTHROUGH_KW,
    FOR_KW,
    FUNC_KW,
    GO_KW,
    GOTO_KW,
    IF_KW,
    IMPORT_KW,
    INTERFACE_KW,
    MAP_KW,
    PACKAGE_KW,
    RANGE_KW,
    RETURN_KW,
    SELECT_KW,
    STRUCT_KW,
    SWITCH_KW,
    TYPE_KW,
    VAR_KW,

    // =========================================================================
    // NODES - declarations
    // =========================================================================
    SOURCE_FILE,
    PACKAGE_CLAUSE,
    IMPORT_DECL,
    IMPORT_SPEC,
    TYPE_DECL,
    TYPE_SPEC,
    TYPE_PARAMS,
    FUNC_DECL,
    RECEIVER,
    PARAM_LIST,
    PARAM,
    RESULT,
    BLOCK,
    VALUE_DECL,
    NAME,

    // =========================================================================
    // NODES - type expressions
    // =========================================================================
    TYPE_NAME,
    TYPE_ARGS,
    POINTER_TYPE,
    SLICE_TYPE,
    ARRAY_TYPE,
    ARRAY_LEN,
    MAP_TYPE,
    CHAN_TYPE,
    FUNC_TYPE,
    STRUCT_TYPE,
    FIELD_DECL,
    INTERFACE_TYPE,
    METHOD_SPEC,
    EMBEDDED_ELEM,
    TYPE_SET_ELEM,
    PAREN_TYPE,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::BREAK_KW as u16) && (self as u16) <= (Self::VAR_KW as u16)
    }

    /// Check if this token ends a statement or declaration
    pub fn is_terminator(self) -> bool {
        matches!(self, Self::SEMICOLON | Self::NEWLINE)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INT | Self::FLOAT | Self::IMAGINARY | Self::RUNE | Self::STRING
        )
    }

    /// Whether a newline directly after this token inserts a semicolon.
    pub fn triggers_semicolon(self) -> bool {
        self == Self::IDENT
            || self.is_literal()
            || matches!(
                self,
                Self::BREAK_KW
                    | Self::CONTINUE_KW
                    | Self::FALLTHROUGH_KW
                    | Self::RETURN_KW
                    | Self::PLUS_PLUS
                    | Self::MINUS_MINUS
                    | Self::R_PAREN
                    | Self::R_BRACKET
                    | Self::R_BRACE
            )
    }

    /// Whether this token can begin a type expression.
    pub fn starts_type(self) -> bool {
        matches!(
            self,
            Self::IDENT
                | Self::STAR
                | Self::L_BRACKET
                | Self::L_PAREN
                | Self::ARROW
                | Self::MAP_KW
                | Self::CHAN_KW
                | Self::FUNC_KW
                | Self::STRUCT_KW
                | Self::INTERFACE_KW
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GoLanguage {}

impl rowan::Language for GoLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<GoLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<GoLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<GoLanguage>;
