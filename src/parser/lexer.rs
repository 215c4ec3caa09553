//! Logos-based lexer for Go source
//!
//! Fast tokenization using the logos crate, plus Go's automatic semicolon
//! insertion: a newline that ends a line whose last token is an identifier,
//! a literal, one of `break continue fallthrough return ++ -- ) ] }` is
//! reported as [`SyntaxKind::NEWLINE`] instead of whitespace.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Byte order mark Go permits at the very start of a file.
const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    /// A leading byte order mark, emitted as whitespace before anything else.
    bom: Option<&'a str>,
    /// Offset of `inner`'s input within the whole source.
    base: u32,
    /// Whether the last significant token asks for a semicolon at the next newline.
    semicolon_pending: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let (bom, rest) = match input.strip_prefix(BYTE_ORDER_MARK) {
            Some(rest) => (Some(&input[..BYTE_ORDER_MARK.len_utf8()]), rest),
            None => (None, input),
        };
        Self {
            inner: LogosToken::lexer(rest),
            bom,
            base: (input.len() - rest.len()) as u32,
            semicolon_pending: false,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(text) = self.bom.take() {
            return Some(Token {
                kind: SyntaxKind::WHITESPACE,
                text,
                offset: TextSize::new(0),
            });
        }

        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.base + self.inner.span().start as u32);

        let kind = match logos_token {
            Ok(LogosToken::Newline) => {
                if std::mem::take(&mut self.semicolon_pending) {
                    SyntaxKind::NEWLINE
                } else {
                    SyntaxKind::WHITESPACE
                }
            }
            // A block comment spanning lines acts like a newline.
            Ok(LogosToken::BlockComment) if text.contains('\n') && self.semicolon_pending => {
                self.semicolon_pending = false;
                SyntaxKind::NEWLINE
            }
            Ok(t) => {
                let kind: SyntaxKind = t.into();
                if !kind.is_trivia() {
                    self.semicolon_pending = kind.triggers_semicolon();
                }
                kind
            }
            Err(()) => {
                self.semicolon_pending = false;
                SyntaxKind::ERROR
            }
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[bB][01_]+")]
    #[regex(r"0[oO][0-7_]+")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+")]
    Float,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?i")]
    Imaginary,

    #[regex(r"'(\\.|[^\\'\n])+'")]
    Rune,

    #[regex(r#""(\\.|[^\\"\n])*""#)]
    #[regex(r"`[^`]*`")]
    String,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token(":=")]
    ColonEq,
    #[token("*")]
    Star,
    #[token("<-")]
    Arrow,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("+")]
    #[token("-")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("^")]
    #[token("<<")]
    #[token(">>")]
    #[token("&^")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("&^=")]
    #[token("&&")]
    #[token("||")]
    #[token("==")]
    #[token("!=")]
    #[token("<")]
    #[token("<=")]
    #[token(">")]
    #[token(">=")]
    #[token("!")]
    Operator,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace | Newline => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,

            // Literals
            Ident => SyntaxKind::IDENT,
            Int => SyntaxKind::INT,
            Float => SyntaxKind::FLOAT,
            Imaginary => SyntaxKind::IMAGINARY,
            Rune => SyntaxKind::RUNE,
            String => SyntaxKind::STRING,

            // Keywords
            Break => SyntaxKind::BREAK_KW,
            Case => SyntaxKind::CASE_KW,
            Chan => SyntaxKind::CHAN_KW,
            Const => SyntaxKind::CONST_KW,
            Continue => SyntaxKind::CONTINUE_KW,
            Default => SyntaxKind::DEFAULT_KW,
            Defer => SyntaxKind::DEFER_KW,
            Else => SyntaxKind::ELSE_KW,
            Fallthrough => SyntaxKind::FALLTHROUGH_KW,
            For => SyntaxKind::FOR_KW,
            Func => SyntaxKind::FUNC_KW,
            Go => SyntaxKind::GO_KW,
            Goto => SyntaxKind::GOTO_KW,
            If => SyntaxKind::IF_KW,
            Import => SyntaxKind::IMPORT_KW,
            Interface => SyntaxKind::INTERFACE_KW,
            Map => SyntaxKind::MAP_KW,
            Package => SyntaxKind::PACKAGE_KW,
            Range => SyntaxKind::RANGE_KW,
            Return => SyntaxKind::RETURN_KW,
            Select => SyntaxKind::SELECT_KW,
            Struct => SyntaxKind::STRUCT_KW,
            Switch => SyntaxKind::SWITCH_KW,
            Type => SyntaxKind::TYPE_KW,
            Var => SyntaxKind::VAR_KW,

            // Punctuation
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Dot => SyntaxKind::DOT,
            Ellipsis => SyntaxKind::ELLIPSIS,
            Comma => SyntaxKind::COMMA,
            Eq => SyntaxKind::EQ,
            ColonEq => SyntaxKind::COLON_EQ,
            Star => SyntaxKind::STAR,
            Arrow => SyntaxKind::ARROW,
            Tilde => SyntaxKind::TILDE,
            Pipe => SyntaxKind::PIPE,
            PlusPlus => SyntaxKind::PLUS_PLUS,
            MinusMinus => SyntaxKind::MINUS_MINUS,
            Operator => SyntaxKind::OPERATOR,
        }
    }
}
