//! Recursive descent parser for Go declarations
//!
//! Builds a rowan GreenNode tree from tokens. Declarations and type
//! expressions get structured nodes; function bodies and `var`/`const`
//! declarations are kept as balanced token runs. Produces a lossless CST
//! and recovers from errors at statement boundaries.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder};
use text_size::{TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse Go source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, input.len());
    parser.parse_source_file();
    parser.finish()
}

const TERMINATORS: &[SyntaxKind] = &[SyntaxKind::SEMICOLON, SyntaxKind::NEWLINE];

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    input_len: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], input_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            input_len,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection (trivia is skipped transparently)
    // =========================================================================

    /// Raw index of the n-th significant token at or after `from`.
    fn significant_index(&self, from: usize, n: usize) -> Option<usize> {
        let mut count = 0;
        for idx in from..self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return Some(idx);
                }
                count += 1;
            }
        }
        None
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.significant_index(self.pos, n)
            .map(|idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::ERROR)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        !self.at_eof() && kinds.contains(&self.current_kind())
    }

    fn at_terminator(&self) -> bool {
        self.at_any(TERMINATORS)
    }

    fn at_eof(&self) -> bool {
        self.significant_index(self.pos, 0).is_none()
    }

    /// Raw index of the bracket closing the one at `open`, if balanced.
    fn matching_close(&self, open: usize) -> Option<usize> {
        let (open_kind, close_kind) = match self.tokens[open].kind {
            SyntaxKind::L_BRACKET => (SyntaxKind::L_BRACKET, SyntaxKind::R_BRACKET),
            SyntaxKind::L_PAREN => (SyntaxKind::L_PAREN, SyntaxKind::R_PAREN),
            SyntaxKind::L_BRACE => (SyntaxKind::L_BRACE, SyntaxKind::R_BRACE),
            _ => return None,
        };
        let mut depth = 0usize;
        for idx in open..self.tokens.len() {
            let kind = self.tokens[idx].kind;
            if kind == open_kind {
                depth += 1;
            } else if kind == close_kind {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
        }
        None
    }

    /// With an identifier at the n-th significant position followed by `[`,
    /// decide whether the identifier is a name followed by a slice/array type
    /// (`s []int`, `buf [N]byte`) rather than a generic instantiation
    /// (`List[T]`).
    fn ident_then_array_type(&self, n: usize) -> bool {
        let Some(open) = self.significant_index(self.pos, n + 1) else {
            return false;
        };
        if self.tokens[open].kind != SyntaxKind::L_BRACKET {
            return false;
        }
        if self.significant_index(open + 1, 0).map(|i| self.tokens[i].kind)
            == Some(SyntaxKind::R_BRACKET)
        {
            return true;
        }
        self.matching_close(open)
            .and_then(|close| self.significant_index(close + 1, 0))
            .map(|after| self.tokens[after].kind.starts_type())
            .unwrap_or(false)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {}", what));
            false
        }
    }

    fn expect_name(&mut self) -> bool {
        if self.at(SyntaxKind::IDENT) {
            self.start_node(SyntaxKind::NAME);
            self.bump();
            self.finish_node();
            true
        } else {
            self.error("expected identifier");
            false
        }
    }

    /// Consume a statement terminator, tolerating a directly following `closing`.
    fn expect_terminator(&mut self, closing: Option<SyntaxKind>) {
        if self.at_terminator() {
            self.bump();
        } else if self.at_eof() || closing.is_some_and(|k| self.at(k)) {
            // implicit terminator
        } else {
            let mut recovery = TERMINATORS.to_vec();
            recovery.extend(closing);
            self.error_recover("expected ';' or newline", &recovery);
            if self.at_terminator() {
                self.bump();
            }
        }
    }

    fn skip_terminators(&mut self) {
        while self.at_terminator() {
            self.bump();
        }
    }

    /// Consume the balanced bracket run starting at the current token.
    fn bump_balanced(&mut self) {
        let open_kind = self.current_kind();
        let close_kind = match open_kind {
            SyntaxKind::L_BRACKET => SyntaxKind::R_BRACKET,
            SyntaxKind::L_PAREN => SyntaxKind::R_PAREN,
            SyntaxKind::L_BRACE => SyntaxKind::R_BRACE,
            _ => {
                self.bump();
                return;
            }
        };
        let mut depth = 0usize;
        while !self.at_eof() {
            let kind = self.current_kind();
            self.bump();
            if kind == open_kind {
                depth += 1;
            } else if kind == close_kind {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
        }
        self.error(format!("unclosed {:?}", open_kind));
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .significant_index(self.pos, 0)
            .map(|idx| {
                let t = &self.tokens[idx];
                TextRange::at(t.offset, TextSize::of(t.text))
            })
            .unwrap_or_else(|| TextRange::empty(TextSize::new(self.input_len as u32)));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SOURCE_FILE.into());
        self.skip_terminators();

        if self.at(SyntaxKind::PACKAGE_KW) {
            self.parse_package_clause();
        } else {
            self.error("expected 'package' clause");
        }

        while !self.at_eof() {
            match self.current_kind() {
                SyntaxKind::SEMICOLON | SyntaxKind::NEWLINE => self.bump(),
                SyntaxKind::IMPORT_KW => self.parse_import_decl(),
                SyntaxKind::TYPE_KW => self.parse_type_decl(),
                SyntaxKind::FUNC_KW => self.parse_func_decl(),
                SyntaxKind::VAR_KW | SyntaxKind::CONST_KW => self.parse_value_decl(),
                _ => self.error_recover("expected declaration", TERMINATORS),
            }
        }

        self.skip_trivia();
        self.finish_node();
    }

    fn parse_package_clause(&mut self) {
        self.start_node(SyntaxKind::PACKAGE_CLAUSE);
        self.bump(); // package
        self.expect_name();
        self.finish_node();
        self.expect_terminator(None);
    }

    fn parse_import_decl(&mut self) {
        self.start_node(SyntaxKind::IMPORT_DECL);
        self.bump(); // import
        if self.eat(SyntaxKind::L_PAREN) {
            self.skip_terminators();
            while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
                self.parse_import_spec();
                self.expect_terminator(Some(SyntaxKind::R_PAREN));
            }
            self.expect(SyntaxKind::R_PAREN, "')'");
        } else {
            self.parse_import_spec();
        }
        self.finish_node();
        self.expect_terminator(None);
    }

    fn parse_import_spec(&mut self) {
        self.start_node(SyntaxKind::IMPORT_SPEC);
        if self.at(SyntaxKind::IDENT) {
            self.expect_name();
        } else {
            self.eat(SyntaxKind::DOT);
        }
        if !self.eat(SyntaxKind::STRING) {
            self.error_recover(
                "expected import path",
                &[SyntaxKind::SEMICOLON, SyntaxKind::NEWLINE, SyntaxKind::R_PAREN],
            );
        }
        self.finish_node();
    }

    fn parse_type_decl(&mut self) {
        self.start_node(SyntaxKind::TYPE_DECL);
        self.bump(); // type
        if self.eat(SyntaxKind::L_PAREN) {
            self.skip_terminators();
            while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
                self.parse_type_spec();
                self.expect_terminator(Some(SyntaxKind::R_PAREN));
            }
            self.expect(SyntaxKind::R_PAREN, "')'");
        } else {
            self.parse_type_spec();
        }
        self.finish_node();
        self.expect_terminator(None);
    }

    fn parse_type_spec(&mut self) {
        self.start_node(SyntaxKind::TYPE_SPEC);
        if self.expect_name() {
            if self.at(SyntaxKind::L_BRACKET) && self.type_spec_has_params() {
                self.parse_type_params();
            }
            self.eat(SyntaxKind::EQ);
            self.parse_type();
        } else {
            self.error_recover(
                "expected type name",
                &[SyntaxKind::SEMICOLON, SyntaxKind::NEWLINE, SyntaxKind::R_PAREN],
            );
        }
        self.finish_node();
    }

    /// `type L[T any] ...` versus `type A [N]int` / `type S []int`.
    fn type_spec_has_params(&self) -> bool {
        if self.nth(1) != SyntaxKind::IDENT {
            return false;
        }
        matches!(
            self.nth(2),
            SyntaxKind::IDENT
                | SyntaxKind::COMMA
                | SyntaxKind::INTERFACE_KW
                | SyntaxKind::TILDE
                | SyntaxKind::L_BRACKET
                | SyntaxKind::FUNC_KW
                | SyntaxKind::MAP_KW
                | SyntaxKind::CHAN_KW
                | SyntaxKind::STRUCT_KW
        )
    }

    fn parse_type_params(&mut self) {
        self.start_node(SyntaxKind::TYPE_PARAMS);
        self.bump_balanced();
        self.finish_node();
    }

    fn parse_func_decl(&mut self) {
        self.start_node(SyntaxKind::FUNC_DECL);
        self.bump(); // func
        if self.at(SyntaxKind::L_PAREN) {
            self.start_node(SyntaxKind::RECEIVER);
            self.parse_param_list();
            self.finish_node();
        }
        if self.expect_name() {
            if self.at(SyntaxKind::L_BRACKET) {
                self.parse_type_params();
            }
            self.parse_signature();
            if self.at(SyntaxKind::L_BRACE) {
                self.start_node(SyntaxKind::BLOCK);
                self.bump_balanced();
                self.finish_node();
            }
        } else {
            self.error_recover("expected function name", TERMINATORS);
        }
        self.finish_node();
        self.expect_terminator(None);
    }

    /// `var`/`const` declarations carry no type information we need.
    fn parse_value_decl(&mut self) {
        self.start_node(SyntaxKind::VALUE_DECL);
        self.bump(); // var | const
        while !self.at_eof() && !self.at_terminator() {
            if self.at_any(&[SyntaxKind::L_PAREN, SyntaxKind::L_BRACKET, SyntaxKind::L_BRACE]) {
                self.bump_balanced();
            } else {
                self.bump();
            }
        }
        self.finish_node();
        self.expect_terminator(None);
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    fn parse_signature(&mut self) {
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_param_list();
        } else {
            self.error("expected '('");
            return;
        }
        if self.at(SyntaxKind::L_PAREN) {
            self.start_node(SyntaxKind::RESULT);
            self.parse_param_list();
            self.finish_node();
        } else if !self.at_eof() && self.current_kind().starts_type() {
            self.start_node(SyntaxKind::RESULT);
            self.parse_type();
            self.finish_node();
        }
    }

    fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);
        self.bump(); // (
        while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) {
            let before = self.pos;
            self.parse_param();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
            if self.pos == before {
                break;
            }
        }
        if !self.eat(SyntaxKind::R_PAREN) {
            self.error_recover("expected ')'", &[SyntaxKind::R_PAREN]);
            self.eat(SyntaxKind::R_PAREN);
        }
        self.finish_node();
    }

    /// One parameter entry: `[name] [...]Type`.
    ///
    /// Whether a lone identifier is a name or a type depends on its siblings
    /// (Go's grouping rule), which is settled during lowering.
    fn parse_param(&mut self) {
        self.start_node(SyntaxKind::PARAM);
        if self.at(SyntaxKind::IDENT) {
            let name_first = match self.nth(1) {
                SyntaxKind::COMMA | SyntaxKind::R_PAREN | SyntaxKind::DOT => false,
                SyntaxKind::L_BRACKET => self.ident_then_array_type(0),
                SyntaxKind::ELLIPSIS => true,
                kind => kind.starts_type(),
            };
            if name_first {
                self.expect_name();
            }
        }
        self.eat(SyntaxKind::ELLIPSIS);
        self.parse_type();
        self.finish_node();
    }

    // =========================================================================
    // Type expressions
    // =========================================================================

    fn parse_type(&mut self) -> bool {
        match self.current_kind() {
            _ if self.at_eof() => {
                self.error("expected type");
                false
            }
            SyntaxKind::IDENT => {
                self.parse_type_name();
                true
            }
            SyntaxKind::STAR => {
                self.start_node(SyntaxKind::POINTER_TYPE);
                self.bump();
                self.parse_type();
                self.finish_node();
                true
            }
            SyntaxKind::L_BRACKET => {
                self.parse_array_or_slice();
                true
            }
            SyntaxKind::MAP_KW => {
                self.start_node(SyntaxKind::MAP_TYPE);
                self.bump();
                self.expect(SyntaxKind::L_BRACKET, "'['");
                self.parse_type();
                self.expect(SyntaxKind::R_BRACKET, "']'");
                self.parse_type();
                self.finish_node();
                true
            }
            SyntaxKind::CHAN_KW | SyntaxKind::ARROW => {
                self.start_node(SyntaxKind::CHAN_TYPE);
                if self.eat(SyntaxKind::ARROW) {
                    self.expect(SyntaxKind::CHAN_KW, "'chan'");
                } else {
                    self.bump(); // chan
                    self.eat(SyntaxKind::ARROW);
                }
                self.parse_type();
                self.finish_node();
                true
            }
            SyntaxKind::FUNC_KW => {
                self.start_node(SyntaxKind::FUNC_TYPE);
                self.bump();
                self.parse_signature();
                self.finish_node();
                true
            }
            SyntaxKind::STRUCT_KW => {
                self.parse_struct_type();
                true
            }
            SyntaxKind::INTERFACE_KW => {
                self.parse_interface_type();
                true
            }
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_TYPE);
                self.bump();
                self.parse_type();
                self.expect(SyntaxKind::R_PAREN, "')'");
                self.finish_node();
                true
            }
            _ => {
                self.error("expected type");
                false
            }
        }
    }

    /// `Name`, `pkg.Name`, optionally followed by type arguments.
    fn parse_type_name(&mut self) {
        self.start_node(SyntaxKind::TYPE_NAME);
        self.bump(); // identifier
        if self.at(SyntaxKind::DOT) {
            self.bump();
            self.expect(SyntaxKind::IDENT, "identifier after '.'");
        }
        if self.at(SyntaxKind::L_BRACKET) && self.nth(1) != SyntaxKind::R_BRACKET {
            self.start_node(SyntaxKind::TYPE_ARGS);
            self.bump(); // [
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACKET) {
                if !self.parse_type() {
                    self.error_recover("expected type argument", &[SyntaxKind::R_BRACKET]);
                    break;
                }
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
            self.expect(SyntaxKind::R_BRACKET, "']'");
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_array_or_slice(&mut self) {
        if self.nth(1) == SyntaxKind::R_BRACKET {
            self.start_node(SyntaxKind::SLICE_TYPE);
            self.bump(); // [
            self.bump(); // ]
        } else {
            self.start_node(SyntaxKind::ARRAY_TYPE);
            self.bump(); // [
            self.start_node(SyntaxKind::ARRAY_LEN);
            let mut depth = 0usize;
            while !self.at_eof() {
                match self.current_kind() {
                    SyntaxKind::R_BRACKET if depth == 0 => break,
                    SyntaxKind::L_BRACKET => depth += 1,
                    SyntaxKind::R_BRACKET => depth -= 1,
                    _ => {}
                }
                self.bump();
            }
            self.finish_node();
            self.expect(SyntaxKind::R_BRACKET, "']'");
        }
        self.parse_type();
        self.finish_node();
    }

    fn parse_struct_type(&mut self) {
        self.start_node(SyntaxKind::STRUCT_TYPE);
        self.bump(); // struct
        if self.expect(SyntaxKind::L_BRACE, "'{'") {
            self.skip_terminators();
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                self.parse_field_decl();
                self.expect_terminator(Some(SyntaxKind::R_BRACE));
            }
            self.expect(SyntaxKind::R_BRACE, "'}'");
        }
        self.finish_node();
    }

    fn parse_field_decl(&mut self) {
        self.start_node(SyntaxKind::FIELD_DECL);
        if self.at(SyntaxKind::STAR) {
            // embedded *T
            self.bump();
            if self.at(SyntaxKind::IDENT) {
                self.parse_type_name();
            } else {
                self.error("expected embedded type name");
            }
        } else if self.at(SyntaxKind::IDENT) {
            let embedded = match self.nth(1) {
                SyntaxKind::SEMICOLON
                | SyntaxKind::NEWLINE
                | SyntaxKind::R_BRACE
                | SyntaxKind::STRING
                | SyntaxKind::DOT => true,
                SyntaxKind::L_BRACKET => !self.ident_then_array_type(0),
                _ => false,
            };
            if embedded {
                self.parse_type_name();
            } else {
                self.expect_name();
                while self.eat(SyntaxKind::COMMA) {
                    self.expect_name();
                }
                self.parse_type();
            }
        } else {
            self.error_recover(
                "expected field declaration",
                &[SyntaxKind::SEMICOLON, SyntaxKind::NEWLINE, SyntaxKind::R_BRACE],
            );
        }
        self.eat(SyntaxKind::STRING); // tag
        self.finish_node();
    }

    fn parse_interface_type(&mut self) {
        self.start_node(SyntaxKind::INTERFACE_TYPE);
        self.bump(); // interface
        if self.expect(SyntaxKind::L_BRACE, "'{'") {
            self.skip_terminators();
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
                self.parse_interface_elem();
                self.expect_terminator(Some(SyntaxKind::R_BRACE));
            }
            self.expect(SyntaxKind::R_BRACE, "'}'");
        }
        self.finish_node();
    }

    fn parse_interface_elem(&mut self) {
        if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::L_PAREN {
            self.start_node(SyntaxKind::METHOD_SPEC);
            self.expect_name();
            self.parse_signature();
            self.finish_node();
            return;
        }

        // Embedded interface, or a type-set union like `~int | ~string`.
        self.skip_trivia();
        let checkpoint = self.builder.checkpoint();
        let mut type_set = false;
        loop {
            if self.eat(SyntaxKind::TILDE) {
                type_set = true;
            }
            if !self.parse_type() {
                self.error_recover(
                    "expected interface element",
                    &[SyntaxKind::SEMICOLON, SyntaxKind::NEWLINE, SyntaxKind::R_BRACE],
                );
                break;
            }
            if !self.eat(SyntaxKind::PIPE) {
                break;
            }
            type_set = true;
        }
        let kind = if type_set {
            SyntaxKind::TYPE_SET_ELEM
        } else {
            SyntaxKind::EMBEDDED_ELEM
        };
        self.builder.start_node_at(checkpoint, kind.into());
        self.finish_node();
    }
}
