//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for Go syntax nodes.
//! Each struct wraps a SyntaxNode and provides methods to access children.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};
use text_size::TextRange;

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
    node.children().find_map(N::cast)
}

fn children<N: AstNode>(node: &SyntaxNode) -> impl Iterator<Item = N> + use<N> {
    node.children().filter_map(N::cast)
}

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// Parse `text`; the root of every parse is a `SOURCE_FILE` node.
    pub fn parse(text: &str) -> (Self, Vec<super::SyntaxError>) {
        let parse = super::parse(text);
        (Self::from_parse(&parse), parse.errors)
    }

    /// Root of an existing parse. Green trees cross threads, syntax nodes don't.
    pub fn from_parse(parse: &super::Parse) -> Self {
        Self(parse.syntax())
    }

    pub fn package_clause(&self) -> Option<PackageClause> {
        child(&self.0)
    }

    /// Declared package name (`package <name>`).
    pub fn package_name(&self) -> Option<Name> {
        self.package_clause().and_then(|p| p.name())
    }

    /// All import specs, from single and grouped import declarations.
    pub fn imports(&self) -> impl Iterator<Item = ImportSpec> + '_ {
        children::<ImportDecl>(&self.0).flat_map(|decl| decl.specs())
    }

    /// All type specs, from single and grouped type declarations.
    pub fn type_specs(&self) -> impl Iterator<Item = TypeSpec> + '_ {
        children::<TypeDecl>(&self.0).flat_map(|decl| decl.specs())
    }

    pub fn func_decls(&self) -> impl Iterator<Item = FuncDecl> + '_ {
        children(&self.0)
    }
}

// ============================================================================
// Names
// ============================================================================

ast_node!(Name, NAME);

impl Name {
    pub fn ident(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::IDENT)
    }

    pub fn text(&self) -> String {
        self.ident().map(|t| t.text().to_string()).unwrap_or_default()
    }

    pub fn range(&self) -> TextRange {
        self.ident()
            .map(|t| t.text_range())
            .unwrap_or_else(|| self.0.text_range())
    }
}

// ============================================================================
// Package clause and imports
// ============================================================================

ast_node!(PackageClause, PACKAGE_CLAUSE);

impl PackageClause {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }
}

ast_node!(ImportDecl, IMPORT_DECL);

impl ImportDecl {
    pub fn specs(&self) -> impl Iterator<Item = ImportSpec> + use<> {
        children(&self.0)
    }
}

ast_node!(ImportSpec, IMPORT_SPEC);

impl ImportSpec {
    /// Explicit import name (`import foo "path"`), including `_`.
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    /// `import . "path"`
    pub fn is_dot(&self) -> bool {
        token(&self.0, SyntaxKind::DOT).is_some()
    }

    /// Import path with its quotes removed.
    pub fn path(&self) -> Option<String> {
        let text = token(&self.0, SyntaxKind::STRING)?.text().to_string();
        Some(text.trim_matches(|c| c == '"' || c == '`').to_string())
    }
}

// ============================================================================
// Type declarations
// ============================================================================

ast_node!(TypeDecl, TYPE_DECL);

impl TypeDecl {
    pub fn specs(&self) -> impl Iterator<Item = TypeSpec> + use<> {
        children(&self.0)
    }
}

ast_node!(TypeSpec, TYPE_SPEC);

impl TypeSpec {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    /// Whether the spec declares type parameters (`type List[T any] ...`).
    pub fn is_generic(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::TYPE_PARAMS)
    }

    /// `type A = B`
    pub fn is_alias(&self) -> bool {
        token(&self.0, SyntaxKind::EQ).is_some()
    }

    pub fn ty(&self) -> Option<TypeExpr> {
        child(&self.0)
    }
}

// ============================================================================
// Functions and signatures
// ============================================================================

ast_node!(FuncDecl, FUNC_DECL);

impl FuncDecl {
    pub fn receiver(&self) -> Option<Receiver> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn is_generic(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::TYPE_PARAMS)
    }

    pub fn params(&self) -> Option<ParamList> {
        child(&self.0)
    }

    pub fn result(&self) -> Option<ResultClause> {
        child(&self.0)
    }
}

ast_node!(Receiver, RECEIVER);

impl Receiver {
    pub fn param(&self) -> Option<Param> {
        child::<ParamList>(&self.0).and_then(|list| list.params().next())
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + use<> {
        children(&self.0)
    }
}

ast_node!(Param, PARAM);

impl Param {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    /// `...T`
    pub fn is_variadic(&self) -> bool {
        token(&self.0, SyntaxKind::ELLIPSIS).is_some()
    }

    pub fn ty(&self) -> Option<TypeExpr> {
        child(&self.0)
    }
}

ast_node!(ResultClause, RESULT);

impl ResultClause {
    /// Parenthesised results: `(int, error)`
    pub fn params(&self) -> Option<ParamList> {
        child(&self.0)
    }

    /// A single unparenthesised result type.
    pub fn ty(&self) -> Option<TypeExpr> {
        child(&self.0)
    }
}

// ============================================================================
// Type expressions
// ============================================================================

/// Any type expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Name(TypeName),
    Pointer(PointerType),
    Slice(SliceType),
    Array(ArrayType),
    Map(MapType),
    Chan(ChanType),
    Func(FuncType),
    Struct(StructType),
    Interface(InterfaceType),
    Paren(ParenType),
}

impl AstNode for TypeExpr {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::TYPE_NAME
                | SyntaxKind::POINTER_TYPE
                | SyntaxKind::SLICE_TYPE
                | SyntaxKind::ARRAY_TYPE
                | SyntaxKind::MAP_TYPE
                | SyntaxKind::CHAN_TYPE
                | SyntaxKind::FUNC_TYPE
                | SyntaxKind::STRUCT_TYPE
                | SyntaxKind::INTERFACE_TYPE
                | SyntaxKind::PAREN_TYPE
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::TYPE_NAME => Some(Self::Name(TypeName(node))),
            SyntaxKind::POINTER_TYPE => Some(Self::Pointer(PointerType(node))),
            SyntaxKind::SLICE_TYPE => Some(Self::Slice(SliceType(node))),
            SyntaxKind::ARRAY_TYPE => Some(Self::Array(ArrayType(node))),
            SyntaxKind::MAP_TYPE => Some(Self::Map(MapType(node))),
            SyntaxKind::CHAN_TYPE => Some(Self::Chan(ChanType(node))),
            SyntaxKind::FUNC_TYPE => Some(Self::Func(FuncType(node))),
            SyntaxKind::STRUCT_TYPE => Some(Self::Struct(StructType(node))),
            SyntaxKind::INTERFACE_TYPE => Some(Self::Interface(InterfaceType(node))),
            SyntaxKind::PAREN_TYPE => Some(Self::Paren(ParenType(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Name(n) => n.syntax(),
            Self::Pointer(n) => n.syntax(),
            Self::Slice(n) => n.syntax(),
            Self::Array(n) => n.syntax(),
            Self::Map(n) => n.syntax(),
            Self::Chan(n) => n.syntax(),
            Self::Func(n) => n.syntax(),
            Self::Struct(n) => n.syntax(),
            Self::Interface(n) => n.syntax(),
            Self::Paren(n) => n.syntax(),
        }
    }
}

ast_node!(TypeName, TYPE_NAME);

impl TypeName {
    fn idents(&self) -> Vec<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENT)
            .collect()
    }

    /// Package qualifier of `pkg.Name`.
    pub fn qualifier(&self) -> Option<SyntaxToken> {
        let idents = self.idents();
        if idents.len() == 2 {
            idents.into_iter().next()
        } else {
            None
        }
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.idents().pop()
    }

    pub fn has_type_args(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::TYPE_ARGS)
    }

    /// Type arguments of a generic instantiation (`List[int]`).
    pub fn type_args(&self) -> Vec<TypeExpr> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::TYPE_ARGS)
            .map(|args| children(&args).collect())
            .unwrap_or_default()
    }
}

ast_node!(PointerType, POINTER_TYPE);

impl PointerType {
    pub fn elem(&self) -> Option<TypeExpr> {
        child(&self.0)
    }
}

ast_node!(SliceType, SLICE_TYPE);

impl SliceType {
    pub fn elem(&self) -> Option<TypeExpr> {
        child(&self.0)
    }
}

ast_node!(ArrayType, ARRAY_TYPE);

impl ArrayType {
    /// Length expression as written, whitespace removed.
    pub fn len_text(&self) -> String {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ARRAY_LEN)
            .map(|n| {
                n.text()
                    .to_string()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn elem(&self) -> Option<TypeExpr> {
        child(&self.0)
    }
}

ast_node!(MapType, MAP_TYPE);

impl MapType {
    pub fn key(&self) -> Option<TypeExpr> {
        children(&self.0).next()
    }

    pub fn value(&self) -> Option<TypeExpr> {
        children(&self.0).nth(1)
    }
}

/// Direction of a channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

ast_node!(ChanType, CHAN_TYPE);

impl ChanType {
    pub fn direction(&self) -> ChanDir {
        let kinds: Vec<SyntaxKind> = self
            .0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .filter(|k| matches!(k, SyntaxKind::ARROW | SyntaxKind::CHAN_KW))
            .collect();
        match kinds.as_slice() {
            [SyntaxKind::ARROW, SyntaxKind::CHAN_KW] => ChanDir::Recv,
            [SyntaxKind::CHAN_KW, SyntaxKind::ARROW] => ChanDir::Send,
            _ => ChanDir::Both,
        }
    }

    pub fn elem(&self) -> Option<TypeExpr> {
        child(&self.0)
    }
}

ast_node!(FuncType, FUNC_TYPE);

impl FuncType {
    pub fn params(&self) -> Option<ParamList> {
        child(&self.0)
    }

    pub fn result(&self) -> Option<ResultClause> {
        child(&self.0)
    }
}

ast_node!(ParenType, PAREN_TYPE);

impl ParenType {
    pub fn inner(&self) -> Option<TypeExpr> {
        child(&self.0)
    }
}

// ============================================================================
// Struct types
// ============================================================================

ast_node!(StructType, STRUCT_TYPE);

impl StructType {
    pub fn fields(&self) -> impl Iterator<Item = FieldDecl> + use<> {
        children(&self.0)
    }
}

ast_node!(FieldDecl, FIELD_DECL);

impl FieldDecl {
    pub fn names(&self) -> Vec<Name> {
        children(&self.0).collect()
    }

    /// An embedded field has a type but no field names.
    pub fn is_embedded(&self) -> bool {
        self.names().is_empty()
    }

    /// Embedded `*T`.
    pub fn is_pointer_embed(&self) -> bool {
        self.is_embedded() && token(&self.0, SyntaxKind::STAR).is_some()
    }

    pub fn ty(&self) -> Option<TypeExpr> {
        child(&self.0)
    }
}

// ============================================================================
// Interface types
// ============================================================================

ast_node!(InterfaceType, INTERFACE_TYPE);

impl InterfaceType {
    pub fn elems(&self) -> impl Iterator<Item = InterfaceElem> + use<> {
        children(&self.0)
    }
}

/// One element of an interface body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InterfaceElem {
    Method(MethodSpec),
    Embedded(EmbeddedElem),
    TypeSet(TypeSetElem),
}

impl AstNode for InterfaceElem {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::METHOD_SPEC | SyntaxKind::EMBEDDED_ELEM | SyntaxKind::TYPE_SET_ELEM
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::METHOD_SPEC => Some(Self::Method(MethodSpec(node))),
            SyntaxKind::EMBEDDED_ELEM => Some(Self::Embedded(EmbeddedElem(node))),
            SyntaxKind::TYPE_SET_ELEM => Some(Self::TypeSet(TypeSetElem(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Method(n) => n.syntax(),
            Self::Embedded(n) => n.syntax(),
            Self::TypeSet(n) => n.syntax(),
        }
    }
}

ast_node!(MethodSpec, METHOD_SPEC);

impl MethodSpec {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn params(&self) -> Option<ParamList> {
        child(&self.0)
    }

    pub fn result(&self) -> Option<ResultClause> {
        child(&self.0)
    }
}

ast_node!(EmbeddedElem, EMBEDDED_ELEM);

impl EmbeddedElem {
    pub fn ty(&self) -> Option<TypeExpr> {
        child(&self.0)
    }
}

ast_node!(TypeSetElem, TYPE_SET_ELEM);
