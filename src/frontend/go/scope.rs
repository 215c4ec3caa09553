//! Package scope: declarations, imports and type lowering.

use std::cell::RefCell;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::base::constants::{BLANK_IDENT, is_predeclared_type};
use crate::base::{LineIndex, PackageId, SourcePosition, TextSize};
use crate::frontend::FrontendError;
use crate::hir::{MethodName, MethodSet, Signature, StructField, Ty, TypeOwner};
use crate::parser::{
    AstNode, FieldDecl, InterfaceElem, InterfaceType, ParamList, ResultClause, SourceFile,
    StructType, SyntaxNode, SyntaxToken, TypeExpr, TypeName, TypeSpec,
};

// ============================================================================
// Files and imports
// ============================================================================

/// One parsed file of the package being resolved.
pub(super) struct PackageFile {
    pub path: Arc<Path>,
    pub tree: SourceFile,
    line_index: LineIndex,
    /// Import name to import path.
    imports: FxHashMap<SmolStr, SmolStr>,
    dot_imports: Vec<SmolStr>,
}

impl PackageFile {
    pub fn new(path: Arc<Path>, tree: SourceFile, line_index: LineIndex) -> Self {
        let mut imports = FxHashMap::default();
        let mut dot_imports = Vec::new();
        for spec in tree.imports() {
            let Some(path) = spec.path() else { continue };
            let path = SmolStr::from(path);
            if spec.is_dot() {
                dot_imports.push(path);
                continue;
            }
            let name = match spec.name() {
                Some(name) => SmolStr::from(name.text()),
                None => import_name(&path),
            };
            if name != BLANK_IDENT {
                imports.insert(name, path);
            }
        }
        Self {
            path,
            tree,
            line_index,
            imports,
            dot_imports,
        }
    }

    pub fn position(&self, offset: TextSize) -> SourcePosition {
        let (line, column) = self.line_index.line_col(offset);
        SourcePosition::new(self.path.clone(), line, column)
    }

    pub fn node_position(&self, node: &SyntaxNode) -> SourcePosition {
        self.position(node.text_range().start())
    }

    pub fn token_position(&self, token: &SyntaxToken) -> SourcePosition {
        self.position(token.text_range().start())
    }

    fn import_path(&self, name: &str) -> Option<&SmolStr> {
        self.imports.get(name)
    }
}

/// Package name an import path is referred to by when no name is given.
///
/// The last path element, skipping a `/vN` major version suffix and
/// stripping `go-` prefixes and `.vN` suffixes (`gopkg.in/yaml.v3` is
/// `yaml`).
pub(super) fn import_name(path: &str) -> SmolStr {
    let mut segments = path.rsplit('/');
    let mut last = segments.next().unwrap_or(path);
    if is_major_version(last) {
        if let Some(previous) = segments.next() {
            last = previous;
        }
    }
    let last = last.strip_prefix("go-").unwrap_or(last);
    let last = match last.rsplit_once(".v") {
        Some((head, version)) if is_major_version(&format!("v{}", version)) => head,
        _ => last,
    };
    last.into()
}

fn is_major_version(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

// ============================================================================
// Declarations
// ============================================================================

/// A package-level type declaration.
#[derive(Debug, Clone)]
pub(super) struct TypeDecl {
    pub name: SmolStr,
    pub file: usize,
    pub spec: TypeSpec,
    pub position: SourcePosition,
    pub offset: TextSize,
}

impl TypeDecl {
    pub fn is_alias(&self) -> bool {
        self.spec.is_alias()
    }

    pub fn is_generic(&self) -> bool {
        self.spec.is_generic()
    }
}

/// What a defined type is underneath its name.
#[derive(Debug, Clone)]
pub(super) enum Underlying {
    Interface {
        methods: Arc<MethodSet>,
        /// Has type-set terms; usable only as a constraint.
        constraint: bool,
        /// Embeds an interface from a package that is never loaded, so
        /// `methods` is incomplete.
        partial: bool,
    },
    Struct {
        file: usize,
        ty: StructType,
    },
    /// A type from a package that is never loaded.
    Imported { path: SmolStr },
    Other,
}

/// Method set of an interface type plus whether it is a constraint.
#[derive(Default)]
pub(super) struct InterfaceMethods {
    pub methods: MethodSet,
    pub constraint: bool,
    pub partial: bool,
}

impl InterfaceMethods {
    fn constraint() -> Self {
        Self {
            constraint: true,
            ..Self::default()
        }
    }

    fn partial() -> Self {
        Self {
            partial: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
enum Resolution {
    InProgress,
    Done(Underlying),
}

/// Package-level scope of one package.
pub(super) struct PackageScope {
    pub package: PackageId,
    pub files: Vec<PackageFile>,
    decls: IndexMap<SmolStr, TypeDecl>,
    underlying: RefCell<FxHashMap<SmolStr, Resolution>>,
    expanding_aliases: RefCell<Vec<SmolStr>>,
}

impl PackageScope {
    pub fn new(package: PackageId, files: Vec<PackageFile>) -> Result<Self, FrontendError> {
        let mut decls: IndexMap<SmolStr, TypeDecl> = IndexMap::new();
        for (index, file) in files.iter().enumerate() {
            for spec in file.tree.type_specs() {
                let Some(name) = spec.name() else { continue };
                let text = SmolStr::from(name.text());
                if text == BLANK_IDENT {
                    continue;
                }
                let offset = name.range().start();
                let decl = TypeDecl {
                    name: text.clone(),
                    file: index,
                    position: file.position(offset),
                    offset,
                    spec,
                };
                if let Some(previous) = decls.get(&text) {
                    return Err(FrontendError::Redeclared {
                        position: decl.position,
                        name: text.to_string(),
                        previous: previous.position.clone(),
                    });
                }
                decls.insert(text, decl);
            }
        }
        tracing::trace!(package = %package, types = decls.len(), "collected declarations");
        Ok(Self {
            package,
            files,
            decls,
            underlying: RefCell::default(),
            expanding_aliases: RefCell::default(),
        })
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeDecl> {
        self.decls.get(name)
    }

    pub fn decls(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.values()
    }

    pub fn method_name(&self, name: &str) -> MethodName {
        MethodName::new(name, &self.package)
    }

    fn missing(&self, file: usize, node: &SyntaxNode, what: &str) -> FrontendError {
        FrontendError::syntax(self.files[file].node_position(node), format!("missing {}", what))
    }

    fn undefined(&self, file: usize, token: &SyntaxToken) -> FrontendError {
        FrontendError::undefined(self.files[file].token_position(token), token.text())
    }

    /// Run `f` on the right-hand side of alias `decl`, failing on alias cycles.
    fn expand_alias<T>(
        &self,
        decl: &TypeDecl,
        f: impl FnOnce(&Self, usize, &TypeExpr) -> Result<T, FrontendError>,
    ) -> Result<T, FrontendError> {
        if self.expanding_aliases.borrow().contains(&decl.name) {
            return Err(FrontendError::recursive(decl.position.clone(), decl.name.as_str()));
        }
        self.expanding_aliases.borrow_mut().push(decl.name.clone());
        let result = match decl.spec.ty() {
            Some(expr) => f(self, decl.file, &expr),
            None => Err(self.missing(decl.file, decl.spec.syntax(), "type")),
        };
        self.expanding_aliases.borrow_mut().pop();
        result
    }

    // ========================================================================
    // Lowering: type expressions to descriptors
    // ========================================================================

    pub fn lower_type(&self, file: usize, expr: &TypeExpr) -> Result<Ty, FrontendError> {
        match expr {
            TypeExpr::Name(name) => self.lower_type_name(file, name),
            TypeExpr::Pointer(p) => Ok(Ty::pointer(self.lower_elem(file, p.elem(), p.syntax())?)),
            TypeExpr::Slice(s) => Ok(Ty::Slice(Box::new(
                self.lower_elem(file, s.elem(), s.syntax())?,
            ))),
            TypeExpr::Array(a) => Ok(Ty::Array {
                len: a.len_text().into(),
                elem: Box::new(self.lower_elem(file, a.elem(), a.syntax())?),
            }),
            TypeExpr::Map(m) => Ok(Ty::Map {
                key: Box::new(self.lower_elem(file, m.key(), m.syntax())?),
                value: Box::new(self.lower_elem(file, m.value(), m.syntax())?),
            }),
            TypeExpr::Chan(c) => Ok(Ty::Chan {
                dir: c.direction(),
                elem: Box::new(self.lower_elem(file, c.elem(), c.syntax())?),
            }),
            TypeExpr::Func(f) => Ok(Ty::Func(Box::new(
                self.lower_signature(file, f.params(), f.result())?,
            ))),
            TypeExpr::Struct(s) => Ok(Ty::Struct(self.lower_struct_fields(file, s)?)),
            TypeExpr::Interface(i) => Ok(Ty::Interface(Box::new(
                self.interface_methods(file, i)?.methods,
            ))),
            TypeExpr::Paren(p) => self.lower_elem(file, p.inner(), p.syntax()),
        }
    }

    fn lower_elem(
        &self,
        file: usize,
        elem: Option<TypeExpr>,
        parent: &SyntaxNode,
    ) -> Result<Ty, FrontendError> {
        match elem {
            Some(expr) => self.lower_type(file, &expr),
            None => Err(self.missing(file, parent, "type")),
        }
    }

    fn lower_type_name(&self, file: usize, name: &TypeName) -> Result<Ty, FrontendError> {
        let ident = name
            .name_token()
            .ok_or_else(|| self.missing(file, name.syntax(), "type name"))?;
        let args = name
            .type_args()
            .iter()
            .map(|arg| self.lower_type(file, arg))
            .collect::<Result<Vec<_>, _>>()?;
        let text = SmolStr::from(ident.text());

        if let Some(qualifier) = name.qualifier() {
            let path = self.files[file]
                .import_path(qualifier.text())
                .ok_or_else(|| self.undefined(file, &qualifier))?;
            return Ok(Ty::Named {
                owner: TypeOwner::Imported(path.clone()),
                name: text,
                args,
            });
        }

        if let Some(decl) = self.decls.get(&text) {
            if decl.is_alias() {
                return self.expand_alias(decl, |scope, file, expr| scope.lower_type(file, expr));
            }
            return Ok(Ty::Named {
                owner: TypeOwner::Local(self.package.clone()),
                name: text,
                args,
            });
        }

        match text.as_str() {
            "byte" => Ok(Ty::universe("uint8")),
            "rune" => Ok(Ty::universe("int32")),
            "any" => Ok(Ty::empty_interface()),
            predeclared if is_predeclared_type(predeclared) => Ok(Ty::universe(predeclared)),
            _ => match self.files[file].dot_imports.first() {
                Some(path) => Ok(Ty::Named {
                    owner: TypeOwner::Imported(path.clone()),
                    name: text,
                    args,
                }),
                None => Err(self.undefined(file, &ident)),
            },
        }
    }

    pub fn lower_struct_fields(
        &self,
        file: usize,
        ty: &StructType,
    ) -> Result<Vec<StructField>, FrontendError> {
        let mut fields = Vec::new();
        for field in ty.fields() {
            let lowered = self.lower_elem(file, field.ty(), field.syntax())?;
            if field.is_embedded() {
                let Some(name) = embedded_field_name(&field) else {
                    return Err(self.missing(file, field.syntax(), "embedded type name"));
                };
                let lowered = if field.is_pointer_embed() {
                    Ty::pointer(lowered)
                } else {
                    lowered
                };
                fields.push(StructField {
                    name,
                    ty: lowered,
                    embedded: true,
                });
            } else {
                for name in field.names() {
                    fields.push(StructField {
                        name: name.text().into(),
                        ty: lowered.clone(),
                        embedded: false,
                    });
                }
            }
        }
        Ok(fields)
    }

    pub fn lower_signature(
        &self,
        file: usize,
        params: Option<ParamList>,
        result: Option<ResultClause>,
    ) -> Result<Signature, FrontendError> {
        let (params, variadic) = match params {
            Some(list) => self.lower_params(file, &list)?,
            None => (Vec::new(), false),
        };
        let results = match result {
            None => Vec::new(),
            Some(result) => match result.params() {
                Some(list) => self.lower_params(file, &list)?.0,
                None => vec![self.lower_elem(file, result.ty(), result.syntax())?],
            },
        };
        Ok(Signature::new(params, results, variadic))
    }

    /// Parameter types of a list, applying Go's grouping rule: once any
    /// parameter is named, a bare identifier is a name sharing the type of
    /// the next typed parameter (`a, b int`).
    fn lower_params(&self, file: usize, list: &ParamList) -> Result<(Vec<Ty>, bool), FrontendError> {
        let params: Vec<_> = list.params().collect();
        let grouped = params.iter().any(|p| p.name().is_some());
        let mut types = Vec::with_capacity(params.len());
        let mut variadic = false;
        let mut pending = 0usize;

        for param in &params {
            if grouped && param.name().is_none() {
                pending += 1;
                continue;
            }
            let mut ty = self.lower_elem(file, param.ty(), param.syntax())?;
            if param.is_variadic() {
                ty = Ty::Slice(Box::new(ty));
                variadic = true;
            }
            for _ in 0..pending {
                types.push(ty.clone());
            }
            pending = 0;
            types.push(ty);
        }

        if pending > 0 {
            return Err(FrontendError::syntax(
                self.files[file].node_position(list.syntax()),
                "mixed named and unnamed parameters",
            ));
        }
        Ok((types, variadic))
    }

    // ========================================================================
    // Underlying types
    // ========================================================================

    /// Underlying type of the package-level type `name`.
    pub fn underlying_of(&self, name: &str) -> Result<Underlying, FrontendError> {
        match self.decls.get(name) {
            Some(decl) => self.underlying_of_decl(decl),
            None => Ok(Underlying::Other),
        }
    }

    fn underlying_of_decl(&self, decl: &TypeDecl) -> Result<Underlying, FrontendError> {
        if decl.is_alias() {
            return self.expand_alias(decl, |scope, file, expr| scope.underlying_of_expr(file, expr));
        }

        let cached = self.underlying.borrow().get(&decl.name).cloned();
        match cached {
            Some(Resolution::Done(underlying)) => return Ok(underlying),
            Some(Resolution::InProgress) => {
                return Err(FrontendError::recursive(decl.position.clone(), decl.name.as_str()));
            }
            None => {}
        }

        self.underlying
            .borrow_mut()
            .insert(decl.name.clone(), Resolution::InProgress);
        let result = match decl.spec.ty() {
            Some(expr) => self.underlying_of_expr(decl.file, &expr),
            None => Err(self.missing(decl.file, decl.spec.syntax(), "type")),
        };
        match &result {
            Ok(underlying) => {
                self.underlying
                    .borrow_mut()
                    .insert(decl.name.clone(), Resolution::Done(underlying.clone()));
            }
            Err(_) => {
                self.underlying.borrow_mut().remove(&decl.name);
            }
        }
        result
    }

    fn underlying_of_expr(&self, file: usize, expr: &TypeExpr) -> Result<Underlying, FrontendError> {
        match expr {
            TypeExpr::Name(name) => self.underlying_of_name(file, name),
            TypeExpr::Paren(p) => match p.inner() {
                Some(inner) => self.underlying_of_expr(file, &inner),
                None => Err(self.missing(file, p.syntax(), "type")),
            },
            TypeExpr::Interface(iface) => {
                let InterfaceMethods {
                    methods,
                    constraint,
                    partial,
                } = self.interface_methods(file, iface)?;
                Ok(Underlying::Interface {
                    methods: Arc::new(methods),
                    constraint,
                    partial,
                })
            }
            TypeExpr::Struct(ty) => {
                self.lower_struct_fields(file, ty)?;
                Ok(Underlying::Struct {
                    file,
                    ty: ty.clone(),
                })
            }
            other => {
                self.lower_type(file, other)?;
                Ok(Underlying::Other)
            }
        }
    }

    fn underlying_of_name(&self, file: usize, name: &TypeName) -> Result<Underlying, FrontendError> {
        let ident = name
            .name_token()
            .ok_or_else(|| self.missing(file, name.syntax(), "type name"))?;

        if let Some(qualifier) = name.qualifier() {
            let path = self.files[file]
                .import_path(qualifier.text())
                .ok_or_else(|| self.undefined(file, &qualifier))?;
            return Ok(Underlying::Imported { path: path.clone() });
        }

        if name.has_type_args() {
            // Instantiations would need substitution of type parameters.
            self.lower_type_name(file, name)?;
            tracing::debug!(
                package = %self.package,
                name = ident.text(),
                "generic instantiation treated as opaque"
            );
            return Ok(Underlying::Other);
        }

        if let Some(decl) = self.decls.get(ident.text()) {
            return self.underlying_of_decl(decl);
        }

        match ident.text() {
            "error" => Ok(Underlying::Interface {
                methods: Arc::new(self.error_methods()),
                constraint: false,
                partial: false,
            }),
            "any" => Ok(Underlying::Interface {
                methods: Arc::default(),
                constraint: false,
                partial: false,
            }),
            "comparable" => Ok(Underlying::Interface {
                methods: Arc::default(),
                constraint: true,
                partial: false,
            }),
            predeclared if is_predeclared_type(predeclared) => Ok(Underlying::Other),
            _ => match self.files[file].dot_imports.first() {
                Some(path) => Ok(Underlying::Imported { path: path.clone() }),
                None => Err(self.undefined(file, &ident)),
            },
        }
    }

    /// Method set of the predeclared `error` interface.
    pub fn error_methods(&self) -> MethodSet {
        let mut methods = MethodSet::new();
        methods.insert(
            self.method_name("Error"),
            Signature::new(Vec::new(), vec![Ty::universe("string")], false),
        );
        methods
    }

    // ========================================================================
    // Interfaces
    // ========================================================================

    /// Own methods plus those of every embedded interface, recursively.
    pub fn interface_methods(
        &self,
        file: usize,
        iface: &InterfaceType,
    ) -> Result<InterfaceMethods, FrontendError> {
        let mut methods = MethodSet::new();
        let mut explicit: FxHashSet<SmolStr> = FxHashSet::default();
        let mut constraint = false;
        let mut partial = false;

        for elem in iface.elems() {
            match elem {
                InterfaceElem::Method(spec) => {
                    let name = spec
                        .name()
                        .ok_or_else(|| self.missing(file, spec.syntax(), "method name"))?;
                    let text = SmolStr::from(name.text());
                    if text == BLANK_IDENT {
                        continue;
                    }
                    let position = self.files[file].position(name.range().start());
                    if !explicit.insert(text.clone()) {
                        return Err(FrontendError::duplicate_method(position, text.as_str()));
                    }
                    let signature = self.lower_signature(file, spec.params(), spec.result())?;
                    add_method(&mut methods, self.method_name(&text), signature, &position)?;
                }
                InterfaceElem::Embedded(embedded) => {
                    let position = self.files[file].node_position(embedded.syntax());
                    let expr = embedded
                        .ty()
                        .ok_or_else(|| self.missing(file, embedded.syntax(), "embedded type"))?;
                    let inner = self.embedded_interface(file, &expr, &position)?;
                    constraint |= inner.constraint;
                    partial |= inner.partial;
                    for (name, signature) in inner.methods.iter() {
                        add_method(&mut methods, name.clone(), signature.clone(), &position)?;
                    }
                }
                InterfaceElem::TypeSet(_) => constraint = true,
            }
        }

        Ok(InterfaceMethods {
            methods,
            constraint,
            partial,
        })
    }

    /// Methods contributed by one embedded interface element. A non-interface
    /// element is a type-set term and turns the interface into a constraint;
    /// an interface from an unloaded package contributes nothing and marks
    /// the result partial.
    fn embedded_interface(
        &self,
        file: usize,
        expr: &TypeExpr,
        position: &SourcePosition,
    ) -> Result<InterfaceMethods, FrontendError> {
        match expr {
            TypeExpr::Paren(p) => match p.inner() {
                Some(inner) => self.embedded_interface(file, &inner, position),
                None => Err(self.missing(file, p.syntax(), "type")),
            },
            TypeExpr::Interface(iface) => self.interface_methods(file, iface),
            TypeExpr::Name(name) => {
                if name.has_type_args() {
                    tracing::debug!(
                        package = %self.package,
                        "embedded generic interface treated as a constraint"
                    );
                    return Ok(InterfaceMethods::constraint());
                }
                match self.underlying_of_name(file, name)? {
                    Underlying::Interface {
                        methods,
                        constraint,
                        partial,
                    } => Ok(InterfaceMethods {
                        methods: (*methods).clone(),
                        constraint,
                        partial,
                    }),
                    Underlying::Imported { path } => {
                        tracing::warn!(
                            at = %position,
                            embedded = %name.syntax().text(),
                            import = %path,
                            "embedded interface from an unloaded package; \
                             the enclosing interface is left out of matching"
                        );
                        Ok(InterfaceMethods::partial())
                    }
                    Underlying::Struct { .. } | Underlying::Other => {
                        Ok(InterfaceMethods::constraint())
                    }
                }
            }
            _ => Ok(InterfaceMethods::constraint()),
        }
    }
}

/// Add a method; a name already present with another signature is a conflict.
fn add_method(
    methods: &mut MethodSet,
    name: MethodName,
    signature: Signature,
    position: &SourcePosition,
) -> Result<(), FrontendError> {
    match methods.get(&name) {
        Some(existing) if *existing != signature => Err(FrontendError::duplicate_method(
            position.clone(),
            name.as_str(),
        )),
        Some(_) => Ok(()),
        None => {
            methods.insert(name, signature);
            Ok(())
        }
    }
}

/// Name of an embedded field: the type name without qualifier or pointer.
pub(super) fn embedded_field_name(field: &FieldDecl) -> Option<SmolStr> {
    match field.ty()? {
        TypeExpr::Name(name) => name.name_token().map(|t| SmolStr::from(t.text())),
        _ => None,
    }
}
