//! Method sets of concrete types: declared methods plus promotion through
//! struct embedding.
//!
//! Promotion is computed breadth-first by embedding depth. A name found at
//! a shallower depth (method or field) shadows every deeper occurrence; two
//! occurrences at the same depth are ambiguous and neither is promoted.
//! Pointer-receiver methods are only callable when the outer view is a
//! pointer or the embedding path passes through an embedded pointer.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::scope::{PackageScope, Underlying, embedded_field_name};
use crate::base::constants::{BLANK_IDENT, is_predeclared_type};
use crate::base::{SourcePosition, TextSize};
use crate::frontend::FrontendError;
use crate::hir::{MethodName, MethodSet, Signature};
use crate::parser::{AstNode, FieldDecl, FuncDecl, StructType, TypeExpr};

/// A method declared with a receiver.
#[derive(Debug, Clone)]
pub(super) struct DeclaredMethod {
    pub name: MethodName,
    pub signature: Signature,
    pub pointer_receiver: bool,
}

/// A named receiver (`func (z *Zaphod) ...`), which is itself a symbol.
#[derive(Debug, Clone)]
pub(super) struct ReceiverSite {
    pub base: SmolStr,
    pub pointer: bool,
    pub file: usize,
    pub offset: TextSize,
    pub position: SourcePosition,
}

/// All methods of a package, grouped by receiver base type.
#[derive(Debug, Default)]
pub(super) struct MethodTable {
    declared: IndexMap<SmolStr, Vec<DeclaredMethod>>,
    receivers: Vec<ReceiverSite>,
}

struct Receiver {
    base: SmolStr,
    pointer: bool,
}

impl MethodTable {
    pub fn collect(scope: &PackageScope) -> Result<Self, FrontendError> {
        let mut table = Self::default();
        for (index, file) in scope.files.iter().enumerate() {
            for func in file.tree.func_decls() {
                let Some(receiver) = receiver_of(scope, index, &func)? else {
                    continue;
                };
                let Some(name) = func.name() else { continue };
                let text = SmolStr::from(name.text());

                if let Some(param) = func.receiver().and_then(|r| r.param()) {
                    let named = param.name().filter(|n| n.text() != BLANK_IDENT);
                    if let Some(receiver_name) = named {
                        let offset = receiver_name.range().start();
                        table.receivers.push(ReceiverSite {
                            base: receiver.base.clone(),
                            pointer: receiver.pointer,
                            file: index,
                            offset,
                            position: file.position(offset),
                        });
                    }
                }

                if text == BLANK_IDENT {
                    continue;
                }
                let method = DeclaredMethod {
                    name: scope.method_name(&text),
                    signature: scope.lower_signature(index, func.params(), func.result())?,
                    pointer_receiver: receiver.pointer,
                };
                let methods = table.declared.entry(receiver.base.clone()).or_default();
                if methods.iter().any(|m| m.name == method.name) {
                    return Err(FrontendError::duplicate_method(
                        file.position(name.range().start()),
                        format!("{}.{}", receiver.base, text),
                    ));
                }
                methods.push(method);
            }
        }
        Ok(table)
    }

    pub fn declared(&self, base: &str) -> &[DeclaredMethod] {
        self.declared.get(base).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn receivers(&self) -> &[ReceiverSite] {
        &self.receivers
    }
}

/// Resolve the receiver base type of a method declaration.
///
/// Returns `None` for plain functions and for methods of generic types,
/// which are never turned into symbols.
fn receiver_of(
    scope: &PackageScope,
    file: usize,
    func: &FuncDecl,
) -> Result<Option<Receiver>, FrontendError> {
    let Some(receiver) = func.receiver() else {
        return Ok(None);
    };
    let position = scope.files[file].node_position(receiver.syntax());
    let invalid = |name: String| FrontendError::InvalidReceiver {
        position: position.clone(),
        name,
    };

    let mut expr = receiver
        .param()
        .and_then(|p| p.ty())
        .ok_or_else(|| FrontendError::syntax(position.clone(), "missing receiver"))?;
    let mut pointer = false;
    loop {
        expr = match expr {
            TypeExpr::Paren(p) => p.inner().ok_or_else(|| invalid("()".to_string()))?,
            TypeExpr::Pointer(p) if !pointer => {
                pointer = true;
                p.elem().ok_or_else(|| invalid("*".to_string()))?
            }
            other => break expr_base(scope, file, other, pointer, &invalid),
        };
    }
}

fn expr_base(
    scope: &PackageScope,
    file: usize,
    expr: TypeExpr,
    pointer: bool,
    invalid: &dyn Fn(String) -> FrontendError,
) -> Result<Option<Receiver>, FrontendError> {
    let name = match expr {
        TypeExpr::Name(name) => name,
        other => return Err(invalid(other.syntax().text().to_string())),
    };
    let text = name.syntax().text().to_string();
    if name.qualifier().is_some() {
        return Err(invalid(text));
    }
    let Some(ident) = name.name_token() else {
        return Err(invalid(text));
    };

    // Aliases attach methods to the type they denote.
    let mut decl = scope.lookup(ident.text());
    let mut hops = 0;
    while let Some(alias) = decl.filter(|d| d.is_alias()) {
        hops += 1;
        decl = match alias.spec.ty() {
            Some(TypeExpr::Name(target)) if target.qualifier().is_none() && hops < 64 => target
                .name_token()
                .and_then(|t| scope.lookup(t.text())),
            _ => return Err(invalid(text)),
        };
    }

    let Some(decl) = decl else {
        if is_predeclared_type(ident.text()) {
            return Err(invalid(text));
        }
        return Err(FrontendError::undefined(
            scope.files[file].token_position(&ident),
            ident.text(),
        ));
    };
    if decl.is_generic() || name.has_type_args() {
        tracing::debug!(receiver = %text, "skipping method of generic type");
        return Ok(None);
    }
    if matches!(scope.underlying_of(&decl.name)?, Underlying::Interface { .. }) {
        return Err(invalid(text));
    }
    Ok(Some(Receiver {
        base: decl.name.clone(),
        pointer,
    }))
}

// ============================================================================
// Promotion
// ============================================================================

/// A type reached through embedding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Embedded {
    Local(SmolStr),
    /// The predeclared `error` interface.
    Error,
}

struct Entry {
    target: Embedded,
    /// A pointer lies on the path to this type.
    indirect: bool,
}

enum Found {
    Method {
        name: MethodName,
        signature: Signature,
        callable: bool,
    },
    Field,
}

/// Method set of the local concrete type `base`, or of `*base` when `pointer`.
pub(super) fn concrete_method_set(
    scope: &PackageScope,
    table: &MethodTable,
    base: &SmolStr,
    pointer: bool,
) -> Result<MethodSet, FrontendError> {
    let mut result = MethodSet::new();
    let mut settled: FxHashSet<SmolStr> = FxHashSet::default();
    let mut seen: FxHashSet<Embedded> = FxHashSet::default();
    let mut current = vec![Entry {
        target: Embedded::Local(base.clone()),
        indirect: pointer,
    }];
    let mut depth = 0usize;

    while !current.is_empty() {
        // The same type reached twice at one depth makes its names ambiguous.
        let mut level: IndexMap<Embedded, (bool, usize)> = IndexMap::new();
        for entry in current {
            if seen.contains(&entry.target) {
                continue;
            }
            let slot = level.entry(entry.target).or_insert((false, 0));
            slot.0 |= entry.indirect;
            slot.1 += 1;
        }

        let mut found: IndexMap<SmolStr, Vec<Found>> = IndexMap::new();
        let mut next = Vec::new();
        for (target, (indirect, count)) in level {
            seen.insert(target.clone());
            let mut here: Vec<(SmolStr, Found)> = Vec::new();
            match &target {
                Embedded::Local(name) => {
                    for method in table.declared(name) {
                        here.push((
                            method.name.as_str().into(),
                            Found::Method {
                                name: method.name.clone(),
                                signature: method.signature.clone(),
                                callable: !method.pointer_receiver || indirect,
                            },
                        ));
                    }
                    match scope.underlying_of(name)? {
                        Underlying::Interface { methods, .. } => {
                            for (name, signature) in methods.iter() {
                                here.push((
                                    name.as_str().into(),
                                    Found::Method {
                                        name: name.clone(),
                                        signature: signature.clone(),
                                        callable: true,
                                    },
                                ));
                            }
                        }
                        Underlying::Struct { file, ty } => {
                            for field in ty.fields() {
                                if !field.is_embedded() {
                                    for name in field.names() {
                                        here.push((name.text().into(), Found::Field));
                                    }
                                    continue;
                                }
                                if let Some(name) = embedded_field_name(&field) {
                                    here.push((name, Found::Field));
                                }
                                if let Some(target) = embedded_target(scope, file, &field) {
                                    next.push(Entry {
                                        target,
                                        indirect: indirect || field.is_pointer_embed(),
                                    });
                                }
                            }
                        }
                        Underlying::Imported { .. } | Underlying::Other => {}
                    }
                }
                Embedded::Error => {
                    for (name, signature) in scope.error_methods().iter() {
                        here.push((
                            name.as_str().into(),
                            Found::Method {
                                name: name.clone(),
                                signature: signature.clone(),
                                callable: true,
                            },
                        ));
                    }
                }
            }
            for (raw, item) in here {
                let bucket = found.entry(raw).or_default();
                if count > 1 {
                    bucket.push(Found::Field);
                }
                bucket.push(item);
            }
        }

        for (raw, candidates) in found {
            if !settled.insert(raw) {
                continue;
            }
            if let [
                Found::Method {
                    name,
                    signature,
                    callable: true,
                },
            ] = candidates.as_slice()
            {
                result.insert(name.clone(), signature.clone());
            }
        }

        tracing::trace!(base = %base, depth, methods = result.len(), "promotion level done");
        current = next;
        depth += 1;
    }

    Ok(result)
}

/// Warn about every field of `ty` embedding a type from another package:
/// its methods are never promoted, so `owner` may miss interfaces it
/// satisfies at runtime.
pub(super) fn warn_unpromoted_embeds(
    scope: &PackageScope,
    file: usize,
    owner: &str,
    ty: &StructType,
) {
    for field in ty.fields().filter(FieldDecl::is_embedded) {
        let Some(TypeExpr::Name(name)) = field.ty() else {
            continue;
        };
        let Some(qualifier) = name.qualifier() else {
            continue;
        };
        tracing::warn!(
            at = %scope.files[file].node_position(field.syntax()),
            owner = %format!("{}.{}", scope.package.name(), owner),
            field = %name.syntax().text(),
            package = qualifier.text(),
            "methods of an embedded type from an unloaded package are not promoted"
        );
    }
}

/// The type an embedded field promotes from, if it is known.
fn embedded_target(scope: &PackageScope, file: usize, field: &FieldDecl) -> Option<Embedded> {
    let TypeExpr::Name(name) = field.ty()? else {
        return None;
    };
    if name.qualifier().is_some() {
        return None;
    }
    if name.has_type_args() {
        tracing::debug!(
            field = %name.syntax().text(),
            file = %scope.files[file].path.display(),
            "embedded generic instantiation promotes nothing"
        );
        return None;
    }

    let mut current = SmolStr::from(name.name_token()?.text());
    let mut visited: FxHashSet<SmolStr> = FxHashSet::default();
    loop {
        if !visited.insert(current.clone()) {
            return None;
        }
        match scope.lookup(&current) {
            Some(decl) if decl.is_alias() => match decl.spec.ty()? {
                TypeExpr::Name(target) if target.qualifier().is_none() => {
                    current = SmolStr::from(target.name_token()?.text());
                }
                _ => return None,
            },
            Some(decl) => return Some(Embedded::Local(decl.name.clone())),
            None if current == "error" => return Some(Embedded::Error),
            None => return None,
        }
    }
}
