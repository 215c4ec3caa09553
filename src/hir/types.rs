//! Type descriptors and method sets.
//!
//! A [`Ty`] is the resolved form of a type expression, compared by Go's
//! type identity rules: named types are identical when they name the same
//! declaration, composite types when their structure is identical. Parameter
//! names never take part in identity.

use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::PackageId;
use crate::parser::ChanDir;

/// Where a named type is declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeOwner {
    /// Predeclared (`int`, `string`, `error`, ...).
    Universe,
    /// Declared in a package resolved during this run.
    Local(PackageId),
    /// Declared in an imported package, keyed by import path. Becomes `Local`
    /// when that package is scanned in the same query.
    Imported(SmolStr),
}

/// A resolved type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    Named {
        owner: TypeOwner,
        name: SmolStr,
        args: Vec<Ty>,
    },
    Pointer(Box<Ty>),
    Slice(Box<Ty>),
    Array {
        len: SmolStr,
        elem: Box<Ty>,
    },
    Map {
        key: Box<Ty>,
        value: Box<Ty>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<Ty>,
    },
    Func(Box<Signature>),
    Struct(Vec<StructField>),
    /// An interface literal, identified by its method set.
    Interface(Box<MethodSet>),
}

impl Ty {
    pub fn universe(name: &str) -> Self {
        Ty::Named {
            owner: TypeOwner::Universe,
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// The empty interface, which `any` denotes.
    pub fn empty_interface() -> Self {
        Ty::Interface(Box::default())
    }

    pub fn pointer(elem: Ty) -> Self {
        Ty::Pointer(Box::new(elem))
    }

    /// Replace every imported owner that `local` maps to a package resolved
    /// in this run. Returns whether anything changed.
    pub fn localize(&mut self, local: &dyn Fn(&str) -> Option<PackageId>) -> bool {
        match self {
            Ty::Named { owner, args, .. } => {
                let package = match owner {
                    TypeOwner::Imported(path) => local(path.as_str()),
                    _ => None,
                };
                let changed = package.is_some();
                if let Some(package) = package {
                    *owner = TypeOwner::Local(package);
                }
                args.iter_mut().fold(changed, |acc, arg| arg.localize(local) | acc)
            }
            Ty::Pointer(elem) | Ty::Slice(elem) => elem.localize(local),
            Ty::Array { elem, .. } | Ty::Chan { elem, .. } => elem.localize(local),
            Ty::Map { key, value } => key.localize(local) | value.localize(local),
            Ty::Func(signature) => signature.localize(local),
            Ty::Struct(fields) => fields
                .iter_mut()
                .fold(false, |acc, field| field.ty.localize(local) | acc),
            Ty::Interface(methods) => methods.localize(local),
        }
    }
}

/// One field of a struct literal type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Field name; for an embedded field, the type's name.
    pub name: SmolStr,
    pub ty: Ty,
    pub embedded: bool,
}

/// A function or method signature. Receivers are not part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Ty>,
    pub results: Vec<Ty>,
    /// The final parameter is `...T` (stored as `[]T`).
    pub variadic: bool,
}

impl Signature {
    pub fn new(params: Vec<Ty>, results: Vec<Ty>, variadic: bool) -> Self {
        Self {
            params,
            results,
            variadic,
        }
    }

    /// See [`Ty::localize`].
    pub fn localize(&mut self, local: &dyn Fn(&str) -> Option<PackageId>) -> bool {
        self.params
            .iter_mut()
            .chain(self.results.iter_mut())
            .fold(false, |acc, ty| ty.localize(local) | acc)
    }
}

/// Whether `name` is exported from its package.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// A method name as seen by the identity rules.
///
/// Unexported names carry their package: `m` declared in package `a` and `m`
/// declared in package `b` are different methods.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodName {
    name: SmolStr,
    package: Option<PackageId>,
}

impl MethodName {
    pub fn new(name: impl Into<SmolStr>, package: &PackageId) -> Self {
        let name = name.into();
        let package = (!is_exported(&name)).then(|| package.clone());
        Self { name, package }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn is_exported(&self) -> bool {
        self.package.is_none()
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The methods callable on a type, keyed by name in declaration order.
#[derive(Debug, Clone, Default)]
pub struct MethodSet {
    methods: IndexMap<MethodName, Signature>,
}

impl MethodSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a method, returning the signature it replaced.
    pub fn insert(&mut self, name: MethodName, signature: Signature) -> Option<Signature> {
        self.methods.insert(name, signature)
    }

    pub fn get(&self, name: &MethodName) -> Option<&Signature> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &MethodName) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MethodName, &Signature)> {
        self.methods.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &MethodName> {
        self.methods.keys()
    }

    /// See [`Ty::localize`].
    pub fn localize(&mut self, local: &dyn Fn(&str) -> Option<PackageId>) -> bool {
        self.methods
            .values_mut()
            .fold(false, |acc, signature| signature.localize(local) | acc)
    }

    /// Every method of `required` is present here with an identical signature.
    pub fn satisfies(&self, required: &MethodSet) -> bool {
        required
            .iter()
            .all(|(name, signature)| self.get(name) == Some(signature))
    }
}

impl PartialEq for MethodSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.satisfies(other)
    }
}

impl Eq for MethodSet {}

impl FromIterator<(MethodName, Signature)> for MethodSet {
    fn from_iter<I: IntoIterator<Item = (MethodName, Signature)>>(iter: I) -> Self {
        Self {
            methods: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Display (Go syntax, used in logs and messages)
// ============================================================================

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Named { owner, name, args } => {
                match owner {
                    TypeOwner::Universe => {}
                    TypeOwner::Local(pkg) => write!(f, "{}.", pkg.name())?,
                    TypeOwner::Imported(path) => {
                        write!(f, "{}.", path.rsplit('/').next().unwrap_or(path.as_str()))?
                    }
                }
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("[")?;
                    write_list(f, args)?;
                    f.write_str("]")?;
                }
                Ok(())
            }
            Ty::Pointer(elem) => write!(f, "*{}", elem),
            Ty::Slice(elem) => write!(f, "[]{}", elem),
            Ty::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            Ty::Map { key, value } => write!(f, "map[{}]{}", key, value),
            Ty::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {}", elem),
                ChanDir::Send => write!(f, "chan<- {}", elem),
                ChanDir::Recv => write!(f, "<-chan {}", elem),
            },
            Ty::Func(sig) => write!(f, "func{}", sig),
            Ty::Struct(fields) => {
                f.write_str("struct{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if field.embedded {
                        write!(f, "{}", field.ty)?;
                    } else {
                        write!(f, "{} {}", field.name, field.ty)?;
                    }
                }
                f.write_str("}")
            }
            Ty::Interface(methods) => {
                f.write_str("interface{")?;
                for (i, (name, sig)) in methods.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}{}", name, sig)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match param {
                Ty::Slice(elem) if self.variadic && i + 1 == self.params.len() => {
                    write!(f, "...{}", elem)?
                }
                _ => write!(f, "{}", param)?,
            }
        }
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " {}", single),
            many => {
                f.write_str(" (")?;
                write_list(f, many)?;
                f.write_str(")")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Ty]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn pkg(dir: &str, name: &str) -> PackageId {
        PackageId::new(PathBuf::from(dir), name)
    }

    fn sig(params: Vec<Ty>, results: Vec<Ty>) -> Signature {
        Signature::new(params, results, false)
    }

    #[test]
    fn test_exported_names_ignore_package() {
        let a = MethodName::new("Bar", &pkg("a", "a"));
        let b = MethodName::new("Bar", &pkg("b", "b"));
        assert_eq!(a, b);
        assert!(a.is_exported());
    }

    #[test]
    fn test_unexported_names_are_package_qualified() {
        let a = MethodName::new("bar", &pkg("a", "a"));
        let b = MethodName::new("bar", &pkg("b", "b"));
        assert_ne!(a, b);
        assert_eq!(a, MethodName::new("bar", &pkg("a", "a")));
    }

    #[test]
    fn test_satisfies_requires_identical_signatures() {
        let p = pkg("t", "testpkg");
        let iface: MethodSet = [
            (MethodName::new("Exist", &p), sig(vec![], vec![])),
            (
                MethodName::new("Baz", &p),
                sig(vec![Ty::universe("int")], vec![]),
            ),
        ]
        .into_iter()
        .collect();

        let mut candidate = iface.clone();
        candidate.insert(
            MethodName::new("Speak", &p),
            sig(vec![Ty::universe("string")], vec![]),
        );
        assert!(candidate.satisfies(&iface));
        assert!(!iface.satisfies(&candidate));

        let mut wrong = MethodSet::new();
        wrong.insert(MethodName::new("Exist", &p), sig(vec![], vec![]));
        wrong.insert(
            MethodName::new("Baz", &p),
            sig(vec![Ty::universe("int64")], vec![]),
        );
        assert!(!wrong.satisfies(&iface));
    }

    #[test]
    fn test_empty_set_is_satisfied_by_anything() {
        assert!(MethodSet::new().satisfies(&MethodSet::new()));
    }

    #[test]
    fn test_method_set_equality_ignores_order() {
        let p = pkg("t", "t");
        let a: MethodSet = [
            (MethodName::new("A", &p), sig(vec![], vec![])),
            (MethodName::new("B", &p), sig(vec![], vec![])),
        ]
        .into_iter()
        .collect();
        let b: MethodSet = [
            (MethodName::new("B", &p), sig(vec![], vec![])),
            (MethodName::new("A", &p), sig(vec![], vec![])),
        ]
        .into_iter()
        .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_variadic_flag_is_part_of_identity() {
        let slice = Ty::Slice(Box::new(Ty::universe("string")));
        let plain = Signature::new(vec![slice.clone()], vec![], false);
        let variadic = Signature::new(vec![slice], vec![], true);
        assert_ne!(plain, variadic);
    }

    #[test]
    fn test_localize_rewrites_known_imports_only() {
        let b = pkg("m/b", "b");
        let imported = |path: &str, name: &str| Ty::Named {
            owner: TypeOwner::Imported(path.into()),
            name: name.into(),
            args: vec![],
        };
        let local = |path: &str| (path == "example.com/m/b").then(|| b.clone());

        let mut handle = Signature::new(
            vec![Ty::pointer(imported("example.com/m/b", "Req"))],
            vec![imported("io", "Reader")],
            false,
        );
        assert!(handle.localize(&local));
        assert_eq!(
            handle.params[0],
            Ty::pointer(Ty::Named {
                owner: TypeOwner::Local(b.clone()),
                name: "Req".into(),
                args: vec![],
            })
        );
        assert_eq!(handle.results[0], imported("io", "Reader"));
        assert!(!handle.localize(&local));

        let mut nested = Ty::Map {
            key: Box::new(Ty::universe("string")),
            value: Box::new(Ty::Slice(Box::new(imported("example.com/m/b", "Req")))),
        };
        assert!(nested.localize(&local));
    }

    #[test]
    fn test_display() {
        let p = pkg("t", "testpkg");
        let fjord = Ty::Named {
            owner: TypeOwner::Local(p.clone()),
            name: "Fjord".into(),
            args: vec![],
        };
        assert_eq!(Ty::pointer(fjord).to_string(), "*testpkg.Fjord");

        let form = Signature::new(
            vec![Ty::universe("int"), Ty::Slice(Box::new(Ty::universe("string")))],
            vec![Ty::universe("error")],
            true,
        );
        assert_eq!(form.to_string(), "(int, ...string) error");

        let reader = Ty::Named {
            owner: TypeOwner::Imported("io".into()),
            name: "Reader".into(),
            args: vec![],
        };
        let multi = Signature::new(vec![], vec![reader, Ty::universe("bool")], false);
        assert_eq!(multi.to_string(), "() (io.Reader, bool)");
    }
}
