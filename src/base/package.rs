use std::fmt;
use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;

/// Identity of one resolved package.
///
/// Two directories that both declare `package bar` produce distinct ids:
/// the id is tied to the compilation unit the package was resolved from,
/// never to its textual name alone. Resolving the same unit twice yields
/// equal ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageId {
    unit: Arc<Path>,
    name: SmolStr,
}

impl PackageId {
    pub fn new(unit: impl Into<Arc<Path>>, name: impl Into<SmolStr>) -> Self {
        Self {
            unit: unit.into(),
            name: name.into(),
        }
    }

    /// The declared package name (`package <name>`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the compilation unit the package was resolved from.
    pub fn unit(&self) -> &Path {
        &self.unit
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.unit.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_same_name_different_units_are_distinct() {
        let foo = PackageId::new(PathBuf::from("foo/bar"), "bar");
        let qux = PackageId::new(PathBuf::from("qux/bar"), "bar");
        assert_eq!(foo.name(), qux.name());
        assert_ne!(foo, qux);
    }

    #[test]
    fn test_same_unit_is_same_identity() {
        let a = PackageId::new(PathBuf::from("foo/bar"), "bar");
        let b = PackageId::new(PathBuf::from("foo/bar"), "bar");
        assert_eq!(a, b);
    }
}
