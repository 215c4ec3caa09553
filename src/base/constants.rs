//! Domain constants shared across layers.

/// Extension of the source files a compilation unit is built from.
pub const SOURCE_EXTENSION: &str = "go";

/// Suffix marking test files (`foo_test.go`).
pub const TEST_FILE_SUFFIX: &str = "_test.go";

/// The blank identifier never names a linkable declaration.
pub const BLANK_IDENT: &str = "_";

/// Predeclared type names of the universe scope.
pub const PREDECLARED_TYPES: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Returns true if `name` is a predeclared type name.
pub fn is_predeclared_type(name: &str) -> bool {
    PREDECLARED_TYPES.contains(&name)
}
