#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::hir::{Signature, Ty};
use std::fs;
use tempfile::TempDir;

fn unit_of(files: &[(&str, &str)]) -> (TempDir, CompilationUnit) {
    let dir = TempDir::new().unwrap();
    let mut paths = Vec::new();
    for (name, text) in files {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        paths.push(path);
    }
    let unit = CompilationUnit::directory(dir.path().to_path_buf(), paths);
    (dir, unit)
}

fn resolve(files: &[(&str, &str)]) -> Result<SymbolTable, FrontendError> {
    let (_dir, unit) = unit_of(files);
    GoFrontend::new().resolve(&unit)
}

fn method_names(symbol: &Symbol) -> Vec<String> {
    let mut names: Vec<_> = symbol
        .method_set
        .names()
        .map(|n| n.as_str().to_string())
        .collect();
    names.sort();
    names
}

const ZAPHOD: &str = r#"package testpkg

type Foo interface {
	Exist()
	Bar()
	Baz(qux int)
}

type Baz interface {
	Crazy()
}

type Zaphod struct{}

func (z *Zaphod) Bar()           {}
func (z *Zaphod) Baz(a int)      {}
func (z *Zaphod) Exist()         {}
func (z *Zaphod) Speak(s string) {}
"#;

#[test]
fn test_interfaces_and_receivers_become_symbols() {
    let table = resolve(&[("file1.go", ZAPHOD)]).unwrap();
    let names: Vec<_> = table.iter().map(|s| s.type_string()).collect();
    assert_eq!(
        names,
        vec![
            "testpkg.Foo",
            "testpkg.Baz",
            "testpkg.Zaphod",
            "*testpkg.Zaphod",
            "*testpkg.Zaphod",
            "*testpkg.Zaphod",
            "*testpkg.Zaphod",
        ]
    );

    let foo = table.lookup("testpkg.Foo").unwrap();
    assert_eq!(foo.kind, SymbolKind::Interface);
    assert_eq!(method_names(foo), vec!["Bar", "Baz", "Exist"]);

    let zaphod = table.lookup("testpkg.Zaphod").unwrap();
    assert_eq!(zaphod.kind, SymbolKind::Concrete);
    assert!(zaphod.method_set.is_empty());

    let pointer = table.lookup("*testpkg.Zaphod").unwrap();
    assert_eq!(method_names(pointer), vec!["Bar", "Baz", "Exist", "Speak"]);
    assert!(pointer.method_set.satisfies(&foo.method_set));
}

#[test]
fn test_receiver_reports_declaration_position() {
    let table = resolve(&[("file1.go", ZAPHOD)]).unwrap();
    let value = table.lookup("testpkg.Zaphod").unwrap();
    let pointer = table.lookup("*testpkg.Zaphod").unwrap();
    assert_eq!(pointer.declaration, value.position);
    assert_ne!(pointer.position, value.position);
    assert_eq!((value.position.line, value.position.column), (13, 6));
}

#[test]
fn test_param_names_do_not_matter() {
    let table = resolve(&[("file1.go", ZAPHOD)]).unwrap();
    let foo = table.lookup("testpkg.Foo").unwrap();
    let baz = foo
        .method_set
        .iter()
        .find(|(name, _)| name.as_str() == "Baz")
        .map(|(_, sig)| sig.clone())
        .unwrap();
    assert_eq!(baz, Signature::new(vec![Ty::universe("int")], vec![], false));
}

#[test]
fn test_value_receivers_are_in_both_method_sets() {
    let table = resolve(&[(
        "p2.go",
        r#"package p2

type Arthur int

func (a Arthur) Drink()     {}
func (a Arthur) Dine() int { return 0 }
"#,
    )])
    .unwrap();
    let value = table.lookup("p2.Arthur").unwrap();
    assert_eq!(method_names(value), vec!["Dine", "Drink"]);
}

#[test]
fn test_embedded_interface_union_and_defined_interface() {
    let table = resolve(&[(
        "p3.go",
        r#"package testpkg

type Planet interface {
	Exist()
	Bar()
	Baz(qux int)
}

type Landmass interface {
	Planet
	Form(y int) error
}

type p Planet

type Fjord struct {
	p
}

func (f *Fjord) Form(a int) error { return nil }
"#,
    )])
    .unwrap();

    let landmass = table.lookup("testpkg.Landmass").unwrap();
    assert_eq!(method_names(landmass), vec!["Bar", "Baz", "Exist", "Form"]);

    let p = table.lookup("testpkg.p").unwrap();
    assert_eq!(p.kind, SymbolKind::Interface);
    assert_eq!(method_names(p), vec!["Bar", "Baz", "Exist"]);

    let fjord = table.lookup("testpkg.Fjord").unwrap();
    assert_eq!(method_names(fjord), vec!["Bar", "Baz", "Exist"]);
    let pointer = table.lookup("*testpkg.Fjord").unwrap();
    assert_eq!(method_names(pointer), vec!["Bar", "Baz", "Exist", "Form"]);
    assert!(pointer.method_set.satisfies(&landmass.method_set));
    assert!(!fjord.method_set.satisfies(&landmass.method_set));
}

#[test]
fn test_promotion_depth_and_pointer_rules() {
    let table = resolve(&[(
        "embed.go",
        r#"package embed

type Inner struct{}

func (Inner) Value()      {}
func (*Inner) Pointer()   {}
func (Inner) Shadowed()   {}

type Middle struct {
	Inner
}

func (Middle) Shadowed() {}

type ByValue struct {
	Middle
}

type ByPointer struct {
	*Inner
}
"#,
    )])
    .unwrap();

    let by_value = table.lookup("embed.ByValue").unwrap();
    assert_eq!(method_names(by_value), vec!["Shadowed", "Value"]);

    let by_pointer = table.lookup("embed.ByPointer").unwrap();
    assert_eq!(method_names(by_pointer), vec!["Pointer", "Shadowed", "Value"]);
}

#[test]
fn test_ambiguous_promotion_is_dropped() {
    let table = resolve(&[(
        "amb.go",
        r#"package amb

type A struct{}

func (A) Run()  {}
func (A) Only() {}

type B struct{}

func (B) Run() {}

type Both struct {
	A
	B
}

type Named struct {
	A
	Run int
}
"#,
    )])
    .unwrap();
    assert_eq!(method_names(table.lookup("amb.Both").unwrap()), vec!["Only"]);
    // A shallower field shadows the promoted method.
    assert_eq!(method_names(table.lookup("amb.Named").unwrap()), vec!["Only"]);
}

#[test]
fn test_embedded_error_interface_promotes() {
    let table = resolve(&[(
        "e.go",
        "package e\n\ntype Wrapped struct {\n\terror\n}\n",
    )])
    .unwrap();
    assert_eq!(method_names(table.lookup("e.Wrapped").unwrap()), vec!["Error"]);
}

#[test]
fn test_aliases_are_transparent() {
    let table = resolve(&[(
        "a.go",
        r#"package a

type Num = int

type Adder interface {
	Add(n Num, m byte) rune
}

type Impl struct{}

func (Impl) Add(n int, m uint8) int32 { return 0 }
"#,
    )])
    .unwrap();
    assert!(table.lookup("a.Num").is_none());
    let adder = table.lookup("a.Adder").unwrap();
    let impl_ = table.lookup("a.Impl").unwrap();
    assert!(impl_.method_set.satisfies(&adder.method_set));
}

#[test]
fn test_generics_and_constraints_are_not_symbols() {
    let table = resolve(&[(
        "g.go",
        r#"package g

type Number interface {
	~int | ~float64
}

type List[T any] struct {
	items []T
}

func (l *List[T]) Push(v T) {}

type Plain struct{}
"#,
    )])
    .unwrap();
    let names: Vec<_> = table.iter().map(|s| s.type_string()).collect();
    assert_eq!(names, vec!["g.Plain"]);
}

#[test]
fn test_multiple_packages_in_one_directory() {
    let table = resolve(&[
        ("a.go", "package foo\n\ntype T struct{}\n"),
        ("a_test.go", "package foo_test\n\ntype U struct{}\n"),
    ])
    .unwrap();
    let t = table.lookup("foo.T").unwrap();
    let u = table.lookup("foo_test.U").unwrap();
    assert_ne!(t.package, u.package);
    assert_eq!(t.package.unit(), u.package.unit());
}

#[test]
fn test_files_of_one_package_share_scope() {
    let table = resolve(&[
        ("a.go", "package foo\n\ntype T struct{}\n"),
        ("b.go", "package foo\n\nfunc (t T) M() {}\n"),
    ])
    .unwrap();
    assert_eq!(method_names(table.lookup("foo.T").unwrap()), vec!["M"]);
}

#[test]
fn test_imported_types_keep_their_identity() {
    let table = resolve(&[(
        "io.go",
        r#"package x

import (
	"io"
	yaml "gopkg.in/yaml.v3"
)

type Reader interface {
	Read(r io.Reader) yaml.Node
}

type Impl struct{}

func (Impl) Read(r io.Reader) yaml.Node { return yaml.Node{} }
"#,
    )])
    .unwrap();
    let reader = table.lookup("x.Reader").unwrap();
    assert!(table.lookup("x.Impl").unwrap().method_set.satisfies(&reader.method_set));
}

#[test]
fn test_unexported_methods_are_package_scoped() {
    let table = resolve(&[(
        "u.go",
        "package u\n\ntype I interface {\n\tm()\n}\n\ntype T struct{}\n\nfunc (T) m() {}\n",
    )])
    .unwrap();
    let iface = table.lookup("u.I").unwrap();
    assert!(table.lookup("u.T").unwrap().method_set.satisfies(&iface.method_set));
}

#[test]
fn test_import_name() {
    assert_eq!(scope::import_name("fmt"), "fmt");
    assert_eq!(scope::import_name("github.com/acme/thing/v2"), "thing");
    assert_eq!(scope::import_name("gopkg.in/yaml.v3"), "yaml");
    assert_eq!(scope::import_name("github.com/mattn/go-sqlite3"), "sqlite3");
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_syntax_error_has_position() {
    let err = resolve(&[("broken.go", "package broken\n\ntype X interface {\n\tM(\n}\n")])
        .unwrap_err();
    let FrontendError::Syntax { position, .. } = &err else {
        panic!("expected syntax error, got {:?}", err);
    };
    assert!(position.file.ends_with("broken.go"));
    assert!(position.line >= 4);
}

#[test]
fn test_undefined_type() {
    let err = resolve(&[(
        "u.go",
        "package u\n\ntype I interface {\n\tM(x Missing)\n}\n",
    )])
    .unwrap_err();
    assert!(matches!(&err, FrontendError::Undefined { name, .. } if name == "Missing"));
    assert!(err.to_string().contains("u.go:4:"));
}

#[test]
fn test_unknown_qualifier_is_undefined() {
    let err = resolve(&[("u.go", "package u\n\ntype T struct{ r io.Reader }\n")]).unwrap_err();
    assert!(matches!(err, FrontendError::Undefined { name, .. } if name == "io"));
}

#[test]
fn test_redeclared_type() {
    let err = resolve(&[
        ("a.go", "package r\n\ntype T int\n"),
        ("b.go", "package r\n\ntype T string\n"),
    ])
    .unwrap_err();
    assert!(matches!(err, FrontendError::Redeclared { name, .. } if name == "T"));
}

#[test]
fn test_recursive_types() {
    let err = resolve(&[("r.go", "package r\n\ntype A B\n\ntype B A\n")]).unwrap_err();
    assert!(matches!(err, FrontendError::InvalidRecursiveType { .. }));

    let err = resolve(&[(
        "i.go",
        "package r\n\ntype A interface{ B }\n\ntype B interface{ A }\n",
    )])
    .unwrap_err();
    assert!(matches!(err, FrontendError::InvalidRecursiveType { .. }));
}

#[test]
fn test_self_referencing_signatures_are_fine() {
    let table = resolve(&[(
        "n.go",
        "package n\n\ntype Node interface {\n\tNext() Node\n}\n\ntype List struct{ next *List }\n",
    )])
    .unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_conflicting_embedded_methods() {
    let err = resolve(&[(
        "d.go",
        "package d\n\ntype A interface{ M() }\n\ntype B interface{ M() int }\n\ntype C interface {\n\tA\n\tB\n}\n",
    )])
    .unwrap_err();
    assert!(matches!(err, FrontendError::DuplicateMethod { method, .. } if method == "M"));
}

#[test]
fn test_duplicate_method_declaration() {
    let err = resolve(&[(
        "d.go",
        "package d\n\ntype T struct{}\n\nfunc (T) M() {}\n\nfunc (*T) M() {}\n",
    )])
    .unwrap_err();
    assert!(matches!(err, FrontendError::DuplicateMethod { method, .. } if method == "T.M"));
}

#[test]
fn test_embedded_imported_interface_marks_interface_partial() {
    let table = resolve(&[(
        "i.go",
        "package i\n\nimport \"io\"\n\ntype RC interface {\n\tio.Reader\n\tClose() error\n}\n\ntype Outer interface {\n\tRC\n}\n\ntype Closer interface{ Close() error }\n",
    )])
    .unwrap();
    let rc = table.lookup("i.RC").unwrap();
    assert!(rc.is_interface());
    assert!(rc.partial);
    assert_eq!(method_names(rc), vec!["Close"]);
    assert!(table.lookup("i.Outer").unwrap().partial);
    assert!(!table.lookup("i.Closer").unwrap().partial);
}

#[test]
fn test_struct_embedding_imported_type_keeps_own_methods() {
    let table = resolve(&[(
        "w.go",
        "package w\n\nimport \"os\"\n\ntype W struct {\n\t*os.File\n}\n\nfunc (w W) Name() string { return \"\" }\n",
    )])
    .unwrap();
    let w = table.lookup("w.W").unwrap();
    assert!(!w.partial);
    assert_eq!(method_names(w), vec!["Name"]);
}

#[test]
fn test_blank_receiver_is_not_a_symbol() {
    let table = resolve(&[(
        "b.go",
        "package b\n\ntype T struct{}\n\nfunc (_ *T) M() {}\n\nfunc (*T) N() {}\n",
    )])
    .unwrap();
    let names: Vec<_> = table.iter().map(|s| s.type_string()).collect();
    assert_eq!(names, vec!["b.T"]);
}

#[test]
fn test_method_on_interface_is_invalid_receiver() {
    let err = resolve(&[(
        "r.go",
        "package r\n\ntype I interface{ M() }\n\nfunc (i I) N() {}\n",
    )])
    .unwrap_err();
    assert!(matches!(err, FrontendError::InvalidReceiver { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let unit = CompilationUnit::directory(
        dir.path().to_path_buf(),
        vec![dir.path().join("gone.go")],
    );
    let err = GoFrontend::new().resolve(&unit).unwrap_err();
    assert!(matches!(err, FrontendError::Io { .. }));
}
