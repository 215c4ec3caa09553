use super::*;

fn parse_ok(source: &str) -> SourceFile {
    let (file, errors) = parse_source_file(source);
    assert!(errors.is_empty(), "errors: {:?}", errors);
    file
}

fn type_spec(file: &SourceFile, name: &str) -> TypeSpec {
    file.type_specs()
        .find(|spec| spec.name().map(|n| n.text()) == Some(name.to_string()))
        .unwrap_or_else(|| panic!("no type spec {}", name))
}

fn interface_of(spec: &TypeSpec) -> InterfaceType {
    match spec.ty() {
        Some(TypeExpr::Interface(iface)) => iface,
        other => panic!("expected interface type, got {:?}", other),
    }
}

#[test]
fn test_package_clause() {
    let file = parse_ok("package testpkg\n");
    assert_eq!(file.package_name().unwrap().text(), "testpkg");
}

#[test]
fn test_leading_byte_order_mark_is_skipped() {
    let source = "\u{FEFF}package p\n\ntype I interface{ M() }\n";
    let file = parse_ok(source);
    assert_eq!(file.package_name().unwrap().text(), "p");
    assert_eq!(interface_of(&type_spec(&file, "I")).elems().count(), 1);
    assert_eq!(file.syntax().text().to_string(), source);
}

#[test]
fn test_missing_package_clause_is_an_error() {
    let (_, errors) = parse_source_file("type Foo int\n");
    assert!(!errors.is_empty());
    assert!(errors[0].message.contains("package"));
}

#[test]
fn test_imports_single_grouped_named_and_dot() {
    let file = parse_ok(
        r#"package p

import "fmt"

import (
    str "strings"
    . "math"
    _ "embed"
    "github.com/acme/thing/v2"
)
"#,
    );
    let specs: Vec<_> = file.imports().collect();
    assert_eq!(specs.len(), 5);
    assert_eq!(specs[0].path().as_deref(), Some("fmt"));
    assert!(specs[0].name().is_none());
    assert_eq!(specs[1].name().unwrap().text(), "str");
    assert!(specs[2].is_dot());
    assert_eq!(specs[3].name().unwrap().text(), "_");
    assert_eq!(specs[4].path().as_deref(), Some("github.com/acme/thing/v2"));
}

#[test]
fn test_interface_methods_and_embedding() {
    let file = parse_ok(
        r#"package testpkg

type Foo interface {
    Exist()
    Bar()
    Baz(qux int)
}

type Human interface {
    Planet
    Speak(s string)
}
"#,
    );

    let foo = interface_of(&type_spec(&file, "Foo"));
    let names: Vec<String> = foo
        .elems()
        .filter_map(|e| match e {
            InterfaceElem::Method(m) => m.name().map(|n| n.text()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["Exist", "Bar", "Baz"]);

    let human = interface_of(&type_spec(&file, "Human"));
    let elems: Vec<_> = human.elems().collect();
    assert_eq!(elems.len(), 2);
    let InterfaceElem::Embedded(embedded) = &elems[0] else {
        panic!("expected embedded element, got {:?}", elems[0]);
    };
    let Some(TypeExpr::Name(planet)) = embedded.ty() else {
        panic!("expected type name");
    };
    assert_eq!(planet.name_token().unwrap().text(), "Planet");
    assert!(matches!(elems[1], InterfaceElem::Method(_)));
}

#[test]
fn test_type_set_elements() {
    let file = parse_ok("package p\n\ntype Number interface {\n    ~int | ~float64\n}\n");
    let number = interface_of(&type_spec(&file, "Number"));
    let elems: Vec<_> = number.elems().collect();
    assert_eq!(elems.len(), 1);
    assert!(matches!(elems[0], InterfaceElem::TypeSet(_)));
}

#[test]
fn test_method_receivers() {
    let file = parse_ok(
        r#"package testpkg

func (z *Zaphod) Bar() {}

func (Arthur) Drink() {
    if true {
        return
    }
}

func helper(a, b int) (int, error) { return 0, nil }
"#,
    );
    let funcs: Vec<_> = file.func_decls().collect();
    assert_eq!(funcs.len(), 3);

    let bar = funcs[0].receiver().unwrap().param().unwrap();
    assert_eq!(bar.name().unwrap().text(), "z");
    assert!(matches!(bar.ty(), Some(TypeExpr::Pointer(_))));
    assert_eq!(funcs[0].name().unwrap().text(), "Bar");

    let drink = funcs[1].receiver().unwrap().param().unwrap();
    assert!(drink.name().is_none());
    assert!(matches!(drink.ty(), Some(TypeExpr::Name(_))));

    assert!(funcs[2].receiver().is_none());
    let result = funcs[2].result().unwrap();
    assert_eq!(result.params().unwrap().params().count(), 2);
}

#[test]
fn test_grouped_params_keep_lone_identifiers() {
    let file = parse_ok("package p\n\nfunc f(a, b int, c ...string) {}\n");
    let func = file.func_decls().next().unwrap();
    let params: Vec<_> = func.params().unwrap().params().collect();
    assert_eq!(params.len(), 3);
    // `a` is parsed as a bare type; lowering regroups it as a name.
    assert!(params[0].name().is_none());
    assert_eq!(params[1].name().unwrap().text(), "b");
    assert!(params[2].is_variadic());
}

#[test]
fn test_struct_fields_and_embeds() {
    let file = parse_ok(
        r#"package p

type Fjord struct {
    p
    *Base
    io.Reader
    x, y int `json:"x"`
    buf [4]byte
    List[int]
}
"#,
    );
    let Some(TypeExpr::Struct(fjord)) = type_spec(&file, "Fjord").ty() else {
        panic!("expected struct");
    };
    let fields: Vec<_> = fjord.fields().collect();
    assert_eq!(fields.len(), 6);
    assert!(fields[0].is_embedded());
    assert!(!fields[0].is_pointer_embed());
    assert!(fields[1].is_pointer_embed());
    let Some(TypeExpr::Name(reader)) = fields[2].ty() else {
        panic!("expected qualified name");
    };
    assert_eq!(reader.qualifier().unwrap().text(), "io");
    assert_eq!(fields[3].names().len(), 2);
    assert!(matches!(fields[4].ty(), Some(TypeExpr::Array(_))));
    assert!(fields[5].is_embedded());
    let Some(TypeExpr::Name(list)) = fields[5].ty() else {
        panic!("expected generic instantiation");
    };
    assert!(list.has_type_args());
}

#[test]
fn test_generic_and_array_type_specs() {
    let file = parse_ok(
        "package p\n\ntype List[T any] struct{ items []T }\n\ntype Buf [16]byte\n\ntype Alias = Buf\n",
    );
    assert!(type_spec(&file, "List").is_generic());

    let buf = type_spec(&file, "Buf");
    assert!(!buf.is_generic());
    let Some(TypeExpr::Array(array)) = buf.ty() else {
        panic!("expected array type");
    };
    assert_eq!(array.len_text(), "16");

    assert!(type_spec(&file, "Alias").is_alias());
}

#[test]
fn test_grouped_type_decl() {
    let file = parse_ok("package p\n\ntype (\n    A int\n    B interface{ M() }\n)\n");
    let names: Vec<_> = file
        .type_specs()
        .filter_map(|s| s.name().map(|n| n.text()))
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn test_channel_and_func_types() {
    let file = parse_ok(
        "package p\n\ntype S struct {\n    in <-chan int\n    out chan<- int\n    both chan int\n    cb func(int) error\n    m map[string][]byte\n}\n",
    );
    let Some(TypeExpr::Struct(s)) = type_spec(&file, "S").ty() else {
        panic!("expected struct");
    };
    let dirs: Vec<_> = s
        .fields()
        .filter_map(|f| match f.ty() {
            Some(TypeExpr::Chan(c)) => Some(c.direction()),
            _ => None,
        })
        .collect();
    assert_eq!(dirs, vec![ChanDir::Recv, ChanDir::Send, ChanDir::Both]);

    let kinds: Vec<_> = s.fields().skip(3).map(|f| f.ty()).collect();
    assert!(matches!(kinds[0], Some(TypeExpr::Func(_))));
    assert!(matches!(kinds[1], Some(TypeExpr::Map(_))));
}

#[test]
fn test_value_decls_and_bodies_are_skipped() {
    let file = parse_ok(
        r#"package p

var (
    x = map[string]int{"a": 1}
    y = func() int { return 2 }()
)

const z = 3

func main() {
    type local struct{}
    _ = local{}
}

type After int
"#,
    );
    let names: Vec<_> = file
        .type_specs()
        .filter_map(|s| s.name().map(|n| n.text()))
        .collect();
    assert_eq!(names, vec!["After"]);
}

#[test]
fn test_syntax_error_has_range() {
    let source = "package p\n\ntype Broken interface {\n    Exist(\n}\n";
    let (_, errors) = parse_source_file(source);
    assert!(!errors.is_empty());
    let start = u32::from(errors[0].range.start()) as usize;
    assert!(start <= source.len());
}

#[test]
fn test_cst_is_lossless() {
    let source = "package p // trailing\n\n/* block */\ntype A interface {\n\tM(x int) (y string)\n}\n";
    let (file, _) = parse_source_file(source);
    assert_eq!(file.syntax().text().to_string(), source);
}
