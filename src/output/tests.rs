#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::*;
use crate::base::{PackageId, SourcePosition};
use crate::hir::{Symbol, SymbolKind};

fn symbol(name: &str, pointer: bool, kind: SymbolKind, line: u32) -> Symbol {
    let file: Arc<Path> = PathBuf::from("internal/testdata/file1.go").into();
    let position = SourcePosition::new(file, line, 6);
    Symbol {
        name: name.into(),
        package: PackageId::new(PathBuf::from("internal/testdata"), "testpkg"),
        kind,
        pointer,
        position: position.clone(),
        declaration: position,
        method_set: Arc::default(),
        partial: false,
    }
}

fn foo_result() -> MatchResult {
    MatchResult {
        interface: symbol("Foo", false, SymbolKind::Interface, 3),
        implementers: vec![
            symbol("Zaphod", true, SymbolKind::Concrete, 20),
            symbol("Planet", false, SymbolKind::Interface, 9),
        ],
    }
}

fn empty_result() -> MatchResult {
    MatchResult {
        interface: symbol("Baz", false, SymbolKind::Interface, 15),
        implementers: Vec::new(),
    }
}

fn plain(results: &[MatchResult]) -> String {
    let options = OutputOptions {
        format: OutputFormat::Plain,
        color: false,
    };
    render(results, &options).unwrap()
}

#[test]
fn test_plain_aligns_and_separates_blocks() {
    let out = plain(&[empty_result(), foo_result()]);
    assert_eq!(
        out,
        "testpkg.Foo: internal/testdata/file1.go:3:6\n\
         file1.go:9:6:  testpkg.Planet\n\
         file1.go:20:6: *testpkg.Zaphod\n\
         \n\
         testpkg.Baz: internal/testdata/file1.go:15:6\n\
         No implementing types.\n"
    );
}

#[test]
fn test_plain_without_results_is_empty() {
    assert_eq!(plain(&[]), "");
}

#[test]
fn test_plain_color_wraps_names() {
    colored::control::set_override(true);
    let options = OutputOptions {
        format: OutputFormat::Plain,
        color: true,
    };
    let out = render(&[foo_result()], &options).unwrap();
    colored::control::unset_override();
    assert!(out.contains("\u{1b}["));
    assert!(out.contains("testpkg.Planet"));
}

#[test]
fn test_json_shape() {
    let options = OutputOptions {
        format: OutputFormat::Json,
        color: true,
    };
    let out = render(&[foo_result()], &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let first = &value[0];
    assert_eq!(first["Interface"]["Name"], "testpkg.Foo");
    assert_eq!(first["Interface"]["Pos"]["Line"], 3);
    assert_eq!(first["Implementers"][0]["Name"], "testpkg.Planet");
    assert_eq!(first["Implementers"][1]["Name"], "*testpkg.Zaphod");
    assert_eq!(
        first["Implementers"][1]["Pos"]["Filename"],
        "internal/testdata/file1.go"
    );
    assert!(out.ends_with("]\n"));
}

#[test]
fn test_json_empty_implementers_is_array() {
    let options = OutputOptions {
        format: OutputFormat::Json,
        color: false,
    };
    let out = render(&[empty_result()], &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(value[0]["Implementers"].as_array().unwrap().is_empty());
}

#[test]
fn test_xml_document() {
    let options = OutputOptions {
        format: OutputFormat::Xml,
        color: false,
    };
    let out = render(&[foo_result()], &options).unwrap();
    assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(out.contains("<Results>"));
    assert!(out.contains("<Name>testpkg.Foo</Name>"));
    assert!(out.contains("<Name>*testpkg.Zaphod</Name>"));
    assert!(out.contains("<Line>20</Line>"));
    assert_eq!(out.matches("<Implementers>").count(), 2);
    assert!(out.trim_end().ends_with("</Results>"));
}

#[test]
fn test_format_parsing() {
    assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert_eq!(OutputFormat::Xml.to_string(), "xml");
    assert!(matches!(
        "yaml".parse::<OutputFormat>(),
        Err(ImplError::Usage(_))
    ));
}

#[test]
fn test_short_position() {
    let pos = Position {
        filename: "a/b/p3.go".into(),
        line: 12,
        column: 6,
    };
    assert_eq!(pos.short(), "p3.go:12:6");
    assert_eq!(pos.to_string(), "a/b/p3.go:12:6");
}
