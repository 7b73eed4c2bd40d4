//! Multi-file configurations: include resolution, nesting and errors raised
//! inside included files.

use std::path::Path;

use appconf::diagnostics::ConfError;
use appconf::parser::ast::App;
use appconf::session::{Session, MAX_INCLUDE_DEPTH};

/// Write `files` under a fresh root directory and parse `app.conf`.
fn parse_project(files: &[(&str, &str)]) -> (tempfile::TempDir, Session, Result<App, ConfError>) {
    let dir = tempfile::tempdir().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
    }
    let mut session = Session::new(dir.path());
    let result = appconf::parse_file(&mut session, "app.conf");
    (dir, session, result)
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

#[test]
fn included_declarations_are_spliced_in_place() {
    let (_dir, _session, result) = parse_project(&[
        ("app.conf", "middleware 'first';\ninclude 'packages.conf';\nmiddleware 'last';\n"),
        ("packages.conf", "package 'lib' { file 'lib.js'; }\nmiddleware 'included';\n"),
    ]);
    let app = result.unwrap();
    assert_eq!(app.middlewares, vec!["first", "included", "last"]);
    assert_eq!(app.package("lib").unwrap().files, vec!["lib.js"]);
}

#[test]
fn nested_includes_resolve_against_the_including_file() {
    let (_dir, session, result) = parse_project(&[
        ("app.conf", "include 'sub/x.conf';"),
        ("sub/x.conf", "include 'y.conf';\npackage 'x' { }"),
        ("sub/y.conf", "package 'y' { }"),
        ("y.conf", "package 'wrong' { }"),
    ]);
    let app = result.unwrap();
    let names: Vec<_> = app.packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["y", "x"]);
    assert_eq!(session.sources().len(), 3);
}

#[test]
fn include_as_last_statement() {
    let (_dir, _session, result) = parse_project(&[
        ("app.conf", "ui { template [ 'a' ] }\ninclude 'tail.conf';"),
        ("tail.conf", "package 'a' { }"),
    ]);
    let app = result.unwrap();
    assert_eq!(app.ui.template, vec!["a"]);
    assert_eq!(app.packages.len(), 1);
}

#[test]
fn empty_included_file() {
    let (_dir, _session, result) = parse_project(&[
        ("app.conf", "include 'empty.conf'; middleware 'm';"),
        ("empty.conf", "// intentionally blank\n"),
    ]);
    assert_eq!(result.unwrap().middlewares, vec!["m"]);
}

#[test]
fn doubled_separators_in_include_path() {
    let (_dir, _session, result) = parse_project(&[
        ("app.conf", "include 'sub//./inner.conf';"),
        ("sub/inner.conf", "middleware 'inner';"),
    ]);
    assert_eq!(result.unwrap().middlewares, vec!["inner"]);
}

#[test]
fn diamond_includes_are_read_twice() {
    let (_dir, session, result) = parse_project(&[
        ("app.conf", "include 'a.conf'; include 'b.conf';"),
        ("a.conf", "include 'common.conf';"),
        ("b.conf", "include 'common.conf';"),
        ("common.conf", "middleware 'common';"),
    ]);
    assert_eq!(result.unwrap().middlewares, vec!["common", "common"]);
    assert_eq!(session.sources().len(), 5);
}

#[test]
fn anonymous_counter_spans_files() {
    let (_dir, _session, result) = parse_project(&[
        ("app.conf", "routes { '/' : 'a.html' [ package { } ]; }\ninclude 'more.conf';"),
        ("more.conf", "ui { javascript [ package { } ] }"),
    ]);
    let app = result.unwrap();
    assert_eq!(app.routes[0].depends, vec!["anonymous-0"]);
    assert_eq!(app.ui.javascript, vec!["anonymous-1"]);
}

#[test]
fn missing_include_names_both_files() {
    let (dir, _session, result) = parse_project(&[("app.conf", "\ninclude 'missing.conf';")]);
    match result.unwrap_err() {
        ConfError::IncludeNotFound { requested, resolved, issuer, location } => {
            assert_eq!(requested, "missing.conf");
            assert_eq!(resolved, dir.path().join("missing.conf"));
            assert_eq!(issuer, dir.path().join("app.conf"));
            let location = location.unwrap();
            assert_eq!((location.line, location.column), (2, 9));
        }
        other => panic!("expected include error, got {other}"),
    }
}

#[test]
fn include_of_a_directory_is_not_found() {
    let (_dir, _session, result) = parse_project(&[
        ("app.conf", "include 'sub';"),
        ("sub/x.conf", ""),
    ]);
    assert!(matches!(result.unwrap_err(), ConfError::IncludeNotFound { .. }));
}

#[test]
fn self_include_hits_the_depth_limit() {
    let (_dir, session, result) = parse_project(&[("app.conf", "include 'app.conf';")]);
    match result.unwrap_err() {
        ConfError::Structural { msg, .. } => assert!(msg.contains("nested deeper")),
        other => panic!("expected structural error, got {other}"),
    }
    assert_eq!(session.sources().len(), MAX_INCLUDE_DEPTH);
}

#[test]
fn errors_inside_included_files_point_at_them() {
    let (_dir, session, result) = parse_project(&[
        ("app.conf", "package 'ok' { }\ninclude 'broken.conf';"),
        ("broken.conf", "package 'x' {\n  directory 'a'\n}"),
    ]);
    let err = result.unwrap_err();
    let location = err.location().unwrap();
    assert_eq!(file_name(&location.file), "broken.conf");
    assert_eq!((location.line, location.column), (3, 1));
    assert!(session.sources().get(location.span.file_id).is_some());
    assert!(matches!(err, ConfError::Syntax { .. }));
}

#[test]
fn lexical_error_in_included_file() {
    let (_dir, _session, result) = parse_project(&[
        ("app.conf", "include 'bad.conf';"),
        ("bad.conf", "package 'x' { # }"),
    ]);
    match result.unwrap_err() {
        ConfError::Lexical { ch, location } => {
            assert_eq!(ch, '#');
            assert_eq!(file_name(&location.file), "bad.conf");
            assert_eq!(location.column, 15);
        }
        other => panic!("expected lexical error, got {other}"),
    }
}

#[test]
fn duplicate_package_across_files() {
    let (_dir, _session, result) = parse_project(&[
        ("app.conf", "package 'p' { }\ninclude 'again.conf';"),
        ("again.conf", "package 'p' { }"),
    ]);
    assert!(matches!(result.unwrap_err(), ConfError::Structural { .. }));
}

#[test]
fn missing_root_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(dir.path());
    let err = appconf::parse_file(&mut session, "app.conf").unwrap_err();
    assert!(matches!(err, ConfError::Io { .. }));
}
