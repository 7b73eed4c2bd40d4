// Property-based tests for the parser: generated well-formed configurations
// always parse, and the declaration tree mirrors what was generated.

use appconf::parse_str;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct GenPackage {
    files: Vec<String>,
    routes: Vec<(String, usize)>,
}

fn value() -> impl Strategy<Value = String> {
    "[a-z0-9_./-]{1,10}"
}

fn gen_package() -> impl Strategy<Value = GenPackage> {
    (
        prop::collection::vec(value(), 0..4),
        prop::collection::vec((value(), 0usize..3), 0..3),
    )
        .prop_map(|(files, routes)| GenPackage { files, routes })
}

/// Render packages named `pkg0..pkgN`. Each route depends on `n` inline
/// anonymous packages.
fn render(packages: &[GenPackage]) -> String {
    let mut out = String::new();
    for (i, pkg) in packages.iter().enumerate() {
        out.push_str(&format!("package 'pkg{i}' {{\n"));
        for file in &pkg.files {
            out.push_str(&format!("    file '{file}';\n"));
        }
        if !pkg.routes.is_empty() {
            out.push_str("    routes {\n");
            for (path, inline) in &pkg.routes {
                let deps: Vec<String> = (0..*inline).map(|_| "package { }".to_string()).collect();
                out.push_str(&format!("        '/{path}' : 't.html' [ {} ];\n", deps.join(", ")));
            }
            out.push_str("    }\n");
        }
        out.push_str("}\n");
    }
    out
}

#[test]
fn prop_generated_configs_parse() {
    proptest!(|(packages in prop::collection::vec(gen_package(), 0..6))| {
        let src = render(&packages);
        let app = parse_str(&src).map_err(|e| TestCaseError::fail(format!("{e}\n{src}")))?;

        let inline: usize = packages.iter().flat_map(|p| &p.routes).map(|(_, n)| n).sum();
        prop_assert_eq!(app.packages.len(), packages.len() + inline);
        prop_assert!(app.routes.is_empty());
    });
}

#[test]
fn prop_routes_stay_in_their_package() {
    proptest!(|(packages in prop::collection::vec(gen_package(), 1..6))| {
        let app = parse_str(&render(&packages)).unwrap();
        for (i, pkg) in packages.iter().enumerate() {
            let parsed = app.package(&format!("pkg{i}")).unwrap();
            prop_assert_eq!(&parsed.files, &pkg.files);
            let paths: Vec<String> = parsed.routes.iter().map(|r| r.path.clone()).collect();
            let expected: Vec<String> = pkg.routes.iter().map(|(p, _)| format!("/{p}")).collect();
            prop_assert_eq!(paths, expected);
        }
    });
}

#[test]
fn prop_anonymous_names_are_sequential() {
    proptest!(|(packages in prop::collection::vec(gen_package(), 0..6))| {
        let app = parse_str(&render(&packages)).unwrap();
        let anonymous: Vec<&str> = app
            .packages
            .iter()
            .filter(|p| p.is_anonymous())
            .map(|p| p.name.as_str())
            .collect();
        let expected: Vec<String> = (0..anonymous.len()).map(|n| format!("anonymous-{n}")).collect();
        prop_assert_eq!(anonymous, expected);

        for route in app.all_routes() {
            for dep in &route.depends {
                prop_assert!(app.package(dep).is_some());
            }
        }
    });
}

#[test]
fn prop_comments_do_not_change_the_tree() {
    proptest!(|(packages in prop::collection::vec(gen_package(), 0..4), comment in "[a-z ]{0,20}")| {
        let plain = render(&packages);
        let commented = plain.replace('\n', &format!(" // {comment}\n"));
        prop_assert_eq!(parse_str(&plain).unwrap(), parse_str(&commented).unwrap());
    });
}
