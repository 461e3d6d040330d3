//! End-to-end tests over serialized program trees
//!
//! Each fixture in `tests/fixtures` is a parser hand-over tree (`*.json`)
//! next to the source text its spans point into (`*.shade`).

use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value};
use shade::ast::{Expr, Program, ToSource};
use shade::checker::{Checker, Diagnostic};
use shade::check;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn load(name: &str) -> (Program, String) {
    let dir = fixtures_dir();
    let tree = fs::read_to_string(dir.join(format!("{}.json", name))).expect("tree fixture");
    let source = fs::read_to_string(dir.join(format!("{}.shade", name))).expect("source fixture");
    let program = serde_json::from_str(&tree).expect("valid program tree");
    (program, source)
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
    diagnostics.iter().map(|d| d.code).collect()
}

fn diagnostics_for(program: &mut Program) -> Vec<Diagnostic> {
    match check(program) {
        Ok(_) => Vec::new(),
        Err(errors) => errors.iter().map(Diagnostic::from).collect(),
    }
}

#[test]
fn e2e_clean_program_lists_globals() {
    let (mut program, _) = load("lighting");
    let result = check(&mut program).expect("lighting checks clean");
    let globals: Vec<String> = result.globals.iter().map(ToString::to_string).collect();
    assert_eq!(globals, vec!["uniform vec3 light", "float lambert(vec3)"]);
}

#[test]
fn e2e_annotated_tree_carries_types() {
    let (mut program, source) = load("lighting");
    check(&mut program).expect("lighting checks clean");

    let expressions = program.expressions();
    assert!(expressions.iter().all(|e| e.resolved_type().is_some()));

    // `n.x * light.x`
    let product = expressions
        .iter()
        .find(|e| &source[e.span.range()] == "n.x * light.x")
        .expect("product expression");
    let annotated = serde_json::to_value(product).unwrap();
    assert_eq!(annotated["ty"], json!({ "Typed": "Float" }));
    assert_eq!(
        annotated["kind"]["Arithmetic"]["right"]["kind"]["Field"]["base"]["ty"],
        json!({ "Typed": { "Vector": { "component": "Float", "arity": 3 } } })
    );
}

#[test]
fn e2e_condition_is_bool() {
    let (mut program, source) = load("lighting");
    check(&mut program).unwrap();
    let condition: Vec<&Expr> = program
        .expressions()
        .into_iter()
        .filter(|e| &source[e.span.range()] == "d < 0.0")
        .collect();
    assert_eq!(condition.len(), 1);
    assert_eq!(
        serde_json::to_value(condition[0]).unwrap()["ty"],
        json!({ "Typed": "Bool" })
    );
}

#[test]
fn e2e_errors_are_reported_in_source_order() {
    let (mut program, _) = load("broken");
    let diagnostics = diagnostics_for(&mut program);
    assert_eq!(
        codes(&diagnostics),
        vec!["E-SCOPE-001", "E-TYPE-001", "E-TYPE-001", "E-FLOW-003", "E-FLOW-002"]
    );
}

#[test]
fn e2e_spans_point_into_source() {
    let (mut program, source) = load("broken");
    let diagnostics = diagnostics_for(&mut program);

    let conflict = &diagnostics[0];
    assert_eq!(&source[conflict.span.range()], "x");
    assert_eq!(conflict.related.len(), 1);
    assert_eq!(&source[conflict.related[0].span.range()], "x");
    assert!(conflict.related[0].span.start < conflict.span.start);

    let brk = &diagnostics[3];
    assert!(source[brk.span.range()].starts_with("break"));
}

#[test]
fn e2e_diagnostics_serialize_for_tooling() {
    let (mut program, _) = load("broken");
    let diagnostics = diagnostics_for(&mut program);
    let value = serde_json::to_value(&diagnostics).unwrap();

    let first = &value[0];
    assert_eq!(first["code"], "E-SCOPE-001");
    assert_eq!(first["category"], "scope");
    assert_eq!(first["related"][0]["label"], "first declared here");
    assert!(first["message"].as_str().unwrap().contains("'x'"));

    // no related locations, no help: both fields are omitted
    let init = &value[1];
    assert_eq!(init["category"], "type");
    assert!(init.get("related").is_none());
}

#[test]
fn e2e_annotated_tree_round_trips() {
    let (mut program, _) = load("broken");
    let first = diagnostics_for(&mut program);

    let text = serde_json::to_string(&program).unwrap();
    let mut reloaded: Program = serde_json::from_str(&text).unwrap();
    assert_eq!(reloaded, program);

    let second = diagnostics_for(&mut reloaded);
    assert_eq!(first, second);
    assert_eq!(reloaded, program);
}

#[test]
fn e2e_inline_tree_without_types() {
    // `vec2 uv; float u = uv.x;` written the way a parser would emit it
    fn span(start: usize, end: usize) -> Value {
        json!({ "start": start, "end": end })
    }
    let tree = json!({
        "declarations": [
            {
                "kind": { "Variable": {
                    "name": { "name": "uv", "span": span(5, 7) },
                    "ty": { "Vector": { "component": "Float", "arity": 2 } },
                    "span": span(0, 8)
                }},
                "span": span(0, 8)
            },
            {
                "kind": { "Variable": {
                    "name": { "name": "u", "span": span(15, 16) },
                    "ty": "Float",
                    "init": {
                        "kind": { "Field": {
                            "base": { "kind": { "Var": { "name": "uv", "span": span(19, 21) } }, "span": span(19, 21) },
                            "field": { "name": "x", "span": span(22, 23) }
                        }},
                        "span": span(19, 23)
                    },
                    "span": span(9, 24)
                }},
                "span": span(9, 24)
            }
        ],
        "span": span(0, 24)
    });

    let mut program: Program = serde_json::from_value(tree).unwrap();
    let mut checker = Checker::new();
    checker.check_program(&mut program);
    assert_eq!(checker.error_count(), 0);

    let globals: Vec<String> = checker.globals().iter().map(ToString::to_string).collect();
    assert_eq!(globals, vec!["vec2 uv", "float u"]);
}

#[test]
fn e2e_fixtures_print_back_to_source() {
    for name in ["lighting", "broken"] {
        let (program, source) = load(name);
        assert_eq!(program.to_source(0), source.trim_end(), "{}", name);
    }
}

#[test]
fn e2e_every_fixture_has_source() {
    let mut checked = 0;
    for entry in fs::read_dir(fixtures_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let name = path.file_stem().unwrap().to_str().unwrap().to_string();
        let (mut program, source) = load(&name);
        assert!(program.span.end <= source.len(), "{} overruns its source", name);
        for diag in diagnostics_for(&mut program) {
            assert!(diag.span.end <= source.len(), "{}: {} out of range", name, diag.code);
        }
        checked += 1;
    }
    assert!(checked >= 2);
}
