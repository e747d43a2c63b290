use std::fs;

use keycalc::{Environment, EvaluationContext, evaluate_expression, format_value};
use walkdir::WalkDir;

const CASES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/cases");

/// One line of a `.calc` file.
enum Expectation<'a> {
    Display(&'a str),
    Failure(&'a str),
}

#[test]
fn case_files_pass() {
    let mut count = 0;
    let mut failures = Vec::new();

    for entry in
        WalkDir::new(CASES).into_iter()
                           .filter_map(Result::ok)
                           .filter(|e| e.path().extension().is_some_and(|ext| ext == "calc"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (line_number, line) in content.lines().enumerate() {
            let Some((input, expectation)) = parse_case(line) else {
                continue;
            };
            count += 1;
            if let Err(message) = run_case(input, &expectation) {
                failures.push(format!("{}:{}: {message}", path.display(), line_number + 1));
            }
        }
    }

    assert!(count > 0, "No cases found in {CASES}");
    assert!(failures.is_empty(), "{} case(s) failed:\n{}", failures.len(), failures.join("\n"));
}

fn parse_case(line: &str) -> Option<(&str, Expectation<'_>)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    if let Some((input, expected)) = line.split_once(" => ") {
        return Some((input.trim(), Expectation::Display(expected.trim())));
    }
    line.split_once(" !! ")
        .map(|(input, kind)| (input.trim(), Expectation::Failure(kind.trim())))
}

fn run_case(input: &str, expectation: &Expectation<'_>) -> Result<(), String> {
    let ctx = EvaluationContext::default();
    let result = evaluate_expression(input, &Environment::new(), &ctx);

    match (expectation, result) {
        (Expectation::Display(expected), Ok(value)) => {
            let shown = format_value(&value, &ctx);
            if shown == *expected {
                Ok(())
            } else {
                Err(format!("`{input}` shows `{shown}`, expected `{expected}`"))
            }
        },
        (Expectation::Display(expected), Err(e)) => {
            Err(format!("`{input}` failed with {e}, expected `{expected}`"))
        },
        (Expectation::Failure(kind), Err(e)) => {
            let found = format!("{:?}", e.kind());
            if found == *kind {
                Ok(())
            } else {
                Err(format!("`{input}` failed with {found}, expected {kind}"))
            }
        },
        (Expectation::Failure(kind), Ok(value)) => {
            Err(format!("`{input}` gave `{}`, expected {kind}", format_value(&value, &ctx)))
        },
    }
}
