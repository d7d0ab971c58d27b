//! Formatter dispatch through full pipeline runs.

use std::sync::{Arc, Mutex};

use lintflow_core::{
    FileItem, FormatterRef, LintMessage, Linter, OutputSink, Pipeline, PipelineError, RawOptions,
    Severity, Span,
};
use lintflow_engine::test_utils::StaticEngine;
use pretty_assertions::assert_eq;
use serde_json::json;

fn linter(configure: impl FnOnce(StaticEngine) -> StaticEngine) -> Linter {
    Linter::new(RawOptions::new(), |options| {
        Ok(configure(StaticEngine::new(options)))
    })
    .expect("linter construction")
}

fn file(name: &str) -> FileItem {
    FileItem::new(format!("/work/{name}"), "/work", "x;")
}

fn error_message(text: &str) -> LintMessage {
    LintMessage::new(text, Span::new(0, 1)).with_severity(Severity::Error)
}

fn capture_sink() -> (Arc<Mutex<Vec<String>>>, OutputSink) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let captured = Arc::clone(&captured);
        OutputSink::from_fn(move |text| captured.lock().unwrap().push(text.to_string()))
    };
    (captured, sink)
}

#[test]
fn format_all_renders_the_whole_set_once() {
    let linter = linter(|engine| {
        engine
            .with_messages("b.js", vec![error_message("no-undef")])
            .with_messages("a.js", vec![error_message("no-console")])
    });
    let (captured, sink) = capture_sink();

    Pipeline::new()
        .pipe(linter.stage())
        .pipe(linter.format_all("compact", sink))
        .run(vec![file("b.js"), file("a.js")])
        .unwrap();

    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    // Sorted by path, one line per result.
    assert_eq!(
        captured[0],
        "/work/a.js: 1 error(s), 0 warning(s)\n/work/b.js: 1 error(s), 0 warning(s)"
    );
}

#[test]
fn format_each_renders_results_as_they_pass() {
    let linter = linter(|engine| {
        engine
            .with_messages("b.js", vec![error_message("no-undef")])
            .with_messages("a.js", vec![error_message("no-console")])
    });
    let (captured, sink) = capture_sink();

    Pipeline::new()
        .pipe(linter.stage())
        .pipe(linter.format_each("compact", sink))
        .run(vec![file("b.js"), file("a.js")])
        .unwrap();

    let captured = captured.lock().unwrap();
    // Stream order, not path order.
    assert_eq!(captured.len(), 2);
    assert!(captured[0].starts_with("/work/b.js"));
    assert!(captured[1].starts_with("/work/a.js"));
}

#[test]
fn function_formatter_sees_sorted_results_and_meta() {
    let mut meta = lintflow_core::RulesMeta::new();
    meta.insert("no-undef".to_string(), json!({ "fixable": false }));
    let linter = linter(move |engine| {
        engine
            .with_messages("b.js", vec![error_message("no-undef")])
            .with_messages("a.js", vec![error_message("no-undef")])
            .with_rules_meta(meta)
    });
    let formatter = FormatterRef::from_fn(|results, context| {
        assert!(context.rules_meta().contains_key("no-undef"));
        let paths: Vec<String> = results
            .iter()
            .map(|r| r.file_path.display().to_string())
            .collect();
        Ok(paths.join(","))
    });
    let (captured, sink) = capture_sink();

    Pipeline::new()
        .pipe(linter.stage())
        .pipe(linter.format_all(formatter, sink))
        .run(vec![file("b.js"), file("a.js")])
        .unwrap();

    assert_eq!(*captured.lock().unwrap(), ["/work/a.js,/work/b.js"]);
}

#[test]
fn unknown_formatter_fails_the_run() {
    let linter = linter(|engine| engine.with_messages("a.js", vec![error_message("no-undef")]));
    let (captured, sink) = capture_sink();

    let error = Pipeline::new()
        .pipe(linter.stage())
        .pipe(linter.format_all("no-such-formatter", sink))
        .run(vec![file("a.js")])
        .unwrap_err();

    assert!(matches!(error, PipelineError::Engine(_)));
    assert!(captured.lock().unwrap().is_empty());
}

#[test]
fn quiet_filtering_is_visible_to_formatters() {
    let raw = RawOptions::from_value(json!({ "quiet": true })).unwrap();
    let warning = LintMessage::new("no-console", Span::new(0, 1)).with_severity(Severity::Warning);
    let linter = Linter::new(raw, |options| {
        Ok(StaticEngine::new(options)
            .with_messages("a.js", vec![warning, error_message("no-undef")]))
    })
    .expect("linter construction");
    let (captured, sink) = capture_sink();

    Pipeline::new()
        .pipe(linter.stage())
        .pipe(linter.format_all("compact", sink))
        .run(vec![file("a.js")])
        .unwrap();

    assert_eq!(
        *captured.lock().unwrap(),
        ["/work/a.js: 1 error(s), 0 warning(s)"]
    );
}
