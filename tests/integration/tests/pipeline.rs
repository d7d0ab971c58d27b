//! End-to-end pipeline runs over a scripted engine.

use std::fs;
use std::sync::{Arc, Mutex};

use lintflow_core::{
    EngineOptions, FileItem, Fix, LintMessage, Linter, NODE_MODULES_WARNING, Pipeline,
    PipelineError, RawOptions, Severity, Span, all_results, collect_files, fail_after_error,
    fail_on_error, transform, write_fixed,
};
use lintflow_engine::test_utils::StaticEngine;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;

fn linter(
    raw: impl Into<RawOptions>,
    configure: impl FnOnce(StaticEngine) -> StaticEngine,
) -> Linter {
    Linter::new(raw, |options| Ok(configure(StaticEngine::new(options))))
        .expect("linter construction")
}

fn file(name: &str, contents: &str) -> FileItem {
    FileItem::new(format!("/work/{name}"), "/work", contents)
}

fn error_message(text: &str) -> LintMessage {
    LintMessage::new(text, Span::new(0, 1)).with_severity(Severity::Error)
}

fn three_file_linter() -> Linter {
    linter(RawOptions::new(), |engine| {
        engine
            .with_messages("a.js", Vec::new())
            .with_messages("b.js", vec![error_message("no-undef")])
            .with_messages("c.js", Vec::new())
    })
}

fn three_files() -> Vec<FileItem> {
    vec![file("a.js", ""), file("b.js", "x;"), file("c.js", "")]
}

#[test]
fn aggregates_totals_across_the_stream() {
    let linter = three_file_linter();
    let observed = Arc::new(Mutex::new(None));
    let hook = {
        let observed = Arc::clone(&observed);
        all_results(move |collection| {
            *observed.lock().unwrap() = Some((collection.len(), collection.counts()));
        })
    };

    let run = Pipeline::new()
        .pipe(linter.stage())
        .pipe(hook)
        .run(three_files())
        .unwrap();

    assert!(run.is_clean());
    let (len, counts) = observed.lock().unwrap().take().unwrap();
    assert_eq!(len, 3);
    assert_eq!(counts.error_count, 1);
    assert_eq!(counts.warning_count, 0);
}

#[test]
fn fail_after_error_fails_once_every_file_passed() {
    let linter = three_file_linter();
    let passed = Arc::new(Mutex::new(0));
    let probe = {
        let passed = Arc::clone(&passed);
        transform("probe", move |_file| {
            *passed.lock().unwrap() += 1;
            Ok(())
        })
    };

    let error = Pipeline::new()
        .pipe(linter.stage())
        .pipe(fail_after_error())
        .pipe(probe)
        .run(three_files())
        .unwrap_err();

    assert_eq!(error.to_string(), "Failed with 1 lint error(s)");
    assert_eq!(*passed.lock().unwrap(), 3);
}

#[test]
fn fail_on_error_stops_at_the_failing_file() {
    let linter = three_file_linter();
    let arrivals = Arc::new(Mutex::new(0));
    let probe = {
        let arrivals = Arc::clone(&arrivals);
        transform("probe", move |_file| {
            *arrivals.lock().unwrap() += 1;
            Ok(())
        })
    };

    let error = Pipeline::new()
        .pipe(probe)
        .pipe(linter.stage())
        .pipe(fail_on_error())
        .run(three_files())
        .unwrap_err();

    assert!(matches!(error, PipelineError::Gate(_)));
    // c.js never reached the first stage.
    assert_eq!(*arrivals.lock().unwrap(), 2);
}

#[test]
fn warn_ignored_attaches_the_ignore_reason() {
    let raw = RawOptions::from_value(json!({ "warn_ignored": true })).unwrap();
    let linter = linter(raw, |engine| engine.with_ignored("index.js"));
    let path = "/work/node_modules/pkg/index.js";

    let run = Pipeline::new()
        .pipe(linter.stage())
        .run(vec![FileItem::new(path, "/work", "x;")])
        .unwrap();

    let result = run.files[0].lint.as_ref().unwrap();
    assert_eq!(result.warning_count, 1);
    assert_eq!(result.error_count, 0);
    assert_eq!(result.messages[0].message, NODE_MODULES_WARNING);
}

#[test]
fn fixes_flow_from_engine_to_disk() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.js"), "let x = 1;").unwrap();
    fs::write(dir.path().join("b.js"), "let y = 2;").unwrap();

    let raw = RawOptions::from_value(json!({ "fix": true })).unwrap();
    let fixable = LintMessage::new("prefer const", Span::new(0, 3))
        .with_severity(Severity::Error)
        .with_fix(Fix::new(Span::new(0, 3), "const"));
    let linter = linter(raw, |engine| {
        engine
            .with_messages("a.js", vec![fixable])
            .with_messages("b.js", Vec::new())
    });

    let files = collect_files(dir.path(), &["*.js".to_string()]).unwrap();
    let run = Pipeline::new()
        .pipe(linter.stage())
        .pipe(write_fixed())
        .run(files)
        .unwrap();

    assert!(run.is_clean());
    assert_eq!(
        fs::read_to_string(dir.path().join("a.js")).unwrap(),
        "const x = 1;"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("b.js")).unwrap(),
        "let y = 2;"
    );
    let fixed_result = run.files[0].lint.as_ref().unwrap();
    assert!(fixed_result.fixed);
    assert!(!run.files[1].lint.as_ref().unwrap().fixed);
}

#[test]
fn forbidden_options_fail_before_streaming() {
    let raw = RawOptions::from_value(json!({ "cache": true, "cache_file": ".c" })).unwrap();

    let error = Linter::new(raw, |options| Ok(StaticEngine::new(options))).unwrap_err();

    assert!(matches!(error, PipelineError::InvalidOptions(_)));
    assert!(error.to_string().contains("cache"));
    assert!(error.to_string().contains("cache_file"));
}

#[test]
fn migrated_options_reach_the_engine_factory() {
    let raw = RawOptions::from_value(json!({
        "globals": ["$", "jQuery:true"],
        "rules": { "no-undef": 2 },
        "fix": false
    }))
    .unwrap();
    let seen = Arc::new(Mutex::new(None));
    {
        let seen = Arc::clone(&seen);
        Linter::new(raw, move |options: &EngineOptions| {
            *seen.lock().unwrap() = Some(options.clone());
            Ok(StaticEngine::new(options))
        })
        .unwrap();
    }

    let options = seen.lock().unwrap().take().unwrap();
    let config = options.override_config().unwrap();
    assert_eq!(config["globals"], json!({ "$": false, "jQuery": true }));
    assert_eq!(config["rules"], json!({ "no-undef": 2 }));
    assert_eq!(options.get("fix"), Some(&json!(false)));
}

#[test]
fn config_file_shorthand_reaches_the_engine_factory() {
    let seen = Arc::new(Mutex::new(None));
    {
        let seen = Arc::clone(&seen);
        Linter::new("eslint.config.js", move |options: &EngineOptions| {
            *seen.lock().unwrap() = Some(options.clone());
            Ok(StaticEngine::new(options))
        })
        .unwrap();
    }

    let options = seen.lock().unwrap().take().unwrap();
    assert_eq!(options.override_config_file(), Some("eslint.config.js"));
    assert_eq!(options.len(), 1);
}

#[test]
fn lint_failure_drops_only_that_file() {
    let linter = linter(RawOptions::new(), |engine| {
        engine
            .with_lint_error("bad.js", "parser blew up")
            .with_messages("good.js", Vec::new())
    });

    let run = Pipeline::new()
        .pipe(linter.stage())
        .run(vec![file("bad.js", "x;"), file("good.js", "")])
        .unwrap();

    assert_eq!(run.files.len(), 1);
    assert!(run.files[0].path.ends_with("good.js"));
    assert_eq!(run.failures.len(), 1);
    assert!(run.failures[0].0.ends_with("bad.js"));
}

#[test]
fn invalid_utf8_contents_drop_the_file() {
    let linter = linter(RawOptions::new(), |engine| engine);
    let binary = FileItem::new("/work/bin.js", "/work", vec![0xff, 0xfe, 0x00]);

    let run = Pipeline::new()
        .pipe(linter.stage())
        .run(vec![binary, file("ok.js", "")])
        .unwrap();

    assert_eq!(run.files.len(), 1);
    assert_eq!(run.failures.len(), 1);
    assert!(matches!(run.failures[0].1, PipelineError::File(_)));
}
