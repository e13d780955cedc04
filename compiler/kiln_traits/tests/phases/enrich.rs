//! Enrichment passes over resolved traits.

use std::sync::Arc;

use kiln_diagnostic::{ErrorCode, Severity};
use kiln_traits::{DecoratorHandler, HandlerCapabilities};
use pretty_assertions::assert_eq;

use crate::common::{
    compiler, file, resolve, AnalyzeScript, CallLog, RecordingContext, ScriptedHandler, TestHost,
};

fn enrich_handlers(log: &CallLog) -> Vec<Arc<dyn DecoratorHandler>> {
    let all = HandlerCapabilities::TYPE_CHECK
        | HandlerCapabilities::INDEX
        | HandlerCapabilities::EXTENDED_CHECK
        | HandlerCapabilities::UPDATE_RESOURCES;
    vec![
        ScriptedHandler::primary("component", "Component", log)
            .with_capabilities(all)
            .build(),
        ScriptedHandler::shared("input", "Input", log).build(),
        ScriptedHandler::shared("broken", "Broken", log)
            .with_capabilities(all)
            .analyze_as(AnalyzeScript::Diagnostic)
            .build(),
    ]
}

#[test]
fn test_type_check_and_index_visit_resolved_traits_with_capability() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Component", "Input", "Broken"]);
    let mut compiler = compiler(host, enrich_handlers(&log));
    compiler.analyze(file(0)).unwrap();
    resolve(&mut compiler);

    let mut ctx = RecordingContext::default();
    compiler.type_check(&mut ctx).unwrap();
    compiler.index(&mut ctx).unwrap();

    assert_eq!(ctx.checks, vec![widget]);
    assert_eq!(ctx.entries, vec![widget]);
    assert_eq!(log.step("type_check"), vec!["component:type_check:0"]);
    assert_eq!(log.step("index"), vec!["component:index:0"]);
}

#[test]
fn test_enrichment_requires_resolution() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    host.class(file(0), "Widget", &["Component"]);
    let mut compiler = compiler(host, enrich_handlers(&log));
    compiler.analyze(file(0)).unwrap();

    let mut ctx = RecordingContext::default();
    let err = compiler.type_check(&mut ctx).unwrap_err();
    assert_eq!(
        err.to_string(),
        "`type_check` is not allowed in the analysis phase (requires resolved)"
    );
    assert!(compiler.index(&mut ctx).is_err());
    assert!(compiler.extended_check().is_err());
    assert!(ctx.checks.is_empty() && ctx.entries.is_empty());
}

#[test]
fn test_extended_check_returns_fresh_diagnostics_each_time() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    host.class(file(0), "Widget", &["Component", "Broken"]);
    let mut compiler = compiler(host, enrich_handlers(&log));
    compiler.analyze(file(0)).unwrap();
    resolve(&mut compiler);

    let first = compiler.extended_check().unwrap();
    let second = compiler.extended_check().unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    assert_eq!(first[0].code, ErrorCode::W7001);
    assert_eq!(first[0].severity, Severity::Warning);
    // Only the analysis error of `broken` is stored.
    assert_eq!(compiler.diagnostics().len(), 1);
}

#[test]
fn test_update_resources_skips_errored_traits() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Component", "Input", "Broken"]);
    let transformed = host.transformed(widget);
    let mut compiler = compiler(host, enrich_handlers(&log));
    compiler.analyze(file(0)).unwrap();

    compiler.update_resources(widget);
    resolve(&mut compiler);
    compiler.update_resources(transformed);

    assert_eq!(
        log.step("update_resources"),
        vec!["component:update_resources:0", "component:update_resources:1"]
    );
}
