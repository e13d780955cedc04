//! Matching: which traits end up on a class record.

use kiln_diagnostic::ErrorCode;
use kiln_ir::Span;
use kiln_traits::{TraitCompilerConfig, TraitState};
use pretty_assertions::assert_eq;

use crate::common::{compiler, compiler_with, file, states, CallLog, ScriptedHandler, TestHost};

#[test]
fn test_primary_evicts_earlier_weak_trait() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Component", "Injectable"]);
    let mut compiler = compiler(
        host,
        vec![
            ScriptedHandler::weak("injectable", "Injectable", &log).build(),
            ScriptedHandler::primary("component", "Component", &log).build(),
        ],
    );

    compiler.analyze(file(0)).unwrap();

    let record = compiler.record_for(widget).unwrap();
    assert_eq!(states(record), vec![("component", TraitState::Analyzed)]);
    assert!(record.has_primary_handler());
    assert!(!record.has_weak_handlers());
    assert_eq!(log.step("analyze"), vec!["component:analyze:0"]);
}

#[test]
fn test_weak_after_non_weak_is_ignored() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Input", "Injectable"]);
    let mut compiler = compiler(
        host,
        vec![
            ScriptedHandler::shared("input", "Input", &log).build(),
            ScriptedHandler::weak("injectable", "Injectable", &log).build(),
        ],
    );

    compiler.analyze(file(0)).unwrap();

    let record = compiler.record_for(widget).unwrap();
    assert_eq!(states(record), vec![("input", TraitState::Analyzed)]);
    assert!(!record.has_weak_handlers());
}

#[test]
fn test_weak_traits_coexist_with_each_other() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Injectable", "Provided"]);
    let mut compiler = compiler(
        host,
        vec![
            ScriptedHandler::weak("injectable", "Injectable", &log).build(),
            ScriptedHandler::weak("provided", "Provided", &log).build(),
        ],
    );

    compiler.analyze(file(0)).unwrap();

    let record = compiler.record_for(widget).unwrap();
    assert_eq!(
        states(record),
        vec![
            ("injectable", TraitState::Analyzed),
            ("provided", TraitState::Analyzed),
        ]
    );
    assert!(record.has_weak_handlers());
}

#[test]
fn test_shared_traits_follow_registration_order() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Input", "Component"]);
    let mut compiler = compiler(
        host,
        vec![
            ScriptedHandler::shared("input", "Input", &log).build(),
            ScriptedHandler::primary("component", "Component", &log).build(),
        ],
    );

    compiler.analyze(file(0)).unwrap();

    let record = compiler.record_for(widget).unwrap();
    assert_eq!(
        states(record),
        vec![
            ("input", TraitState::Analyzed),
            ("component", TraitState::Analyzed),
        ]
    );
}

#[test]
fn test_two_primary_handlers_poison_the_class() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    host.class(file(0), "Plain", &[]);
    let widget = host.class(file(0), "Widget", &["Component", "Directive", "Input"]);
    let mut compiler = compiler(
        host,
        vec![
            ScriptedHandler::primary("component", "Component", &log).build(),
            ScriptedHandler::primary("directive", "Directive", &log).build(),
            ScriptedHandler::shared("input", "Input", &log).build(),
        ],
    );

    compiler.analyze(file(0)).unwrap();

    let record = compiler.record_for(widget).unwrap();
    assert!(record.traits().is_empty());
    assert!(!record.has_primary_handler());

    let meta = record.meta_diagnostics().unwrap();
    assert_eq!(meta.len(), 1);
    assert_eq!(meta[0].code, ErrorCode::E7001);
    assert_eq!(
        meta[0].message,
        "the class `Widget` has incompatible markers: `component` and `directive` cannot both apply"
    );
    assert_eq!(meta[0].primary_span(), Some(Span::new(100, 150)));

    // Matching stops at the collision; nothing is analyzed.
    assert_eq!(log.step("detect"), vec!["component:detect:1", "directive:detect:1"]);
    assert!(log.step("analyze").is_empty());
    assert_eq!(compiler.diagnostics(), meta.to_vec());
}

#[test]
fn test_unmarked_class_gets_no_record() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let plain = host.class(file(0), "Plain", &["Unrelated"]);
    let mut compiler = compiler(
        host,
        vec![ScriptedHandler::primary("component", "Component", &log).build()],
    );

    compiler.analyze(file(0)).unwrap();

    assert!(compiler.record_for(plain).is_none());
    assert!(compiler.records_for(file(0)).is_empty());
}

#[test]
fn test_exported_only_skips_private_classes() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let public = host.class(file(0), "Public", &["Component"]);
    let private = host.private_class(file(0), "Private", &["Component"]);
    let mut compiler = compiler_with(
        host,
        vec![ScriptedHandler::primary("component", "Component", &log).build()],
        TraitCompilerConfig::exported_only(),
    );

    compiler.analyze(file(0)).unwrap();

    assert!(compiler.record_for(public).is_some());
    assert!(compiler.record_for(private).is_none());
}

#[test]
fn test_private_classes_match_by_default() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let private = host.private_class(file(0), "Private", &["Component"]);
    let mut compiler = compiler(
        host,
        vec![ScriptedHandler::primary("component", "Component", &log).build()],
    );

    compiler.analyze(file(0)).unwrap();

    assert!(compiler.record_for(private).is_some());
}

#[test]
fn test_declaration_files_are_skipped() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let shape = host.class(file(7), "Shape", &["Component"]);
    host.declaration_file(file(7));
    let mut compiler = compiler(
        host,
        vec![ScriptedHandler::primary("component", "Component", &log).build()],
    );

    compiler.analyze(file(7)).unwrap();

    assert!(compiler.record_for(shape).is_none());
    assert!(log.entries().is_empty());
}

#[test]
fn test_declaration_files_can_be_opted_in() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let shape = host.class(file(7), "Shape", &["Component"]);
    host.declaration_file(file(7));
    let mut compiler = compiler_with(
        host,
        vec![ScriptedHandler::primary("component", "Component", &log).build()],
        TraitCompilerConfig::default().with_skip_declaration_files(false),
    );

    compiler.analyze(file(7)).unwrap();

    assert!(compiler.record_for(shape).is_some());
}
