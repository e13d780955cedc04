//! Compile: per-declaration emission and declaration-file fields.

use kiln_traits::{
    CompilationMode, ConstantPool, DtsTransforms, TraitCompilerConfig, TraitCompilerError,
};
use pretty_assertions::assert_eq;

use crate::common::{
    compiler, compiler_with, file, resolve, CallLog, ResolveScript, ScriptedHandler, TestHost,
};

#[test]
fn test_duplicate_fields_keep_the_first_trait() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Component", "Factory"]);
    let mut compiler = compiler(
        host,
        vec![
            ScriptedHandler::primary("component", "Component", &log)
                .with_fields(&["ɵcmp", "ɵfac"])
                .build(),
            ScriptedHandler::shared("factory", "Factory", &log)
                .with_fields(&["ɵfac", "ɵprov"])
                .build(),
        ],
    );
    compiler.analyze(file(0)).unwrap();
    resolve(&mut compiler);

    let mut pool = ConstantPool::new();
    let mut dts = DtsTransforms::new();
    let results = compiler
        .compile(widget, &mut pool, &mut dts)
        .unwrap()
        .unwrap();

    let fields: Vec<(&str, &str)> = results
        .iter()
        .map(|r| (r.name.as_str(), r.ty.as_str()))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("ɵcmp", "componentDef"),
            ("ɵfac", "componentDef"),
            ("ɵprov", "factoryDef"),
        ]
    );
    assert!(results
        .iter()
        .all(|r| r.initializer.as_deref() == Some("_c0")));
    assert_eq!(pool.statements(), ["const _c0 = \"kiln\";"]);

    let names: Vec<&str> = dts
        .fields_for(widget)
        .unwrap()
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["ɵcmp", "ɵfac", "ɵprov"]);
}

#[test]
fn test_empty_compile_still_visits_declaration_file() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Component"]);
    let plain = host.class(file(0), "Plain", &[]);
    let mut compiler = compiler(
        host,
        vec![ScriptedHandler::primary("component", "Component", &log).build()],
    );
    compiler.analyze(file(0)).unwrap();
    resolve(&mut compiler);

    let mut pool = ConstantPool::new();
    let mut dts = DtsTransforms::new();

    assert_eq!(compiler.compile(widget, &mut pool, &mut dts).unwrap(), None);
    assert!(dts.was_visited(widget));
    assert_eq!(dts.fields_for(widget), Some(&[][..]));

    assert_eq!(compiler.compile(plain, &mut pool, &mut dts).unwrap(), None);
    assert!(!dts.was_visited(plain));
    assert!(pool.is_empty());
}

#[test]
fn test_declaration_type_replacement_lands_on_the_original() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let module = host.class(file(0), "AppModule", &["Module", "Providers"]);
    let transformed = host.transformed(module);
    let mut compiler = compiler(
        host,
        vec![
            ScriptedHandler::primary("module", "Module", &log)
                .with_fields(&["ɵmod"])
                .build(),
            ScriptedHandler::shared("providers", "Providers", &log)
                .with_declaration_type("ModuleWithProviders<AppModule>")
                .build(),
        ],
    );
    compiler.analyze(file(0)).unwrap();
    resolve(&mut compiler);

    let mut dts = DtsTransforms::new();
    let results = compiler
        .compile(transformed, &mut ConstantPool::new(), &mut dts)
        .unwrap()
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(
        dts.type_replacement(module),
        Some("ModuleWithProviders<AppModule>")
    );
    assert_eq!(dts.type_replacement(transformed), None);
    assert_eq!(log.step("declaration_type"), vec!["providers:declaration_type:1"]);
}

#[test]
fn test_errored_traits_are_not_compiled() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Component", "Input"]);
    let mut compiler = compiler(
        host,
        vec![
            ScriptedHandler::primary("component", "Component", &log)
                .resolve_as(ResolveScript::Diagnostic)
                .with_fields(&["ɵcmp"])
                .build(),
            ScriptedHandler::shared("input", "Input", &log)
                .with_fields(&["inputs"])
                .build(),
        ],
    );
    compiler.analyze(file(0)).unwrap();
    resolve(&mut compiler);

    let results = compiler
        .compile(widget, &mut ConstantPool::new(), &mut DtsTransforms::new())
        .unwrap()
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "inputs");
    assert_eq!(log.step("compile"), vec!["input:compile:0:Full"]);
}

#[test]
fn test_transformed_declaration_maps_to_its_record() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Component"]);
    let transformed = host.transformed(widget);
    let mut compiler = compiler_with(
        host,
        vec![ScriptedHandler::primary("component", "Component", &log)
            .with_fields(&["ɵcmp"])
            .build()],
        TraitCompilerConfig::default().with_compilation_mode(CompilationMode::Partial),
    );
    compiler.analyze(file(0)).unwrap();
    resolve(&mut compiler);

    let mut dts = DtsTransforms::new();
    let results = compiler
        .compile(transformed, &mut ConstantPool::new(), &mut dts)
        .unwrap();

    assert!(results.is_some());
    // The handler sees the transformed node; fields land on the original.
    assert_eq!(log.step("compile"), vec!["component:compile:1:Partial"]);
    assert!(dts.was_visited(widget));
    assert!(!dts.was_visited(transformed));

    let names: Vec<String> = compiler
        .decorators_for(transformed)
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Component".to_string()]);
}

#[test]
fn test_compile_before_resolve_is_a_phase_error() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Component"]);
    let mut compiler = compiler(
        host,
        vec![ScriptedHandler::primary("component", "Component", &log)
            .with_fields(&["ɵcmp"])
            .build()],
    );
    compiler.analyze(file(0)).unwrap();

    let err = compiler
        .compile(widget, &mut ConstantPool::new(), &mut DtsTransforms::new())
        .unwrap_err();

    assert!(matches!(
        err,
        TraitCompilerError::PhaseOrder {
            operation: "compile",
            ..
        }
    ));
    assert!(log.step("compile").is_empty());
}

#[test]
fn test_decorators_for_lists_resolved_triggers_only() {
    let log = CallLog::new();
    let mut host = TestHost::new();
    let widget = host.class(file(0), "Widget", &["Component", "Input"]);
    let mut compiler = compiler(
        host,
        vec![
            ScriptedHandler::primary("component", "Component", &log).build(),
            ScriptedHandler::shared("input", "Input", &log)
                .resolve_as(ResolveScript::Diagnostic)
                .build(),
        ],
    );
    compiler.analyze(file(0)).unwrap();
    assert!(compiler.decorators_for(widget).is_empty());

    resolve(&mut compiler);

    let names: Vec<String> = compiler
        .decorators_for(widget)
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Component".to_string()]);
}
