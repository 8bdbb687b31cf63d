//! End-to-end runs of the processor over small compilations.

mod common;

use common::*;
use contributes::diagnostics::ErrorKind;
use contributes::model::{ElementId, MethodElement, MethodId, TypeElement, TypeRef};
use contributes::validator::Validator;
use contributes::{
    CollectingMessager, DiagnosticCollector, MemoryFiler, Processor, ProcessorOptions,
    RoundEnvironment, SymbolTable,
};
use pretty_assertions::assert_eq;

const SAMPLE_MODULE: &str = "\
package com.example;

import com.bluelinelabs.conductor.Controller;
import com.christianbahl.conductor.ControllerKey;
import dagger.Binds;
import dagger.Module;
import dagger.android.AndroidInjector;
import dagger.multibindings.IntoMap;
import javax.annotation.Generated;

@Generated(\"com.christianbahl.conductor.processor.ConductorProcessor\")
@Module(subcomponents = Sample_ControllerA_MyControllerSubcomponent.class)
public abstract class Sample_ControllerA {
  private Sample_ControllerA() {
  }

  @Binds
  @IntoMap
  @ControllerKey(MyController.class)
  abstract AndroidInjector.Factory<? extends Controller> bindAndroidInjectorFactory(Sample_ControllerA_MyControllerSubcomponent.Builder builder);
}
";

const SAMPLE_SUBCOMPONENT: &str = "\
package com.example;

import dagger.Subcomponent;
import dagger.android.AndroidInjector;
import javax.annotation.Generated;

@Generated(\"com.christianbahl.conductor.processor.ConductorProcessor\")
@Subcomponent(modules = {Extra.class, Sample.class})
public interface Sample_ControllerA_MyControllerSubcomponent extends AndroidInjector<MyController> {
  @Subcomponent.Builder
  abstract class Builder extends AndroidInjector.Builder<MyController> {
  }
}
";

/// `Sample` with one contribution built by `method`, plus `Extra` and
/// `MyController`.
fn sample_compilation(method: MethodElement) -> (SymbolTable, RoundEnvironment, MethodId) {
    let mut table = runtime_table();
    controller(&mut table, "com.example.MyController");
    table.add_type(module_type("com.example.Extra"));
    let sample = table.add_type(module_type("com.example.Sample").with_method(method));
    (table, RoundEnvironment::new([sample]), MethodId::new(sample, 0))
}

#[test]
fn test_scenario_valid_declaration() {
    let (table, round, method) = sample_compilation(contribution(
        "controllerA",
        raw("com.example.MyController"),
        &["com.example.Extra"],
    ));

    let options = ProcessorOptions::default();
    let mut diagnostics = DiagnosticCollector::new();
    let descriptor = Validator::new(&table, &options)
        .create_if_valid(method, &mut diagnostics)
        .unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(descriptor.injected_type(), &class("com.example.MyController"));
    assert_eq!(descriptor.base_type(), &class(CONTROLLER));
    assert_eq!(descriptor.modules().iter().collect::<Vec<_>>(), vec![&class("com.example.Extra")]);
    assert_eq!(descriptor.enclosing_module(), &class("com.example.Sample"));
    assert_eq!(descriptor.method_name(), "controllerA");
    assert!(descriptor.scopes().is_empty());

    let mut processor = Processor::new(options);
    let filer = MemoryFiler::new();
    let mut messager = CollectingMessager::new();
    processor.process_round(&table, &round, &filer, &mut messager);
    processor.finish(&table, &filer, &mut messager);

    assert!(!processor.failed());
    assert_eq!(
        filer.contents(&class("com.example.Sample_ControllerA")).as_deref(),
        Some(SAMPLE_MODULE)
    );
    assert_eq!(
        filer
            .contents(&class("com.example.Sample_ControllerA_MyControllerSubcomponent"))
            .as_deref(),
        Some(SAMPLE_SUBCOMPONENT)
    );
    assert!(SAMPLE_MODULE.contains("@ControllerKey(MyController.class)"));
}

#[test]
fn test_scenario_parameters_rejected() {
    let (table, round, method) = sample_compilation(
        contribution("controllerA", raw("com.example.MyController"), &["com.example.Extra"])
            .with_parameter("x", TypeRef::primitive("int")),
    );

    let mut processor = Processor::new(ProcessorOptions::default());
    let filer = MemoryFiler::new();
    let mut messager = CollectingMessager::new();
    processor.process_round(&table, &round, &filer, &mut messager);

    assert!(processor.failed());
    assert!(filer.is_empty());
    let messages = messager.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(
        &*messages[0].message,
        "@ContributesControllerInjector methods cannot have parameters"
    );
    assert_eq!(messages[0].kind, ErrorKind::StructuralDeclaration);
    assert_eq!(messages[0].anchor.element, ElementId::Method(method));
}

#[test]
fn test_scenario_parameterized_return_rejected() {
    let mut table = runtime_table();
    table.add_type(
        TypeElement::class(class("com.example.GenericController"))
            .with_type_parameter("T")
            .extends(raw(CONTROLLER)),
    );
    let sample = table.add_type(module_type("com.example.Sample").with_method(contribution(
        "controllerA",
        TypeRef::parameterized(class("com.example.GenericController"), vec![raw("java.lang.String")]),
        &[],
    )));

    let mut processor = Processor::new(ProcessorOptions::default());
    let filer = MemoryFiler::new();
    let mut messager = CollectingMessager::new();
    // java.lang.String is outside the compilation, so the first round defers.
    processor.process_round(&table, &RoundEnvironment::new([sample]), &filer, &mut messager);
    processor.finish(&table, &filer, &mut messager);

    assert!(processor.failed());
    assert!(filer.is_empty());
    let messages: Vec<&str> = messager.messages().iter().map(|d| &*d.message).collect();
    assert_eq!(
        messages,
        vec!["@ContributesControllerInjector methods cannot return parametrized types"]
    );
}

#[test]
fn test_two_independent_violations_give_two_diagnostics() {
    let (mut table, round, _) = sample_compilation(
        MethodElement::new("controllerA", raw("com.example.MyController"))
            .annotated(marker(&["com.example.NotAModule"])),
    );
    table.add_type(TypeElement::class(class("com.example.NotAModule")));

    let mut processor = Processor::new(ProcessorOptions::default());
    let filer = MemoryFiler::new();
    let mut messager = CollectingMessager::new();
    let outcome = processor.process_round(&table, &round, &filer, &mut messager);

    assert_eq!(outcome.errors, 2);
    let messages: Vec<&str> = messager.messages().iter().map(|d| &*d.message).collect();
    assert_eq!(
        messages,
        vec![
            "@ContributesControllerInjector methods must be abstract",
            "com.example.NotAModule is not a @Module",
        ]
    );
}

#[test]
fn test_duplicate_key_annotations_fail_once() {
    let (mut table, round, _) = sample_compilation(contribution(
        "controllerA",
        raw("com.example.MyController"),
        &[],
    ));
    table.add_type(key_annotation("com.other.ControllerKey", CONTROLLER));

    let mut processor = Processor::new(ProcessorOptions::default());
    let filer = MemoryFiler::new();
    let mut messager = CollectingMessager::new();
    processor.process_round(&table, &round, &filer, &mut messager);
    processor.finish(&table, &filer, &mut messager);

    assert!(processor.failed());
    assert_eq!(processor.error_count(), 1);
    assert_eq!(messager.messages()[0].kind, ErrorKind::MapKeyCardinality);
    assert!(filer.is_empty());
}

#[test]
fn test_multi_round_compilation() {
    let mut table = runtime_table();
    table.add_type(module_type("com.example.Extra"));
    controller(&mut table, "com.example.Home");
    let app = table.add_type(
        module_type("com.example.AppModule")
            .with_method(contribution("home", raw("com.example.Home"), &["com.example.Extra"]))
            .with_method(contribution("details", raw("com.example.Details"), &[])),
    );

    let mut processor = Processor::new(ProcessorOptions::default());
    let filer = MemoryFiler::new();
    let mut messager = CollectingMessager::new();

    // Round 1: `Details` isn't visible yet.
    let first = processor.process_round(&table, &RoundEnvironment::new([app]), &filer, &mut messager);
    assert_eq!(first.validated, 1);
    assert_eq!(first.deferred, 1);
    assert_eq!(
        first.generated,
        vec![
            class("com.example.AppModule_Home"),
            class("com.example.AppModule_Home_HomeSubcomponent"),
        ]
    );

    // Round 2: a generated source introduces it.
    let details = controller(&mut table, "com.example.Details");
    let second = processor.process_round(&table, &RoundEnvironment::new([details]), &filer, &mut messager);
    assert_eq!(second.validated, 1);
    assert_eq!(second.deferred, 0);
    assert_eq!(second.generated.len(), 2);

    let last = processor.finish(&table, &filer, &mut messager);
    assert_eq!(last.validated, 0);
    assert!(!processor.failed());
    assert!(messager.messages().is_empty());
    assert_eq!(filer.len(), 4);

    let details_module = filer
        .contents(&class("com.example.AppModule_Details"))
        .unwrap();
    assert!(details_module.contains("@ControllerKey(Details.class)"));
}

#[test]
fn test_directory_filer_end_to_end() {
    let (table, round, _) = sample_compilation(contribution(
        "controllerA",
        raw("com.example.MyController"),
        &["com.example.Extra"],
    ));
    let dir = tempfile::tempdir().unwrap();
    let filer = contributes::DirectoryFiler::new(dir.path());

    let mut processor = Processor::new(ProcessorOptions::default());
    let mut messager = CollectingMessager::new();
    processor.process_round(&table, &round, &filer, &mut messager);

    let written = std::fs::read_to_string(dir.path().join("com/example/Sample_ControllerA.java")).unwrap();
    assert_eq!(written, SAMPLE_MODULE);
    assert!(dir
        .path()
        .join("com/example/Sample_ControllerA_MyControllerSubcomponent.java")
        .exists());
}
