//! The processing driver.
//!
//! A [`Processor`] lives for one compilation and is invoked once per round.
//! Each round it:
//!
//! 1. checks key-annotation cardinality across everything visible, which
//!    also fixes the recognized base types for the round,
//! 2. validates newly visible (and previously deferred) declarations,
//! 3. generates and writes sources for the valid ones,
//! 4. flushes the round's diagnostics to the messager.
//!
//! The compilation fails iff any error was reported in any round.

use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxHashSet;

use crate::codegen::ContributionGenerator;
use crate::config::ProcessorOptions;
use crate::descriptor::InjectorDescriptor;
use crate::diagnostics::{Anchor, DiagnosticCollector, ErrorKind, Messager};
use crate::filer::Filer;
use crate::map_keys::{MapKeyChecker, MapKeyIndex};
use crate::model::{ClassName, MethodId, RoundEnvironment, TypeModel};
use crate::validator::Validator;

/// What one round did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    /// Declarations validated this round (valid or not).
    pub validated: usize,
    /// Classes written this round, in write order.
    pub generated: Vec<ClassName>,
    /// Declarations waiting for classes a later round may introduce.
    pub deferred: usize,
    /// New errors reported this round.
    pub errors: usize,
}

/// Drives validation and generation across rounds.
#[derive(Debug)]
pub struct Processor {
    options: ProcessorOptions,
    processed: FxHashSet<MethodId>,
    deferred: IndexSet<MethodId>,
    /// `(anchor, message)` pairs already sent to the messager.
    reported: FxHashSet<(Anchor, Arc<str>)>,
    error_count: usize,
}

impl Processor {
    pub fn new(options: ProcessorOptions) -> Self {
        Self {
            options,
            processed: FxHashSet::default(),
            deferred: IndexSet::new(),
            reported: FxHashSet::default(),
            error_count: 0,
        }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Process one round.
    ///
    /// `model` holds everything visible so far; `round` names the types that
    /// became visible in this round.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(roots = round.roots().len(), last = round.processing_over())
    )]
    pub fn process_round<M: TypeModel + ?Sized>(
        &mut self,
        model: &M,
        round: &RoundEnvironment,
        filer: &dyn Filer,
        messager: &mut dyn Messager,
    ) -> RoundOutcome {
        let mut diagnostics = DiagnosticCollector::new();
        let mut outcome = RoundOutcome::default();

        let keys = MapKeyChecker::new(model, &self.options).check(&mut diagnostics);
        let validator = Validator::with_base_types(model, &self.options, keys.base_types());
        let generator = ContributionGenerator::new(&self.options);

        let mut candidates: IndexSet<MethodId> = std::mem::take(&mut self.deferred);
        candidates.extend(round.methods_annotated_with(model, &self.options.marker));

        for method in candidates {
            if self.processed.contains(&method) {
                continue;
            }
            if !round.processing_over() {
                let missing = validator.unresolved_references(method);
                if !missing.is_empty() {
                    tracing::debug!(?method, missing = missing.len(), "deferring declaration");
                    self.deferred.insert(method);
                    continue;
                }
            }

            self.processed.insert(method);
            outcome.validated += 1;
            let Some(descriptor) = validator.create_if_valid(method, &mut diagnostics) else {
                continue;
            };
            self.emit(
                model,
                method,
                &descriptor,
                &keys,
                &generator,
                filer,
                &mut diagnostics,
                &mut outcome,
            );
        }

        outcome.deferred = self.deferred.len();
        outcome.errors = self.flush(diagnostics, messager);
        tracing::debug!(
            validated = outcome.validated,
            generated = outcome.generated.len(),
            deferred = outcome.deferred,
            errors = outcome.errors,
            "round complete"
        );
        outcome
    }

    /// Run the last round: deferred declarations are validated as they are.
    pub fn finish<M: TypeModel + ?Sized>(
        &mut self,
        model: &M,
        filer: &dyn Filer,
        messager: &mut dyn Messager,
    ) -> RoundOutcome {
        self.process_round(model, &RoundEnvironment::final_round(), filer, messager)
    }

    /// Whether any error has been reported so far.
    pub fn failed(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Declarations waiting on classes not yet visible.
    pub fn deferred(&self) -> impl Iterator<Item = MethodId> + '_ {
        self.deferred.iter().copied()
    }

    pub fn is_processed(&self, method: MethodId) -> bool {
        self.processed.contains(&method)
    }

    #[allow(clippy::too_many_arguments)]
    fn emit<M: TypeModel + ?Sized>(
        &self,
        model: &M,
        method: MethodId,
        descriptor: &InjectorDescriptor,
        keys: &MapKeyIndex,
        generator: &ContributionGenerator<'_>,
        filer: &dyn Filer,
        diagnostics: &mut DiagnosticCollector,
        outcome: &mut RoundOutcome,
    ) {
        let anchor = Anchor::element(method, model.span_of(method.into()));
        let base = descriptor.base_type();
        let Some(key) = keys.key_for(base) else {
            // Already reported by the key check unless the base itself is
            // missing from the compilation.
            if !keys.is_rejected(base) {
                diagnostics.error(
                    ErrorKind::MapKeyCardinality,
                    anchor,
                    format!("No key annotation found for {base}"),
                );
            }
            tracing::debug!(%base, "no unique key annotation; skipping generation");
            return;
        };

        let sources = generator.generate(descriptor, key);
        for file in sources.files() {
            let class_name = file.class_name();
            let contents = file.render();
            match filer.create_source_file(&class_name, &contents, method) {
                Ok(()) => outcome.generated.push(class_name),
                Err(err) => diagnostics.error(
                    ErrorKind::Emission,
                    anchor.clone(),
                    format!("could not write generated class {class_name}: {err}"),
                ),
            }
        }
    }

    /// Send new diagnostics to `messager`; returns how many were sent.
    fn flush(&mut self, mut diagnostics: DiagnosticCollector, messager: &mut dyn Messager) -> usize {
        let mut sent = 0;
        for diagnostic in diagnostics.take() {
            let key = (diagnostic.anchor.clone(), diagnostic.message.clone());
            if !self.reported.insert(key) {
                continue;
            }
            messager.print_message(&diagnostic);
            sent += 1;
        }
        self.error_count += sent;
        sent
    }
}
