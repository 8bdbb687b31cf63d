//! Processor configuration.
//!
//! Every annotation and type the processor recognizes is named here rather
//! than baked into the validator, so the same pipeline can serve other base
//! types or marker annotations. Defaults follow the Conductor + Dagger
//! conventions.

use indexmap::IndexMap;
use smol_str::SmolStr;
use thiserror::Error;

use crate::model::{ClassName, ClassNameError};

/// Prefix shared by every option this processor understands.
pub const OPTION_PREFIX: &str = "contributes.";

pub const OPT_BASE_TYPES: &str = "contributes.baseTypes";
pub const OPT_MARKER: &str = "contributes.marker";
pub const OPT_MODULE_MARKER: &str = "contributes.moduleMarker";
pub const OPT_GENERATED_ANNOTATION: &str = "contributes.generatedAnnotation";
pub const OPT_PROCESSOR_NAME: &str = "contributes.processorName";

/// Errors from parsing processor options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown processor option '{0}'")]
    UnknownOption(String),
    #[error("option '{option}': {source}")]
    InvalidClassName {
        option: &'static str,
        #[source]
        source: ClassNameError,
    },
    #[error("option '{0}' must name at least one base type")]
    EmptyBaseTypes(&'static str),
    #[error("option '{0}' must not be empty")]
    EmptyValue(&'static str),
}

/// Names and switches that drive validation and generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorOptions {
    /// The attribute placed on contributing methods.
    pub marker: ClassName,
    /// Marks a configuration module.
    pub module_marker: ClassName,
    /// Meta-annotation identifying key-mapping annotations.
    pub map_key_marker: ClassName,
    /// Meta-annotation identifying scope annotations.
    pub scope_marker: ClassName,
    /// Meta-annotation identifying qualifier annotations.
    pub qualifier_marker: ClassName,
    /// Recognized injectable roots, in tie-break order.
    pub base_types: Vec<ClassName>,
    /// Added to every generated type when set.
    pub generated_annotation: Option<ClassName>,
    pub processor_name: SmolStr,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            marker: ClassName::new("com.christianbahl.conductor", "ContributesControllerInjector"),
            module_marker: ClassName::new("dagger", "Module"),
            map_key_marker: ClassName::new("dagger", "MapKey"),
            scope_marker: ClassName::new("javax.inject", "Scope"),
            qualifier_marker: ClassName::new("javax.inject", "Qualifier"),
            base_types: vec![ClassName::new("com.bluelinelabs.conductor", "Controller")],
            generated_annotation: Some(ClassName::new("javax.annotation", "Generated")),
            processor_name: SmolStr::new("com.christianbahl.conductor.processor.ConductorProcessor"),
        }
    }
}

impl ProcessorOptions {
    /// Apply `-A`-style options on top of the defaults.
    ///
    /// Keys outside the `contributes.` namespace belong to other processors
    /// and are ignored.
    pub fn from_args(args: &IndexMap<String, String>) -> Result<Self, ConfigError> {
        let mut options = Self::default();
        for (key, value) in args {
            if !key.starts_with(OPTION_PREFIX) {
                continue;
            }
            let value = value.trim();
            match key.as_str() {
                OPT_BASE_TYPES => {
                    let bases = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(|s| parse_class(OPT_BASE_TYPES, s))
                        .collect::<Result<Vec<_>, _>>()?;
                    if bases.is_empty() {
                        return Err(ConfigError::EmptyBaseTypes(OPT_BASE_TYPES));
                    }
                    options.base_types = bases;
                }
                OPT_MARKER => options.marker = parse_class(OPT_MARKER, value)?,
                OPT_MODULE_MARKER => options.module_marker = parse_class(OPT_MODULE_MARKER, value)?,
                OPT_GENERATED_ANNOTATION => {
                    options.generated_annotation = match value {
                        "none" => None,
                        other => Some(parse_class(OPT_GENERATED_ANNOTATION, other)?),
                    };
                }
                OPT_PROCESSOR_NAME => {
                    if value.is_empty() {
                        return Err(ConfigError::EmptyValue(OPT_PROCESSOR_NAME));
                    }
                    options.processor_name = SmolStr::new(value);
                }
                _ => return Err(ConfigError::UnknownOption(key.clone())),
            }
        }
        tracing::debug!(
            marker = %options.marker,
            bases = options.base_types.len(),
            "processor options resolved"
        );
        Ok(options)
    }

    /// Option keys recognized by [`from_args`](Self::from_args).
    pub fn supported_options() -> &'static [&'static str] {
        &[
            OPT_BASE_TYPES,
            OPT_MARKER,
            OPT_MODULE_MARKER,
            OPT_GENERATED_ANNOTATION,
            OPT_PROCESSOR_NAME,
        ]
    }
}

fn parse_class(option: &'static str, value: &str) -> Result<ClassName, ConfigError> {
    ClassName::parse(value).map_err(|source| ConfigError::InvalidClassName { option, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let options = ProcessorOptions::default();
        assert_eq!(options.marker.simple_name(), "ContributesControllerInjector");
        assert_eq!(
            options.base_types,
            vec![ClassName::new("com.bluelinelabs.conductor", "Controller")]
        );
        assert!(options.generated_annotation.is_some());
    }

    #[test]
    fn test_from_args_overrides() {
        let options = ProcessorOptions::from_args(&args(&[
            (OPT_BASE_TYPES, "a.Controller, b.Fragment"),
            (OPT_GENERATED_ANNOTATION, "none"),
            (OPT_PROCESSOR_NAME, "my.Processor"),
            ("other.processor.flag", "anything"),
        ]))
        .unwrap();

        let names: Vec<String> = options.base_types.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["a.Controller", "b.Fragment"]);
        assert!(options.generated_annotation.is_none());
        assert_eq!(options.processor_name, "my.Processor");
    }

    #[test]
    fn test_from_args_rejects_unknown_key() {
        let err = ProcessorOptions::from_args(&args(&[("contributes.typo", "x")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownOption("contributes.typo".into()));
    }

    #[test]
    fn test_from_args_rejects_bad_class_name() {
        let err = ProcessorOptions::from_args(&args(&[(OPT_MARKER, "not a class")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidClassName { option: OPT_MARKER, .. }));
    }

    #[test]
    fn test_from_args_rejects_empty_bases() {
        let err = ProcessorOptions::from_args(&args(&[(OPT_BASE_TYPES, " , ")])).unwrap_err();
        assert_eq!(err, ConfigError::EmptyBaseTypes(OPT_BASE_TYPES));
    }

    #[test]
    fn test_supported_options_share_prefix() {
        assert!(ProcessorOptions::supported_options()
            .iter()
            .all(|opt| opt.starts_with(OPTION_PREFIX)));
    }
}
