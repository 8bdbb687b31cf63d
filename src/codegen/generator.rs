//! Descriptor → generated Java sources.
//!
//! For a descriptor declared as `Sample.controllerA()` returning
//! `MyController`, two compilation units are produced in `Sample`'s package:
//!
//! ```text
//! Sample_ControllerA                          binding module: files the factory
//!                                             in the injector map under
//!                                             @ControllerKey(MyController.class)
//! Sample_ControllerA_MyControllerSubcomponent injector factory for MyController
//! ```
//!
//! The shape of both files derives only from the descriptor, the key
//! annotation and the options, so equal inputs render byte-identical text.

use smol_str::SmolStr;

use crate::config::ProcessorOptions;
use crate::descriptor::InjectorDescriptor;
use crate::model::ClassName;
use super::java::{
    AnnotationMember, AnnotationSpec, JavaFile, MethodSpec, Modifier, TypeName, TypeSpec,
};

/// Runtime types the generated code is written against.
mod runtime {
    pub const PACKAGE_DAGGER: &str = "dagger";
    pub const PACKAGE_ANDROID: &str = "dagger.android";
    pub const PACKAGE_MULTIBINDINGS: &str = "dagger.multibindings";

    pub const BINDS: &str = "Binds";
    pub const SUBCOMPONENT: &str = "Subcomponent";
    pub const ANDROID_INJECTOR: &str = "AndroidInjector";
    pub const INTO_MAP: &str = "IntoMap";
    pub const BUILDER: &str = "Builder";
    pub const FACTORY: &str = "Factory";

    pub const BIND_METHOD: &str = "bindAndroidInjectorFactory";
    pub const BUILDER_PARAMETER: &str = "builder";
}

/// The two sources generated for one contribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedSources {
    /// Module contributing the injector factory to the dispatch map.
    pub binding_module: JavaFile,
    /// Injector and builder for the contributed type.
    pub subcomponent: JavaFile,
}

impl GeneratedSources {
    /// Both files, module first.
    pub fn files(&self) -> [&JavaFile; 2] {
        [&self.binding_module, &self.subcomponent]
    }
}

/// Builds generated sources from validated descriptors.
pub struct ContributionGenerator<'a> {
    options: &'a ProcessorOptions,
}

impl<'a> ContributionGenerator<'a> {
    pub fn new(options: &'a ProcessorOptions) -> Self {
        Self { options }
    }

    /// Name of the generated binding module, e.g. `Sample_ControllerA`.
    pub fn module_name(descriptor: &InjectorDescriptor) -> ClassName {
        let enclosing = descriptor.enclosing_module();
        let simple = format!(
            "{}_{}",
            enclosing.simple_names().join("_"),
            capitalize(descriptor.method_name())
        );
        ClassName::new(enclosing.package(), simple)
    }

    /// Name of the generated subcomponent, e.g.
    /// `Sample_ControllerA_MyControllerSubcomponent`.
    pub fn subcomponent_name(descriptor: &InjectorDescriptor) -> ClassName {
        let module = Self::module_name(descriptor);
        module.peer(format!(
            "{}_{}Subcomponent",
            module.simple_name(),
            descriptor.injected_type().simple_name()
        ))
    }

    /// Generate both sources; `map_key` is the key annotation for the
    /// descriptor's base type.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(injected = %descriptor.injected_type(), method = descriptor.method_name())
    )]
    pub fn generate(&self, descriptor: &InjectorDescriptor, map_key: &ClassName) -> GeneratedSources {
        let module_name = Self::module_name(descriptor);
        let subcomponent_name = Self::subcomponent_name(descriptor);

        let sources = GeneratedSources {
            binding_module: self.binding_module(descriptor, map_key, &module_name, &subcomponent_name),
            subcomponent: self.subcomponent(descriptor, &subcomponent_name),
        };
        tracing::debug!(
            module = %module_name,
            subcomponent = %subcomponent_name,
            "generated contribution"
        );
        sources
    }

    fn binding_module(
        &self,
        descriptor: &InjectorDescriptor,
        map_key: &ClassName,
        module_name: &ClassName,
        subcomponent_name: &ClassName,
    ) -> JavaFile {
        let injector = ClassName::new(runtime::PACKAGE_ANDROID, runtime::ANDROID_INJECTOR);
        let factory_type = TypeName::parameterized(
            injector.nested(runtime::FACTORY),
            vec![TypeName::subtype_of(descriptor.base_type().clone().into())],
        );

        let bind = MethodSpec::method(runtime::BIND_METHOD, factory_type)
            .annotated(AnnotationSpec::new(ClassName::new(runtime::PACKAGE_DAGGER, runtime::BINDS)))
            .annotated(AnnotationSpec::new(ClassName::new(
                runtime::PACKAGE_MULTIBINDINGS,
                runtime::INTO_MAP,
            )))
            .annotated(descriptor.map_key_annotation(map_key))
            .with_modifier(Modifier::Abstract)
            .with_parameter(
                subcomponent_name.nested(runtime::BUILDER).into(),
                runtime::BUILDER_PARAMETER,
            );

        let module_annotation = AnnotationSpec::new(self.options.module_marker.clone()).member(
            "subcomponents",
            AnnotationMember::Array(vec![AnnotationMember::ClassLiteral(subcomponent_name.clone())]),
        );

        let mut ty = TypeSpec::class(module_name.simple_name());
        if let Some(generated) = self.generated_annotation() {
            ty = ty.annotated(generated);
        }
        let ty = ty
            .annotated(module_annotation)
            .with_modifier(Modifier::Public)
            .with_modifier(Modifier::Abstract)
            .with_method(MethodSpec::constructor().with_modifier(Modifier::Private))
            .with_method(bind);

        JavaFile::new(module_name.package(), ty)
    }

    fn subcomponent(&self, descriptor: &InjectorDescriptor, name: &ClassName) -> JavaFile {
        let subcomponent = ClassName::new(runtime::PACKAGE_DAGGER, runtime::SUBCOMPONENT);
        let injector = ClassName::new(runtime::PACKAGE_ANDROID, runtime::ANDROID_INJECTOR);
        let injected: TypeName = descriptor.injected_type().clone().into();

        let modules = descriptor
            .injector_modules()
            .into_iter()
            .map(AnnotationMember::ClassLiteral)
            .collect();

        let mut ty = TypeSpec::interface(name.simple_name());
        if let Some(generated) = self.generated_annotation() {
            ty = ty.annotated(generated);
        }
        ty = ty.annotated(AnnotationSpec::new(subcomponent.clone()).member("modules", AnnotationMember::Array(modules)));
        for scope in descriptor.scopes() {
            ty = ty.annotated(scope.clone());
        }

        let builder = TypeSpec::class(runtime::BUILDER)
            .annotated(AnnotationSpec::new(subcomponent.nested(runtime::BUILDER)))
            .with_modifier(Modifier::Abstract)
            .extends(TypeName::parameterized(
                injector.nested(runtime::BUILDER),
                vec![injected.clone()],
            ));

        let ty = ty
            .with_modifier(Modifier::Public)
            .implements(TypeName::parameterized(injector, vec![injected]))
            .with_type(builder);

        JavaFile::new(name.package(), ty)
    }

    fn generated_annotation(&self) -> Option<AnnotationSpec> {
        let generated = self.options.generated_annotation.as_ref()?;
        Some(AnnotationSpec::new(generated.clone()).string_member("value", self.options.processor_name.clone()))
    }
}

fn capitalize(name: &str) -> SmolStr {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(chars.as_str());
            SmolStr::new(out)
        }
        None => SmolStr::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn class(name: &str) -> ClassName {
        ClassName::parse(name).unwrap()
    }

    fn descriptor(scopes: &[&str]) -> InjectorDescriptor {
        let mut builder = InjectorDescriptor::builder();
        builder
            .injected_type(class("com.example.MyController"))
            .base_type(class("com.bluelinelabs.conductor.Controller"))
            .add_module(class("com.example.Extra"))
            .enclosing_module(class("com.example.Sample"))
            .method_name("controllerA");
        for scope in scopes {
            builder.add_scope(AnnotationSpec::new(class(scope)));
        }
        builder.build().unwrap()
    }

    fn controller_key() -> ClassName {
        class("com.christianbahl.conductor.ControllerKey")
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("controllerA"), "ControllerA");
        assert_eq!(capitalize("x"), "X");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_generated_names() {
        let descriptor = descriptor(&[]);
        assert_eq!(
            ContributionGenerator::module_name(&descriptor),
            class("com.example.Sample_ControllerA")
        );
        assert_eq!(
            ContributionGenerator::subcomponent_name(&descriptor),
            class("com.example.Sample_ControllerA_MyControllerSubcomponent")
        );
    }

    #[test]
    fn test_nested_enclosing_module_names_are_joined() {
        let mut builder = InjectorDescriptor::builder();
        builder
            .injected_type(class("com.example.MyController"))
            .base_type(class("com.bluelinelabs.conductor.Controller"))
            .enclosing_module(class("com.example.Outer.Inner"))
            .method_name("bind");
        let descriptor = builder.build().unwrap();
        assert_eq!(
            ContributionGenerator::module_name(&descriptor),
            class("com.example.Outer_Inner_Bind")
        );
    }

    #[test]
    fn test_binding_module_output() {
        let options = ProcessorOptions::default();
        let sources = ContributionGenerator::new(&options).generate(&descriptor(&[]), &controller_key());

        let expected = "\
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
        assert_eq!(sources.binding_module.render(), expected);
    }

    #[test]
    fn test_subcomponent_output_with_scope() {
        let options = ProcessorOptions::default();
        let sources = ContributionGenerator::new(&options)
            .generate(&descriptor(&["com.example.scopes.ScreenScope"]), &controller_key());

        let expected = "\
package com.example;

import com.example.scopes.ScreenScope;
import dagger.Subcomponent;
import dagger.android.AndroidInjector;
import javax.annotation.Generated;

@Generated(\"com.christianbahl.conductor.processor.ConductorProcessor\")
@Subcomponent(modules = {Extra.class, Sample.class})
@ScreenScope
public interface Sample_ControllerA_MyControllerSubcomponent extends AndroidInjector<MyController> {
  @Subcomponent.Builder
  abstract class Builder extends AndroidInjector.Builder<MyController> {
  }
}
";
        assert_eq!(sources.subcomponent.render(), expected);
    }

    #[test]
    fn test_injected_type_named_like_nested_builder_stays_qualified() {
        let mut builder = InjectorDescriptor::builder();
        builder
            .injected_type(class("com.other.Builder"))
            .base_type(class("com.bluelinelabs.conductor.Controller"))
            .enclosing_module(class("com.example.Sample"))
            .method_name("b");
        let descriptor = builder.build().unwrap();
        let options = ProcessorOptions::default();
        let sources = ContributionGenerator::new(&options).generate(&descriptor, &controller_key());

        let expected = "\
package com.example;

import dagger.Subcomponent;
import dagger.android.AndroidInjector;
import javax.annotation.Generated;

@Generated(\"com.christianbahl.conductor.processor.ConductorProcessor\")
@Subcomponent(modules = Sample.class)
public interface Sample_B_BuilderSubcomponent extends AndroidInjector<com.other.Builder> {
  @Subcomponent.Builder
  abstract class Builder extends AndroidInjector.Builder<com.other.Builder> {
  }
}
";
        assert_eq!(sources.subcomponent.render(), expected);

        let module = sources.binding_module.render();
        assert!(module.contains("import com.other.Builder;"));
        assert!(module.contains("@ControllerKey(Builder.class)"));
        assert!(module.contains("(Sample_B_BuilderSubcomponent.Builder builder)"));
    }

    #[test]
    fn test_generated_annotation_can_be_disabled() {
        let options = ProcessorOptions {
            generated_annotation: None,
            ..ProcessorOptions::default()
        };
        let sources = ContributionGenerator::new(&options).generate(&descriptor(&[]), &controller_key());
        for file in sources.files() {
            assert!(!file.render().contains("Generated"));
        }
    }

    #[test]
    fn test_identical_descriptors_render_identically() {
        let options = ProcessorOptions::default();
        let generator = ContributionGenerator::new(&options);
        let first = generator.generate(&descriptor(&["a.Scope"]), &controller_key());
        let second = generator.generate(&descriptor(&["a.Scope"]), &controller_key());

        assert_eq!(first, second);
        for (a, b) in first.files().iter().zip(second.files()) {
            assert_eq!(a.render(), b.render());
        }
    }
}
