//! Shared fixtures: a Conductor + Dagger compilation built in code.
#![allow(dead_code)]

use contributes::model::{AnnotationMirror, MethodElement, TypeDefId, TypeElement, TypeRef};
use contributes::{ClassName, SymbolTable};

pub const MARKER: &str = "com.christianbahl.conductor.ContributesControllerInjector";
pub const CONTROLLER: &str = "com.bluelinelabs.conductor.Controller";
pub const CONTROLLER_KEY: &str = "com.christianbahl.conductor.ControllerKey";

pub fn class(name: &str) -> ClassName {
    ClassName::parse(name).unwrap()
}

pub fn raw(name: &str) -> TypeRef {
    TypeRef::class(class(name))
}

/// The library types every compilation sees: the base controller and its
/// key annotation.
pub fn runtime_table() -> SymbolTable {
    let mut table = SymbolTable::new();
    table.add_type(TypeElement::class(class(CONTROLLER)).make_abstract());
    table.add_type(key_annotation(CONTROLLER_KEY, CONTROLLER));
    table
}

pub fn key_annotation(name: &str, base: &str) -> TypeElement {
    TypeElement::annotation_type(class(name))
        .annotated(AnnotationMirror::new(class("dagger.MapKey")))
        .with_method(MethodElement::new(
            "value",
            TypeRef::parameterized(class("java.lang.Class"), vec![TypeRef::wildcard_extends(raw(base))]),
        ))
}

pub fn controller(table: &mut SymbolTable, name: &str) -> TypeDefId {
    table.add_type(TypeElement::class(class(name)).extends(raw(CONTROLLER)))
}

pub fn module_type(name: &str) -> TypeElement {
    TypeElement::class(class(name))
        .make_abstract()
        .annotated(AnnotationMirror::new(class("dagger.Module")))
}

pub fn marker(modules: &[&str]) -> AnnotationMirror {
    let mirror = AnnotationMirror::new(class(MARKER));
    if modules.is_empty() {
        mirror
    } else {
        mirror.with_types("modules", modules.iter().map(|m| raw(m)))
    }
}

/// `@Marker(modules = ...) abstract <ret> <name>()`
pub fn contribution(name: &str, ret: TypeRef, modules: &[&str]) -> MethodElement {
    MethodElement::new(name, ret).make_abstract().annotated(marker(modules))
}
