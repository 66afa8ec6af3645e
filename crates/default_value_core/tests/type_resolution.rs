use default_value_core::{
    ClassDescriptor, DeclarationKind, ExtensionDeclaration, Layer, ObjectType,
    ObjectTypeExtension, RegistryError, ResolvedTypeFactory, TypeDeclaration, TypeRegistry,
};
use std::sync::Arc;

#[derive(Debug)]
struct NamedType(&'static str);

impl ObjectType for NamedType {
    fn name(&self) -> &str {
        self.0
    }
}

#[derive(Debug)]
struct NamedExtension(&'static str);

impl ObjectTypeExtension for NamedExtension {
    fn name(&self) -> &str {
        self.0
    }
}

fn universe() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for descriptor in [
        ClassDescriptor::class("Foo"),
        ClassDescriptor::class("Bar"),
        ClassDescriptor::class("SubBar").extends("Bar"),
        ClassDescriptor::class("Qux"),
        ClassDescriptor::interface("Interface"),
        ClassDescriptor::class("ConcreteImpl").implements("Interface"),
    ] {
        registry.declare_class(descriptor).expect("declare class");
    }
    registry
}

fn register_type(registry: &mut TypeRegistry, class: &str, name: &'static str) {
    registry
        .register_type(TypeDeclaration::new(class, Arc::new(NamedType(name))))
        .expect("type registration");
}

fn register_extension(registry: &mut TypeRegistry, class: &str, name: &'static str, priority: i32) {
    registry
        .register_extension(
            ExtensionDeclaration::new(class, Arc::new(NamedExtension(name))).with_priority(priority),
        )
        .expect("extension registration");
}

#[test]
fn extensions_are_ordered_by_priority() {
    let mut registry = universe();
    register_type(&mut registry, "Foo", "DefaultType");
    register_extension(&mut registry, "Foo", "E1", 0);
    register_extension(&mut registry, "Foo", "E2", 10);

    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    let foo = factory.resolve("Foo").expect("resolve foo");

    assert_eq!(foo.class(), "Foo");
    assert_eq!(foo.inner_type_name(), "DefaultType");
    assert_eq!(foo.extension_names(), vec!["E2", "E1"]);
    assert!(foo.parent().is_none());
}

#[test]
fn equal_priorities_keep_registration_order() {
    let mut registry = universe();
    register_type(&mut registry, "Foo", "DefaultType");
    for name in ["first", "second", "third"] {
        register_extension(&mut registry, "Foo", name, 3);
    }
    register_extension(&mut registry, "Foo", "late_but_high", 4);

    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    for _ in 0..3 {
        let foo = factory.resolve("Foo").expect("resolve foo");
        assert_eq!(
            foo.extension_names(),
            vec!["late_but_high", "first", "second", "third"]
        );
    }
}

#[test]
fn repeated_resolution_returns_the_same_node() {
    let mut registry = universe();
    register_type(&mut registry, "Foo", "DefaultType");

    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    let first = factory.resolve("Foo").expect("first resolve");
    let second = factory.resolve("Foo").expect("second resolve");
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn unregistered_subclass_reuses_parent_node() {
    let mut registry = universe();
    register_type(&mut registry, "Bar", "BarType");

    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    let sub_bar = factory.resolve("SubBar").expect("resolve sub bar");
    let bar = factory.resolve("Bar").expect("resolve bar");

    assert!(Arc::ptr_eq(&sub_bar, &bar));
    assert_eq!(sub_bar.class(), "Bar");
    assert!(factory.is_cached("SubBar"));
}

#[test]
fn registered_subclass_gets_own_node_with_shared_parent() {
    let mut registry = universe();
    register_type(&mut registry, "Bar", "BarType");
    register_type(&mut registry, "SubBar", "SubBarType");
    register_extension(&mut registry, "Bar", "bar_ext", 0);
    register_extension(&mut registry, "SubBar", "sub_bar_ext", 0);

    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    let sub_bar = factory.resolve("SubBar").expect("resolve sub bar");
    let bar = factory.resolve("Bar").expect("resolve bar");

    assert!(!Arc::ptr_eq(&sub_bar, &bar));
    assert!(Arc::ptr_eq(sub_bar.parent().expect("parent node"), &bar));
    assert_eq!(sub_bar.extension_names(), vec!["sub_bar_ext"]);
    assert_eq!(bar.extension_names(), vec!["bar_ext"]);

    let layers = sub_bar.layers();
    let names: Vec<&str> = layers.iter().map(Layer::name).collect();
    assert_eq!(names, vec!["BarType", "bar_ext", "SubBarType", "sub_bar_ext"]);
}

#[test]
fn extension_on_interface_reaches_bound_implementation() {
    let mut registry = universe();
    registry
        .add_target_mapping("Interface", "ConcreteImpl")
        .expect("bind interface");
    register_type(&mut registry, "ConcreteImpl", "ImplType");
    register_extension(&mut registry, "Interface", "via_interface", 0);

    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    let concrete = factory.resolve("ConcreteImpl").expect("resolve concrete");
    assert_eq!(concrete.extension_names(), vec!["via_interface"]);

    let through_interface = factory.resolve("Interface").expect("resolve interface");
    assert!(Arc::ptr_eq(&concrete, &through_interface));
    assert!(factory.is_cached("Interface"));
    assert!(factory.is_cached("ConcreteImpl"));
}

#[test]
fn type_declared_for_interface_is_stored_under_bound_class() {
    let mut registry = universe();
    registry
        .add_target_mapping("Interface", "ConcreteImpl")
        .expect("bind interface");
    register_type(&mut registry, "Interface", "InterfaceType");

    assert!(registry.has_type("ConcreteImpl"));
    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    let node = factory.resolve("ConcreteImpl").expect("resolve concrete");
    assert_eq!(node.class(), "ConcreteImpl");
    assert_eq!(node.inner_type_name(), "InterfaceType");
}

#[test]
fn extension_without_base_type_is_not_resolvable() {
    let mut registry = universe();
    register_extension(&mut registry, "Qux", "orphan", 0);

    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    let err = factory.resolve("Qux").expect_err("qux has no type");
    assert_eq!(err, RegistryError::NoTypeFound("Qux".to_string()));
    assert!(!factory.is_cached("Qux"));
}

#[test]
fn extension_on_unknown_target_is_rejected_without_affecting_resolution() {
    let mut registry = universe();
    register_type(&mut registry, "Foo", "DefaultType");
    register_extension(&mut registry, "Foo", "kept", 0);
    let err = registry
        .register_extension(
            ExtensionDeclaration::new("Missing", Arc::new(NamedExtension("lost")))
                .with_service_id("test.default_value.type_extension.lost"),
        )
        .expect_err("unknown target must fail");
    assert_eq!(
        err,
        RegistryError::UnresolvedClassParameter {
            kind: DeclarationKind::TypeExtension,
            class: "Missing".to_string(),
            service_id: Some("test.default_value.type_extension.lost".to_string()),
        }
    );
    assert_eq!(registry.extension_count(), 1);

    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    let foo = factory.resolve("Foo").expect("foo still resolves");
    assert_eq!(foo.extension_names(), vec!["kept"]);

    let err = factory.resolve("Missing").expect_err("unknown class");
    assert!(matches!(err, RegistryError::UnresolvableHierarchy { .. }));
}

#[test]
fn remapping_the_class_a_type_was_stored_under_conflicts() {
    let mut registry = universe();
    registry
        .add_target_mapping("Interface", "ConcreteImpl")
        .expect("bind interface");
    register_type(&mut registry, "Interface", "InterfaceType");

    let err = registry
        .add_target_mapping("ConcreteImpl", "Foo")
        .expect_err("stored class cannot be rebound");
    assert!(matches!(err, RegistryError::ConflictingTarget { .. }));
    assert!(registry.has_type("ConcreteImpl"));

    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    let node = factory.resolve("ConcreteImpl").expect("resolve concrete");
    assert_eq!(node.inner_type_name(), "InterfaceType");
}

#[test]
fn declared_parent_overrides_class_hierarchy() {
    let mut registry = universe();
    register_type(&mut registry, "Foo", "FooType");
    register_type(&mut registry, "Bar", "BarType");
    registry
        .register_type(
            TypeDeclaration::new("SubBar", Arc::new(NamedType("SubBarType"))).with_parent("Foo"),
        )
        .expect("register sub bar");

    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    let sub_bar = factory.resolve("SubBar").expect("resolve sub bar");
    let foo = factory.resolve("Foo").expect("resolve foo");
    assert!(Arc::ptr_eq(sub_bar.parent().expect("parent"), &foo));
}

#[test]
fn leading_namespace_separator_hits_the_same_node() {
    let mut registry = universe();
    register_type(&mut registry, "Foo", "DefaultType");

    let factory = ResolvedTypeFactory::new(Arc::new(registry));
    let plain = factory.resolve("Foo").expect("plain name");
    let qualified = factory.resolve(r"\Foo").expect("qualified name");
    assert!(Arc::ptr_eq(&plain, &qualified));
}
