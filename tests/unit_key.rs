/// Unit tests for binding keys and descriptors.

use bindery::{BindingKey, ContainerBuilder, Marker, Qualifier, Resolver, Scope};
use std::collections::HashMap;
use std::sync::Arc;

struct Widget;
struct Gadget;

trait Port: Send + Sync {}

#[test]
fn test_keys_split_by_type() {
    assert_ne!(BindingKey::of::<Widget>(), BindingKey::of::<Gadget>());
    assert_eq!(BindingKey::of::<Widget>(), BindingKey::of::<Widget>());
}

#[test]
fn test_keys_split_by_qualifier() {
    let plain = BindingKey::of::<Widget>();
    let spare = BindingKey::qualified::<Widget>("spare");
    let backup = BindingKey::qualified::<Widget>("backup");

    assert_ne!(plain, spare);
    assert_ne!(spare, backup);
    assert_eq!(spare, BindingKey::qualified::<Widget>("spare"));
}

#[test]
fn test_trait_objects_have_their_own_keys() {
    let concrete = BindingKey::of::<Widget>();
    let erased = BindingKey::of::<dyn Port>();
    assert_ne!(concrete, erased);
    assert!(erased.type_name().contains("Port"));
}

#[test]
fn test_marker_normalization_flows_into_keys() {
    assert_eq!(
        BindingKey::qualified::<Widget>("  spare  "),
        BindingKey::qualified::<Widget>("spare")
    );
    assert_ne!(
        BindingKey::qualified::<Widget>("Spare"),
        BindingKey::qualified::<Widget>("spare")
    );
}

#[test]
fn test_rendered_form() {
    let plain = BindingKey::of::<Widget>();
    assert!(plain.rendered().ends_with("Widget"));
    assert!(!plain.rendered().contains('@'));

    let marked = BindingKey::qualified::<Widget>("spare");
    assert!(marked.rendered().ends_with("Widget@spare"));
    assert_eq!(marked.rendered(), marked.to_string());
}

#[test]
fn test_qualifier_accessor() {
    let plain = BindingKey::of::<Widget>();
    assert_eq!(plain.qualifier(), &Qualifier::Unqualified);
    assert!(plain.qualifier().marker().is_none());

    let marked = BindingKey::qualified::<Widget>("spare");
    assert_eq!(marked.qualifier().marker().map(Marker::label), Some("spare"));
}

#[test]
fn test_keys_work_as_hash_map_keys() {
    let mut map = HashMap::new();
    map.insert(BindingKey::of::<Widget>(), 1);
    map.insert(BindingKey::qualified::<Widget>("spare"), 2);
    map.insert(BindingKey::of::<Gadget>(), 3);

    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&BindingKey::of::<Widget>()), Some(&1));
    assert_eq!(map.get(&BindingKey::qualified::<Widget>(" spare ")), Some(&2));
    assert_eq!(map.get(&BindingKey::qualified::<Gadget>("spare")), None);
}

#[test]
fn test_descriptors_report_the_registered_shape() {
    let mut builder = ContainerBuilder::new();
    builder
        .bind::<Widget>()
        .scoped(Scope::Singleton)
        .to_provider(|_| Ok(Arc::new(Widget)))
        .register()
        .unwrap();
    builder
        .bind::<Gadget>()
        .qualified_by("spare")
        .to_provider(|_| Ok(Arc::new(Gadget)))
        .register()
        .unwrap();

    let container = builder.build().unwrap();
    let descriptors = container.descriptors();
    assert_eq!(descriptors.len(), 2);

    let widget = descriptors
        .iter()
        .find(|d| d.type_name.contains("Widget"))
        .unwrap();
    assert_eq!(widget.scope, Scope::Singleton);
    assert!(!widget.is_qualified());
    assert_eq!(widget.declared_by, None);

    let gadget = descriptors
        .iter()
        .find(|d| d.type_name.contains("Gadget"))
        .unwrap();
    assert_eq!(gadget.scope, Scope::Prototype);
    assert_eq!(gadget.marker().map(Marker::label), Some("spare"));
    assert!(gadget.rendered_key().ends_with("Gadget@spare"));
}

#[test]
fn test_descriptors_sort_by_name_then_qualifier() {
    let mut builder = ContainerBuilder::new();
    builder
        .bind::<Widget>()
        .qualified_by("zeta")
        .to_provider(|_| Ok(Arc::new(Widget)))
        .register()
        .unwrap();
    builder
        .bind::<Widget>()
        .qualified_by("alpha")
        .to_provider(|_| Ok(Arc::new(Widget)))
        .register()
        .unwrap();
    builder
        .bind::<Widget>()
        .to_provider(|_| Ok(Arc::new(Widget)))
        .register()
        .unwrap();

    let descriptors = builder.descriptors();
    let keys: Vec<String> = descriptors.iter().map(|d| d.rendered_key()).collect();

    // Unqualified first, then markers in lexical order.
    assert_eq!(keys.len(), 3);
    assert!(keys[0].ends_with("Widget"));
    assert!(keys[1].ends_with("Widget@alpha"));
    assert!(keys[2].ends_with("Widget@zeta"));
}

#[test]
fn test_many_bindings_stay_addressable() {
    // Push the registry well past its small-table capacity.
    let mut builder = ContainerBuilder::new();
    for i in 0..64 {
        builder
            .bind::<u64>()
            .qualified_by(format!("slot-{}", i))
            .to_instance(i as u64)
            .register()
            .unwrap();
    }

    let container = builder.build().unwrap();
    for i in 0..64 {
        let value = container.get_with::<u64>(format!("slot-{}", i)).unwrap();
        assert_eq!(*value, i as u64);
    }
}
