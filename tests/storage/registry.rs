//! Integration tests for component type registration

use cairn_foundation::{Component, ErrorKind, FieldSink, Result};
use cairn_storage::Store;

#[derive(Clone, Debug, Default, PartialEq)]
struct Velocity {
    dx: f32,
    dy: f32,
}

impl Component for Velocity {
    const NAME: &'static str = "physics:Velocity";

    fn fields(&mut self, sink: &mut FieldSink<'_>) -> Result<()> {
        sink.field("dx", &mut self.dx)?;
        sink.field("dy", &mut self.dy)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Mass(f64);

impl Component for Mass {
    const NAME: &'static str = "physics:Mass";

    fn fields(&mut self, sink: &mut FieldSink<'_>) -> Result<()> {
        sink.field("kg", &mut self.0)
    }
}

mod other {
    use super::*;

    #[derive(Clone, Debug, Default)]
    pub struct Velocity(pub i32);

    impl Component for Velocity {
        const NAME: &'static str = "physics:Velocity";

        fn fields(&mut self, sink: &mut FieldSink<'_>) -> Result<()> {
            sink.field("v", &mut self.0)
        }
    }
}

#[test]
fn registries_are_per_store() {
    let mut a = Store::new();
    let mut b = Store::new();

    a.register_component::<Velocity>().unwrap();
    a.register_component::<Mass>().unwrap();
    b.register_component::<Mass>().unwrap();
    b.register_component::<Velocity>().unwrap();

    assert_eq!(a.registry().ordinal_of::<Velocity>().unwrap().index(), 0);
    assert_eq!(b.registry().ordinal_of::<Velocity>().unwrap().index(), 1);
}

#[test]
fn registering_creates_an_empty_container() {
    let mut store = Store::new();
    store.register_component::<Mass>().unwrap();

    let container = store.registered_container::<Mass>().unwrap();
    assert!(container.is_some_and(|c| c.is_empty()));
}

#[test]
fn colliding_name_is_rejected() {
    let mut store = Store::new();
    store.register_component::<Velocity>().unwrap();

    let err = store.register_component::<other::Velocity>().unwrap_err();
    match err.kind {
        ErrorKind::NameCollision { name, .. } => assert_eq!(name, "physics:Velocity"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!store.registry().contains::<other::Velocity>());
}

#[test]
fn unregistered_type_has_no_walkable_container() {
    let mut store = Store::new();
    let e = store.new_entity_id().unwrap();
    store.add_component(e, Mass(2.0));

    let err = store.registered_container::<Mass>().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnregisteredComponent(_)));
    assert_eq!(store.get::<Mass>(e), Some(&Mass(2.0)));
}

#[test]
fn lookup_by_name_reaches_the_descriptor() {
    let mut store = Store::new();
    store.register_component::<Mass>().unwrap();

    let descriptor = store.registry().by_name("physics:Mass").unwrap();
    assert!(descriptor.rust_type().ends_with("Mass"));
    assert!(store.registry().by_name("physics:Inertia").is_none());
}

#[test]
fn schema_is_captured_lazily_once() {
    let mut store = Store::new();
    store.register_component::<Velocity>().unwrap();
    assert!(store.registry().get::<Velocity>().unwrap().schema().is_none());

    let schema = store.schema_by_name("physics:Velocity").unwrap().to_vec();
    assert_eq!(schema.len(), 2);
    assert_eq!(
        store.registry().get::<Velocity>().unwrap().schema(),
        Some(schema.as_slice())
    );
}
