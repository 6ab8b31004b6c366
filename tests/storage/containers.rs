//! Integration tests for typed and type-erased containers

use cairn_foundation::{Component, EntityId, ErrorKind, FieldSink, FieldValue, Result, Tree};
use cairn_storage::{AnyContainer, Container, DuplicatePolicy, MergeOutcome, Store, StoreConfig};

#[derive(Clone, Debug, Default, PartialEq)]
struct Gameplay {
    health: i32,
    armor: i32,
}

impl Component for Gameplay {
    const NAME: &'static str = "render:CompGameplay";

    fn fields(&mut self, sink: &mut FieldSink<'_>) -> Result<()> {
        sink.field("health", &mut self.health)?;
        sink.field("armor", &mut self.armor)
    }
}

fn gp(health: i32, armor: i32) -> Gameplay {
    Gameplay { health, armor }
}

fn e(n: u64) -> EntityId {
    EntityId::new(n)
}

fn field(name: &str, value: i32) -> (String, Tree) {
    (name.to_string(), value.encode())
}

#[test]
fn lookup_works_while_dirty() {
    let mut c = Container::default();
    c.push(e(3), gp(3, 0));
    c.push(e(1), gp(1, 0));
    assert!(c.is_dirty());
    assert_eq!(c.get(e(1)), Some(&gp(1, 0)));
    assert_eq!(c.get(e(2)), None);
}

#[test]
fn iter_pairs_ids_with_values() {
    let mut c = Container::default();
    c.push(e(0), gp(10, 1));
    c.push(e(5), gp(50, 5));
    let pairs: Vec<_> = c.iter().map(|(id, v)| (id.index(), v.health)).collect();
    assert_eq!(pairs, vec![(0, 10), (5, 50)]);
}

#[test]
fn erased_container_is_reachable_by_name() {
    let mut store = Store::new();
    store.register_component::<Gameplay>().unwrap();
    store.add_component(e(2), gp(45, 21));

    let erased = store.erased_by_name("render:CompGameplay").unwrap();
    assert_eq!(erased.component_name(), "render:CompGameplay");
    assert_eq!(erased.len(), 1);
    assert_eq!(erased.ids(), &[e(2)]);

    let err = store.erased_by_name("render:Missing").err().unwrap();
    assert!(matches!(err.kind, ErrorKind::UnregisteredComponent(_)));
}

#[test]
fn erased_merge_patches_existing_slot() {
    let mut c: Container<Gameplay> = Container::default();
    c.push(e(1), gp(23, 123));

    let erased: &mut dyn AnyContainer = &mut c;
    let outcome = erased
        .merge_entry(e(1), None, &[field("armor", 7)], false)
        .unwrap();
    assert_eq!(outcome, MergeOutcome::Patched(1));
    assert_eq!(c.get(e(1)), Some(&gp(23, 7)));
}

#[test]
fn erased_merge_unknown_entity() {
    let mut c: Container<Gameplay> = Container::default();
    let erased: &mut dyn AnyContainer = &mut c;

    let err = erased
        .merge_entry(e(8), Some(1), &[field("health", 1)], false)
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnknownEntity { slot: Some(1), .. }
    ));

    let outcome = erased
        .merge_entry(e(8), None, &[field("health", 1)], true)
        .unwrap();
    assert_eq!(outcome, MergeOutcome::Inserted);
    assert_eq!(c.get(e(8)), Some(&gp(1, 0)));
}

#[test]
fn erased_insert_only_fills_the_next_free_slot() {
    let mut c: Container<Gameplay> = Container::default();
    c.push(e(4), gp(1, 1));
    let erased: &mut dyn AnyContainer = &mut c;

    let err = erased
        .merge_entry(e(4), Some(5), &[field("health", 9)], true)
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnknownEntity { slot: Some(5), .. }
    ));
    assert_eq!(erased.len(), 1);

    let outcome = erased
        .merge_entry(e(4), Some(1), &[field("health", 9)], true)
        .unwrap();
    assert_eq!(outcome, MergeOutcome::Inserted);
    assert_eq!(c.get_slot(e(4), 1), Some(&gp(9, 0)));
}

#[test]
fn encode_entries_follow_container_order() {
    let mut c: Container<Gameplay> = Container::default();
    c.push(e(0), gp(0, 0));
    c.push(e(3), gp(99, 892));
    let schema = AnyContainer::capture_schema(&c).unwrap();

    let entries = c.encode_entries(&schema).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].0, e(3));
    assert_eq!(entries[1].1, vec![field("health", 99), field("armor", 892)]);
}

#[test]
fn keep_all_renormalize_preserves_slot_order() {
    let mut c: Container<Gameplay> = Container::default();
    c.push(e(2), gp(1, 0));
    c.push(e(1), gp(9, 0));
    c.push(e(2), gp(2, 0));
    c.renormalize(false, DuplicatePolicy::KeepAll).unwrap();

    assert_eq!(c.ids(), &[e(1), e(2), e(2)]);
    assert_eq!(c.get_slot(e(2), 1), Some(&gp(2, 0)));
}

#[test]
fn initial_capacity_is_applied() {
    let mut store = Store::with_config(StoreConfig::default().with_initial_capacity(64));
    store.register_component::<Gameplay>().unwrap();
    assert_eq!(store.config().initial_capacity, 64);
    assert!(store.container::<Gameplay>().unwrap().is_empty());
}
