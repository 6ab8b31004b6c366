//! Snapshot, bytes and create over the shared data set

use cairn::engine::System;
use cairn::foundation::{EntityId, Tree};
use cairn::serial::{StoreSerialize, flatten, parse};

use crate::fixture::{Gameplay, HomPos, Position, e, populated, position, registered};

struct CountAll(usize);

impl System for CountAll {
    type Query = (Position, HomPos, Gameplay);

    fn execute(&mut self, _entity: EntityId, _item: (&Position, &HomPos, &Gameplay)) {
        self.0 += 1;
    }
}

fn entity_ids(doc: &Tree, name: &str) -> Vec<i64> {
    let parts = doc
        .get(name)
        .and_then(Tree::as_obj)
        .and_then(Tree::as_array)
        .unwrap();
    parts[1]
        .as_obj()
        .and_then(Tree::as_array)
        .unwrap()
        .iter()
        .step_by(2)
        .map(|node| node.as_int64().unwrap())
        .collect()
}

#[test]
fn snapshot_lists_each_type_in_entity_order() {
    let doc = populated().serialize_all_components().unwrap();

    let names: Vec<_> = doc.as_dict().unwrap().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        names,
        vec!["render:CompPosition", "render:CompHomPos", "render:CompGameplay"]
    );
    assert_eq!(entity_ids(&doc, "render:CompPosition"), vec![0, 2, 3]);
    assert_eq!(entity_ids(&doc, "render:CompHomPos"), vec![0, 1, 2, 3]);
    assert_eq!(entity_ids(&doc, "render:CompGameplay"), vec![0, 1, 2, 3]);
}

#[test]
fn position_fields_keep_declaration_order_and_carriers() {
    let doc = populated().serialize_all_components().unwrap();
    let parts = doc
        .get("render:CompPosition")
        .and_then(Tree::as_obj)
        .and_then(Tree::as_array)
        .unwrap();
    let entries = parts[1].as_obj().and_then(Tree::as_array).unwrap();
    let fields = entries[1].as_obj().and_then(Tree::as_dict).unwrap();

    let keys: Vec<_> = fields.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["pos-x", "pos-y", "pos-z", "my-str"]);
    assert!(matches!(fields[0].1, Tree::Int32(_)));
    assert_eq!(fields[3].1.as_str(), Some("st1"));
}

#[test]
fn deferred_clear_then_create_restores_the_store() {
    let mut store = populated();
    let doc = store.serialize_all_components().unwrap();

    store.clear_all_component_containers();
    store.deserialize_component_create(&doc).unwrap();
    store.renormalize(true).unwrap();

    assert_eq!(store.serialize_all_components().unwrap(), doc);
    let mut count = CountAll(0);
    count.walk(&store).unwrap();
    assert_eq!(count.0, 3);
}

#[test]
fn immediate_clear_then_create_restores_the_store() {
    let mut store = populated();
    let doc = store.serialize_all_components().unwrap();

    store.clear_all_component_containers_immediately();
    assert_eq!(store.entity_count(), 0);
    store.deserialize_component_create(&doc).unwrap();
    store.renormalize(true).unwrap();

    assert_eq!(store.get::<Position>(e(2)), Some(&position(2)));
    assert_eq!(store.entity_count(), 4);
}

#[test]
fn bytes_restore_into_a_fresh_store() {
    let source = populated();
    let bytes = flatten(&source.serialize_all_components().unwrap()).unwrap();

    let mut target = registered();
    target.deserialize_component_create(&parse(&bytes).unwrap()).unwrap();
    target.renormalize(true).unwrap();

    assert_eq!(
        target.serialize_all_components().unwrap(),
        source.serialize_all_components().unwrap()
    );
    assert_eq!(target.new_entity_id().unwrap(), e(4));
}

mod proptests {
    use cairn::foundation::EntityId;
    use cairn::serial::{StoreSerialize, flatten, parse};
    use proptest::prelude::*;

    use crate::fixture::{Gameplay, registered};

    proptest! {
        #[test]
        fn any_gameplay_set_survives_bytes(
            rows in prop::collection::btree_map(0_u64..64, (any::<i32>(), any::<i32>()), 0..32)
        ) {
            let mut source = registered();
            for (&id, &(health, armor)) in &rows {
                source.add_component(EntityId::new(id), Gameplay { health, armor });
            }
            source.renormalize(true).unwrap();
            let doc = source.serialize_all_components().unwrap();

            let mut target = registered();
            target.deserialize_component_create(&parse(&flatten(&doc).unwrap()).unwrap()).unwrap();
            target.renormalize(true).unwrap();

            prop_assert_eq!(target.serialize_all_components().unwrap(), doc);
            for (&id, &(health, armor)) in &rows {
                prop_assert_eq!(
                    target.get::<Gameplay>(EntityId::new(id)),
                    Some(&Gameplay { health, armor })
                );
            }
        }
    }
}
