//! Single-value merges over the shared data set

use cairn::engine::System;
use cairn::foundation::{EntityId, ErrorKind};
use cairn::serial::StoreSerialize;

use crate::fixture::{
    Gameplay, HomPos, Position, e, gameplay, hom_pos, populated, position,
};

/// Records every visit so a test can compare the whole walk.
#[derive(Default)]
struct Collect {
    seen: Vec<(u64, Position, HomPos, Gameplay)>,
}

impl System for Collect {
    type Query = (Position, HomPos, Gameplay);

    fn execute(&mut self, entity: EntityId, (p, h, g): (&Position, &HomPos, &Gameplay)) {
        self.seen.push((entity.index(), p.clone(), h.clone(), g.clone()));
    }
}

fn walk(store: &cairn::storage::Store) -> Vec<(u64, Position, HomPos, Gameplay)> {
    let mut collect = Collect::default();
    collect.walk(store).unwrap();
    collect.seen
}

fn expected(index: u64) -> (u64, Position, HomPos, Gameplay) {
    (index, position(index), hom_pos(index), gameplay(index))
}

#[test]
fn merges_touch_only_their_target() {
    let mut store = populated();
    let doc = store.serialize_all_components().unwrap();
    store.clear_all_component_containers_immediately();
    store.deserialize_component_create(&doc).unwrap();
    store.renormalize(true).unwrap();
    assert_eq!(walk(&store), vec![expected(0), expected(2), expected(3)]);

    let new_pos = Position {
        x: 2.4,
        y: 3.43,
        z: 8.21,
        label: String::new(),
    };
    let change = store.serialize_value(&new_pos, e(3)).unwrap();
    store.deserialize_component_merge(&change, false).unwrap();
    store.renormalize(true).unwrap();

    let mut after = vec![expected(0), expected(2), expected(3)];
    after[2].1 = new_pos;
    assert_eq!(walk(&store), after);

    let new_hom = HomPos {
        x: 1.5,
        y: 2.5,
        z: 3.5,
        w: 5.0,
    };
    let change = store.serialize_value(&new_hom, e(1)).unwrap();
    store.deserialize_component_merge(&change, false).unwrap();
    store.renormalize(true).unwrap();

    // Entity 1 has no Position, so the three-type walk is unchanged.
    assert_eq!(walk(&store), after);
    assert_eq!(store.get::<HomPos>(e(1)), Some(&new_hom));
    assert_eq!(store.get::<HomPos>(e(2)), Some(&hom_pos(2)));
}

#[test]
fn merge_to_absent_entity_needs_insert() {
    let mut store = populated();
    let new_gp = Gameplay {
        health: 23,
        armor: 53,
    };
    let change = store.serialize_value(&new_gp, e(4)).unwrap();

    let err = store.deserialize_component_merge(&change, false).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownEntity { ref entity, .. } if *entity == e(4)));
    assert_eq!(store.len_of::<Gameplay>(), 4);

    assert_eq!(store.deserialize_component_merge(&change, true).unwrap(), 1);
    store.renormalize(true).unwrap();
    assert_eq!(store.get::<Gameplay>(e(4)), Some(&new_gp));
    assert_eq!(store.new_entity_id().unwrap(), e(5));

    // Entity 4 holds only a Gameplay, so it joins nothing.
    assert_eq!(walk(&store).len(), 3);
}

#[test]
fn merged_snapshot_differs_only_in_the_patched_section() {
    let mut store = populated();
    let before = store.serialize_all_components().unwrap();

    let change = store
        .serialize_value(&Gameplay { health: 1, armor: 2 }, e(2))
        .unwrap();
    store.deserialize_component_merge(&change, false).unwrap();
    let after = store.serialize_all_components().unwrap();

    for name in ["render:CompPosition", "render:CompHomPos"] {
        assert_eq!(before.get(name), after.get(name), "{name}");
    }
    assert_ne!(
        before.get("render:CompGameplay"),
        after.get("render:CompGameplay")
    );
}
