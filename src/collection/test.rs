use super::*;

use pretty_assertions::assert_eq;

use crate::test::{names, registry_with, take_warnings, Item};

#[test]
fn add() {
    let (mut registry, ids) = registry_with(&["a"]);
    let c = registry.collection();

    registry.collection_mut(c).unwrap().add(ids[0]).unwrap();

    let view = registry.collection_ref(c).unwrap();
    assert_eq!(view.len(), 1);
    assert!(view.contains(ids[0]));
    assert!(registry.get(ids[0]).unwrap().membership.contains(c));
}

#[test]
fn add_twice_is_noop() {
    let (mut registry, ids) = registry_with(&["a"]);
    let c = registry.collection();

    registry
        .collection_mut(c)
        .unwrap()
        .add(ids[0])
        .unwrap()
        .add(ids[0])
        .unwrap();

    assert_eq!(registry.collection_ref(c).unwrap().len(), 1);
    assert_eq!(registry.get(ids[0]).unwrap().membership.len(), 1);
}

#[test]
fn add_released_element() {
    let (mut registry, ids) = registry_with(&["a"]);
    let c = registry.collection();
    registry.release(ids[0]);

    let err = registry.collection_mut(c).unwrap().add(ids[0]).unwrap_err();
    assert!(matches!(err, Error::WrongItemType { .. }));
    assert_eq!(err.code(), Error::WRONG_ITEM_TYPE);
    assert!(registry.collection_ref(c).unwrap().is_empty());
}

#[test]
fn insert_at() {
    let (mut registry, ids) = registry_with(&["a"]);
    let c = registry.collection();

    registry.collection_mut(c).unwrap().insert_at(3, ids[0]).unwrap();

    let view = registry.collection_ref(c).unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view.get(3).map(|item| item.name), Some("a"));
    assert_eq!(view.collection().position(ids[0]), Some(3));
}

#[test]
fn insert_at_empty_then_append() {
    let (mut registry, ids) = registry_with(&["e", "f"]);
    let c = registry.collection();

    {
        let mut binding = registry.collection_mut(c).unwrap();
        binding.insert_at(5, ids[0]).unwrap();
        assert_eq!(binding.len(), 1);
        for position in 0..5 {
            assert!(!binding.view().contains_position(position));
        }
        binding.add(ids[1]).unwrap();
    }

    let view = registry.collection_ref(c).unwrap();
    assert_eq!(names(view), vec![(5, "e"), (6, "f")]);
}

#[test]
fn insert_at_overwrites_without_unregistering() {
    let (mut registry, ids) = registry_with(&["a", "b"]);
    let (a, b) = (ids[0], ids[1]);
    let c = registry.collection();

    registry
        .collection_mut(c)
        .unwrap()
        .add(a)
        .unwrap()
        .insert_at(0, b)
        .unwrap();

    let view = registry.collection_ref(c).unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view.get(0).map(|item| item.name), Some("b"));
    assert!(!view.contains(a));

    // the displaced element still believes it's a member
    assert!(registry.get(a).unwrap().membership.contains(c));

    // and releasing it doesn't touch the collection
    registry.release(a);
    let view = registry.collection_ref(c).unwrap();
    assert_eq!(names(view), vec![(0, "b")]);
}

#[test]
fn set() {
    let (mut registry, ids) = registry_with(&["a", "b"]);
    let c = registry.collection();

    registry
        .collection_mut(c)
        .unwrap()
        .set(None, ids[0])
        .unwrap()
        .set(Some(4), ids[1])
        .unwrap();

    let view = registry.collection_ref(c).unwrap();
    assert_eq!(names(view), vec![(0, "a"), (4, "b")]);
}

#[test]
fn remove() {
    let (mut registry, ids) = registry_with(&["a"]);
    let c = registry.collection();

    registry
        .collection_mut(c)
        .unwrap()
        .add(ids[0])
        .unwrap()
        .remove(ids[0]);

    assert!(registry.collection_ref(c).unwrap().is_empty());
    assert!(registry.get(ids[0]).unwrap().membership.is_empty());
}

#[test]
fn remove_absent_is_noop() {
    let (mut registry, ids) = registry_with(&["a", "b"]);
    let c = registry.collection_from([ids[0]]).unwrap();

    registry.collection_mut(c).unwrap().remove(ids[1]);

    assert_eq!(registry.collection_ref(c).unwrap().len(), 1);
}

#[test]
fn destroy_does_not_call_back() {
    let (mut registry, ids) = registry_with(&["a"]);
    let c = registry.collection_from([ids[0]]).unwrap();

    registry.collection_mut(c).unwrap().destroy(ids[0]);

    assert!(registry.collection_ref(c).unwrap().is_empty());
    assert!(registry.get(ids[0]).unwrap().membership.contains(c));
}

#[test]
fn replace() {
    let (mut registry, ids) = registry_with(&["a", "b", "c"]);
    let c = registry.collection_from([ids[0], ids[1]]).unwrap();

    registry.collection_mut(c).unwrap().replace(ids[0], ids[2]).unwrap();

    let view = registry.collection_ref(c).unwrap();
    assert_eq!(view.len(), 2);
    assert_eq!(names(view), vec![(0, "c"), (1, "b")]);
    assert!(!view.contains(ids[0]));
    assert!(registry.get(ids[0]).unwrap().membership.contains(c));
}

#[test]
fn replace_absent() {
    let (mut registry, ids) = registry_with(&["a", "b"]);
    let c = registry.collection();

    let err = registry
        .collection_mut(c)
        .unwrap()
        .replace(ids[0], ids[1])
        .unwrap_err();

    assert_eq!(err, Error::ItemNotFound);
    assert_eq!(err.code(), Error::ITEM_NOT_FOUND);
    assert!(registry.collection_ref(c).unwrap().is_empty());
}

#[test]
fn unset_leaves_gap() {
    let (mut registry, ids) = registry_with(&["a", "b", "c", "d"]);
    let c = registry.collection_from([ids[0], ids[1], ids[2]]).unwrap();

    {
        let mut binding = registry.collection_mut(c).unwrap();
        binding.unset(1);
        assert_eq!(binding.len(), 2);
        assert!(!binding.contains(ids[1]));
        assert!(!binding.view().contains_position(1));
        assert_eq!(binding.get(2).map(|item| item.name), Some("c"));

        binding.add(ids[3]).unwrap();
    }

    let view = registry.collection_ref(c).unwrap();
    assert_eq!(names(view), vec![(0, "a"), (2, "c"), (3, "d")]);
    assert!(registry.get(ids[1]).unwrap().membership.is_empty());
}

#[test]
fn unset_absent_is_noop() {
    let (mut registry, _ids) = registry_with(&[]);
    let c = registry.collection();

    registry.collection_mut(c).unwrap().unset(0);

    assert!(registry.collection_ref(c).unwrap().is_empty());
}

#[test]
fn append_never_reuses_positions() {
    let (mut registry, ids) = registry_with(&["a", "b", "c"]);
    let c = registry.collection_from([ids[0], ids[1]]).unwrap();

    let mut binding = registry.collection_mut(c).unwrap();
    binding.unset(1);
    assert_eq!(binding.view().collection().next_position(), Some(2));
    binding.add(ids[2]).unwrap();
    assert_eq!(binding.view().collection().position(ids[2]), Some(2));
}

#[test]
fn undefined_offset() {
    let (mut registry, _ids) = registry_with(&[]);
    let c = registry.collection();

    let view = registry.collection_ref(c).unwrap();
    let _ = take_warnings();
    assert!(view.get(1).is_none());
    assert_eq!(take_warnings(), vec!["undefined offset: 1".to_string()]);

    // a defined offset is silent
    let (mut registry, ids) = registry_with(&["a"]);
    let c = registry.collection_from([ids[0]]).unwrap();
    let _ = take_warnings();
    assert!(registry.collection_ref(c).unwrap().get(0).is_some());
    assert!(take_warnings().is_empty());
}

#[test]
fn append_after_last_position_fails() {
    let (mut registry, ids) = registry_with(&["e", "f"]);
    let (e, f) = (ids[0], ids[1]);
    let c = registry.collection();

    let mut binding = registry.collection_mut(c).unwrap();
    binding.insert_at(Position::MAX, e).unwrap();
    assert_eq!(binding.view().collection().next_position(), None);

    assert_eq!(binding.add(f).unwrap_err(), Error::PositionOverflow);
    assert_eq!(binding.set(None, f).unwrap_err(), Error::PositionOverflow);
    assert_eq!(binding.extend_from([f]).unwrap_err(), Error::PositionOverflow);

    // `e` stays in place and `f` is never registered
    let view = binding.view();
    assert_eq!(view.len(), 1);
    assert!(view.contains(e));
    assert!(!view.contains(f));
    assert_eq!(names(view), vec![(Position::MAX, "e")]);
    assert!(registry.get(e).unwrap().membership.contains(c));
    assert!(registry.get(f).unwrap().membership.is_empty());

    // explicit positions and members are still fine
    let mut binding = registry.collection_mut(c).unwrap();
    binding.add(e).unwrap().extend_from([e]).unwrap();
    binding.insert_at(0, f).unwrap();
    assert_eq!(names(binding.view()), vec![(0, "f"), (Position::MAX, "e")]);
}

#[test]
fn extend_from_checks_room_for_all() {
    let (mut registry, ids) = registry_with(&["a", "b", "c"]);
    let c = registry.collection();

    let mut binding = registry.collection_mut(c).unwrap();
    binding.insert_at(Position::MAX - 1, ids[0]).unwrap();

    // one position is left, and duplicates only need it once
    assert_eq!(
        binding.extend_from([ids[1], ids[2]]).unwrap_err(),
        Error::PositionOverflow
    );
    assert_eq!(binding.len(), 1);
    binding.extend_from([ids[1], ids[1], ids[0]]).unwrap();
    assert_eq!(
        names(binding.view()),
        vec![(Position::MAX - 1, "a"), (Position::MAX, "b")]
    );
    assert!(registry.get(ids[2]).unwrap().membership.is_empty());
}

#[test]
fn cursor_at_last_position() {
    let (mut registry, ids) = registry_with(&["a", "b"]);
    let c = registry.collection();

    let mut binding = registry.collection_mut(c).unwrap();
    binding
        .insert_at(1, ids[0])
        .unwrap()
        .insert_at(Position::MAX, ids[1])
        .unwrap();

    let mut visited = Vec::new();
    loop {
        let name = binding.view().current().map(|item| item.name);
        match name {
            Some(name) => visited.push(name),
            None => break,
        }
        binding.advance();
    }
    assert_eq!(visited, vec!["a", "b"]);
    assert_eq!(binding.view().key(), None);
    assert!(!binding.view().is_valid());
}

#[test]
fn to_vec() {
    let (mut registry, ids) = registry_with(&["a", "b"]);
    let c = registry.collection_from(ids.iter().copied()).unwrap();

    let view = registry.collection_ref(c).unwrap();
    let items = view.to_vec();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].map(|item| item.name), Some("b"));

    registry.release(ids[1]);
    let view = registry.collection_ref(c).unwrap();
    assert_eq!(view.to_vec().len(), 1);
}

#[test]
fn from_ids_matches_adding_one_by_one() {
    let (mut registry, ids) = registry_with(&["a", "b", "c"]);

    let built = registry.collection_from(ids.iter().copied()).unwrap();
    let added = registry.collection();
    {
        let mut binding = registry.collection_mut(added).unwrap();
        for &id in &ids {
            binding.add(id).unwrap();
        }
    }

    let built = registry.collection_ref(built).unwrap();
    let added = registry.collection_ref(added).unwrap();
    assert_eq!(built.len(), added.len());
    assert_eq!(names(built), names(added));
}

#[test]
fn extend_from_is_all_or_nothing() {
    let (mut registry, ids) = registry_with(&["a", "b"]);
    registry.release(ids[1]);
    let c = registry.collection();

    let err = registry
        .collection_mut(c)
        .unwrap()
        .extend_from(ids.iter().copied())
        .unwrap_err();

    assert!(matches!(err, Error::WrongItemType { .. }));
    assert!(registry.collection_ref(c).unwrap().is_empty());
    assert!(registry.get(ids[0]).unwrap().membership.is_empty());
}

#[test]
fn cursor() {
    let (mut registry, ids) = registry_with(&["a", "b", "c"]);
    let c = registry.collection();

    let mut binding = registry.collection_mut(c).unwrap();
    binding
        .insert_at(1, ids[0])
        .unwrap()
        .insert_at(4, ids[1])
        .unwrap()
        .add(ids[2])
        .unwrap();

    let walk = |binding: &mut CollectionMut<'_, Item>| {
        let mut visited = Vec::new();
        binding.rewind();
        while binding.view().is_valid() {
            let view = binding.view();
            visited.push((view.key().unwrap(), view.current().unwrap().name));
            binding.advance();
        }
        visited
    };

    let expected = vec![(1, "a"), (4, "b"), (5, "c")];
    assert_eq!(walk(&mut binding), expected);
    // restartable
    assert_eq!(walk(&mut binding), expected);

    // past the end
    assert!(!binding.view().is_valid());
    assert!(binding.view().current().is_none());
}

#[test]
fn cursor_survives_unset() {
    let (mut registry, ids) = registry_with(&["a", "b", "c"]);
    let c = registry.collection_from(ids.iter().copied()).unwrap();

    let mut binding = registry.collection_mut(c).unwrap();
    binding.rewind();
    binding.advance();
    assert_eq!(binding.view().key(), Some(1));

    binding.unset(1);
    assert!(!binding.view().is_valid());

    binding.advance();
    assert_eq!(binding.view().key(), Some(2));
    assert_eq!(binding.view().current().map(|item| item.name), Some("c"));
}

#[test]
fn cursor_on_empty() {
    let mut collection = Collection::<Item>::new();
    assert_eq!(collection.key(), None);
    assert!(!collection.is_valid());

    collection.advance();
    collection.rewind();
    assert_eq!(collection.current_id(), None);
}

#[test]
fn iter() {
    let (mut registry, ids) = registry_with(&["a", "b", "c"]);
    let c = registry.collection_from(ids.iter().copied()).unwrap();
    registry.collection_mut(c).unwrap().unset(0);

    let view = registry.collection_ref(c).unwrap();
    let mut visited = Vec::new();
    for (position, item) in view {
        assert!(view.contains_position(position));
        visited.push(item.name);
    }
    assert_eq!(visited, vec!["b", "c"]);

    let ids = view.collection().ids().rev().map(|(p, _)| p).collect::<Vec<_>>();
    assert_eq!(ids, vec![2, 1]);
}
