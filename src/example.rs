/*!
Example code and documentation

# Basic usage

Elements embed a [`Membership`] and implement [`Collectionnable`], usually with
[`impl_collectionnable`](crate::impl_collectionnable):

```
use toy_collection::{impl_collectionnable, Membership, Registry};

#[derive(Debug, Default)]
pub struct Enemy {
    hp: u32,
    groups: Membership<Enemy>,
}

impl_collectionnable!(Enemy, groups);

let mut registry = Registry::<Enemy>::new();
let e0 = registry.insert(Enemy { hp: 10, ..Default::default() });
let e1 = registry.insert(Enemy { hp: 20, ..Default::default() });
let e2 = registry.insert(Enemy { hp: 30, ..Default::default() });

// collections hold weak references to the elements
let targets = registry.collection_from([e0, e1]).unwrap();
let visible = registry.collection();
registry
    .collection_mut(visible)
    .unwrap()
    .add(e1)
    .unwrap()
    .add(e2)
    .unwrap();

// releasing an element removes it from every collection
registry.release(e1);
assert_eq!(registry.collection_ref(targets).unwrap().len(), 1);
assert_eq!(registry.collection_ref(visible).unwrap().len(), 1);
```

# Positions

Positions are sparse. Removal leaves a gap, and appending continues after the highest position
ever assigned:

```
use toy_collection::{impl_collectionnable, Membership, Registry};

#[derive(Debug, Default)]
pub struct Tag {
    name: &'static str,
    membership: Membership<Tag>,
}

impl_collectionnable!(Tag, membership);

let mut registry = Registry::<Tag>::new();
let ids = ["a", "b", "c", "d"]
    .iter()
    .map(|&name| registry.insert(Tag { name, ..Default::default() }))
    .collect::<Vec<_>>();

let tags = registry.collection_from(ids[..3].iter().copied()).unwrap();
let mut binding = registry.collection_mut(tags).unwrap();
binding.unset(1);
binding.add(ids[3]).unwrap();

let view = binding.view();
assert!(!view.contains_position(1));
assert_eq!(view.get(3).map(|tag| tag.name), Some("d"));

let positions = view.iter().map(|(position, _)| position).collect::<Vec<_>>();
assert_eq!(positions, vec![0, 2, 3]);
```

# Caveat: displaced elements

[`CollectionMut::insert_at`] and [`CollectionMut::replace`] overwrite the element at the position,
but the overwritten element is not told about it. It keeps the collection in its [`Membership`]
until it's released or the collection is dropped. Both are harmless: releasing it is a no-op for
the collection, and a dropped collection is skipped because its index no longer resolves.
*/

// for linking types in the docstring:
#[allow(unused)]
use crate::*;
