/*!
Element side of the weak association: the [`Collectionnable`] capability

An element remembers which collections it was added to, so that [`Registry::release`] can tell
each of them to forget the element. The bookkeeping lives in [`Membership`], which elements embed
and expose through the trait.

[`Registry::release`]: crate::Registry::release
*/


use std::collections::{hash_set, HashSet};

use derivative::Derivative;

use crate::registry::CollectionId;

/// Capability of values storable in a [`Collection`](crate::Collection)
///
/// Only [`membership`](Self::membership) and [`membership_mut`](Self::membership_mut) are
/// required. [`impl_collectionnable`](crate::impl_collectionnable) writes them for a struct
/// field.
pub trait Collectionnable: Sized {
    fn membership(&self) -> &Membership<Self>;

    fn membership_mut(&mut self) -> &mut Membership<Self>;

    /// Records the collection. Registering twice is the same as registering once.
    fn register_collection(&mut self, collection: CollectionId<Self>) {
        self.membership_mut().insert(collection);
    }

    /// Forgets the collection. No-op if it was not registered.
    fn unregister_collection(&mut self, collection: CollectionId<Self>) {
        self.membership_mut().remove(collection);
    }
}

/// Non-owning references to the collections an element belongs to, keyed by collection identity
#[derive(Derivative)]
#[derivative(
    Debug(bound = ""),
    Clone(bound = ""),
    Default(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = "")
)]
pub struct Membership<T> {
    collections: HashSet<CollectionId<T>>,
}

impl<T> Membership<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn contains(&self, collection: CollectionId<T>) -> bool {
        self.collections.contains(&collection)
    }

    /// Returns true if the collection was not registered yet
    pub fn insert(&mut self, collection: CollectionId<T>) -> bool {
        self.collections.insert(collection)
    }

    /// Returns true if the collection was registered
    pub fn remove(&mut self, collection: CollectionId<T>) -> bool {
        self.collections.remove(&collection)
    }

    /// Takes every registration, leaving this membership empty
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Registered collections in arbitrary order. Some of them may be already dropped.
    pub fn iter(&self) -> impl Iterator<Item = CollectionId<T>> + '_ {
        self.collections.iter().copied()
    }
}

impl<T> IntoIterator for Membership<T> {
    type Item = CollectionId<T>;
    type IntoIter = hash_set::IntoIter<CollectionId<T>>;
    fn into_iter(self) -> Self::IntoIter {
        self.collections.into_iter()
    }
}

/// Implements [`Collectionnable`] for a struct with a [`Membership`] field
///
/// # Example
/// ```
/// use toy_collection::{impl_collectionnable, Membership};
///
/// #[derive(Debug, Default)]
/// pub struct Enemy {
///     hp: u32,
///     groups: Membership<Enemy>,
/// }
///
/// impl_collectionnable!(Enemy, groups);
/// ```
#[macro_export]
macro_rules! impl_collectionnable {
    ($ty:ty, $field:ident) => {
        impl $crate::Collectionnable for $ty {
            fn membership(&self) -> &$crate::Membership<Self> {
                &self.$field
            }

            fn membership_mut(&mut self) -> &mut $crate::Membership<Self> {
                &mut self.$field
            }
        }
    };
}
