//! Weak, self-cleaning [`Collection`]s layered on a generational [`Arena`].
//!
//! A [`Collection`] holds non-owning references ([`ElementId`]) to elements living in a
//! [`Registry`]. When an element is [released](Registry::release), it is removed from every
//! collection it was added to. When a collection is [dropped](Registry::drop_collection), its
//! elements forget about it.
//!
//! ```
//! use toy_collection::{impl_collectionnable, Membership, Registry};
//!
//! #[derive(Debug, Default)]
//! struct Item {
//!     name: &'static str,
//!     membership: Membership<Item>,
//! }
//!
//! impl_collectionnable!(Item, membership);
//!
//! let mut registry = Registry::<Item>::new();
//! let a = registry.insert(Item { name: "a", ..Default::default() });
//! let b = registry.insert(Item { name: "b", ..Default::default() });
//!
//! let items = registry.collection_from([a, b]).unwrap();
//! assert_eq!(registry.collection_ref(items).unwrap().len(), 2);
//!
//! // releasing an element removes it from the collection
//! registry.release(a);
//! let view = registry.collection_ref(items).unwrap();
//! assert_eq!(view.len(), 1);
//! assert_eq!(view.get(1).map(|item| item.name), Some("b"));
//! ```
//!
//! # Similar crates
//! * [generational_arena](https://docs.rs/generational_arena/latest)
//! * [thunderdome](https://docs.rs/thunderdome/latest)
//! * [slotmap](https://docs.rs/slotmap/latest)

pub mod collection;
pub mod element;
pub mod error;
pub mod example;
pub mod iter;
pub mod registry;


use std::{
    fmt::{self, Debug},
    hash::Hash,
    marker::PhantomData,
    num::*,
};

use derivative::Derivative;

use crate::iter::*;

pub use crate::{
    collection::{Collection, CollectionMut, CollectionRef, Position},
    element::{Collectionnable, Membership},
    error::{Error, Result},
    registry::{CollectionId, ElementId, Registry},
};

/// Default generation type used by arena.
pub type DefaultGen = NonZeroU32;

/// Generational arena with typed [`Index`].
///
/// It's basically a [`Vec`], but with fixed item positions. Removed slots are reused, and the
/// generation of the slot tells the old item from the new one.
#[derive(Derivative)]
#[derivative(Debug(bound = "T: Debug"), Clone(bound = "T: Clone"))]
pub struct Arena<T, G: Gen = DefaultGen> {
    entries: Vec<Entry<T, G>>,
    /// Free slots (LIFO)
    free: Vec<Slot>,
    n_items: usize,
}

#[derive(Derivative)]
#[derivative(Debug(bound = "T: Debug"), Clone(bound = "T: Clone"))]
pub(crate) struct Entry<T, G: Gen = DefaultGen> {
    pub(crate) gen: G,
    pub(crate) data: Option<T>,
}

/// Slot with identitiy based on generation.
///
/// Item in the [`Arena`] is located by [`Slot`] and identified by their generation. If the item at
/// a slot is removed and the slot is reused, the generation of the entry is incremented, so the
/// old index never resolves to the new item.
///
/// # Memory use
/// ```
/// use std::mem;
/// use toy_collection::Index;
/// assert_eq!(
///     mem::size_of::<Index<()>>(),
///     mem::size_of::<u64>(),
/// );
/// assert_eq!(
///     mem::size_of::<Option<Index<()>>>(),
///     mem::size_of::<u64>(),
/// );
/// ```
#[derive(Derivative)]
#[derivative(
    Copy(bound = ""),
    Clone(bound = ""),
    Debug(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = ""),
    Hash(bound = "")
)]
pub struct Index<T, G: Gen = DefaultGen> {
    slot: Slot,
    gen: G,
    /// Item type parameter
    #[derivative(Debug = "ignore")]
    _t: PhantomData<fn() -> T>,
}

impl<T, G: Gen> Index<T, G> {
    fn new(slot: Slot, gen: G) -> Self {
        Self {
            slot,
            gen,
            _t: PhantomData,
        }
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn gen(&self) -> G {
        self.gen
    }
}

type RawSlot = u32;

/// Raw index of the backing `Vec` in [`Arena`]. It can be [upgraded](`Arena::upgrade`) to
/// [`Index`].
#[derive(Copy, Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Slot {
    raw: RawSlot,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, f)
    }
}

impl Slot {
    /// Creates slot from raw value.
    pub fn from_raw(raw: RawSlot) -> Self {
        Self { raw }
    }

    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }
}

/// Generation type, one of the `NonZero` types in [`std::num`].
///
/// Generation of the first item at a slot is always `2` (since it's using `NonZero` type and we'll
/// always increase the generation on creating new value).
pub trait Gen: Debug + Clone + Copy + PartialEq + Eq + Hash + 'static {
    fn default_gen() -> Self;
    fn next(&mut self) -> Self;
}

macro_rules! impl_generators {
    ($($nonzero:ident),+ $(,)?) => {
        $(
            impl Gen for $nonzero {
                fn default_gen() -> Self {
                    $nonzero::MIN
                }

                fn next(&mut self) -> Self {
                    *self = self.checked_add(1).expect("generation overflow");
                    *self
                }
            }
        )+
    };
}

impl_generators!(NonZeroU8, NonZeroU16, NonZeroU32, NonZeroU64);

impl<T, G: Gen> Default for Arena<T, G> {
    fn default() -> Self {
        Self::with_capacity(4)
    }
}

impl<T, G: Gen> Arena<T, G> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        debug_assert!(cap < RawSlot::MAX as usize, "Too big arena");

        Self {
            entries: Vec::with_capacity(cap),
            free: Vec::new(),
            n_items: 0,
        }
    }

    /// Number of items in this arena.
    pub fn len(&self) -> usize {
        self.n_items
    }

    /// Capacity of the backing vec.
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// # ----- Mutations -----
impl<T, G: Gen> Arena<T, G> {
    pub fn insert(&mut self, data: T) -> Index<T, G> {
        let slot = self.next_free_slot();
        let entry = &mut self.entries[slot.to_usize()];

        debug_assert!(entry.data.is_none(), "bug: free slot occupied?");
        entry.data = Some(data);
        self.n_items += 1;

        Index::new(slot, entry.gen.next())
    }

    /// Returns some item if the generation matches. Returns none on mismatch or no data.
    pub fn remove(&mut self, index: Index<T, G>) -> Option<T> {
        let entry = self.entries.get_mut(index.slot.to_usize())?;
        if entry.gen != index.gen {
            // generation mistmatch: can't remove
            return None;
        }

        let data = entry.data.take()?;
        self.n_items -= 1;
        self.free.push(index.slot);
        Some(data)
    }

    fn next_free_slot(&mut self) -> Slot {
        if let Some(slot) = self.free.pop() {
            return slot;
        }

        let raw = RawSlot::try_from(self.entries.len()).expect("arena slot overflow");
        self.entries.push(Entry {
            gen: G::default_gen(),
            data: None,
        });
        Slot::from_raw(raw)
    }
}

/// # ----- Accessors -----
impl<T, G: Gen> Arena<T, G> {
    pub fn contains(&self, index: Index<T, G>) -> bool {
        self.get(index).is_some()
    }

    pub fn get(&self, index: Index<T, G>) -> Option<&T> {
        self.entries.get(index.slot.to_usize()).and_then(|entry| {
            if entry.gen == index.gen {
                entry.data.as_ref()
            } else {
                None
            }
        })
    }

    pub fn get_mut(&mut self, index: Index<T, G>) -> Option<&mut T> {
        self.entries
            .get_mut(index.slot.to_usize())
            .and_then(|entry| {
                if entry.gen == index.gen {
                    entry.data.as_mut()
                } else {
                    None
                }
            })
    }

    /// Upgrades slot to `Index` if the slot is occupied.
    pub fn upgrade(&self, slot: Slot) -> Option<Index<T, G>> {
        self.entries.get(slot.to_usize()).and_then(|e| {
            if e.data.is_some() {
                Some(Index::new(slot, e.gen))
            } else {
                None
            }
        })
    }
}

/// # ----- Iterators -----
impl<T, G: Gen> Arena<T, G> {
    /// `(Index, &T)`
    pub fn iter(&self) -> IndexedItems<T, G> {
        IndexedItems {
            entries: self.entries.iter().enumerate(),
            n_items: self.n_items,
            n_visited: 0,
        }
    }

    /// `&T`
    pub fn items(&self) -> Items<T, G> {
        Items {
            entries: self.entries.iter(),
            n_items: self.n_items,
            n_visited: 0,
        }
    }
}

impl<'a, T, G: Gen> IntoIterator for &'a Arena<T, G> {
    type IntoIter = IndexedItems<'a, T, G>;
    type Item = <Self::IntoIter as Iterator>::Item;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, G: Gen> FromIterator<T> for Arena<T, G> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut arena = Self::new();
        for data in iter {
            arena.insert(data);
        }
        arena
    }
}
