/*!
Owner of elements and collections

Neither side of the element ↔ collection association owns the other. Both are stored in arenas
owned by a [`Registry`] and refer to each other by generational [`Index`], which resolves to
nothing once the referent is removed. Destruction is explicit:

* [`Registry::release`] removes an element and tells every live collection it was added to.
* [`Registry::drop_collection`] removes a collection and tells its live elements to forget it.
*/


use std::fmt::Debug;

use derivative::Derivative;
use log::{debug, trace};

use crate::{
    collection::{Collection, CollectionMut, CollectionRef},
    element::Collectionnable,
    error::{Error, Result},
    iter::Items,
    Arena, DefaultGen, Index,
};

/// Identity of an element, also used as the weak reference to it
pub type ElementId<T> = Index<T>;

/// Identity of a collection, also used as the weak reference to it
pub type CollectionId<T> = Index<Collection<T>>;

/// Arenas of elements and collections
#[derive(Derivative)]
#[derivative(Debug(bound = "T: Debug"), Default(bound = ""))]
pub struct Registry<T> {
    elements: Arena<T>,
    collections: Arena<Collection<T>>,
}

/// Fails with [`Error::WrongItemType`] on the first element that is not in the arena.
pub(crate) fn ensure_live<T>(elements: &Arena<T>, ids: &[ElementId<T>]) -> Result<()> {
    match ids.iter().find(|id| !elements.contains(**id)) {
        Some(&id) => Err(Error::released(id)),
        None => Ok(()),
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(elements: usize, collections: usize) -> Self {
        Self {
            elements: Arena::with_capacity(elements),
            collections: Arena::with_capacity(collections),
        }
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of live collections
    pub fn n_collections(&self) -> usize {
        self.collections.len()
    }

    pub fn contains(&self, element: ElementId<T>) -> bool {
        self.elements.contains(element)
    }

    pub fn contains_collection(&self, collection: CollectionId<T>) -> bool {
        self.collections.contains(collection)
    }

    pub fn get(&self, element: ElementId<T>) -> Option<&T> {
        self.elements.get(element)
    }

    pub fn get_mut(&mut self, element: ElementId<T>) -> Option<&mut T> {
        self.elements.get_mut(element)
    }

    /// `&T` of every live element
    pub fn elements(&self) -> Items<T, DefaultGen> {
        self.elements.items()
    }

    /// Creates an empty collection
    pub fn collection(&mut self) -> CollectionId<T> {
        let id = self.collections.insert(Collection::new());
        debug!("created collection {}", id.slot());
        id
    }

    pub fn collection_ref(&self, collection: CollectionId<T>) -> Option<CollectionRef<'_, T>> {
        let binding = self.collections.get(collection)?;
        Some(CollectionRef {
            id: collection,
            collection: binding,
            elements: &self.elements,
        })
    }

    pub fn collection_mut(&mut self, collection: CollectionId<T>) -> Option<CollectionMut<'_, T>> {
        let binding = self.collections.get_mut(collection)?;
        Some(CollectionMut {
            id: collection,
            collection: binding,
            elements: &mut self.elements,
        })
    }
}

impl<T: Collectionnable> Registry<T> {
    /// Stores the element. It's not a member of any collection yet.
    pub fn insert(&mut self, element: T) -> ElementId<T> {
        self.elements.insert(element)
    }

    /// Destroys the element: it's removed from every live collection it was added to, then
    /// returned with an empty membership.
    ///
    /// Returns `None` if the element was already released.
    pub fn release(&mut self, element: ElementId<T>) -> Option<T> {
        let mut data = self.elements.remove(element)?;

        let mut n_notified = 0;
        for collection in data.membership_mut().take() {
            match self.collections.get_mut(collection) {
                Some(binding) => {
                    binding.destroy(element);
                    n_notified += 1;
                }
                None => trace!("skipping dropped collection {}", collection.slot()),
            }
        }

        debug!(
            "released element {} from {} collection(s)",
            element.slot(),
            n_notified
        );
        Some(data)
    }

    /// Creates a collection holding the elements in order.
    ///
    /// Fails with [`Error::WrongItemType`] if any of the elements is released. In that case no
    /// collection is created and no element is registered.
    pub fn collection_from<I>(&mut self, elements: I) -> Result<CollectionId<T>>
    where
        I: IntoIterator<Item = ElementId<T>>,
    {
        let elements = elements.into_iter().collect::<Vec<_>>();
        self::ensure_live(&self.elements, &elements)?;

        let id = self.collection();
        if let Some(mut binding) = self.collection_mut(id) {
            binding.extend_from(elements)?;
        }
        Ok(id)
    }

    /// Destroys the collection. Its live elements forget about it.
    ///
    /// Returns false if the collection was already dropped.
    pub fn drop_collection(&mut self, collection: CollectionId<T>) -> bool {
        let dropped = match self.collections.remove(collection) {
            Some(dropped) => dropped,
            None => return false,
        };

        for (_, element) in dropped.ids() {
            if let Some(data) = self.elements.get_mut(element) {
                data.unregister_collection(collection);
            }
        }

        debug!(
            "dropped collection {} with {} element(s)",
            collection.slot(),
            dropped.len()
        );
        true
    }
}
