/*!
Ordered, sparse collection of weak element references

[`Collection`] stores [`ElementId`]s by [`Position`]. Positions are not contiguous: removing an
element leaves a gap and appending continues after the highest position ever assigned.

Elements live in the [`Registry`](crate::Registry), so most operations go through bindings that
borrow the collection together with the element arena:

* [`CollectionRef`]: read access ([`Registry::collection_ref`](crate::Registry::collection_ref))
* [`CollectionMut`]: mutations ([`Registry::collection_mut`](crate::Registry::collection_mut))
*/

pub mod iter;

#[cfg(test)]
mod test;

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::Debug,
};

use derivative::Derivative;
use log::{trace, warn};

use crate::{
    element::Collectionnable,
    error::{Error, Result},
    registry::{self, CollectionId, ElementId},
    Arena,
};

use self::iter::{Ids, Iter};

/// Key of the sparse index of a [`Collection`]
pub type Position = usize;

/// Sparse index of element identities
///
/// Invariant: an element is in `positions` iff some position in `indices` maps to it.
#[derive(Derivative)]
#[derivative(Debug(bound = ""), Clone(bound = ""), Default(bound = ""))]
pub struct Collection<T> {
    /// Element identity → position. The identity is also the weak reference to the element.
    positions: HashMap<ElementId<T>, Position>,
    /// Position → element identity
    indices: BTreeMap<Position, ElementId<T>>,
    /// Highest position ever assigned
    last: Option<Position>,
    cursor: Cursor,
}

/// Traversal state of a [`Collection`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Cursor {
    /// The first live position
    #[default]
    Start,
    At(Position),
    /// Past the last live position
    End,
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live positions
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, element: ElementId<T>) -> bool {
        self.positions.contains_key(&element)
    }

    pub fn contains_position(&self, position: Position) -> bool {
        self.indices.contains_key(&position)
    }

    pub fn position(&self, element: ElementId<T>) -> Option<Position> {
        self.positions.get(&element).copied()
    }

    pub fn id_at(&self, position: Position) -> Option<ElementId<T>> {
        self.indices.get(&position).copied()
    }

    /// Position the next appended element gets. `None` if the positions are exhausted.
    pub fn next_position(&self) -> Option<Position> {
        match self.last {
            Some(last) => last.checked_add(1),
            None => Some(0),
        }
    }

    /// Fails if `n_appends` elements can't be appended without running out of positions
    pub(crate) fn ensure_room(&self, n_appends: usize) -> Result<()> {
        if n_appends == 0 {
            return Ok(());
        }

        self.next_position()
            .and_then(|next| next.checked_add(n_appends - 1))
            .map(|_| ())
            .ok_or(Error::PositionOverflow)
    }

    /// `(Position, ElementId)` in ascending position order
    pub fn ids(&self) -> Ids<T> {
        Ids {
            indices: self.indices.iter(),
        }
    }

    /// Drops the entry of the element without calling back to it. Called on element release.
    pub fn destroy(&mut self, element: ElementId<T>) {
        if let Some(position) = self.unlink(element) {
            trace!("destroyed element {} at {}", element.slot(), position);
        }
    }

    /// Places the element at `at`, or appends it if `at` is `None`. The element must not be a
    /// member yet.
    ///
    /// Appending fails with [`Error::PositionOverflow`] once `Position::MAX` has been assigned.
    pub(crate) fn link(&mut self, element: ElementId<T>, at: Option<Position>) -> Result<Position> {
        debug_assert!(!self.contains(element), "bug: linking a member twice");

        let position = match at {
            Some(position) => position,
            None => self.next_position().ok_or(Error::PositionOverflow)?,
        };
        if let Some(displaced) = self.indices.insert(position, element) {
            // NOTE: The displaced element is not told to unregister this collection. Releasing it
            // later is a no-op here.
            self.positions.remove(&displaced);
            trace!("element {} displaced from {}", displaced.slot(), position);
        }

        self.positions.insert(element, position);
        self.last = self.last.max(Some(position));
        Ok(position)
    }

    pub(crate) fn unlink(&mut self, element: ElementId<T>) -> Option<Position> {
        let position = self.positions.remove(&element)?;
        let removed = self.indices.remove(&position);
        debug_assert_eq!(removed, Some(element));
        Some(position)
    }
}

/// # ----- Cursor -----
///
/// Restartable traversal of live positions in ascending order:
///
/// ```
/// # use toy_collection::{Collection, Position};
/// # fn walk<T>(collection: &mut Collection<T>) {
/// collection.rewind();
/// while collection.is_valid() {
///     let _position: Option<Position> = collection.key();
///     collection.advance();
/// }
/// # }
/// ```
impl<T> Collection<T> {
    /// Current position, if the collection has any position to point at
    pub fn key(&self) -> Option<Position> {
        match self.cursor {
            Cursor::Start => self.indices.keys().next().copied(),
            Cursor::At(position) => Some(position),
            Cursor::End => None,
        }
    }

    /// Whether the current position holds an element
    pub fn is_valid(&self) -> bool {
        self.key()
            .map_or(false, |position| self.contains_position(position))
    }

    pub fn current_id(&self) -> Option<ElementId<T>> {
        self.key().and_then(|position| self.id_at(position))
    }

    /// Moves to the next live position, or past the end
    pub fn advance(&mut self) {
        let current = match self.key() {
            Some(position) => position,
            None => return,
        };

        self.cursor = current
            .checked_add(1)
            .and_then(|after| self.indices.range(after..).next())
            .map_or(Cursor::End, |(&position, _)| Cursor::At(position));
    }

    /// Moves back to the first live position
    pub fn rewind(&mut self) {
        self.cursor = Cursor::Start;
    }
}

/// Read-only binding of a [`Collection`] and the element arena
#[derive(Derivative)]
#[derivative(Debug(bound = "T: Debug"))]
pub struct CollectionRef<'a, T> {
    pub(crate) id: CollectionId<T>,
    pub(crate) collection: &'a Collection<T>,
    pub(crate) elements: &'a Arena<T>,
}

impl<'a, T> Clone for CollectionRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for CollectionRef<'a, T> {}

impl<'a, T> CollectionRef<'a, T> {
    pub fn id(&self) -> CollectionId<T> {
        self.id
    }

    pub fn collection(&self) -> &'a Collection<T> {
        self.collection
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn contains(&self, element: ElementId<T>) -> bool {
        self.collection.contains(element)
    }

    pub fn contains_position(&self, position: Position) -> bool {
        self.collection.contains_position(position)
    }

    /// Returns the element at the position.
    ///
    /// Reading an undefined offset is not an error: it logs a warning and returns `None`.
    pub fn get(&self, position: Position) -> Option<&'a T> {
        let element = match self.collection.id_at(position) {
            Some(element) => element,
            None => {
                warn!("undefined offset: {}", position);
                return None;
            }
        };

        self.elements.get(element)
    }

    /// Elements in ascending position order. Entries that no longer resolve are `None`.
    pub fn to_vec(&self) -> Vec<Option<&'a T>> {
        self.collection
            .ids()
            .map(|(_, element)| self.elements.get(element))
            .collect()
    }

    /// `(Position, &T)` in ascending position order
    pub fn iter(&self) -> Iter<'a, T> {
        Iter {
            ids: self.collection.ids(),
            elements: self.elements,
        }
    }

    /// See [`Collection::key`]
    pub fn key(&self) -> Option<Position> {
        self.collection.key()
    }

    /// See [`Collection::is_valid`]
    pub fn is_valid(&self) -> bool {
        self.collection.is_valid()
    }

    /// Element under the cursor
    pub fn current(&self) -> Option<&'a T> {
        self.collection
            .current_id()
            .and_then(|element| self.elements.get(element))
    }
}

impl<'a, T> IntoIterator for CollectionRef<'a, T> {
    type IntoIter = Iter<'a, T>;
    type Item = <Self::IntoIter as Iterator>::Item;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mutable binding of a [`Collection`] and the element arena
#[derive(Derivative)]
#[derivative(Debug(bound = "T: Debug"))]
pub struct CollectionMut<'a, T> {
    pub(crate) id: CollectionId<T>,
    pub(crate) collection: &'a mut Collection<T>,
    pub(crate) elements: &'a mut Arena<T>,
}

impl<'a, T> CollectionMut<'a, T> {
    pub fn id(&self) -> CollectionId<T> {
        self.id
    }

    /// Reborrows as a read-only binding
    pub fn view(&self) -> CollectionRef<'_, T> {
        CollectionRef {
            id: self.id,
            collection: &*self.collection,
            elements: &*self.elements,
        }
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn contains(&self, element: ElementId<T>) -> bool {
        self.collection.contains(element)
    }

    /// See [`CollectionRef::get`]
    pub fn get(&self, position: Position) -> Option<&T> {
        self.view().get(position)
    }

    /// See [`Collection::destroy`]
    pub fn destroy(&mut self, element: ElementId<T>) {
        self.collection.destroy(element);
    }

    /// See [`Collection::advance`]
    pub fn advance(&mut self) {
        self.collection.advance();
    }

    /// See [`Collection::rewind`]
    pub fn rewind(&mut self) {
        self.collection.rewind();
    }
}

/// # ----- Mutations -----
impl<'a, T: Collectionnable> CollectionMut<'a, T> {
    /// Appends the element after the highest position ever assigned. No-op if it's already a
    /// member.
    ///
    /// Fails with [`Error::PositionOverflow`] if `Position::MAX` is already assigned.
    pub fn add(&mut self, element: ElementId<T>) -> Result<&mut Self> {
        self.link(element, None)?;
        Ok(self)
    }

    /// Places the element at the position, replacing the element there (if any). No-op if it's
    /// already a member.
    ///
    /// The replaced element still believes it belongs to this collection.
    pub fn insert_at(&mut self, position: Position, element: ElementId<T>) -> Result<&mut Self> {
        self.link(element, Some(position))?;
        Ok(self)
    }

    /// [`add`](Self::add) if the position is `None`, [`insert_at`](Self::insert_at) otherwise
    pub fn set(&mut self, position: Option<Position>, element: ElementId<T>) -> Result<&mut Self> {
        self.link(element, position)?;
        Ok(self)
    }

    /// Puts `new` at the position of `old`
    ///
    /// Fails with [`Error::ItemNotFound`] if `old` is not a member. Like
    /// [`insert_at`](Self::insert_at), `old` is not told to unregister this collection.
    pub fn replace(&mut self, old: ElementId<T>, new: ElementId<T>) -> Result<&mut Self> {
        let position = self.collection.position(old).ok_or(Error::ItemNotFound)?;
        self.link(new, Some(position))?;
        Ok(self)
    }

    /// Removes the element and makes it forget this collection. No-op if it's not a member.
    pub fn remove(&mut self, element: ElementId<T>) -> &mut Self {
        if self.collection.contains(element) {
            self.forget(element);
            self.collection.unlink(element);
        }
        self
    }

    /// Removes the element at the position. No-op if the position is empty.
    pub fn unset(&mut self, position: Position) -> &mut Self {
        if let Some(element) = self.collection.id_at(position) {
            self.forget(element);
            self.collection.unlink(element);
        }
        self
    }

    /// Appends the elements in order.
    ///
    /// Every element is checked first: if any of them is released, or if they don't fit in the
    /// remaining positions, nothing is added.
    pub fn extend_from<I>(&mut self, elements: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = ElementId<T>>,
    {
        let elements = elements.into_iter().collect::<Vec<_>>();
        registry::ensure_live(&*self.elements, &elements)?;

        let n_appends = elements
            .iter()
            .filter(|element| !self.collection.contains(**element))
            .collect::<HashSet<_>>()
            .len();
        self.collection.ensure_room(n_appends)?;

        for element in elements {
            self.link(element, None)?;
        }
        Ok(self)
    }

    fn link(&mut self, element: ElementId<T>, at: Option<Position>) -> Result<()> {
        if self.collection.contains(element) {
            return Ok(());
        }

        if !self.elements.contains(element) {
            return Err(Error::released(element));
        }

        let position = self.collection.link(element, at)?;
        if let Some(data) = self.elements.get_mut(element) {
            data.register_collection(self.id);
        }

        trace!(
            "linked element {} to collection {} at {}",
            element.slot(),
            self.id.slot(),
            position
        );
        Ok(())
    }

    fn forget(&mut self, element: ElementId<T>) {
        if let Some(data) = self.elements.get_mut(element) {
            data.unregister_collection(self.id);
        }
    }
}
