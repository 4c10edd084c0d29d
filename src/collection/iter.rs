/*!
Iterator types for [`Collection`](crate::Collection)
*/

use std::{collections::btree_map, iter::FusedIterator};

use crate::{collection::Position, registry::ElementId, Arena};

/// [`Collection::ids`](crate::Collection::ids) → `(Position, ElementId)`
pub struct Ids<'a, T> {
    pub(crate) indices: btree_map::Iter<'a, Position, ElementId<T>>,
}

impl<'a, T> Iterator for Ids<'a, T> {
    type Item = (Position, ElementId<T>);
    fn next(&mut self) -> Option<Self::Item> {
        self.indices
            .next()
            .map(|(&position, &element)| (position, element))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Ids<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.indices
            .next_back()
            .map(|(&position, &element)| (position, element))
    }
}

impl<'a, T> FusedIterator for Ids<'a, T> {}
impl<'a, T> ExactSizeIterator for Ids<'a, T> {}

/// [`CollectionRef::iter`](crate::CollectionRef::iter) → `(Position, &T)`
///
/// Entries that no longer resolve are skipped.
pub struct Iter<'a, T> {
    pub(crate) ids: Ids<'a, T>,
    pub(crate) elements: &'a Arena<T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Position, &'a T);
    fn next(&mut self) -> Option<Self::Item> {
        let elements = self.elements;
        self.ids
            .by_ref()
            .find_map(|(position, element)| elements.get(element).map(|data| (position, data)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.ids.size_hint().1)
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> {}
