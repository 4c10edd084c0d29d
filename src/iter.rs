/*!
[`Arena`] iterator types
*/

use std::iter::{Enumerate, FusedIterator};

use crate::*;

/// [`Arena::items`] → `&T`
pub struct Items<'a, T, G: Gen> {
    pub(crate) entries: std::slice::Iter<'a, Entry<T, G>>,
    pub(crate) n_items: usize,
    pub(crate) n_visited: usize,
}

impl<'a, T, G: Gen> Iterator for Items<'a, T, G> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        while self.n_visited < self.n_items {
            let entry = self.entries.next()?;
            if let Some(data) = &entry.data {
                self.n_visited += 1;
                return Some(data);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.n_items - self.n_visited;
        (n, Some(n))
    }
}

impl<'a, T, G: Gen> FusedIterator for Items<'a, T, G> {}
impl<'a, T, G: Gen> ExactSizeIterator for Items<'a, T, G> {}

/// [`Arena::iter`] → `(Index, &T)`
pub struct IndexedItems<'a, T, G: Gen> {
    pub(crate) entries: Enumerate<std::slice::Iter<'a, Entry<T, G>>>,
    pub(crate) n_items: usize,
    pub(crate) n_visited: usize,
}

impl<'a, T, G: Gen> Iterator for IndexedItems<'a, T, G> {
    type Item = (Index<T, G>, &'a T);
    fn next(&mut self) -> Option<Self::Item> {
        while self.n_visited < self.n_items {
            let (slot, entry) = self.entries.next()?;
            if let Some(data) = &entry.data {
                self.n_visited += 1;
                // the arena never grows past `RawSlot::MAX` entries
                let slot = Slot::from_raw(slot as RawSlot);
                return Some((Index::new(slot, entry.gen), data));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.n_items - self.n_visited;
        (n, Some(n))
    }
}

impl<'a, T, G: Gen> FusedIterator for IndexedItems<'a, T, G> {}
impl<'a, T, G: Gen> ExactSizeIterator for IndexedItems<'a, T, G> {}
