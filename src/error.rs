//! Error kinds of collection operations

use std::any;

use crate::registry::ElementId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Contract violations. They're raised synchronously and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A value given where a live element was expected
    #[error("Expected: {expected}, got: {actual}")]
    WrongItemType {
        expected: &'static str,
        actual: String,
    },

    /// [`replace`](crate::CollectionMut::replace) was called with an element that is not a member
    #[error("Object not found")]
    ItemNotFound,

    /// An append was requested after the last representable position had been assigned
    #[error("No position left to append")]
    PositionOverflow,
}

impl Error {
    pub const ITEM_NOT_FOUND: u32 = 0x431;
    pub const WRONG_ITEM_TYPE: u32 = 0x432;
    pub const POSITION_OVERFLOW: u32 = 0x433;

    /// Numeric error code
    pub fn code(&self) -> u32 {
        match self {
            Self::WrongItemType { .. } => Self::WRONG_ITEM_TYPE,
            Self::ItemNotFound => Self::ITEM_NOT_FOUND,
            Self::PositionOverflow => Self::POSITION_OVERFLOW,
        }
    }

    /// [`Error::WrongItemType`] expecting an item of type `T`
    pub fn wrong_item_type<T>(actual: impl Into<String>) -> Self {
        Self::WrongItemType {
            expected: any::type_name::<T>(),
            actual: actual.into(),
        }
    }

    pub(crate) fn released<T>(element: ElementId<T>) -> Self {
        Self::wrong_item_type::<T>(format!("released element at slot {}", element.slot()))
    }
}
