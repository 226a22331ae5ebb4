// Copyright 2022 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Designates an empty enum as the tag of a list.
/// You are supposed to define an empty enum for every role in which an element structure
/// can be linked into a list.
///
/// This is required, because a single element may be part of multiple lists, and henceforth
/// its element structure then contains multiple [`ListEntry`] fields.
/// To make all list functions insert and remove elements via the correct entry fields,
/// lists need to be uniquely identified, and this is what the empty enum types are for.
/// Tags only exist at compile time. Using an entry of one tag with a list of another tag is a
/// type error.
///
/// The easiest way to implement this trait is to use `derive`:
///
/// ```
/// # use tagged_list::ListTag;
/// #[derive(ListTag)]
/// enum ReadyQueue {}
/// ```
///
/// [`ListEntry`]: crate::list::ListEntry
pub trait ListTag {}
pub use tagged_list_macros::ListTag;

/// The tag used by [`ListEntry`] and [`ListHead`] when none is given.
///
/// It is enough for element structures that are only ever part of a single list.
///
/// [`ListEntry`]: crate::list::ListEntry
/// [`ListHead`]: crate::list::ListHead
pub enum DefaultTag {}
impl ListTag for DefaultTag {}

/// Designates a structure as a list element with a [`ListEntry`] field for the list
/// identified via the tag `L`.
///
/// You can implement this trait multiple times for a structure if it is part of multiple
/// lists (and therefore contains multiple entry fields).
///
/// The easiest way to implement this trait for all entry fields of a structure is to use
/// `derive` on the structure:
///
/// ```
/// # use tagged_list::{ListElement, ListTag};
/// # use tagged_list::list::ListEntry;
/// #[derive(ListTag)]
/// enum ReadyQueue {}
///
/// #[derive(ListTag)]
/// enum AllTasks {}
///
/// #[derive(Default, ListElement)]
/// struct Task {
///     ready: ListEntry<Self, ReadyQueue>,
///     all: ListEntry<Self, AllTasks>,
///     id: u32,
/// }
/// ```
///
/// # Safety
///
/// [`offset`](ListElement::offset) must return the byte offset of a field of type
/// `ListEntry<Self, L>` within `Self`.
/// The lists recover elements from their entries by subtracting this offset.
///
/// [`ListEntry`]: crate::list::ListEntry
pub unsafe trait ListElement<L: ListTag> {
    /// Returns the byte offset to the [`ListEntry`] field relative to the beginning of the
    /// element structure.
    ///
    /// [`ListEntry`]: crate::list::ListEntry
    fn offset() -> usize;
}
pub use tagged_list_macros::ListElement;
